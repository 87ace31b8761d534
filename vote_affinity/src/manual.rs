/*!

This is the long-form manual for `vote_affinity` and `mepmatch`.

## Input formats

Three static files describe the parliament. They are produced offline and are
never modified by the program.

### Member roster

A JSON array of members:

```text
[
  {"id": "124831", "name": "Ana Pérez", "country": "Spain", "group": "S&D",
   "party": "Partido Socialista Obrero Español", "party_sig": "PSOE", "image": "https://..."}
]
```

All the fields except `id` are optional. `id` may also be a number. `photo` is
accepted in place of `image`. A member without a name is displayed with its id.

### Vote catalogue

A JSON array of votes. Several spellings of the fields are accepted, because the
catalogues come from different sources:

| field           | accepted names                |
|-----------------|-------------------------------|
| id              | `voteId`, `id`                |
| question        | `question`, `q`, `title`      |
| explanation     | `queSeVota`, `explanation`    |
| arguments for   | `aFavor` (string or array)    |
| arguments against | `enContra` (string or array) |
| source          | `url`                         |

Votes without an id or without a question are dropped.

### Position matrix

A JSON object keyed by vote id. Each value is an object keyed by member id, with
the recorded position of the member:

```text
{"168201": {"124831": 1, "97058": -1, "28297": 0, "4746": null}}
```

`1` is a vote for, `-1` a vote against, `0` an abstention. `null` means the member
was absent. Any other value is treated as absent too.

### Answers

Either a JSON object with the same encoding as one row of the matrix
(`{"168201": 1, "168305": -1}`), or a CSV file:

```text
vote_id,position
168201,for
168305,-1
```

The header is optional. The position can be written `1`/`-1`/`0`, `+`/`-`,
or `for`/`against`/`abstention`.

## Affinity

For every member, the engine counts the answered votes on which the member also has
a recorded position (the *overlap*), and how many of them agree with the user.

- `coverage` mode (the default) multiplies the agreement rate by the share of the
  user's answers covered by the member. A member who voted on 5 of 8 answered votes
  and agreed on 3 of them has an affinity of 3/5 × 5/8 = 37.5%.
- `raw` mode only uses the agreement rate: 60% in the example above.

Members with an overlap below `minOverlap` (5 by default) are not scored. With
`abstentionSoft`, a disagreement where one side abstained counts for half.

## Ranking

Affinities are displayed as whole percentages. Members with the same percentage
share a position: `dense` numbering gives 1, 1, 2, 3 and `competition` numbering
gives 1, 1, 3, 4. The same numbering is applied independently inside every
sub-group (by `country`, `group` or `party`). Searching by name, group or country
keeps the global positions.

Members that were not scored are ranked at the end with an affinity of 0. Their
`standing` tells apart members with too few votes in common (`insufficientOverlap`)
from members that did not vote on any answered question (`notAnswered`).

## Configuration

`mepmatch` accepts a configuration file in JSON. Paths are relative to the file.

```text
{
  "dataSources": {"members": "members.json", "votes": "votes.json",
                  "matrix": "matrix.json", "answers": "answers.json"},
  "options": {"mode": "coverage", "minOverlap": 5, "abstentionSoft": false,
              "rankingMode": "dense", "subgroup": "country"},
  "quiz": {"size": 10, "seed": 0},
  "outputSettings": {"outputPath": "summary.json", "limit": 10}
}
```

Every option can also be given on the command line, which takes precedence.
 */
