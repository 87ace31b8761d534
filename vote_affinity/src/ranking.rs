//! Rank positions, sub-group rankings and search views derived from the scores.
//!
//! The presentation never re-orders the members compared to [crate::score]: it
//! only completes the list with the members that did not pass the overlap
//! threshold and assigns the rank numbers.

use log::{debug, info};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::config::*;

/// Why a member has (or does not have) an affinity.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Standing {
    /// The member passed the overlap threshold.
    Scored,
    /// The member voted on some of the answered votes, but not enough of them.
    InsufficientOverlap,
    /// The member has no recorded position on any of the answered votes.
    NotAnswered,
}

#[derive(PartialEq, Debug, Clone)]
pub struct RankedEntry {
    pub member: Member,
    /// 0 unless the member was scored.
    pub affinity: f64,
    pub overlap: u32,
    pub coverage: f64,
    pub standing: Standing,
    /// 1-based, ties share a position.
    pub global_position: u32,
    /// 1-based, only when the member has a value for the sub-group key.
    pub subgroup_position: Option<u32>,
}

impl RankedEntry {
    pub fn percent(&self) -> u32 {
        affinity_percent(self.affinity)
    }

    fn matches(&self, needle: &str) -> bool {
        let fields = [
            Some(self.member.name.as_str()),
            self.member.group.as_deref(),
            self.member.country.as_deref(),
        ];
        fields
            .iter()
            .flatten()
            .any(|f| f.to_lowercase().contains(needle))
    }
}

/// An incremental reveal count over an already sorted list.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct Reveal {
    pub shown: usize,
    pub step: usize,
}

impl Reveal {
    pub const DEFAULT_REVEAL: Reveal = Reveal { shown: 10, step: 10 };

    /// A step of zero is raised to one.
    pub fn new(initial: usize, step: usize) -> Reveal {
        Reveal {
            shown: initial,
            step: step.max(1),
        }
    }

    /// Shows one more step.
    pub fn more(&mut self) {
        self.shown = self.shown.saturating_add(self.step.max(1));
    }

    pub fn reset(&mut self, initial: usize) {
        self.shown = initial;
    }

    pub fn has_more(&self, total: usize) -> bool {
        self.shown < total
    }
}

impl Default for Reveal {
    fn default() -> Self {
        Reveal::DEFAULT_REVEAL
    }
}

/// The first entries of the list, as allowed by the reveal count.
pub fn page_of<'a, T>(entries: &'a [T], reveal: &Reveal) -> &'a [T] {
    &entries[..reveal.shown.min(entries.len())]
}

/// The ranked members.
#[derive(PartialEq, Debug, Clone)]
pub struct Ranking {
    entries: Vec<RankedEntry>,
    settings: PresentSettings,
}

impl Ranking {
    /// All the entries, in global order.
    pub fn entries(&self) -> &[RankedEntry] {
        &self.entries
    }

    pub fn settings(&self) -> &PresentSettings {
        &self.settings
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn page(&self, reveal: &Reveal) -> &[RankedEntry] {
        page_of(&self.entries, reveal)
    }

    pub fn position_of(&self, member_id: &str) -> Option<&RankedEntry> {
        self.entries.iter().find(|e| e.member.id == member_id)
    }

    /// The entries of one sub-group, in global order.
    pub fn subgroup(&self, value: &str) -> Vec<&RankedEntry> {
        let key = self.settings.subgroup;
        self.entries
            .iter()
            .filter(|e| key.of(&e.member) == Some(value))
            .collect()
    }

    /// The distinct sub-group values, sorted.
    pub fn subgroups(&self) -> Vec<&str> {
        let key = self.settings.subgroup;
        let mut values: Vec<&str> = self
            .entries
            .iter()
            .filter_map(|e| key.of(&e.member))
            .collect::<HashSet<&str>>()
            .into_iter()
            .collect();
        values.sort_unstable();
        values
    }

    /// The entries whose name, group or country contain the query, ignoring case.
    ///
    /// The entries keep their global positions.
    pub fn search(&self, query: &str) -> Vec<&RankedEntry> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.entries.iter().collect();
        }
        self.entries.iter().filter(|e| e.matches(&needle)).collect()
    }
}

// Assigns the tie-compressed positions to a list of percentages, in order.
fn compress_ranks<I: Iterator<Item = u32>>(percents: I, mode: RankingMode) -> Vec<u32> {
    let mut res: Vec<u32> = Vec::new();
    let mut last: Option<u32> = None;
    let mut current: u32 = 0;
    for (idx, pct) in percents.enumerate() {
        if last != Some(pct) {
            current = match mode {
                RankingMode::Dense => current + 1,
                RankingMode::Competition => idx as u32 + 1,
            };
            last = Some(pct);
        }
        res.push(current);
    }
    res
}

fn snapshot(member_id: &str, roster: &HashMap<&str, &Member>) -> Member {
    match roster.get(member_id) {
        Some(m) => (*m).clone(),
        // Fall back on the id when the roster does not know the member.
        None => Member::new(member_id, member_id),
    }
}

/// Builds the ranking of all the members that appear in the matrix.
///
/// Arguments:
/// * `scored` the complete output of [crate::score], for all the members
/// * `choices` the choices that produced the scores
/// * `matrix` the matrix that produced the scores
/// * `roster` the members, used for display and sub-groups
/// * `settings` the numbering mode and the sub-group key
///
/// Members that were not scored rank with an affinity of zero, after the scored
/// members with the same affinity.
pub fn present(
    scored: &[ScoredMember],
    choices: &UserChoices,
    matrix: &PositionMatrix,
    roster: &[Member],
    settings: &PresentSettings,
) -> Ranking {
    let roster_by_id: HashMap<&str, &Member> = roster.iter().map(|m| (m.id.as_str(), m)).collect();
    let scored_ids: HashSet<&str> = scored.iter().map(|s| s.member_id.as_str()).collect();

    // Overlap of the members that did not pass the threshold.
    let mut partial: HashMap<&str, u32> = HashMap::new();
    for vote_id in choices.keys() {
        if let Some(row) = matrix.row(vote_id) {
            for (member_id, pos) in row.iter() {
                if pos.is_some() && !scored_ids.contains(member_id.as_str()) {
                    *partial.entry(member_id.as_str()).or_insert(0) += 1;
                }
            }
        }
    }

    let num_choices = choices.len();
    let mut entries: Vec<RankedEntry> = scored
        .iter()
        .map(|s| RankedEntry {
            member: snapshot(&s.member_id, &roster_by_id),
            affinity: s.affinity,
            overlap: s.overlap,
            coverage: s.coverage,
            standing: Standing::Scored,
            global_position: 0,
            subgroup_position: None,
        })
        .collect();
    for member_id in matrix.member_ids() {
        if scored_ids.contains(member_id) {
            continue;
        }
        let overlap = partial.get(member_id).cloned().unwrap_or(0);
        entries.push(RankedEntry {
            member: snapshot(member_id, &roster_by_id),
            affinity: 0.0,
            overlap,
            coverage: if num_choices == 0 {
                0.0
            } else {
                overlap as f64 / num_choices as f64
            },
            standing: if overlap > 0 {
                Standing::InsufficientOverlap
            } else {
                Standing::NotAnswered
            },
            global_position: 0,
            subgroup_position: None,
        });
    }
    // Stable: the scored members keep the order of the scorer.
    entries.sort_by(|a, b| {
        b.affinity
            .partial_cmp(&a.affinity)
            .unwrap_or(Ordering::Equal)
    });

    let positions = compress_ranks(entries.iter().map(|e| e.percent()), settings.ranking_mode);
    for (e, p) in entries.iter_mut().zip(positions) {
        e.global_position = p;
    }

    // Same compression, independently for every sub-group.
    let mut groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (idx, e) in entries.iter().enumerate() {
        if let Some(value) = settings.subgroup.of(&e.member) {
            groups.entry(value.to_string()).or_default().push(idx);
        }
    }
    for (value, idxs) in groups.iter() {
        let positions = compress_ranks(
            idxs.iter().map(|idx| entries[*idx].percent()),
            settings.ranking_mode,
        );
        debug!("present: sub-group {:?}: {:?} members", value, idxs.len());
        for (idx, p) in idxs.iter().zip(positions) {
            entries[*idx].subgroup_position = Some(p);
        }
    }

    info!(
        "present: {:?} members ranked, {:?} scored, {:?} sub-groups",
        entries.len(),
        scored.len(),
        groups.len()
    );
    Ranking {
        entries,
        settings: *settings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score;

    fn member(id: &str, name: &str, country: Option<&str>, group: Option<&str>) -> Member {
        Member {
            country: country.map(|s| s.to_string()),
            group: group.map(|s| s.to_string()),
            ..Member::new(id, name)
        }
    }

    fn scored(id: &str, affinity: f64, overlap: u32) -> ScoredMember {
        ScoredMember {
            member_id: id.to_string(),
            affinity,
            overlap,
            coverage: 1.0,
            agreement: affinity,
        }
    }

    fn matrix_of(ids: &[&str]) -> PositionMatrix {
        let mut m = PositionMatrix::new();
        for id in ids {
            m.insert("v1", id, Some(Position::For));
        }
        m
    }

    fn positions(r: &Ranking) -> Vec<(String, u32)> {
        r.entries()
            .iter()
            .map(|e| (e.member.id.clone(), e.global_position))
            .collect()
    }

    fn roster() -> Vec<Member> {
        vec![
            member("a", "Ana Pérez", Some("Spain"), Some("S&D")),
            member("b", "Bruno Rossi", Some("Italy"), Some("EPP")),
            member("c", "Clara Díaz", Some("Spain"), Some("EPP")),
            member("d", "Dirk Jansen", Some("Netherlands"), Some("Renew")),
            member("e", "Eva Novak", None, Some("Greens")),
        ]
    }

    #[test]
    fn compression_modes() {
        let pcts = vec![90, 90, 80, 70, 70, 70, 60];
        assert_eq!(
            compress_ranks(pcts.clone().into_iter(), RankingMode::Dense),
            vec![1, 1, 2, 3, 3, 3, 4]
        );
        assert_eq!(
            compress_ranks(pcts.into_iter(), RankingMode::Competition),
            vec![1, 1, 3, 4, 4, 4, 7]
        );
        assert!(compress_ranks(std::iter::empty(), RankingMode::Dense).is_empty());
    }

    #[test]
    fn equal_percentages_share_a_position() {
        let s = vec![
            scored("a", 0.801, 5),
            scored("b", 0.799, 5),
            scored("c", 0.5, 5),
        ];
        let choices: UserChoices = [("v1".to_string(), Position::For)].into_iter().collect();
        let r = present(
            &s,
            &choices,
            &matrix_of(&["a", "b", "c"]),
            &roster(),
            &PresentSettings::DEFAULT_SETTINGS,
        );
        assert_eq!(
            positions(&r),
            vec![
                ("a".to_string(), 1),
                ("b".to_string(), 1),
                ("c".to_string(), 2)
            ]
        );
        // The scorer's order is kept inside the tie.
        assert!(r.entries()[0].affinity > r.entries()[1].affinity);
    }

    #[test]
    fn unscored_members_rank_last_with_zero() {
        let choices: UserChoices = [("v1".to_string(), Position::For)].into_iter().collect();
        let mut m = matrix_of(&["a", "b"]);
        m.insert("v2", "d", Some(Position::Against));
        m.insert("v1", "e", None);
        let s = vec![scored("b", 0.7, 5), scored("a", 0.0, 5)];
        let r = present(&s, &choices, &m, &roster(), &PresentSettings::DEFAULT_SETTINGS);
        assert_eq!(
            positions(&r),
            vec![
                ("b".to_string(), 1),
                ("a".to_string(), 2),
                ("d".to_string(), 2),
                ("e".to_string(), 2)
            ]
        );
        assert_eq!(r.entries()[1].standing, Standing::Scored);
        assert_eq!(r.entries()[2].standing, Standing::NotAnswered);
        assert_eq!(r.entries()[3].standing, Standing::NotAnswered);
        // Roster members that never appear in the matrix are not ranked.
        assert!(r.position_of("c").is_none());
    }

    #[test]
    fn insufficient_overlap_is_reported() {
        let ballot: Vec<(&str, Position)> = vec![
            ("v1", Position::For),
            ("v2", Position::For),
            ("v3", Position::Against),
            ("v4", Position::For),
            ("v5", Position::Abstention),
        ];
        let choices: UserChoices = ballot.iter().map(|(v, p)| (v.to_string(), *p)).collect();
        let mut m = PositionMatrix::new();
        for (v, p) in ballot.iter() {
            m.insert(v, "a", Some(*p));
        }
        m.insert("v1", "b", Some(Position::For));
        m.insert("v2", "b", Some(Position::For));
        let s = score(&choices, &m, &ScoreOptions::DEFAULT_OPTIONS);
        let r = present(&s, &choices, &m, &roster(), &PresentSettings::DEFAULT_SETTINGS);
        let b = r.position_of("b").unwrap();
        assert_eq!(b.standing, Standing::InsufficientOverlap);
        assert_eq!(b.overlap, 2);
        assert_eq!(b.affinity, 0.0);
        assert_eq!(b.global_position, 2);
        assert_eq!(r.position_of("a").unwrap().global_position, 1);
    }

    #[test]
    fn empty_choices_tie_everyone_at_one() {
        let m = matrix_of(&["a", "b", "c"]);
        let choices = UserChoices::new();
        let s = score(&choices, &m, &ScoreOptions::DEFAULT_OPTIONS);
        let r = present(&s, &choices, &m, &roster(), &PresentSettings::DEFAULT_SETTINGS);
        assert_eq!(r.len(), 3);
        assert!(r
            .entries()
            .iter()
            .all(|e| e.global_position == 1 && e.affinity == 0.0 && e.standing == Standing::NotAnswered));
        assert!(r.entries().iter().all(|e| e.coverage == 0.0));
    }

    #[test]
    fn subgroup_positions_are_independent() {
        let s = vec![
            scored("b", 0.9, 5),
            scored("a", 0.8, 5),
            scored("d", 0.8, 5),
            scored("c", 0.7, 5),
            scored("e", 0.6, 5),
        ];
        let choices: UserChoices = [("v1".to_string(), Position::For)].into_iter().collect();
        let m = matrix_of(&["a", "b", "c", "d", "e"]);
        let r = present(&s, &choices, &m, &roster(), &PresentSettings::DEFAULT_SETTINGS);
        let spain: Vec<(&str, Option<u32>, u32)> = r
            .subgroup("Spain")
            .iter()
            .map(|e| (e.member.id.as_str(), e.subgroup_position, e.global_position))
            .collect();
        assert_eq!(spain, vec![("a", Some(1), 2), ("c", Some(2), 3)]);
        assert_eq!(r.position_of("b").unwrap().subgroup_position, Some(1));
        assert_eq!(r.position_of("e").unwrap().subgroup_position, None);
        assert_eq!(r.subgroups(), vec!["Italy", "Netherlands", "Spain"]);

        let by_group = PresentSettings {
            subgroup: SubgroupKey::Group,
            ..PresentSettings::DEFAULT_SETTINGS
        };
        let r = present(&s, &choices, &m, &roster(), &by_group);
        let epp: Vec<(&str, Option<u32>)> = r
            .subgroup("EPP")
            .iter()
            .map(|e| (e.member.id.as_str(), e.subgroup_position))
            .collect();
        assert_eq!(epp, vec![("b", Some(1)), ("c", Some(2))]);
        assert_eq!(r.position_of("e").unwrap().subgroup_position, Some(1));
    }

    #[test]
    fn search_keeps_global_positions() {
        let s = vec![
            scored("b", 0.9, 5),
            scored("a", 0.8, 5),
            scored("c", 0.7, 5),
            scored("d", 0.6, 5),
        ];
        let choices: UserChoices = [("v1".to_string(), Position::For)].into_iter().collect();
        let m = matrix_of(&["a", "b", "c", "d"]);
        let r = present(&s, &choices, &m, &roster(), &PresentSettings::DEFAULT_SETTINGS);

        let found: Vec<(&str, u32)> = r
            .search("spain")
            .iter()
            .map(|e| (e.member.id.as_str(), e.global_position))
            .collect();
        assert_eq!(found, vec![("a", 2), ("c", 3)]);

        let by_group: Vec<&str> = r.search(" epp").iter().map(|e| e.member.id.as_str()).collect();
        assert_eq!(by_group, vec!["b", "c"]);

        let by_name: Vec<u32> = r.search("JANSEN").iter().map(|e| e.global_position).collect();
        assert_eq!(by_name, vec![4]);

        assert_eq!(r.search("").len(), 4);
        assert!(r.search("nobody").is_empty());
    }

    #[test]
    fn unknown_members_use_their_id() {
        let choices: UserChoices = [("v1".to_string(), Position::For)].into_iter().collect();
        let m = matrix_of(&["zz"]);
        let r = present(&[], &choices, &m, &roster(), &PresentSettings::DEFAULT_SETTINGS);
        assert_eq!(r.entries()[0].member.name, "zz");
        assert_eq!(r.entries()[0].subgroup_position, None);
        assert_eq!(r.entries()[0].standing, Standing::InsufficientOverlap);
    }

    #[test]
    fn reveal_steps_are_bounded() {
        let mut reveal = Reveal::new(0, 0);
        assert_eq!(reveal.step, 1);
        reveal.more();
        assert_eq!(reveal.shown, 1);

        let mut open = Reveal {
            shown: usize::MAX - 1,
            step: 10,
        };
        open.more();
        assert_eq!(open.shown, usize::MAX);
        assert!(!open.has_more(25));
        let entries = vec![1, 2, 3];
        assert_eq!(page_of(&entries, &open), &[1, 2, 3]);
    }

    #[test]
    fn competition_numbering_inside_a_subgroup() {
        // Spain: a and c tie at 80, e follows.
        let spain = |id: &str| member(id, id, Some("Spain"), None);
        let roster = vec![
            spain("a"),
            member("b", "b", Some("Italy"), None),
            spain("c"),
            spain("e"),
        ];
        let s = vec![
            scored("b", 0.9, 5),
            scored("a", 0.8, 5),
            scored("c", 0.8, 5),
            scored("e", 0.6, 5),
        ];
        let choices: UserChoices = [("v1".to_string(), Position::For)].into_iter().collect();
        let m = matrix_of(&["a", "b", "c", "e"]);
        let competition = PresentSettings {
            ranking_mode: RankingMode::Competition,
            ..PresentSettings::DEFAULT_SETTINGS
        };
        let r = present(&s, &choices, &m, &roster, &competition);
        let in_spain: Vec<(&str, Option<u32>, u32)> = r
            .subgroup("Spain")
            .iter()
            .map(|e| (e.member.id.as_str(), e.subgroup_position, e.global_position))
            .collect();
        assert_eq!(
            in_spain,
            vec![("a", Some(1), 2), ("c", Some(1), 2), ("e", Some(3), 4)]
        );
        assert_eq!(r.position_of("b").unwrap().subgroup_position, Some(1));

        let r = present(&s, &choices, &m, &roster, &PresentSettings::DEFAULT_SETTINGS);
        assert_eq!(r.position_of("e").unwrap().subgroup_position, Some(2));
        assert_eq!(r.position_of("e").unwrap().global_position, 3);
    }

    #[test]
    fn reveal_slices_without_reordering() {
        let s: Vec<ScoredMember> = (0..25)
            .map(|i| scored(&format!("m{:02}", i), 1.0 - (i as f64) / 100.0, 5))
            .collect();
        let ids: Vec<String> = s.iter().map(|x| x.member_id.clone()).collect();
        let id_refs: Vec<&str> = ids.iter().map(|s| s.as_str()).collect();
        let choices: UserChoices = [("v1".to_string(), Position::For)].into_iter().collect();
        let r = present(&s, &choices, &matrix_of(&id_refs), &[], &PresentSettings::DEFAULT_SETTINGS);

        let mut reveal = Reveal::default();
        assert_eq!(r.page(&reveal).len(), 10);
        assert!(reveal.has_more(r.len()));
        reveal.more();
        reveal.more();
        let page = r.page(&reveal);
        assert_eq!(page.len(), 25);
        assert!(!reveal.has_more(r.len()));
        let page_ids: Vec<&str> = page.iter().map(|e| e.member.id.as_str()).collect();
        assert_eq!(page_ids, id_refs);
        reveal.reset(5);
        assert_eq!(r.page(&reveal)[4].member.id, "m04");

        let found = r.search("m1");
        assert_eq!(page_of(&found, &Reveal::new(3, 3)).len(), 3);
    }
}
