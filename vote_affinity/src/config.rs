// ********* Input data structures ***********

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::error::Error;
use std::fmt::Display;

/// A recorded or chosen position on a roll-call vote.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum Position {
    /// +1
    For,
    /// -1
    Against,
    /// 0
    Abstention,
}

impl Position {
    /// Reads the numeric encoding used in the position matrix.
    ///
    /// Only the values 1, -1 and 0 are understood. Anything else is treated as
    /// an absent position rather than an error.
    pub fn from_value(value: f64) -> Option<Position> {
        if value == 1.0 {
            Some(Position::For)
        } else if value == -1.0 {
            Some(Position::Against)
        } else if value == 0.0 {
            Some(Position::Abstention)
        } else {
            None
        }
    }

    pub fn value(&self) -> i8 {
        match self {
            Position::For => 1,
            Position::Against => -1,
            Position::Abstention => 0,
        }
    }
}

/// A roll-call vote, as presented to the user.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Vote {
    pub id: String,
    pub question: String,
    pub explanation: Option<String>,
    pub arguments_for: Vec<String>,
    pub arguments_against: Vec<String>,
    pub url: Option<String>,
}

impl Vote {
    pub fn new(id: &str, question: &str) -> Vote {
        Vote {
            id: id.to_string(),
            question: question.to_string(),
            explanation: None,
            arguments_for: Vec::new(),
            arguments_against: Vec::new(),
            url: None,
        }
    }
}

/// A voting member of the parliament.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Member {
    pub id: String,
    pub name: String,
    pub country: Option<String>,
    /// The political group in the parliament.
    pub group: Option<String>,
    /// The national party or coalition.
    pub party: Option<String>,
    pub party_sig: Option<String>,
    pub image: Option<String>,
}

impl Member {
    pub fn new(id: &str, name: &str) -> Member {
        Member {
            id: id.to_string(),
            name: name.to_string(),
            country: None,
            group: None,
            party: None,
            party_sig: None,
            image: None,
        }
    }
}

/// The recorded position of every member on every vote.
///
/// A member missing from a row did not appear for that vote. A member present
/// with `None` was recorded as absent.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct PositionMatrix {
    rows: HashMap<String, HashMap<String, Option<Position>>>,
}

impl PositionMatrix {
    pub fn new() -> PositionMatrix {
        PositionMatrix::default()
    }

    pub fn insert(&mut self, vote_id: &str, member_id: &str, position: Option<Position>) {
        self.rows
            .entry(vote_id.to_string())
            .or_default()
            .insert(member_id.to_string(), position);
    }

    /// Registers a vote with no positions yet.
    pub fn insert_vote(&mut self, vote_id: &str) {
        self.rows.entry(vote_id.to_string()).or_default();
    }

    pub fn row(&self, vote_id: &str) -> Option<&HashMap<String, Option<Position>>> {
        self.rows.get(vote_id)
    }

    pub fn contains_vote(&self, vote_id: &str) -> bool {
        self.rows.contains_key(vote_id)
    }

    /// All the members that appear anywhere in the matrix, sorted by id.
    pub fn member_ids(&self) -> BTreeSet<&str> {
        self.rows
            .values()
            .flat_map(|row| row.keys().map(|s| s.as_str()))
            .collect()
    }

    /// Number of votes.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl FromIterator<(String, String, Option<Position>)> for PositionMatrix {
    fn from_iter<I: IntoIterator<Item = (String, String, Option<Position>)>>(iter: I) -> Self {
        let mut m = PositionMatrix::new();
        for (vote_id, member_id, position) in iter {
            m.insert(&vote_id, &member_id, position);
        }
        m
    }
}

/// The positions chosen by the user, keyed by vote id.
pub type UserChoices = BTreeMap<String, Position>;

// ******** Output data structures *********

#[derive(PartialEq, Debug, Clone)]
pub struct ScoredMember {
    pub member_id: String,
    pub affinity: f64,
    /// Number of votes where both the user and the member have a position.
    pub overlap: u32,
    pub coverage: f64,
    /// The agreement rate before any coverage penalty.
    pub agreement: f64,
}

impl ScoredMember {
    /// The affinity as a whole percentage, i.e. rounded to two decimal places.
    pub fn percent(&self) -> u32 {
        affinity_percent(self.affinity)
    }
}

pub(crate) fn affinity_percent(affinity: f64) -> u32 {
    (affinity * 100.0).round() as u32
}

/// Errors when driving a quiz session.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum AffinityErrors {
    /// None of the votes in the catalogue have recorded positions.
    EmptyQuiz,
    /// The vote is not one of the questions of this session.
    UnknownVote(String),
    InvalidQuizSize,
}

impl Error for AffinityErrors {}

impl Display for AffinityErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AffinityErrors::EmptyQuiz => write!(f, "no vote of the catalogue has recorded positions"),
            AffinityErrors::UnknownVote(id) => write!(f, "vote {} is not part of this quiz", id),
            AffinityErrors::InvalidQuizSize => write!(f, "the quiz must contain at least one question"),
        }
    }
}

// ********* Configuration **********

/// How the affinity is computed from the agreement rate.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum AffinityMode {
    /// The agreement rate is multiplied by the share of the user's answers that
    /// the member also voted on.
    Coverage,
    /// Only the agreement rate.
    Raw,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct ScoreOptions {
    /// Members with fewer jointly answered votes are left out.
    pub min_overlap: u32,
    pub coverage_penalty: bool,
    /// Gives half credit when one side abstained and the other did not.
    pub abstention_soft: bool,
}

impl ScoreOptions {
    pub const DEFAULT_OPTIONS: ScoreOptions = ScoreOptions {
        min_overlap: 5,
        coverage_penalty: true,
        abstention_soft: false,
    };

    pub fn with_mode(&self, mode: AffinityMode) -> ScoreOptions {
        ScoreOptions {
            coverage_penalty: mode == AffinityMode::Coverage,
            ..*self
        }
    }

    pub fn mode(&self) -> AffinityMode {
        if self.coverage_penalty {
            AffinityMode::Coverage
        } else {
            AffinityMode::Raw
        }
    }
}

impl Default for ScoreOptions {
    fn default() -> Self {
        ScoreOptions::DEFAULT_OPTIONS
    }
}

/// How tied percentages are numbered.
///
/// - Dense: 1, 1, 2, 3, 3. The number following a tie is one more than the tie.
///
/// - Competition: 1, 1, 3, 4, 4. The number following a tie skips the tied places.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum RankingMode {
    Dense,
    Competition,
}

/// The member attribute used to compute the sub-group ranking.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum SubgroupKey {
    Country,
    Group,
    Party,
}

impl SubgroupKey {
    pub fn of<'a>(&self, m: &'a Member) -> Option<&'a str> {
        match self {
            SubgroupKey::Country => m.country.as_deref(),
            SubgroupKey::Group => m.group.as_deref(),
            SubgroupKey::Party => m.party.as_deref(),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct PresentSettings {
    pub ranking_mode: RankingMode,
    pub subgroup: SubgroupKey,
}

impl PresentSettings {
    pub const DEFAULT_SETTINGS: PresentSettings = PresentSettings {
        ranking_mode: RankingMode::Dense,
        subgroup: SubgroupKey::Country,
    };
}

impl Default for PresentSettings {
    fn default() -> Self {
        PresentSettings::DEFAULT_SETTINGS
    }
}
