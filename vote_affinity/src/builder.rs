pub use crate::config::*;

use log::{debug, info, warn};
use std::collections::HashSet;

/// A builder for a quiz session.
///
/// The questions are drawn from the votes of the catalogue that have recorded
/// positions in the matrix, in an order that only depends on the seed.
///
/// ```
/// use vote_affinity::builder::Builder;
/// use vote_affinity::*;
///
/// let mut matrix = PositionMatrix::new();
/// matrix.insert("v1", "m1", Some(Position::For));
/// matrix.insert("v2", "m1", Some(Position::Against));
///
/// let votes = vec![Vote::new("v1", "First question?"), Vote::new("v2", "Second question?")];
/// let mut session = Builder::new(&ScoreOptions::DEFAULT_OPTIONS)?
///     .catalogue(&votes)?
///     .size(10)?
///     .seed(42)
///     .build(&matrix)?;
///
/// let first = session.current().unwrap().id.clone();
/// session.answer(&first, Position::For)?;
/// assert_eq!(session.answered(), 1);
/// assert_eq!(session.progress_pct(), 50);
///
/// # Ok::<(), AffinityErrors>(())
/// ```
pub struct Builder {
    pub(crate) _options: ScoreOptions,
    pub(crate) _catalogue: Vec<Vote>,
    pub(crate) _size: usize,
    pub(crate) _seed: u32,
}

impl Builder {
    pub const DEFAULT_SIZE: usize = 10;

    pub fn new(options: &ScoreOptions) -> Result<Builder, AffinityErrors> {
        Ok(Builder {
            _options: *options,
            _catalogue: Vec::new(),
            _size: Builder::DEFAULT_SIZE,
            _seed: 0,
        })
    }

    pub fn catalogue(self, votes: &[Vote]) -> Result<Builder, AffinityErrors> {
        Ok(Builder {
            _catalogue: votes.to_vec(),
            ..self
        })
    }

    /// The number of questions in the quiz.
    pub fn size(self, size: usize) -> Result<Builder, AffinityErrors> {
        if size == 0 {
            return Err(AffinityErrors::InvalidQuizSize);
        }
        Ok(Builder {
            _size: size,
            ..self
        })
    }

    pub fn seed(self, seed: u32) -> Builder {
        Builder {
            _seed: seed,
            ..self
        }
    }

    pub fn build(self, matrix: &PositionMatrix) -> Result<Session, AffinityErrors> {
        // The first occurrence of a vote id wins.
        let mut seen: HashSet<String> = HashSet::new();
        let mut eligible: Vec<Vote> = Vec::new();
        for v in self._catalogue.into_iter() {
            if !matrix.contains_vote(&v.id) {
                continue;
            }
            if !seen.insert(v.id.clone()) {
                warn!("build: vote {} appears twice in the catalogue, skipping", v.id);
                continue;
            }
            eligible.push(v);
        }
        debug!("build: {:?} eligible votes", eligible.len());
        if eligible.is_empty() {
            return Err(AffinityErrors::EmptyQuiz);
        }
        let mut questions = vote_permutation_crypto(eligible, self._seed);
        questions.truncate(self._size);
        info!(
            "build: quiz of {:?} questions (seed {:?})",
            questions.len(),
            self._seed
        );
        Ok(Session {
            questions,
            choices: UserChoices::new(),
            options: self._options,
            index: 0,
            return_index: 0,
            done: false,
        })
    }
}

/// Generates a "random" order of the votes. Random in this context means hard to guess in advance,
/// while staying reproducible for a given seed.
fn vote_permutation_crypto(votes: Vec<Vote>, seed: u32) -> Vec<Vote> {
    let mut data: Vec<(String, Vote)> = votes
        .into_iter()
        .map(|v| (sha256::digest(format!("{:08}{}", seed, v.id)), v))
        .collect();
    data.sort_by(|a, b| a.0.cmp(&b.0));
    data.into_iter().map(|p| p.1).collect()
}

/// Keeps only the choices on votes that have a row in the matrix.
pub fn restrict_to_matrix(choices: &UserChoices, matrix: &PositionMatrix) -> UserChoices {
    choices
        .iter()
        .filter(|(vote_id, _)| matrix.contains_vote(vote_id))
        .map(|(vote_id, p)| (vote_id.clone(), *p))
        .collect()
}

/// The state of one user answering a quiz.
///
/// Nothing is persisted: the answers are dropped with the session.
#[derive(PartialEq, Debug, Clone)]
pub struct Session {
    questions: Vec<Vote>,
    choices: UserChoices,
    options: ScoreOptions,
    index: usize,
    return_index: usize,
    done: bool,
}

impl Session {
    pub fn questions(&self) -> &[Vote] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&Vote> {
        if self.done {
            None
        } else {
            self.questions.get(self.index)
        }
    }

    /// Moves to the given question, clamped to the quiz.
    pub fn go_to(&mut self, index: usize) {
        self.index = index.min(self.questions.len().saturating_sub(1));
    }

    pub fn back(&mut self) {
        self.go_to(self.index.saturating_sub(1));
    }

    /// Records (or replaces) the answer to a question and moves to the next one.
    ///
    /// Answering the last question finishes the quiz.
    pub fn answer(&mut self, vote_id: &str, position: Position) -> Result<(), AffinityErrors> {
        let idx = self
            .questions
            .iter()
            .position(|v| v.id == vote_id)
            .ok_or_else(|| AffinityErrors::UnknownVote(vote_id.to_string()))?;
        self.choices.insert(vote_id.to_string(), position);
        debug!("answer: {} -> {:?}", vote_id, position);
        if idx + 1 < self.questions.len() {
            self.go_to(idx + 1);
        } else {
            self.finish();
        }
        Ok(())
    }

    pub fn position(&self, vote_id: &str) -> Option<Position> {
        self.choices.get(vote_id).cloned()
    }

    /// Stops the quiz, even if some questions are not answered.
    pub fn finish(&mut self) {
        self.return_index = self.index;
        self.done = true;
    }

    /// Goes back to the questions, where the user left them.
    pub fn reopen(&mut self) {
        self.done = false;
        self.go_to(self.return_index);
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn answered(&self) -> usize {
        self.choices.len()
    }

    pub fn progress_pct(&self) -> u32 {
        let total = self.questions.len();
        if total == 0 {
            return 0;
        }
        let answered = self.answered().min(total);
        ((answered as f64 / total as f64) * 100.0).round() as u32
    }

    pub fn choices(&self) -> &UserChoices {
        &self.choices
    }

    pub fn options(&self) -> &ScoreOptions {
        &self.options
    }

    pub fn set_mode(&mut self, mode: AffinityMode) {
        self.options = self.options.with_mode(mode);
    }

    /// Whether enough questions are answered to compute meaningful affinities.
    pub fn has_enough_answers(&self, matrix: &PositionMatrix) -> bool {
        restrict_to_matrix(&self.choices, matrix).len() >= self.options.min_overlap as usize
    }

    /// The scores of all the members, or nothing if too few questions are answered.
    pub fn score(&self, matrix: &PositionMatrix) -> Vec<ScoredMember> {
        if !self.has_enough_answers(matrix) {
            debug!(
                "score: {:?} answers, at least {:?} needed",
                self.answered(),
                self.options.min_overlap
            );
            return Vec::new();
        }
        crate::score(&restrict_to_matrix(&self.choices, matrix), matrix, &self.options)
    }
}
