use crate::puzzle::{Group, Puzzle, GROUP_COUNT, GROUP_SIZE};
use crate::results::ResultsSummary;
use crate::save::SavedState;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Where a session stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Outcome {
    InProgress,
    Won,
    Lost,
}

impl Outcome {
    pub fn is_terminal(self) -> bool {
        self != Outcome::InProgress
    }
}

/// Result of an evaluated guess
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "camelCase")]
pub enum GuessResult {
    /// The selection was exactly one unsolved group
    Correct { group: Group },
    /// The selection matched nothing
    Incorrect {
        #[serde(rename = "mistakesRemaining")]
        mistakes_remaining: usize,
    },
}

impl GuessResult {
    pub fn is_correct(&self) -> bool {
        matches!(self, GuessResult::Correct { .. })
    }
}

/// The state machine for one puzzle
#[derive(Debug, Clone)]
pub struct PuzzleSession {
    puzzle: Puzzle,
    max_mistakes: usize,
    /// Selected items, in click order
    selected: Vec<String>,
    mistakes: usize,
    /// Indices into `puzzle.groups`, in discovery order
    solved: Vec<usize>,
    outcome: Outcome,
}

impl PuzzleSession {
    /// Start a fresh session; a mistake limit of zero is raised to one
    pub fn start(puzzle: Puzzle, max_mistakes: usize) -> Self {
        Self {
            puzzle,
            max_mistakes: max_mistakes.max(1),
            selected: Vec::with_capacity(GROUP_SIZE),
            mistakes: 0,
            solved: Vec::with_capacity(GROUP_COUNT),
            outcome: Outcome::InProgress,
        }
    }

    /// Rebuild a session from persisted progress.
    ///
    /// Solved groups are matched back to the puzzle by category; anything that
    /// no longer belongs to the puzzle is dropped. The outcome is re-derived so
    /// that a saved loss stays lost and a win needs all four groups.
    pub fn restore(puzzle: Puzzle, max_mistakes: usize, saved: &SavedState) -> Self {
        let mut session = Self::start(puzzle, max_mistakes);

        for group in &saved.solved_groups {
            match session.puzzle.category_index(&group.category) {
                Some(index) if !session.solved.contains(&index) => session.solved.push(index),
                Some(_) => warn!(category = %group.category, "duplicate solved group in saved state"),
                None => warn!(category = %group.category, "saved group is not part of this puzzle"),
            }
        }

        let max_mistakes = session.max_mistakes;
        session.mistakes = saved.mistakes.min(max_mistakes);
        let all_solved = session.solved.len() == GROUP_COUNT;

        session.outcome = if saved.completed && !saved.is_win {
            // Older saves list every group on a loss; those were revealed, not solved
            if all_solved {
                session.solved.clear();
            }
            session.mistakes = max_mistakes;
            Outcome::Lost
        } else if all_solved {
            Outcome::Won
        } else if session.mistakes >= max_mistakes {
            Outcome::Lost
        } else {
            if saved.completed {
                warn!(solved = session.solved.len(), "saved win is missing groups, resuming");
            }
            Outcome::InProgress
        };

        info!(
            solved = session.solved.len(),
            mistakes = session.mistakes,
            outcome = ?session.outcome,
            "restored session"
        );
        session
    }

    /// Persistable view of this session
    pub fn snapshot(&self) -> SavedState {
        SavedState {
            completed: self.is_terminal(),
            is_win: self.outcome == Outcome::Won,
            mistakes: self.mistakes,
            solved_groups: self.solved_groups().cloned().collect(),
        }
    }

    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome.is_terminal()
    }

    pub fn mistakes(&self) -> usize {
        self.mistakes
    }

    pub fn max_mistakes(&self) -> usize {
        self.max_mistakes
    }

    pub fn mistakes_remaining(&self) -> usize {
        self.max_mistakes.saturating_sub(self.mistakes)
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn is_selected(&self, item: &str) -> bool {
        self.selected.iter().any(|s| s == item)
    }

    /// Whether a guess can be submitted right now
    pub fn can_submit(&self) -> bool {
        !self.is_terminal() && self.selected.len() == GROUP_SIZE
    }

    /// Solved groups in discovery order
    pub fn solved_groups(&self) -> impl Iterator<Item = &Group> {
        self.solved.iter().map(|&i| &self.puzzle.groups[i])
    }

    pub fn solved_count(&self) -> usize {
        self.solved.len()
    }

    /// Groups not found yet, in puzzle order
    pub fn remaining_groups(&self) -> impl Iterator<Item = &Group> {
        self.puzzle
            .groups
            .iter()
            .enumerate()
            .filter(|(i, _)| !self.solved.contains(i))
            .map(|(_, g)| g)
    }

    fn is_solved_item(&self, item: &str) -> bool {
        self.solved_groups().any(|g| g.contains(item))
    }

    /// Whether an item is still on the board
    pub fn is_active(&self, item: &str) -> bool {
        self.puzzle.contains(item) && !self.is_solved_item(item)
    }

    /// Items not in any solved group, in puzzle order
    pub fn active_items(&self) -> Vec<&str> {
        self.puzzle
            .all_items()
            .filter(|item| !self.is_solved_item(item))
            .collect()
    }

    /// Select or deselect an item, returning the selection size.
    ///
    /// Inactive items and clicks after the game has ended are ignored; a
    /// fourth item is ignored rather than replacing an earlier one.
    pub fn toggle_select(&mut self, item: &str) -> usize {
        if self.is_terminal() {
            return self.selected.len();
        }
        if !self.is_active(item) {
            debug!(item, "ignoring selection of inactive item");
            return self.selected.len();
        }

        if let Some(pos) = self.selected.iter().position(|s| s == item) {
            self.selected.remove(pos);
        } else if self.selected.len() < GROUP_SIZE {
            self.selected.push(item.to_string());
        }
        self.selected.len()
    }

    /// Drop the current selection
    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Evaluate the current selection.
    ///
    /// Returns `None` when there is nothing to evaluate: fewer than three
    /// items selected, or the session is already over.
    pub fn submit_guess(&mut self) -> Option<GuessResult> {
        if !self.can_submit() {
            return None;
        }

        let guess = std::mem::take(&mut self.selected);
        let found = self
            .puzzle
            .groups
            .iter()
            .enumerate()
            .find(|(i, g)| !self.solved.contains(i) && g.matches(guess.as_slice()))
            .map(|(i, _)| i);

        match found {
            Some(index) => {
                self.solved.push(index);
                let group = self.puzzle.groups[index].clone();
                debug!(category = %group.category, solved = self.solved.len(), "correct guess");

                if self.solved.len() == GROUP_COUNT {
                    self.outcome = Outcome::Won;
                    info!(mistakes = self.mistakes, "puzzle solved");
                }
                Some(GuessResult::Correct { group })
            }
            None => {
                self.mistakes += 1;
                debug!(mistakes = self.mistakes, "incorrect guess");

                if self.mistakes >= self.max_mistakes {
                    self.outcome = Outcome::Lost;
                    info!(solved = self.solved.len(), "out of mistakes");
                }
                Some(GuessResult::Incorrect {
                    mistakes_remaining: self.mistakes_remaining(),
                })
            }
        }
    }

    /// Summary for the end-of-game screen, once the session is over
    pub fn results(&self) -> Option<ResultsSummary> {
        if !self.is_terminal() {
            return None;
        }
        Some(ResultsSummary::new(
            self.outcome == Outcome::Won,
            self.mistakes,
            self.max_mistakes,
            self.solved_groups().chain(self.remaining_groups()).cloned().collect(),
            self.solved.len(),
        ))
    }
}
