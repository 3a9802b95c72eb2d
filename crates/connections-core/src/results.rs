use crate::puzzle::Group;
use serde::Serialize;

/// End-of-game summary: outcome plus every group revealed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsSummary {
    pub won: bool,
    pub mistakes: usize,
    pub max_mistakes: usize,
    /// Solved groups in discovery order, then the ones that were missed
    pub groups: Vec<Group>,
    pub solved_count: usize,
}

impl ResultsSummary {
    pub fn new(
        won: bool,
        mistakes: usize,
        max_mistakes: usize,
        groups: Vec<Group>,
        solved_count: usize,
    ) -> Self {
        Self {
            won,
            mistakes,
            max_mistakes,
            groups,
            solved_count,
        }
    }

    pub fn headline(&self) -> &'static str {
        if self.won {
            "Congratulations!"
        } else {
            "Better luck next time!"
        }
    }

    pub fn message(&self) -> &'static str {
        if self.won {
            "You found every connection!"
        } else {
            "Here are the answers:"
        }
    }

    /// Groups the player found
    pub fn solved(&self) -> &[Group] {
        &self.groups[..self.solved_count.min(self.groups.len())]
    }

    /// Groups revealed at the end
    pub fn missed(&self) -> &[Group] {
        &self.groups[self.solved_count.min(self.groups.len())..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::tests::sample_puzzle;

    #[test]
    fn test_headlines() {
        let groups = sample_puzzle().groups.to_vec();
        let won = ResultsSummary::new(true, 1, 4, groups.clone(), 4);
        assert_eq!(won.headline(), "Congratulations!");
        assert!(won.missed().is_empty());

        let lost = ResultsSummary::new(false, 4, 4, groups, 1);
        assert_eq!(lost.message(), "Here are the answers:");
        assert_eq!(lost.solved().len(), 1);
        assert_eq!(lost.missed().len(), 3);
    }
}
