use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Number of items in every group
pub const GROUP_SIZE: usize = 3;
/// Number of groups in every puzzle
pub const GROUP_COUNT: usize = 4;
/// Number of decoys in every puzzle
pub const DECOY_COUNT: usize = 4;
/// Total number of tiles on a fresh board
pub const ITEM_COUNT: usize = GROUP_SIZE * GROUP_COUNT + DECOY_COUNT;

/// Difficulty tier of a group, serialized as its rank (0-3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Difficulty {
    Yellow,
    Green,
    Blue,
    Purple,
}

impl Difficulty {
    /// All tiers, easiest first
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Yellow,
        Difficulty::Green,
        Difficulty::Blue,
        Difficulty::Purple,
    ];

    pub fn rank(self) -> u8 {
        self as u8
    }

    pub fn from_rank(rank: u8) -> Option<Self> {
        Self::ALL.get(rank as usize).copied()
    }
}

impl From<Difficulty> for u8 {
    fn from(d: Difficulty) -> Self {
        d.rank()
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = String;

    fn try_from(rank: u8) -> Result<Self, Self::Error> {
        Self::from_rank(rank).ok_or_else(|| format!("difficulty rank {} is out of range 0-3", rank))
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Yellow => write!(f, "Yellow"),
            Difficulty::Green => write!(f, "Green"),
            Difficulty::Blue => write!(f, "Blue"),
            Difficulty::Purple => write!(f, "Purple"),
        }
    }
}

/// Three items sharing a hidden category
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Group {
    pub category: String,
    pub items: [String; GROUP_SIZE],
    pub difficulty: Difficulty,
}

impl Group {
    pub fn new(category: &str, items: [&str; GROUP_SIZE], difficulty: Difficulty) -> Self {
        Self {
            category: category.to_string(),
            items: items.map(str::to_string),
            difficulty,
        }
    }

    /// Check if an item belongs to this group
    pub fn contains(&self, item: &str) -> bool {
        self.items.iter().any(|i| i == item)
    }

    /// Order-independent, case-sensitive comparison against a guess.
    ///
    /// Works on sorted copies so the stored item order is never touched.
    pub fn matches<S: AsRef<str>>(&self, guess: &[S]) -> bool {
        if guess.len() != GROUP_SIZE {
            return false;
        }
        let mut ours: Vec<&str> = self.items.iter().map(String::as_str).collect();
        let mut theirs: Vec<&str> = guess.iter().map(AsRef::as_ref).collect();
        ours.sort_unstable();
        theirs.sort_unstable();
        ours == theirs
    }

    /// Items joined for display, e.g. "a, b, c"
    pub fn items_label(&self) -> String {
        self.items.join(", ")
    }
}

/// One board: four groups plus four decoys
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
    pub groups: [Group; GROUP_COUNT],
    pub decoys: [String; DECOY_COUNT],
}

impl Puzzle {
    /// Every item on the board: group items in group order, then decoys
    pub fn all_items(&self) -> impl Iterator<Item = &str> {
        self.groups
            .iter()
            .flat_map(|g| g.items.iter())
            .chain(self.decoys.iter())
            .map(String::as_str)
    }

    /// Check if an item appears anywhere on the board
    pub fn contains(&self, item: &str) -> bool {
        self.all_items().any(|i| i == item)
    }

    /// Index of the group with this category name
    pub fn category_index(&self, category: &str) -> Option<usize> {
        self.groups.iter().position(|g| g.category == category)
    }

    /// Check the structural rules the type cannot express.
    ///
    /// Returns a human-readable reason on failure.
    pub fn validate(&self) -> Result<(), String> {
        let mut categories = HashSet::new();
        for group in &self.groups {
            if group.category.trim().is_empty() {
                return Err("group with an empty category".to_string());
            }
            if !categories.insert(group.category.as_str()) {
                return Err(format!("duplicate category '{}'", group.category));
            }
        }

        let mut seen = HashSet::with_capacity(ITEM_COUNT);
        for item in self.all_items() {
            if item.trim().is_empty() {
                return Err("empty item".to_string());
            }
            if !seen.insert(item) {
                return Err(format!("item '{}' appears more than once", item));
            }
        }

        Ok(())
    }
}
