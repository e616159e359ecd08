//! Cell types and the reward table

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Food found in a grid cell.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum CellType {
    Cheese,
    Cookie,
    Salad,
    /// No food in the cell.
    #[default]
    #[serde(alias = "No food")]
    Empty,
}

impl CellType {
    /// Every cell type, in reward-table order.
    pub const ALL: [CellType; 4] = [
        CellType::Cheese,
        CellType::Cookie,
        CellType::Salad,
        CellType::Empty,
    ];

    fn slot(self) -> usize {
        match self {
            CellType::Cheese => 0,
            CellType::Cookie => 1,
            CellType::Salad => 2,
            CellType::Empty => 3,
        }
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CellType::Cheese => "Cheese",
            CellType::Cookie => "Cookie",
            CellType::Salad => "Salad",
            CellType::Empty => "No food",
        };
        f.write_str(label)
    }
}

/// Fixed integer reward for entering a cell of each type.
///
/// The table is total over [`CellType`]: it is backed by one slot per
/// variant, so a lookup can never fail. Partial tables can only come from
/// deserialization, which rejects them with [`Error::MissingReward`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<CellType, i32>",
    into = "BTreeMap<CellType, i32>"
)]
pub struct RewardTable {
    rewards: [i32; 4],
}

impl RewardTable {
    pub fn new(cheese: i32, cookie: i32, salad: i32, empty: i32) -> Self {
        Self {
            rewards: [cheese, cookie, salad, empty],
        }
    }

    /// Reward for entering a cell of the given type.
    pub fn reward(&self, cell: CellType) -> i32 {
        self.rewards[cell.slot()]
    }

    /// Return a copy of the table with one entry replaced.
    pub fn with_reward(mut self, cell: CellType, reward: i32) -> Self {
        self.rewards[cell.slot()] = reward;
        self
    }

    /// Iterate over `(cell, reward)` pairs in [`CellType::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (CellType, i32)> + '_ {
        CellType::ALL.iter().map(|&cell| (cell, self.reward(cell)))
    }
}

impl Default for RewardTable {
    /// Cheese 2, Cookie 100, Salad -2, no food 0.
    fn default() -> Self {
        Self::new(2, 100, -2, 0)
    }
}

impl TryFrom<BTreeMap<CellType, i32>> for RewardTable {
    type Error = Error;

    fn try_from(map: BTreeMap<CellType, i32>) -> Result<Self> {
        let mut rewards = [0; 4];
        for cell in CellType::ALL {
            rewards[cell.slot()] = *map.get(&cell).ok_or(Error::MissingReward { cell })?;
        }
        Ok(Self { rewards })
    }
}

impl From<RewardTable> for BTreeMap<CellType, i32> {
    fn from(table: RewardTable) -> Self {
        table.iter().collect()
    }
}
