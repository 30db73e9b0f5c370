use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Category, PlayerColor, ScoreCard};

#[readonly::make]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Player {
    pub id: Uuid,
    pub name: String,
    pub color: PlayerColor,
    pub scores: ScoreCard,
}

impl Player {
    pub fn new(id: Uuid, name: impl Into<String>, color: PlayerColor) -> Self {
        Self {
            id,
            name: name.into(),
            color,
            scores: ScoreCard::default(),
        }
    }

    pub fn score(&self, category: Category) -> Option<u32> {
        self.scores.get(category)
    }

    pub fn total(&self) -> u32 {
        self.scores.total()
    }

    pub(crate) fn set_score(&mut self, category: Category, points: u32) {
        self.scores.set(category, points);
    }

    pub(crate) fn clear_scores(&mut self) {
        self.scores.clear();
    }
}

/// Name shown for a seat whose name was left blank, `position` counted from 1.
pub fn default_player_name(position: usize) -> String {
    format!("Player {position}")
}
