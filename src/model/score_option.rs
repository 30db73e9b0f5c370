use serde::{Deserialize, Serialize};

/// One legal declaration for a category, e.g. "3" jacks for 9 points or a
/// "Served" grande for 80.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreOption {
    pub label: String,
    pub points: u32,
}

impl ScoreOption {
    pub fn new(label: impl Into<String>, points: u32) -> Self {
        Self {
            label: label.into(),
            points,
        }
    }
}
