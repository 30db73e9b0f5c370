use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A seat on the setup screen before a game starts. The id carries over to
/// the game's `Player`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerSetup {
    pub id: Uuid,
    pub name: String,
}

impl PlayerSetup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}
