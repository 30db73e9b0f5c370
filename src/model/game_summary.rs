use chrono::NaiveDate;
use uuid::Uuid;

use super::Game;

/// One line of the history list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSummary {
    pub game_id: Uuid,
    pub date: NaiveDate,
    pub player_count: usize,
    pub completed: bool,
    /// Winner of a finished game, current leader of an unfinished one.
    pub headline_player: Option<String>,
    pub headline_points: u32,
    pub filled: usize,
    pub capacity: usize,
}

impl From<&Game> for GameSummary {
    fn from(game: &Game) -> Self {
        let headline = game.leader();
        let (filled, capacity) = game.progress();
        Self {
            game_id: game.id(),
            date: game.date(),
            player_count: game.players().len(),
            completed: game.is_completed(),
            headline_player: headline.map(|player| player.name.clone()),
            headline_points: headline.map(|player| player.total()).unwrap_or_default(),
            filled,
            capacity,
        }
    }
}

impl std::fmt::Display for GameSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = self.headline_player.as_deref().unwrap_or("Unknown");
        if self.completed {
            write!(
                f,
                "{} - {} won - {} players - {} points",
                self.date, name, self.player_count, self.headline_points
            )
        } else {
            write!(
                f,
                "{} - In progress - {} leading - {} / {} scores entered",
                self.date, name, self.filled, self.capacity
            )
        }
    }
}
