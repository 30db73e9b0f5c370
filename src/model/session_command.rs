use uuid::Uuid;

use super::{Category, Game, PlayerSetup};

/// Write commands accepted by the session. Commands without a game id act on
/// the current game.
#[derive(Debug, Clone)]
pub enum SessionCommand {
    StartGame(Vec<PlayerSetup>),
    RecordScore {
        player_index: usize,
        category: Category,
        points: u32,
    },
    ResetScores,
    AddPlayer,
    RemovePlayer(Uuid), // player id
    ContinueGame(Uuid),
    FinishGame,
    RestartGame(Uuid),
    DeleteGame(Uuid),
    UpdateGame(Game),
}
