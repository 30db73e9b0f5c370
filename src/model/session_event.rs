use uuid::Uuid;

use super::{Category, Player};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    GameStarted(Uuid),
    ScoreRecorded {
        game_id: Uuid,
        player_index: usize,
        category: Category,
        points: u32,
    },
    GameCompleted {
        game_id: Uuid,
        winner: Player,
    },
    ScoresReset(Uuid),
    PlayersChanged {
        game_id: Uuid,
        player_count: usize,
    },
    CurrentGameChanged(Option<Uuid>),
    HistoryChanged {
        history_length: usize,
    },
    GameDeleted(Uuid),
}
