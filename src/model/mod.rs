mod category;
mod game;
mod game_summary;
mod player;
mod player_color;
mod player_setup;
mod score_card;
mod score_option;
mod session_command;
mod session_event;

pub use category::{Category, CategoryKind, CATEGORY_COUNT};
pub use game::{Game, MAX_PLAYERS};
pub use game_summary::GameSummary;
pub use player::{default_player_name, Player};
pub use player_color::PlayerColor;
pub use player_setup::PlayerSetup;
pub use score_card::ScoreCard;
pub use score_option::ScoreOption;
pub use session_command::SessionCommand;
pub use session_event::SessionEvent;
