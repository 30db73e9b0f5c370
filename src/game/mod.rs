pub mod history_store;
pub mod roster;
pub mod session;
pub mod settings;

pub use history_store::{HistorySnapshot, HistoryStore};
pub use roster::Roster;
pub use session::Session;
pub use settings::Settings;
