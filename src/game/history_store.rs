use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::Result;
use crate::model::Game;

const HISTORY_FILE: &str = "history.json";

/// What goes to disk: every game, newest first, and which one was open.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistorySnapshot {
    pub games: Vec<Game>,
    #[serde(default)]
    pub current: Option<Uuid>,
}

/// JSON file backing for the session history.
#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(HISTORY_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is an empty history. A file that does not parse, or
    /// holds a game the mutators could never have produced, is an error so it
    /// never gets silently overwritten.
    pub fn load(&self) -> Result<HistorySnapshot> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(target: "history_store", "No history at {}", self.path.display());
                return Ok(HistorySnapshot::default());
            }
            Err(err) => return Err(err.into()),
        };
        let mut snapshot: HistorySnapshot = serde_json::from_str(&contents)?;
        for game in &snapshot.games {
            game.validate()?;
        }
        if let Some(current) = snapshot.current {
            if !snapshot.games.iter().any(|game| game.id() == current) {
                snapshot.current = None;
            }
        }
        trace!(
            target: "history_store",
            "Loaded {} games from {}",
            snapshot.games.len(),
            self.path.display()
        );
        Ok(snapshot)
    }

    pub fn save(&self, snapshot: &HistorySnapshot) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let contents = serde_json::to_string_pretty(snapshot)?;
        fs::write(&self.path, contents)?;
        trace!(
            target: "history_store",
            "Saved {} games to {}",
            snapshot.games.len(),
            self.path.display()
        );
        Ok(())
    }
}
