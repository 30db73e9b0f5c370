use uuid::Uuid;

use crate::error::{Error, Result};
use crate::model::{PlayerSetup, MAX_PLAYERS};

/// The player list edited on the setup screen before a game is started.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    entries: Vec<PlayerSetup>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[PlayerSetup] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= MAX_PLAYERS
    }

    /// A game can be started from this roster.
    pub fn is_ready(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Appends an unnamed seat.
    pub fn add(&mut self) -> Result<&PlayerSetup> {
        if self.is_full() {
            return Err(Error::PlayerCount {
                count: self.entries.len() + 1,
            });
        }
        self.entries.push(PlayerSetup::new(""));
        Ok(&self.entries[self.entries.len() - 1])
    }

    pub fn rename(&mut self, id: Uuid, name: impl Into<String>) -> Result<()> {
        let entry = self
            .entries
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or(Error::UnknownPlayer(id))?;
        entry.name = name.into();
        Ok(())
    }

    pub fn remove(&mut self, id: Uuid) -> Result<PlayerSetup> {
        let position = self
            .entries
            .iter()
            .position(|entry| entry.id == id)
            .ok_or(Error::UnknownPlayer(id))?;
        Ok(self.entries.remove(position))
    }

    pub fn into_entries(self) -> Vec<PlayerSetup> {
        self.entries
    }
}

impl TryFrom<Vec<PlayerSetup>> for Roster {
    type Error = Error;

    /// Seeds a roster, e.g. from a "play again".
    fn try_from(entries: Vec<PlayerSetup>) -> Result<Self> {
        if entries.len() > MAX_PLAYERS {
            return Err(Error::PlayerCount {
                count: entries.len(),
            });
        }
        Ok(Self { entries })
    }
}
