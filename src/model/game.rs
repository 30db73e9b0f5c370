use chrono::{DateTime, Local, NaiveDate};
use itertools::Itertools;
use log::trace;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use serde_with::TimestampSeconds;
use std::cmp::Reverse;
use std::time::SystemTime;
use uuid::Uuid;

use super::player::default_player_name;
use super::{Category, Player, PlayerColor, PlayerSetup, CATEGORY_COUNT};
use crate::error::{Error, Result};

pub const MAX_PLAYERS: usize = 6;

/// One score sheet: the seated players, their scores and whether the game is
/// over.
///
/// `completed` holds exactly when every player has every category filled,
/// unless the game was ended early with [`Game::finish`]. Whenever the game is
/// completed `winner` is a copy of the top ranked player taken at the last
/// mutation; it is never read back from the live player list.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Game {
    id: Uuid,
    #[serde_as(as = "TimestampSeconds")]
    created: SystemTime,
    players: Vec<Player>,
    completed: bool,
    #[serde(default)]
    ended_early: bool,
    winner: Option<Player>,
}

impl Game {
    /// Seats one player per setup entry, in order. Blank names fall back to
    /// "Player N" and colors follow the seat.
    pub fn new(setups: &[PlayerSetup]) -> Result<Self> {
        if setups.is_empty() || setups.len() > MAX_PLAYERS {
            return Err(Error::PlayerCount {
                count: setups.len(),
            });
        }

        let players = setups
            .iter()
            .enumerate()
            .map(|(idx, setup)| -> Result<Player> {
                let name = if setup.name.trim().is_empty() {
                    default_player_name(idx + 1)
                } else {
                    setup.name.clone()
                };
                let color = PlayerColor::from_index(idx).ok_or(Error::PlayerCount {
                    count: setups.len(),
                })?;
                Ok(Player::new(setup.id, name, color))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            id: Uuid::new_v4(),
            created: SystemTime::now(),
            players,
            completed: false,
            ended_early: false,
            winner: None,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created(&self) -> SystemTime {
        self.created
    }

    /// Local calendar day the game was started on.
    pub fn date(&self) -> NaiveDate {
        DateTime::<Local>::from(self.created).date_naive()
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, index: usize) -> Result<&Player> {
        self.players.get(index).ok_or(Error::InvalidPlayerIndex {
            index,
            len: self.players.len(),
        })
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn ended_early(&self) -> bool {
        self.ended_early
    }

    pub fn winner(&self) -> Option<&Player> {
        self.winner.as_ref()
    }

    pub fn is_fully_scored(&self) -> bool {
        self.players.iter().all(|player| player.scores.is_full())
    }

    /// Entered cells against the size of the sheet.
    pub fn progress(&self) -> (usize, usize) {
        let filled = self
            .players
            .iter()
            .map(|player| player.scores.filled_count())
            .sum();
        (filled, self.players.len() * CATEGORY_COUNT)
    }

    /// Players by descending total. Equal totals keep seat order, which is
    /// what breaks ties for the winner.
    pub fn ranked_players(&self) -> Vec<&Player> {
        self.players
            .iter()
            .sorted_by_key(|player| Reverse(player.total()))
            .collect()
    }

    /// The stored winner once the game is over, otherwise whoever ranks first
    /// right now.
    pub fn leader(&self) -> Option<&Player> {
        if self.completed {
            self.winner.as_ref()
        } else {
            self.ranked_players().into_iter().next()
        }
    }

    /// Writes `points` into a cell. Writing a filled cell replaces the old
    /// value. Only values from `category.score_options()` are accepted.
    pub fn record_score(
        &mut self,
        player_index: usize,
        category: Category,
        points: u32,
    ) -> Result<()> {
        let len = self.players.len();
        let player = self
            .players
            .get_mut(player_index)
            .ok_or(Error::InvalidPlayerIndex {
                index: player_index,
                len,
            })?;
        if !category.offers(points) {
            return Err(Error::InvalidPoints { category, points });
        }
        player.set_score(category, points);
        trace!(
            target: "game",
            "Recorded {} for {} in {}",
            points,
            player.name,
            category
        );
        self.refresh_completion();
        Ok(())
    }

    /// Clears every cell. Players, colors and the creation time stay.
    pub fn reset_scores(&mut self) {
        for player in self.players.iter_mut() {
            player.clear_scores();
        }
        self.ended_early = false;
        self.refresh_completion();
    }

    /// Seats a new blank player named after the seat it takes.
    pub fn add_player(&mut self) -> Result<&Player> {
        let count = self.players.len();
        let color =
            PlayerColor::from_index(count).ok_or(Error::PlayerCount { count: count + 1 })?;
        self.players.push(Player::new(
            Uuid::new_v4(),
            default_player_name(count + 1),
            color,
        ));
        self.refresh_completion();
        Ok(&self.players[count])
    }

    /// Removes a player and returns it. Remaining players keep their names and
    /// colors. The last player can not be removed.
    pub fn remove_player(&mut self, player_id: Uuid) -> Result<Player> {
        let position = self
            .players
            .iter()
            .position(|player| player.id == player_id)
            .ok_or(Error::UnknownPlayer(player_id))?;
        if self.players.len() == 1 {
            return Err(Error::PlayerCount { count: 0 });
        }
        let removed = self.players.remove(position);
        self.refresh_completion();
        Ok(removed)
    }

    /// Ends the game now, filled or not, and snapshots the current leader as
    /// winner.
    pub fn finish(&mut self) {
        self.ended_early = !self.is_fully_scored();
        self.refresh_completion();
    }

    /// Checks a game that did not come through the mutators, e.g. one read
    /// back from disk.
    pub fn validate(&self) -> Result<()> {
        if self.players.is_empty() || self.players.len() > MAX_PLAYERS {
            return Err(Error::PlayerCount {
                count: self.players.len(),
            });
        }
        for player in &self.players {
            for (category, points) in player.scores.iter() {
                if let Some(points) = points.filter(|points| !category.offers(*points)) {
                    return Err(Error::InvalidPoints { category, points });
                }
            }
        }

        let inconsistent = |reason: &str| Error::InconsistentGame {
            game_id: self.id,
            reason: reason.to_string(),
        };
        if self.completed != (self.ended_early || self.is_fully_scored()) {
            return Err(inconsistent("completed flag does not match the scores"));
        }
        if self.completed != self.winner.is_some() {
            return Err(inconsistent("winner does not match the completed flag"));
        }
        if let Some(winner) = &self.winner {
            if !self.players.iter().any(|player| player.id == winner.id) {
                return Err(inconsistent("winner is not seated in the game"));
            }
        }
        Ok(())
    }

    fn refresh_completion(&mut self) {
        if self.is_fully_scored() {
            self.ended_early = false;
        }
        self.completed = self.ended_early || self.is_fully_scored();
        let winner = if self.completed {
            self.ranked_players().first().map(|player| (*player).clone())
        } else {
            None
        };
        self.winner = winner;
    }
}
