use serde::{Deserialize, Serialize};

/// Palette assigned to players by seat. There is one color per allowed seat.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PlayerColor {
    BluePurple,
    GreenTeal,
    RedPink,
    YellowOrange,
    IndigoBlue,
    PurplePink,
}

impl PlayerColor {
    pub const PALETTE: [PlayerColor; 6] = [
        PlayerColor::BluePurple,
        PlayerColor::GreenTeal,
        PlayerColor::RedPink,
        PlayerColor::YellowOrange,
        PlayerColor::IndigoBlue,
        PlayerColor::PurplePink,
    ];

    pub fn from_index(index: usize) -> Option<PlayerColor> {
        Self::PALETTE.get(index).copied()
    }

    /// Gradient stops, for front ends that want the stock look.
    pub fn gradient(&self) -> (&'static str, &'static str) {
        match self {
            PlayerColor::BluePurple => ("blue-500", "purple-600"),
            PlayerColor::GreenTeal => ("green-500", "teal-600"),
            PlayerColor::RedPink => ("red-500", "pink-600"),
            PlayerColor::YellowOrange => ("yellow-500", "orange-600"),
            PlayerColor::IndigoBlue => ("indigo-500", "blue-600"),
            PlayerColor::PurplePink => ("purple-500", "pink-600"),
        }
    }
}
