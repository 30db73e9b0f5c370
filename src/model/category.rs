use serde::{Deserialize, Serialize};

use super::ScoreOption;

pub const CATEGORY_COUNT: usize = 10;

/// How many dice of one face a counted category accepts (0 through 5).
const MAX_COUNT: u32 = 5;

/// Decides which declarations a category offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryKind {
    /// Points are the number of matching dice times `multiplier`.
    Counted { multiplier: u32 },
    /// A combination is either missed, rolled normally or served.
    Combination { normal: u32, served: u32 },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Nines,
    Tens,
    Jacks,
    Queens,
    Kings,
    Aces,
    Straight,
    Full,
    Poker,
    Grande,
}

impl Category {
    /// Every category in score sheet order.
    pub const ALL: [Category; CATEGORY_COUNT] = [
        Category::Nines,
        Category::Tens,
        Category::Jacks,
        Category::Queens,
        Category::Kings,
        Category::Aces,
        Category::Straight,
        Category::Full,
        Category::Poker,
        Category::Grande,
    ];

    pub fn all() -> impl Iterator<Item = Category> {
        Self::ALL.into_iter()
    }

    pub fn index(&self) -> usize {
        match self {
            Category::Nines => 0,
            Category::Tens => 1,
            Category::Jacks => 2,
            Category::Queens => 3,
            Category::Kings => 4,
            Category::Aces => 5,
            Category::Straight => 6,
            Category::Full => 7,
            Category::Poker => 8,
            Category::Grande => 9,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Category::Nines => "nines",
            Category::Tens => "tens",
            Category::Jacks => "jacks",
            Category::Queens => "queens",
            Category::Kings => "kings",
            Category::Aces => "aces",
            Category::Straight => "straight",
            Category::Full => "full",
            Category::Poker => "poker",
            Category::Grande => "grande",
        }
    }

    pub fn from_key(key: &str) -> Option<Category> {
        Self::all().find(|category| category.key() == key)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Category::Nines => "9",
            Category::Tens => "10",
            Category::Jacks => "Jack",
            Category::Queens => "Queen",
            Category::Kings => "King",
            Category::Aces => "Ace",
            Category::Straight => "Straight",
            Category::Full => "Full",
            Category::Poker => "Poker",
            Category::Grande => "Grande",
        }
    }

    pub fn kind(&self) -> CategoryKind {
        match self {
            Category::Nines => CategoryKind::Counted { multiplier: 1 },
            Category::Tens => CategoryKind::Counted { multiplier: 2 },
            Category::Jacks => CategoryKind::Counted { multiplier: 3 },
            Category::Queens => CategoryKind::Counted { multiplier: 4 },
            Category::Kings => CategoryKind::Counted { multiplier: 5 },
            Category::Aces => CategoryKind::Counted { multiplier: 6 },
            Category::Straight => CategoryKind::Combination {
                normal: 20,
                served: 25,
            },
            Category::Full => CategoryKind::Combination {
                normal: 30,
                served: 35,
            },
            Category::Poker => CategoryKind::Combination {
                normal: 40,
                served: 45,
            },
            Category::Grande => CategoryKind::Combination {
                normal: 50,
                served: 80,
            },
        }
    }

    /// Whether `points` is one of the values `score_options` offers.
    pub fn offers(&self, points: u32) -> bool {
        match self.kind() {
            CategoryKind::Counted { multiplier } => {
                points % multiplier == 0 && points / multiplier <= MAX_COUNT
            }
            CategoryKind::Combination { normal, served } => {
                points == 0 || points == normal || points == served
            }
        }
    }

    /// The declarations a player can make for this category, lowest first.
    pub fn score_options(&self) -> Vec<ScoreOption> {
        match self.kind() {
            CategoryKind::Counted { multiplier } => (0..=MAX_COUNT)
                .map(|count| ScoreOption::new(count.to_string(), count * multiplier))
                .collect(),
            CategoryKind::Combination { normal, served } => vec![
                ScoreOption::new("0", 0),
                ScoreOption::new("Normal", normal),
                ScoreOption::new("Served", served),
            ],
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
