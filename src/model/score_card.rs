use serde::{Deserialize, Serialize};

use super::category::{Category, CATEGORY_COUNT};

/// One player's column on the score sheet. Holds a slot for every category,
/// so a card can never be missing a key or carry an extra one.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreCard {
    cells: [Option<u32>; CATEGORY_COUNT],
}

impl ScoreCard {
    pub fn get(&self, category: Category) -> Option<u32> {
        self.cells[category.index()]
    }

    pub fn set(&mut self, category: Category, points: u32) {
        self.cells[category.index()] = Some(points);
    }

    pub fn clear(&mut self) {
        self.cells = [None; CATEGORY_COUNT];
    }

    /// Sum of the entered scores; empty cells count for nothing.
    pub fn total(&self) -> u32 {
        self.cells.iter().flatten().sum()
    }

    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, Option<u32>)> + '_ {
        Category::all().map(|category| (category, self.get(category)))
    }
}
