//! Fixed filter categories and sort keys offered by the filter drawer.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// One of the eight category keys the product list can be filtered by.
///
/// The key is matched as a case-insensitive substring of a product's
/// category text, so `dairies` also matches `"Fermented dairies"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Beverages,
    Dairies,
    Snacks,
    SweetSnacks,
    Breakfasts,
    Meals,
    Desserts,
    PlantBasedFoodsAndBeverages,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Beverages,
        Category::Dairies,
        Category::Snacks,
        Category::SweetSnacks,
        Category::Breakfasts,
        Category::Meals,
        Category::Desserts,
        Category::PlantBasedFoodsAndBeverages,
    ];

    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Category::Beverages => "beverages",
            Category::Dairies => "dairies",
            Category::Snacks => "snacks",
            Category::SweetSnacks => "sweet-snacks",
            Category::Breakfasts => "breakfasts",
            Category::Meals => "meals",
            Category::Desserts => "desserts",
            Category::PlantBasedFoodsAndBeverages => "plant-based-foods-and-beverages",
        }
    }

    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Category::Beverages => "Beverages",
            Category::Dairies => "Dairy Products",
            Category::Snacks => "Snacks",
            Category::SweetSnacks => "Sweet Snacks",
            Category::Breakfasts => "Breakfasts",
            Category::Meals => "Meals",
            Category::Desserts => "Desserts",
            Category::PlantBasedFoodsAndBeverages => "Plant Based Foods",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Category {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.key() == wanted)
            .ok_or_else(|| CoreError::UnknownCategory(s.to_string()))
    }
}

/// Ordering applied to the displayed product list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    /// Keep fetch order.
    #[default]
    None,
    NameAsc,
    NameDesc,
    GradeAsc,
    GradeDesc,
}

impl SortOption {
    pub const ALL: [SortOption; 5] = [
        SortOption::None,
        SortOption::NameAsc,
        SortOption::NameDesc,
        SortOption::GradeAsc,
        SortOption::GradeDesc,
    ];

    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            SortOption::None => "none",
            SortOption::NameAsc => "name-asc",
            SortOption::NameDesc => "name-desc",
            SortOption::GradeAsc => "grade-asc",
            SortOption::GradeDesc => "grade-desc",
        }
    }

    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            SortOption::None => "None",
            SortOption::NameAsc => "Name A-Z",
            SortOption::NameDesc => "Name Z-A",
            SortOption::GradeAsc => "Nutrition Grade \u{2191}",
            SortOption::GradeDesc => "Nutrition Grade \u{2193}",
        }
    }

    #[must_use]
    pub fn is_none(self) -> bool {
        self == SortOption::None
    }
}

impl std::fmt::Display for SortOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SortOption {
    type Err = CoreError;

    /// Accepts the kebab-case key; an empty string means no sorting.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        if wanted.is_empty() {
            return Ok(SortOption::None);
        }
        SortOption::ALL
            .into_iter()
            .find(|o| o.key() == wanted)
            .ok_or_else(|| CoreError::UnknownSortOption(s.to_string()))
    }
}
