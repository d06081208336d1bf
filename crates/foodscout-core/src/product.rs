//! Open Food Facts product record.
//!
//! ## Observed shape from `world.openfoodfacts.org`
//!
//! No field is guaranteed. Products contributed by users routinely lack a
//! name, an image or a category list, and the same field may change type
//! between records:
//!
//! - `code` is usually a string (`"3017620422003"`) but older records carry a
//!   bare JSON number. Both are stored as a string.
//! - `nutriments` values are usually numbers, sometimes numeric strings
//!   (`"12.5"`) and occasionally free text. Anything that is not a number is
//!   treated as absent.
//! - `categories` is a comma-separated string, most generic category first
//!   (`"Plant-based foods and beverages, Beverages, Sodas"`).
//! - `nutrition_grades` is a lower-case letter `a`..`e`, or values like
//!   `"unknown"` / `"not-applicable"`.
//!
//! Every field this crate does not model is kept in [`Product::extra`] so a
//! cart snapshot preserves the full record. The exception is a modelled field
//! whose value has the wrong shape (an object where text is expected, say):
//! it reads as absent and is not carried into snapshots.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

const NO_NAME: &str = "No Name";
const NO_CATEGORY: &str = "No Category";
const NOT_AVAILABLE: &str = "Not Available";
const NO_DESCRIPTION: &str = "No description available.";
const NO_GRADE: &str = "N/A";

/// Number of characters of ingredient text shown in list previews.
const INGREDIENTS_PREVIEW_CHARS: usize = 50;

/// A single food product as returned by the remote database.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Global identifier, usually the EAN-13 barcode.
    #[serde(
        default,
        deserialize_with = "de_opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub code: Option<String>,

    /// Secondary identifier used by the database internally.
    #[serde(
        rename = "_id",
        default,
        deserialize_with = "de_opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,

    #[serde(
        default,
        deserialize_with = "de_opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub product_name: Option<String>,

    #[serde(
        default,
        deserialize_with = "de_opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub generic_name: Option<String>,

    #[serde(
        default,
        deserialize_with = "de_opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_front_url: Option<String>,

    #[serde(
        default,
        deserialize_with = "de_opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_front_thumb_url: Option<String>,

    #[serde(
        default,
        deserialize_with = "de_opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_url: Option<String>,

    /// Comma-separated category list, most generic first.
    #[serde(
        default,
        deserialize_with = "de_opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub categories: Option<String>,

    #[serde(
        default,
        deserialize_with = "de_opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub nutrition_grades: Option<String>,

    #[serde(
        default,
        deserialize_with = "de_opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub ingredients_text: Option<String>,

    #[serde(
        default,
        deserialize_with = "de_opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub brands: Option<String>,

    /// Net quantity as printed on the pack, e.g. `"400 g"`.
    #[serde(
        default,
        deserialize_with = "de_opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub quantity: Option<String>,

    /// Label tags such as `"en:organic"` or `"fair-trade"`.
    #[serde(
        default,
        deserialize_with = "de_text_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub labels_tags: Vec<String>,

    #[serde(
        default,
        deserialize_with = "de_opt_nutriments",
        skip_serializing_if = "Option::is_none"
    )]
    pub nutriments: Option<Nutriments>,

    /// Every other field of the record, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Per-100g nutrient values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutriments {
    #[serde(
        rename = "energy_100g",
        default,
        deserialize_with = "de_opt_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub energy_kj: Option<f64>,

    #[serde(
        rename = "energy-kcal_100g",
        default,
        deserialize_with = "de_opt_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub energy_kcal: Option<f64>,

    #[serde(
        rename = "fat_100g",
        default,
        deserialize_with = "de_opt_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub fat: Option<f64>,

    #[serde(
        rename = "saturated-fat_100g",
        default,
        deserialize_with = "de_opt_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub saturated_fat: Option<f64>,

    #[serde(
        rename = "carbohydrates_100g",
        default,
        deserialize_with = "de_opt_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub carbohydrates: Option<f64>,

    #[serde(
        rename = "sugars_100g",
        default,
        deserialize_with = "de_opt_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub sugars: Option<f64>,

    #[serde(
        rename = "proteins_100g",
        default,
        deserialize_with = "de_opt_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub proteins: Option<f64>,

    #[serde(
        rename = "salt_100g",
        default,
        deserialize_with = "de_opt_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub salt: Option<f64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One row of the nutrition facts table.
#[derive(Debug, Clone, PartialEq)]
pub struct NutritionFact {
    pub label: &'static str,
    pub value: Option<f64>,
    pub unit: &'static str,
}

/// Nutri-Score letter grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NutritionGrade {
    A,
    B,
    C,
    D,
    E,
}

impl NutritionGrade {
    /// Parses a grade letter case-insensitively. Anything else is `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "a" => Some(Self::A),
            "b" => Some(Self::B),
            "c" => Some(Self::C),
            "d" => Some(Self::D),
            "e" => Some(Self::E),
            _ => None,
        }
    }
}

impl std::fmt::Display for NutritionGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NutritionGrade::A => write!(f, "A"),
            NutritionGrade::B => write!(f, "B"),
            NutritionGrade::C => write!(f, "C"),
            NutritionGrade::D => write!(f, "D"),
            NutritionGrade::E => write!(f, "E"),
        }
    }
}

impl Product {
    /// Display name, falling back to `"No Name"`.
    #[must_use]
    pub fn display_name(&self) -> &str {
        non_empty(self.product_name.as_ref()).unwrap_or(NO_NAME)
    }

    /// Generic name, falling back to a fixed placeholder sentence.
    #[must_use]
    pub fn description(&self) -> &str {
        non_empty(self.generic_name.as_ref()).unwrap_or(NO_DESCRIPTION)
    }

    /// Raw category text, empty when absent. Used for filtering.
    #[must_use]
    pub fn category_text(&self) -> &str {
        self.categories.as_deref().unwrap_or("")
    }

    /// First entry of the category list, falling back to `"No Category"`.
    #[must_use]
    pub fn primary_category(&self) -> &str {
        self.categories
            .as_deref()
            .and_then(|c| c.split(',').next())
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(NO_CATEGORY)
    }

    /// Raw grade text, empty when absent. Used for sorting.
    #[must_use]
    pub fn grade_text(&self) -> &str {
        self.nutrition_grades.as_deref().unwrap_or("")
    }

    #[must_use]
    pub fn grade(&self) -> Option<NutritionGrade> {
        self.nutrition_grades
            .as_deref()
            .and_then(NutritionGrade::parse)
    }

    /// Upper-cased grade text, or `"N/A"` when absent.
    #[must_use]
    pub fn grade_label(&self) -> String {
        non_empty(self.nutrition_grades.as_ref())
            .map_or_else(|| NO_GRADE.to_string(), str::to_uppercase)
    }

    /// First 50 characters of the ingredient list followed by `...`, or
    /// `"Not Available"`.
    #[must_use]
    pub fn ingredients_preview(&self) -> String {
        match non_empty(self.ingredients_text.as_ref()) {
            Some(text) => {
                let head: String = text.chars().take(INGREDIENTS_PREVIEW_CHARS).collect();
                format!("{head}...")
            }
            None => NOT_AVAILABLE.to_string(),
        }
    }

    /// Label tags with dashes turned into spaces (`"fair-trade"` → `"fair trade"`).
    #[must_use]
    pub fn label_names(&self) -> Vec<String> {
        self.labels_tags
            .iter()
            .filter(|l| !l.is_empty())
            .map(|l| l.replace('-', " "))
            .collect()
    }

    /// Front image for detail views.
    #[must_use]
    pub fn front_image(&self) -> Option<&str> {
        non_empty(self.image_front_url.as_ref())
    }

    /// Thumbnail for list views, falling back to the full front image.
    #[must_use]
    pub fn thumbnail(&self) -> Option<&str> {
        non_empty(self.image_front_thumb_url.as_ref()).or_else(|| self.front_image())
    }

    /// Nutrition facts table rows, or `None` when the record has no
    /// `nutriments` section at all.
    #[must_use]
    pub fn nutrition_facts(&self) -> Option<Vec<NutritionFact>> {
        let n = self.nutriments.as_ref()?;
        let row = |label, value, unit| NutritionFact { label, value, unit };
        Some(vec![
            row("Energy", n.energy_kj, "kJ"),
            row("Energy", n.energy_kcal, "kcal"),
            row("Fat", n.fat, "g"),
            row("Saturated Fat", n.saturated_fat, "g"),
            row("Carbohydrates", n.carbohydrates, "g"),
            row("Sugars", n.sugars, "g"),
            row("Proteins", n.proteins, "g"),
            row("Salt", n.salt, "g"),
        ])
    }
}

/// Returns the string when it is present and not empty.
pub(crate) fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}

// Strings and numbers only. Any other shape is dropped, not kept in `extra`.
fn de_opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn de_text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

fn de_opt_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

fn de_opt_nutriments<'de, D>(deserializer: D) -> Result<Option<Nutriments>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(v @ Value::Object(_)) => serde_json::from_value(v).ok(),
        _ => None,
    })
}
