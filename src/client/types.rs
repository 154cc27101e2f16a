//! Type definitions for the recipe catalog API.
//!
//! This module contains the data structures exchanged with the recipe backend:
//! the recipe record itself, the filter set sent to the search endpoint, the
//! supported page sizes and the list envelope returned by both endpoints.
//!
//! ## Key Types
//!
//! - [`Recipe`] - One catalog entry; every field is optional
//! - [`RecipeFilters`] - User-entered search criteria (empty means unset)
//! - [`PageSize`] - The fixed set of page sizes the table offers
//! - [`RecipeList`] - Response wrapper for both listing and search
//!
//! ## API Compatibility
//!
//! The two endpoints disagree on their response shape:
//! - `/api/recipes` answers `{ page, limit, total, data: [...] }`
//! - `/api/recipes/search` answers a bare `[...]`
//!
//! [`RecipeList`] has a custom deserializer that accepts both.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single recipe from the catalog.
///
/// The backend fills these from a loosely cleaned data set, so nothing is
/// guaranteed to be present. Rendering code substitutes placeholders for
/// anything missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Unique recipe identifier, used as the row key
    #[serde(default)]
    pub id: Option<i64>,
    /// Recipe title
    #[serde(default)]
    pub title: Option<String>,
    /// Cuisine label (e.g. "Southern Recipes")
    #[serde(default)]
    pub cuisine: Option<String>,
    /// Average user rating on a 0-5 scale
    #[serde(default)]
    pub rating: Option<f64>,
    /// Total time in minutes
    #[serde(default)]
    pub total_time: Option<f64>,
    /// Preparation time in minutes
    #[serde(default)]
    pub prep_time: Option<f64>,
    /// Cooking time in minutes
    #[serde(default)]
    pub cook_time: Option<f64>,
    /// Free-form servings description (usually text such as "8 servings")
    #[serde(default)]
    pub serves: Option<Value>,
    /// Recipe description
    #[serde(default)]
    pub description: Option<String>,
    /// Nutrient name to value, in the order the backend sent them
    #[serde(default)]
    pub nutrients: Option<Map<String, Value>>,
}

/// A single field of the [`RecipeFilters`] set.
///
/// The declaration order is also the order in which active filters are sent
/// as query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    Title,
    Cuisine,
    MinRating,
    MaxTotalTime,
    Calories,
    MaxRating,
    MinTotalTime,
}

impl FilterField {
    pub const ALL: [FilterField; 7] = [
        FilterField::Title,
        FilterField::Cuisine,
        FilterField::MinRating,
        FilterField::MaxTotalTime,
        FilterField::Calories,
        FilterField::MaxRating,
        FilterField::MinTotalTime,
    ];

    /// Query parameter name understood by the search endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterField::Title => "title",
            FilterField::Cuisine => "cuisine",
            FilterField::MinRating => "min_rating",
            FilterField::MaxTotalTime => "max_total_time",
            FilterField::Calories => "calories",
            FilterField::MaxRating => "max_rating",
            FilterField::MinTotalTime => "min_total_time",
        }
    }

    /// Input hint shown next to an unset filter.
    pub fn hint(&self) -> &'static str {
        match self {
            FilterField::Title => "Search Title",
            FilterField::Cuisine => "Cuisine",
            FilterField::MinRating => "Min Rating (e.g. 4.5)",
            FilterField::MaxTotalTime => "Max Time (e.g. 60)",
            FilterField::Calories => "Calories (e.g. <=400)",
            FilterField::MaxRating => "Max Rating (e.g. 5)",
            FilterField::MinTotalTime => "Min Time (e.g. 15)",
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Search criteria for the `/api/recipes/search` endpoint.
///
/// Every field is a raw string exactly as the user typed it. An empty (or
/// whitespace-only) value means "unset" and is left out of the request.
/// The backend does the interpretation: `calories` takes a comparison
/// such as `<=400` or `>=200`, the rating and time bounds take numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeFilters {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub cuisine: String,
    #[serde(default)]
    pub min_rating: String,
    #[serde(default)]
    pub max_total_time: String,
    #[serde(default)]
    pub calories: String,
    #[serde(default)]
    pub max_rating: String,
    #[serde(default)]
    pub min_total_time: String,
}

impl RecipeFilters {
    pub fn get(&self, field: FilterField) -> &str {
        match field {
            FilterField::Title => &self.title,
            FilterField::Cuisine => &self.cuisine,
            FilterField::MinRating => &self.min_rating,
            FilterField::MaxTotalTime => &self.max_total_time,
            FilterField::Calories => &self.calories,
            FilterField::MaxRating => &self.max_rating,
            FilterField::MinTotalTime => &self.min_total_time,
        }
    }

    pub fn set(&mut self, field: FilterField, value: impl Into<String>) {
        let slot = match field {
            FilterField::Title => &mut self.title,
            FilterField::Cuisine => &mut self.cuisine,
            FilterField::MinRating => &mut self.min_rating,
            FilterField::MaxTotalTime => &mut self.max_total_time,
            FilterField::Calories => &mut self.calories,
            FilterField::MaxRating => &mut self.max_rating,
            FilterField::MinTotalTime => &mut self.min_total_time,
        };
        *slot = value.into();
    }

    /// Filters that carry a value, trimmed, in query parameter order.
    pub fn active(&self) -> Vec<(FilterField, &str)> {
        FilterField::ALL
            .iter()
            .filter_map(|field| {
                let value = self.get(*field).trim();
                (!value.is_empty()).then_some((*field, value))
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.active().is_empty()
    }
}

/// Page sizes offered by the table's "per page" selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PageSize {
    #[default]
    Fifteen,
    TwentyFive,
    Fifty,
}

impl PageSize {
    pub const ALL: [PageSize; 3] = [PageSize::Fifteen, PageSize::TwentyFive, PageSize::Fifty];

    pub fn get(self) -> u32 {
        match self {
            PageSize::Fifteen => 15,
            PageSize::TwentyFive => 25,
            PageSize::Fifty => 50,
        }
    }
}

impl TryFrom<u32> for PageSize {
    type Error = anyhow::Error;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        PageSize::ALL
            .into_iter()
            .find(|size| size.get() == value)
            .ok_or_else(|| anyhow::anyhow!("Unsupported page size {}: expected one of 15, 25 or 50", value))
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Recipes returned by either endpoint, plus the listing metadata when present.
///
/// A body without `data` (or with `data: null`) yields an empty list rather
/// than an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecipeList {
    /// Recipes in display order
    pub data: Vec<Recipe>,
    /// Page echoed back by the listing endpoint
    pub page: Option<u32>,
    /// Page size echoed back by the listing endpoint
    pub limit: Option<u32>,
    /// Total number of recipes in the catalog (listing endpoint only)
    pub total: Option<u64>,
}

impl RecipeList {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl From<Vec<Recipe>> for RecipeList {
    fn from(data: Vec<Recipe>) -> Self {
        Self {
            data,
            ..Default::default()
        }
    }
}

/// Custom deserializer for RecipeList to handle both response shapes.
///
/// The body is read as a [`Value`] first and dispatched on its JSON type, so a
/// malformed recipe field is reported as such instead of as a shape mismatch.
impl<'de> Deserialize<'de> for RecipeList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;

        #[derive(Deserialize)]
        struct Envelope {
            #[serde(default)]
            data: Option<Vec<Recipe>>,
            #[serde(default)]
            page: Option<u32>,
            #[serde(default)]
            limit: Option<u32>,
            #[serde(default)]
            total: Option<u64>,
        }

        match Value::deserialize(deserializer)? {
            body @ Value::Array(_) => serde_json::from_value::<Vec<Recipe>>(body)
                .map(RecipeList::from)
                .map_err(D::Error::custom),
            body @ Value::Object(_) => {
                let envelope = serde_json::from_value::<Envelope>(body).map_err(D::Error::custom)?;
                Ok(RecipeList {
                    data: envelope.data.unwrap_or_default(),
                    page: envelope.page,
                    limit: envelope.limit,
                    total: envelope.total,
                })
            }
            other => Err(D::Error::custom(format!(
                "expected a recipe array or an object with a data field, found {}",
                other
            ))),
        }
    }
}
