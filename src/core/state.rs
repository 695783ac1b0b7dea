//! # Application State
//!
//! Everything the UI reads lives in one `Snapshot`. No TUI-specific types
//! here; presentation state lives in the `tui` module.
//!
//! ```text
//! Snapshot
//! ├── countries: Vec<Country>         // canonical list, as last fetched in full
//! ├── sorted_countries: Vec<Country>  // derived view (sort / filter / search result)
//! ├── activities: Vec<Activity>
//! ├── continents: Vec<String>         // distinct, non-empty, first-seen order
//! ├── is_loading: bool
//! ├── error: Option<ApiError>         // sticky until ResetError
//! └── pagination: Pagination          // current slice of sorted_countries
//! ```
//!
//! State changes only happen through `reduce(state, action)` in action.rs.

use crate::core::pagination::{DEFAULT_ITEMS_PER_PAGE, Pagination};
use crate::gateway::{Activity, ApiError, Country};

#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub countries: Vec<Country>,
    pub sorted_countries: Vec<Country>,
    pub activities: Vec<Activity>,
    pub continents: Vec<String>,
    pub is_loading: bool,
    pub error: Option<ApiError>,
    pub pagination: Pagination,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::new(DEFAULT_ITEMS_PER_PAGE)
    }
}

impl Snapshot {
    pub fn new(items_per_page: usize) -> Self {
        Self {
            countries: Vec::new(),
            sorted_countries: Vec::new(),
            activities: Vec::new(),
            continents: Vec::new(),
            is_loading: false,
            error: None,
            pagination: Pagination::empty(items_per_page),
        }
    }

    /// Distinct activity names in first-seen order. These are the options
    /// offered by the activity filter.
    pub fn activity_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for activity in &self.activities {
            if !names.contains(&activity.name) {
                names.push(activity.name.clone());
            }
        }
        names
    }
}

/// Distinct non-empty continents in the order they first appear.
pub fn derive_continents(countries: &[Country]) -> Vec<String> {
    let mut continents: Vec<String> = Vec::new();
    for country in countries {
        if !country.continent.is_empty() && !continents.contains(&country.continent) {
            continents.push(country.continent.clone());
        }
    }
    continents
}
