//! # Actions
//!
//! Everything that can happen to the catalog becomes an `Action`.
//! User picks an ordering? That's `Action::OrderCountries(kind)`.
//! Backend answers? That's `Action::ReceiveAllCountries(list)`.
//!
//! The `reduce()` function takes the current state and an action,
//! then returns the next state. No side effects here. I/O happens in
//! `intents`.
//!
//! ```text
//! Snapshot + Action  →  reduce()  →  New Snapshot
//! ```
//!
//! Actions serialize as `{"type": "...", "payload": ...}` so a session can be
//! logged and replayed. Unrecognised types deserialize to `Action::Unknown`
//! and leave the state untouched.
//!
//! ## Filter vs. order
//!
//! Filters always re-derive from the canonical `countries`, so a second
//! filter replaces the first instead of narrowing it. Ordering sorts the
//! current view, so filter-then-sort keeps the filter while sort-then-filter
//! drops the sort.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::core::collate;
use crate::core::pagination::paginate;
use crate::core::state::{Snapshot, derive_continents};
use crate::gateway::{Activity, ActivityId, ApiError, Country};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderKind {
    AlphaAsc,
    AlphaDesc,
    PopAsc,
    PopDesc,
    #[serde(other)]
    #[value(skip)]
    Unknown,
}

impl OrderKind {
    /// The orderings a user can actually pick, in cycling order.
    pub const SELECTABLE: [OrderKind; 4] = [
        OrderKind::AlphaAsc,
        OrderKind::AlphaDesc,
        OrderKind::PopAsc,
        OrderKind::PopDesc,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            OrderKind::AlphaAsc => "A-Z",
            OrderKind::AlphaDesc => "Z-A",
            OrderKind::PopAsc => "Population ↑",
            OrderKind::PopDesc => "Population ↓",
            OrderKind::Unknown => "?",
        }
    }

    fn comparator(self) -> Option<fn(&Country, &Country) -> Ordering> {
        match self {
            OrderKind::AlphaAsc => Some(name_asc),
            OrderKind::AlphaDesc => Some(name_desc),
            OrderKind::PopAsc => Some(population_asc),
            OrderKind::PopDesc => Some(population_desc),
            OrderKind::Unknown => None,
        }
    }
}

fn name_asc(a: &Country, b: &Country) -> Ordering {
    collate::compare(&a.name, &b.name)
}

fn name_desc(a: &Country, b: &Country) -> Ordering {
    collate::compare(&b.name, &a.name)
}

fn population_asc(a: &Country, b: &Country) -> Ordering {
    a.population.cmp(&b.population)
}

fn population_desc(a: &Country, b: &Country) -> Ordering {
    b.population.cmp(&a.population)
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterKind {
    Continent,
    Activity,
    #[serde(other)]
    Unknown,
}

impl FilterKind {
    fn matches(self, country: &Country, value: &str) -> Option<bool> {
        match self {
            FilterKind::Continent => Some(country.continent == value),
            FilterKind::Activity => Some(country.has_activity(value)),
            FilterKind::Unknown => None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    SetLoading(bool),
    SetError(ApiError),
    ResetError,
    /// Full list fetch: replaces the canonical list.
    ReceiveAllCountries(Vec<Country>),
    /// Name search result: replaces only the view.
    ReceiveCountries(Vec<Country>),
    ReceiveActivities(Vec<Activity>),
    ActivityCreated(Activity),
    ActivityDeleted(ActivityId),
    ReceiveContinents,
    OrderCountries(OrderKind),
    FilterCountries { kind: FilterKind, value: String },
    ResetFilter,
    SetPage(usize),
    #[serde(other)]
    Unknown,
}

impl Action {
    /// Short name for logging; payloads can be thousands of countries.
    pub fn name(&self) -> &'static str {
        match self {
            Action::SetLoading(_) => "SetLoading",
            Action::SetError(_) => "SetError",
            Action::ResetError => "ResetError",
            Action::ReceiveAllCountries(_) => "ReceiveAllCountries",
            Action::ReceiveCountries(_) => "ReceiveCountries",
            Action::ReceiveActivities(_) => "ReceiveActivities",
            Action::ActivityCreated(_) => "ActivityCreated",
            Action::ActivityDeleted(_) => "ActivityDeleted",
            Action::ReceiveContinents => "ReceiveContinents",
            Action::OrderCountries(_) => "OrderCountries",
            Action::FilterCountries { .. } => "FilterCountries",
            Action::ResetFilter => "ResetFilter",
            Action::SetPage(_) => "SetPage",
            Action::Unknown => "Unknown",
        }
    }
}

/// Applies one action. Total over every known action; `Unknown` actions and
/// unknown order/filter kinds return the state unchanged.
pub fn reduce(state: Snapshot, action: Action) -> Snapshot {
    let per_page = state.pagination.items_per_page;

    match action {
        Action::SetLoading(is_loading) => Snapshot { is_loading, ..state },

        Action::SetError(error) => Snapshot {
            error: Some(error),
            is_loading: false,
            ..state
        },

        Action::ResetError => Snapshot {
            error: None,
            ..state
        },

        Action::ReceiveAllCountries(countries) => Snapshot {
            continents: derive_continents(&countries),
            pagination: paginate(&countries, 1, per_page),
            sorted_countries: countries.clone(),
            countries,
            ..state
        },

        Action::ReceiveCountries(found) => Snapshot {
            pagination: paginate(&found, 1, per_page),
            sorted_countries: found,
            ..state
        },

        Action::ReceiveActivities(activities) => Snapshot { activities, ..state },

        Action::ActivityCreated(activity) => {
            let mut activities = state.activities;
            activities.push(activity);
            Snapshot { activities, ..state }
        }

        Action::ActivityDeleted(id) => {
            let activities = state
                .activities
                .into_iter()
                .filter(|a| a.id != id)
                .collect();
            Snapshot { activities, ..state }
        }

        Action::ReceiveContinents => Snapshot {
            continents: derive_continents(&state.countries),
            ..state
        },

        Action::OrderCountries(kind) => {
            let Some(compare) = kind.comparator() else {
                return state;
            };
            let mut sorted = state.sorted_countries.clone();
            // sort_by is stable: equal keys keep their relative order.
            sorted.sort_by(compare);
            Snapshot {
                pagination: paginate(&sorted, 1, per_page),
                sorted_countries: sorted,
                ..state
            }
        }

        Action::FilterCountries { kind, value } => {
            if kind == FilterKind::Unknown {
                return state;
            }
            let filtered: Vec<Country> = state
                .countries
                .iter()
                .filter(|c| kind.matches(c, &value).unwrap_or(false))
                .cloned()
                .collect();
            Snapshot {
                pagination: paginate(&filtered, 1, per_page),
                sorted_countries: filtered,
                ..state
            }
        }

        Action::ResetFilter => Snapshot {
            pagination: paginate(&state.countries, 1, per_page),
            sorted_countries: state.countries.clone(),
            ..state
        },

        Action::SetPage(page) => Snapshot {
            pagination: paginate(&state.sorted_countries, page, per_page),
            ..state
        },

        Action::Unknown => state,
    }
}
