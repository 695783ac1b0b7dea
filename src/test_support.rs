//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Mutex;

use async_trait::async_trait;

use crate::gateway::{
    Activity, ActivityDraft, ActivityId, ActivityRef, Country, CountryGateway, CountryId,
    GatewayError, Season,
};

pub fn country(id: &str, name: &str, continent: &str, population: u64) -> Country {
    Country {
        id: id.to_string(),
        name: name.to_string(),
        flag: format!("https://flags.example/{}.png", id.to_lowercase()),
        continent: continent.to_string(),
        capital: None,
        subregion: None,
        area: None,
        population,
        activities: Vec::new(),
    }
}

fn with_activities(mut country: Country, names: &[&str]) -> Country {
    country.activities = names
        .iter()
        .map(|name| ActivityRef {
            id: None,
            name: name.to_string(),
            difficulty: None,
            duration: None,
            season: None,
        })
        .collect();
    country
}

/// Five countries in deliberately unsorted order.
pub fn sample_countries() -> Vec<Country> {
    vec![
        with_activities(country("FRA", "France", "Europe", 67_000_000), &["Hiking"]),
        with_activities(country("ARG", "Argentina", "Americas", 45_000_000), &["Hiking"]),
        country("JPN", "Japan", "Asia", 125_000_000),
        with_activities(country("BRA", "Brazil", "Americas", 214_000_000), &["Surfing"]),
        with_activities(country("ESP", "Spain", "Europe", 40_000_000), &["Surfing", "Hiking"]),
    ]
}

/// `n` countries "Country 00".."Country n-1", alternating Europe/Asia,
/// with population equal to the index.
pub fn numbered_countries(n: usize) -> Vec<Country> {
    (0..n)
        .map(|i| {
            let continent = if i % 2 == 0 { "Europe" } else { "Asia" };
            country(&format!("C{i:02}"), &format!("Country {i:02}"), continent, i as u64)
        })
        .collect()
}

pub fn activity(id: u64, name: &str) -> Activity {
    Activity {
        id: ActivityId::from(id),
        name: name.to_string(),
        difficulty: 2,
        duration: 3.0,
        season: Season::Summer,
        countries: Vec::new(),
    }
}

/// Gateway returning canned results and recording what it was asked.
pub struct FakeGateway {
    pub countries: Result<Vec<Country>, GatewayError>,
    pub search: Result<Vec<Country>, GatewayError>,
    pub activities: Result<Vec<Activity>, GatewayError>,
    pub created: Result<Activity, GatewayError>,
    pub deleted: Result<(), GatewayError>,
    pub calls: Mutex<Vec<String>>,
}

impl Default for FakeGateway {
    fn default() -> Self {
        Self {
            countries: Ok(sample_countries()),
            search: Ok(Vec::new()),
            activities: Ok(vec![activity(1, "Hiking"), activity(2, "Surfing")]),
            created: Ok(activity(3, "Rafting")),
            deleted: Ok(()),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl FakeGateway {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: String) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

#[async_trait]
impl CountryGateway for FakeGateway {
    async fn fetch_all_countries(&self) -> Result<Vec<Country>, GatewayError> {
        self.record("fetch_all_countries".into());
        self.countries.clone()
    }

    async fn fetch_countries_by_name(&self, term: &str) -> Result<Vec<Country>, GatewayError> {
        self.record(format!("fetch_countries_by_name({term})"));
        self.search.clone()
    }

    async fn fetch_activities(&self) -> Result<Vec<Activity>, GatewayError> {
        self.record("fetch_activities".into());
        self.activities.clone()
    }

    async fn create_activity(
        &self,
        draft: &ActivityDraft,
        country_ids: &[CountryId],
    ) -> Result<Activity, GatewayError> {
        self.record(format!("create_activity({}, {})", draft.name, country_ids.join(",")));
        self.created.clone()
    }

    async fn delete_activity(&self, id: &ActivityId) -> Result<(), GatewayError> {
        self.record(format!("delete_activity({id})"));
        self.deleted.clone()
    }
}
