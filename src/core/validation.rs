//! # Activity Form Validation
//!
//! Raw form input is validated locally before anything is sent. A rejected
//! form never reaches the gateway and never touches `Snapshot::error`.

use std::fmt;

use crate::gateway::{ActivityDraft, CountryId, Season};

pub const NAME_MIN_LEN: usize = 3;
pub const NAME_MAX_LEN: usize = 255;
pub const DIFFICULTY_RANGE: std::ops::RangeInclusive<u8> = 1..=5;
pub const DURATION_RANGE: std::ops::RangeInclusive<f64> = 1.0..=100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Difficulty,
    Duration,
    Season,
    Countries,
}

impl FormField {
    fn hint(&self) -> &'static str {
        match self {
            FormField::Name => "name must be 3-255 characters and not a number",
            FormField::Difficulty => "difficulty is required (1-5)",
            FormField::Duration => "duration is required (1-100 hours)",
            FormField::Season => "season is required (Summer, Autumn, Winter, Spring)",
            FormField::Countries => "select at least one country",
        }
    }
}

/// Every field that failed, in form order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    pub fields: Vec<FormField>,
}

impl ValidationErrors {
    pub fn contains(&self, field: FormField) -> bool {
        self.fields.contains(&field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hints: Vec<&str> = self.fields.iter().map(FormField::hint).collect();
        write!(f, "invalid activity: {}", hints.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Activity form as typed by the user. Everything stays a string until
/// `validate()` so half-filled forms can be represented.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityForm {
    pub name: String,
    pub difficulty: String,
    pub duration: String,
    pub season: String,
    pub countries: Vec<CountryId>,
}

impl ActivityForm {
    /// Adds a country unless it is already selected.
    pub fn select_country(&mut self, id: impl Into<CountryId>) {
        let id = id.into();
        if !self.countries.contains(&id) {
            self.countries.push(id);
        }
    }

    pub fn remove_country(&mut self, id: &str) {
        self.countries.retain(|c| c != id);
    }

    pub fn validate(&self) -> Result<(ActivityDraft, Vec<CountryId>), ValidationErrors> {
        let mut fields = Vec::new();

        let name = self.name.trim();
        if !valid_name(&self.name) {
            fields.push(FormField::Name);
        }

        let difficulty = self
            .difficulty
            .trim()
            .parse::<u8>()
            .ok()
            .filter(|d| DIFFICULTY_RANGE.contains(d));
        if difficulty.is_none() {
            fields.push(FormField::Difficulty);
        }

        let duration = self
            .duration
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|d| DURATION_RANGE.contains(d));
        if duration.is_none() {
            fields.push(FormField::Duration);
        }

        let season = self.season.parse::<Season>().ok();
        if season.is_none() {
            fields.push(FormField::Season);
        }

        if self.countries.is_empty() {
            fields.push(FormField::Countries);
        }

        match (difficulty, duration, season) {
            (Some(difficulty), Some(duration), Some(season)) if fields.is_empty() => Ok((
                ActivityDraft {
                    name: name.to_string(),
                    difficulty,
                    duration,
                    season,
                },
                self.countries.clone(),
            )),
            _ => Err(ValidationErrors { fields }),
        }
    }
}

/// Trimmed length within bounds and not something that reads as a number.
fn valid_name(raw: &str) -> bool {
    let trimmed = raw.trim();
    let len = trimmed.chars().count();
    len >= NAME_MIN_LEN && raw.chars().count() <= NAME_MAX_LEN && !is_numeric(trimmed)
}

/// Decimal, exponent, infinity, and unsigned `0x` / `0o` / `0b` literals.
fn is_numeric(s: &str) -> bool {
    let radix_literal = |prefix: &str, radix: u32| {
        let (head, digits) = s.split_at_checked(2).unwrap_or((s, ""));
        head.eq_ignore_ascii_case(prefix)
            && !digits.is_empty()
            && digits.chars().all(|c| c.is_digit(radix))
    };
    let infinity = matches!(s, "Infinity" | "+Infinity" | "-Infinity");
    let decimal = s.parse::<f64>().is_ok_and(|v| v.is_finite());
    infinity
        || decimal
        || radix_literal("0x", 16)
        || radix_literal("0o", 8)
        || radix_literal("0b", 2)
}
