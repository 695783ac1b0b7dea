use std::fmt;
use std::str::FromStr;

use serde::de::{Error as _, IgnoredAny};
use serde::{Deserialize, Deserializer, Serialize};

/// Country identifiers are the backend's three-letter codes ("ARG", "JPN").
pub type CountryId = String;

/// Activity identifier. The backend may hand these out as integers or as
/// strings; both are accepted and kept in their textual form.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(from = "RawId", into = "String")]
pub struct ActivityId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(u64),
    Text(String),
}

impl From<RawId> for ActivityId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Number(n) => ActivityId(n.to_string()),
            RawId::Text(s) => ActivityId(s),
        }
    }
}

impl From<ActivityId> for String {
    fn from(id: ActivityId) -> Self {
        id.0
    }
}

impl From<&str> for ActivityId {
    fn from(s: &str) -> Self {
        ActivityId(s.to_string())
    }
}

impl From<u64> for ActivityId {
    fn from(n: u64) -> Self {
        ActivityId(n.to_string())
    }
}

impl ActivityId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Season {
    Summer,
    Autumn,
    Winter,
    Spring,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Summer, Season::Autumn, Season::Winter, Season::Spring];

    pub fn label(&self) -> &'static str {
        match self {
            Season::Summer => "Summer",
            Season::Autumn => "Autumn",
            Season::Winter => "Winter",
            Season::Spring => "Spring",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Season {
    type Err = String;

    /// Case-insensitive; "fall" is accepted as an alias for autumn.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "summer" => Ok(Season::Summer),
            "autumn" | "fall" => Ok(Season::Autumn),
            "winter" => Ok(Season::Winter),
            "spring" => Ok(Season::Spring),
            other => Err(format!("unknown season: {other:?}")),
        }
    }
}

/// Activity as embedded in a country payload. The backend only guarantees
/// the name here; everything else may be missing.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ActivityRef {
    #[serde(default)]
    pub id: Option<ActivityId>,
    pub name: String,
    #[serde(default, deserialize_with = "lenient_opt")]
    pub difficulty: Option<u8>,
    #[serde(default, deserialize_with = "lenient_opt")]
    pub duration: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt")]
    pub season: Option<Season>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Country {
    pub id: CountryId,
    pub name: String,
    /// Image URL of the flag.
    #[serde(default)]
    pub flag: String,
    #[serde(default)]
    pub continent: String,
    #[serde(default)]
    pub capital: Option<String>,
    #[serde(default)]
    pub subregion: Option<String>,
    #[serde(default)]
    pub area: Option<f64>,
    #[serde(default)]
    pub population: u64,
    #[serde(default, alias = "Activities")]
    pub activities: Vec<ActivityRef>,
}

impl Country {
    pub fn has_activity(&self, name: &str) -> bool {
        self.activities.iter().any(|a| a.name == name)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Activity {
    pub id: ActivityId,
    pub name: String,
    #[serde(deserialize_with = "lenient")]
    pub difficulty: u8,
    /// Hours, possibly fractional.
    #[serde(deserialize_with = "lenient")]
    pub duration: f64,
    pub season: Season,
    #[serde(default, alias = "Countries", deserialize_with = "country_ids")]
    pub countries: Vec<CountryId>,
}

/// Accepts either plain ids or embedded country objects carrying an `id`.
fn country_ids<'de, D>(deserializer: D) -> Result<Vec<CountryId>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Link {
        Id(CountryId),
        Embedded { id: CountryId },
    }

    let links = Vec::<Link>::deserialize(deserializer)?;
    Ok(links
        .into_iter()
        .map(|link| match link {
            Link::Id(id) | Link::Embedded { id } => id,
        })
        .collect())
}

/// A scalar the backend may send as a JSON number or as a numeric string.
#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

impl Loose {
    fn text(self) -> Option<String> {
        match self {
            Loose::Number(n) => Some(n.to_string()),
            Loose::Text(s) => Some(s.trim().to_string()),
            Loose::Other(_) => None,
        }
    }
}

/// Required field: number or string, parsed with `FromStr`.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let text = Loose::deserialize(deserializer)?
        .text()
        .ok_or_else(|| D::Error::custom("expected a number or a string"))?;
    text.parse()
        .map_err(|_| D::Error::custom(format!("invalid value {text:?}")))
}

/// Optional field: anything missing, null or unparseable becomes `None`.
fn lenient_opt<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let raw = Option::<Loose>::deserialize(deserializer)?;
    Ok(raw.and_then(Loose::text).and_then(|t| t.parse().ok()))
}

/// The user-editable part of an activity, before the server assigns an id.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ActivityDraft {
    pub name: String,
    pub difficulty: u8,
    pub duration: f64,
    pub season: Season,
}

/// Body of `POST /activities`.
#[derive(Serialize, Debug)]
pub struct CreateActivityRequest<'a> {
    pub activity: &'a ActivityDraft,
    pub countries: &'a [CountryId],
}
