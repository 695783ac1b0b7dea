pub mod client;
pub mod http;
pub mod types;

pub use client::{ApiError, CountryGateway, GatewayError};
pub use http::HttpGateway;
pub use types::{Activity, ActivityDraft, ActivityId, ActivityRef, Country, CountryId, Season};
