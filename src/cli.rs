//! # Command Line
//!
//! Argument parsing plus the one-shot commands. Every command drives the
//! same `Store` and intents the TUI uses, then prints what ended up in the
//! snapshot.

use std::fmt;
use std::sync::Arc;

use clap::{Args as ClapArgs, Parser, Subcommand};
use log::{info, warn};

use crate::core::action::{Action, FilterKind, OrderKind};
use crate::core::config::ResolvedConfig;
use crate::core::state::Snapshot;
use crate::core::store::Store;
use crate::core::validation::{ActivityForm, ValidationErrors};
use crate::gateway::{
    Activity, ActivityId, ApiError, CountryGateway, GatewayError, HttpGateway,
};
use crate::intents;

#[derive(Parser, Debug)]
#[command(name = "atlas", about = "Browse countries and plan tourist activities")]
pub struct Args {
    /// Backend base URL (overrides ATLAS_API_URL and the config file)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interactive browser (default)
    Browse,
    /// Print one page of countries
    Countries(CountriesArgs),
    /// Manage activities
    #[command(subcommand)]
    Activities(ActivitiesCommand),
    /// Apply a JSON-lines action log and print the resulting view
    Replay { path: std::path::PathBuf },
}

#[derive(ClapArgs, Debug, Default)]
pub struct CountriesArgs {
    /// Name search; blank lists everything. Filters start from the full
    /// list, so a search cannot be combined with one.
    #[arg(long, conflicts_with_all = ["continent", "activity"])]
    pub search: Option<String>,
    #[arg(long, value_enum)]
    pub order: Option<OrderKind>,
    #[arg(long, conflicts_with = "activity")]
    pub continent: Option<String>,
    #[arg(long)]
    pub activity: Option<String>,
    #[arg(long, default_value_t = 1)]
    pub page: usize,
}

#[derive(Subcommand, Debug)]
pub enum ActivitiesCommand {
    List,
    /// Validate and create an activity. All fields are checked before any
    /// request goes out.
    Create {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        difficulty: String,
        /// Hours
        #[arg(long, default_value = "")]
        duration: String,
        /// Summer, Autumn, Winter or Spring
        #[arg(long, default_value = "")]
        season: String,
        /// Country id; repeat for several
        #[arg(long = "country")]
        countries: Vec<String>,
    },
    Delete { id: String },
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub enum CliError {
    Api(ApiError),
    Gateway(GatewayError),
    Validation(ValidationErrors),
    Io(std::io::Error),
    Replay(serde_json::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Api(e) => write!(f, "{e}"),
            CliError::Gateway(e) => write!(f, "{e}"),
            CliError::Validation(e) => write!(f, "{e}"),
            CliError::Io(e) => write!(f, "I/O error: {e}"),
            CliError::Replay(e) => write!(f, "bad action log: {e}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<ApiError> for CliError {
    fn from(e: ApiError) -> Self {
        CliError::Api(e)
    }
}

impl From<GatewayError> for CliError {
    fn from(e: GatewayError) -> Self {
        CliError::Gateway(e)
    }
}

impl From<ValidationErrors> for CliError {
    fn from(e: ValidationErrors) -> Self {
        CliError::Validation(e)
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Replay(e)
    }
}

// ============================================================================
// Dispatch
// ============================================================================

pub async fn run(command: Option<Command>, config: &ResolvedConfig) -> Result<(), CliError> {
    let command = command.unwrap_or(Command::Browse);
    info!("Running command: {:?}", command);

    let mut store = Store::with_page_size(config.items_per_page);
    match command {
        Command::Browse => {
            let gateway = HttpGateway::from_config(config)?;
            crate::tui::run(Arc::new(gateway), config.items_per_page)?;
        }
        Command::Countries(args) => {
            let gateway = HttpGateway::from_config(config)?;
            list_countries(&mut store, &gateway, &args).await?;
            print!("{}", render_countries(store.snapshot()));
        }
        Command::Activities(sub) => {
            let gateway = HttpGateway::from_config(config)?;
            print!("{}", run_activities(&mut store, &gateway, sub).await?);
        }
        Command::Replay { path } => {
            let log = std::fs::read_to_string(&path)?;
            let applied = store.replay(&log)?;
            info!("Replayed {} actions from {}", applied, path.display());
            print!("{}", render_countries(store.snapshot()));
        }
    }
    Ok(())
}

/// Fetch, then filter, then order, then page. Filtering first means the
/// ordering applies to the filtered view.
pub async fn list_countries(
    store: &mut Store,
    gateway: &dyn CountryGateway,
    args: &CountriesArgs,
) -> Result<(), CliError> {
    let filter = match (&args.continent, &args.activity) {
        (Some(continent), _) => Some((FilterKind::Continent, continent)),
        (None, Some(activity)) => Some((FilterKind::Activity, activity)),
        (None, None) => None,
    };

    // Filters re-derive from the canonical list, which only a full fetch fills.
    match (args.search.as_deref(), filter.is_some()) {
        (Some(term), false) => intents::search_countries(store, gateway, term).await?,
        (Some(term), true) => {
            warn!("Ignoring search {:?}: a filter replaces search results", term);
            intents::load_all_countries(store, gateway).await?
        }
        (None, _) => intents::load_all_countries(store, gateway).await?,
    }
    if let Some((kind, value)) = filter {
        store.dispatch(Action::FilterCountries {
            kind,
            value: value.clone(),
        });
    }
    if let Some(order) = args.order {
        store.dispatch(Action::OrderCountries(order));
    }
    store.dispatch(Action::SetPage(args.page));
    Ok(())
}

/// Runs an `activities` subcommand and returns what should be printed.
pub async fn run_activities(
    store: &mut Store,
    gateway: &dyn CountryGateway,
    command: ActivitiesCommand,
) -> Result<String, CliError> {
    match command {
        ActivitiesCommand::List => {
            intents::load_activities(store, gateway).await?;
            Ok(render_activities(&store.snapshot().activities))
        }
        ActivitiesCommand::Create {
            name,
            difficulty,
            duration,
            season,
            countries,
        } => {
            let mut form = ActivityForm {
                name,
                difficulty,
                duration,
                season,
                ..Default::default()
            };
            for id in countries {
                form.select_country(id);
            }
            let (draft, country_ids) = form.validate()?;
            let created = intents::create_activity(store, gateway, &draft, &country_ids).await?;
            Ok(format!("Created activity {} ({})\n", created.name, created.id))
        }
        ActivitiesCommand::Delete { id } => {
            let id = ActivityId::from(id.as_str());
            intents::delete_activity(store, gateway, &id).await?;
            let mut out = format!("Deleted activity {id}\n");
            out.push_str(&render_activities(&store.snapshot().activities));
            Ok(out)
        }
    }
}

// ============================================================================
// Rendering
// ============================================================================

pub fn render_countries(snapshot: &Snapshot) -> String {
    let pagination = &snapshot.pagination;
    if pagination.page_items.is_empty() {
        return "No countries match.\n".to_string();
    }

    let mut out = String::new();
    for country in &pagination.page_items {
        let activities: Vec<&str> = country.activities.iter().map(|a| a.name.as_str()).collect();
        out.push_str(&format!(
            "{:<5} {:<32} {:<14} {:>15}  {}\n",
            country.id,
            country.name,
            country.continent,
            format_population(country.population),
            activities.join(", ")
        ));
    }
    out.push_str(&format!(
        "Page {}/{} ({} countries)\n",
        pagination.current_page,
        pagination.total_pages,
        snapshot.sorted_countries.len()
    ));
    out
}

pub fn render_activities(activities: &[Activity]) -> String {
    if activities.is_empty() {
        return "No activities.\n".to_string();
    }
    activities
        .iter()
        .map(|a| {
            format!(
                "{:<6} {:<24} difficulty {}  {}h  {}  [{}]\n",
                a.id,
                a.name,
                a.difficulty,
                a.duration,
                a.season,
                a.countries.join(", ")
            )
        })
        .collect()
}

/// `1234567` → `"1,234,567"`
pub fn format_population(population: u64) -> String {
    let digits = population.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
