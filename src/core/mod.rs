//! # Core Application Logic
//!
//! This module contains Atlas's business logic.
//! It knows nothing about any specific UI technology or about HTTP.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Snapshot (app data)  │
//!                    │  • Action (transitions) │
//!                    │  • reduce() (reducer)   │
//!                    │  • Store (container)    │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    TUI     │      │    CLI     │      │  Intents   │
//!     │  Browser   │      │ (one-shot) │      │ (gateway + │
//!     │ (ratatui)  │      │            │      │  dispatch) │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `Snapshot` struct, all application state in one place
//! - [`action`]: The `Action` enum and `reduce()`
//! - [`store`]: The `Store` container and the `Dispatch` sink trait
//! - [`pagination`]: Page slicing over the derived view
//! - [`validation`]: Activity form checks that run before any request
//! - [`collate`]: Locale-style name comparison used by alphabetical order
//! - [`config`]: Layered settings (defaults, file, env, CLI)

pub mod action;
pub mod collate;
pub mod config;
pub mod pagination;
pub mod state;
pub mod store;
pub mod validation;

pub use action::{Action, FilterKind, OrderKind, reduce};
pub use state::Snapshot;
pub use store::{Dispatch, Store};
