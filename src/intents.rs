//! # Intents
//!
//! The async side of the app: each function runs one user intent against a
//! [`CountryGateway`] and folds the result into whatever [`Dispatch`] sink
//! the caller supplies (the `Store` directly, or a channel feeding it).
//!
//! Failures are normalized to [`ApiError`], dispatched as `SetError`, and
//! also returned, so the caller can decide e.g. whether to clear a form.
//!
//! Responses are applied in whatever order they arrive. Two overlapping
//! searches can resolve out of order and the older one wins.
//! TODO: tag requests with a generation number and drop stale responses.

use std::ops::{Deref, DerefMut};

use log::{info, warn};

use crate::core::action::Action;
use crate::core::store::Dispatch;
use crate::gateway::{Activity, ActivityDraft, ActivityId, ApiError, CountryGateway, CountryId, GatewayError};

/// Holds the loading flag up for as long as it lives. Dropping it always
/// dispatches `SetLoading(false)`, whichever way the call ended.
pub struct LoadingScope<'a, S: Dispatch + ?Sized> {
    sink: &'a mut S,
}

impl<'a, S: Dispatch + ?Sized> LoadingScope<'a, S> {
    pub fn enter(sink: &'a mut S) -> Self {
        sink.dispatch(Action::SetLoading(true));
        Self { sink }
    }
}

impl<S: Dispatch + ?Sized> Deref for LoadingScope<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.sink
    }
}

impl<S: Dispatch + ?Sized> DerefMut for LoadingScope<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.sink
    }
}

impl<S: Dispatch + ?Sized> Drop for LoadingScope<'_, S> {
    fn drop(&mut self) {
        self.sink.dispatch(Action::SetLoading(false));
    }
}

fn report<S: Dispatch + ?Sized>(sink: &mut S, err: &GatewayError) -> ApiError {
    warn!("Gateway call failed: {}", err);
    let api_error = ApiError::from(err);
    sink.dispatch(Action::SetError(api_error.clone()));
    api_error
}

/// Fetches the full list, replacing the canonical countries.
pub async fn load_all_countries<S: Dispatch + ?Sized>(
    sink: &mut S,
    gateway: &dyn CountryGateway,
) -> Result<(), ApiError> {
    let mut scope = LoadingScope::enter(sink);
    match gateway.fetch_all_countries().await {
        Ok(countries) => {
            scope.dispatch(Action::ReceiveAllCountries(countries));
            Ok(())
        }
        Err(e) => Err(report(&mut *scope, &e)),
    }
}

/// Name search. A blank term means "show everything" and reloads the full
/// list instead of asking the backend for matches.
pub async fn search_countries<S: Dispatch + ?Sized>(
    sink: &mut S,
    gateway: &dyn CountryGateway,
    term: &str,
) -> Result<(), ApiError> {
    let term = term.trim();
    if term.is_empty() {
        info!("Empty search, loading all countries");
        return load_all_countries(sink, gateway).await;
    }

    let mut scope = LoadingScope::enter(sink);
    match gateway.fetch_countries_by_name(term).await {
        Ok(found) => {
            info!("Search {:?}: {} matches", term, found.len());
            scope.dispatch(Action::ReceiveCountries(found));
            Ok(())
        }
        Err(e) => Err(report(&mut *scope, &e)),
    }
}

pub async fn load_activities<S: Dispatch + ?Sized>(
    sink: &mut S,
    gateway: &dyn CountryGateway,
) -> Result<(), ApiError> {
    let mut scope = LoadingScope::enter(sink);
    match gateway.fetch_activities().await {
        Ok(activities) => {
            scope.dispatch(Action::ReceiveActivities(activities));
            Ok(())
        }
        Err(e) => Err(report(&mut *scope, &e)),
    }
}

/// Creates an activity and appends the server's copy (with its id) locally.
pub async fn create_activity<S: Dispatch + ?Sized>(
    sink: &mut S,
    gateway: &dyn CountryGateway,
    draft: &ActivityDraft,
    country_ids: &[CountryId],
) -> Result<Activity, ApiError> {
    let mut scope = LoadingScope::enter(sink);
    match gateway.create_activity(draft, country_ids).await {
        Ok(created) => {
            scope.dispatch(Action::ActivityCreated(created.clone()));
            Ok(created)
        }
        Err(e) => Err(report(&mut *scope, &e)),
    }
}

/// Deletes an activity, drops it locally, then re-fetches the list. A failed
/// re-fetch is reported through `SetError` but the delete still counts as
/// done.
pub async fn delete_activity<S: Dispatch + ?Sized>(
    sink: &mut S,
    gateway: &dyn CountryGateway,
    id: &ActivityId,
) -> Result<(), ApiError> {
    let mut scope = LoadingScope::enter(sink);
    if let Err(e) = gateway.delete_activity(id).await {
        return Err(report(&mut *scope, &e));
    }
    scope.dispatch(Action::ActivityDeleted(id.clone()));

    match gateway.fetch_activities().await {
        Ok(activities) => scope.dispatch(Action::ReceiveActivities(activities)),
        Err(e) => {
            report(&mut *scope, &e);
        }
    }
    Ok(())
}

/// First load: countries and activities in parallel under one loading scope,
/// so neither response can clear the flag while the other is in flight.
pub async fn initialize<S: Dispatch + ?Sized>(
    sink: &mut S,
    gateway: &dyn CountryGateway,
) -> Result<(), ApiError> {
    let mut scope = LoadingScope::enter(sink);
    let (countries, activities) =
        futures::join!(gateway.fetch_all_countries(), gateway.fetch_activities());

    let mut first_error = None;
    match countries {
        Ok(list) => scope.dispatch(Action::ReceiveAllCountries(list)),
        Err(e) => first_error = Some(report(&mut *scope, &e)),
    }
    match activities {
        Ok(list) => scope.dispatch(Action::ReceiveActivities(list)),
        Err(e) => {
            let api_error = report(&mut *scope, &e);
            first_error.get_or_insert(api_error);
        }
    }
    scope.dispatch(Action::ReceiveContinents);
    scope.dispatch(Action::SetPage(1));

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Sequential reload of countries then activities.
pub async fn refresh<S: Dispatch + ?Sized>(
    sink: &mut S,
    gateway: &dyn CountryGateway,
) -> Result<(), ApiError> {
    let countries = load_all_countries(sink, gateway).await;
    let activities = load_activities(sink, gateway).await;
    sink.dispatch(Action::ReceiveContinents);
    countries.and(activities)
}
