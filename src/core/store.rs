//! # Store
//!
//! Owns the single `Snapshot` and is the only place `reduce()` is called.
//! Subscribers are told about every change; dispatches that leave the
//! snapshot as it was notify nobody.

use log::{debug, warn};
use std::sync::mpsc;

use crate::core::action::{Action, reduce};
use crate::core::state::Snapshot;

pub type Subscriber = Box<dyn FnMut(&Snapshot) + Send>;

/// Anything actions can be sent to: the store itself, or a channel feeding
/// the store from a background task.
pub trait Dispatch {
    fn dispatch(&mut self, action: Action);
}

pub struct Store {
    snapshot: Snapshot,
    subscribers: Vec<Subscriber>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new(Snapshot::default())
    }
}

impl Store {
    pub fn new(initial: Snapshot) -> Self {
        Self {
            snapshot: initial,
            subscribers: Vec::new(),
        }
    }

    pub fn with_page_size(items_per_page: usize) -> Self {
        Self::new(Snapshot::new(items_per_page))
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&Snapshot) + Send + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    pub fn dispatch(&mut self, action: Action) -> &Snapshot {
        debug!("Dispatch: {}", action.name());
        let next = reduce(self.snapshot.clone(), action);
        if next != self.snapshot {
            self.snapshot = next;
            for subscriber in self.subscribers.iter_mut() {
                subscriber(&self.snapshot);
            }
        }
        &self.snapshot
    }

    /// Replays a JSON-lines action log (one serialized `Action` per line,
    /// blank lines skipped). Returns how many actions were applied.
    pub fn replay(&mut self, log: &str) -> Result<usize, serde_json::Error> {
        let mut applied = 0;
        for line in log.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let action: Action = serde_json::from_str(line)?;
            self.dispatch(action);
            applied += 1;
        }
        Ok(applied)
    }
}

impl Dispatch for Store {
    fn dispatch(&mut self, action: Action) {
        Store::dispatch(self, action);
    }
}

impl Dispatch for mpsc::Sender<Action> {
    fn dispatch(&mut self, action: Action) {
        let name = action.name();
        if self.send(action).is_err() {
            warn!("Failed to forward {}: receiver dropped", name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::OrderKind;
    use crate::test_support::{numbered_countries, sample_countries};
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_dispatch_returns_new_snapshot() {
        let mut store = Store::default();
        let snapshot = store.dispatch(Action::ReceiveAllCountries(numbered_countries(25)));
        assert_eq!(snapshot.pagination.total_pages, 3);
        assert_eq!(store.snapshot().countries.len(), 25);
    }

    #[test]
    fn test_subscribers_only_see_changes() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut store = Store::default();
        let sink = seen.clone();
        store.subscribe(move |s: &Snapshot| sink.lock().unwrap().push(s.is_loading));

        store.dispatch(Action::SetLoading(true));
        store.dispatch(Action::SetLoading(true));
        store.dispatch(Action::Unknown);
        store.dispatch(Action::OrderCountries(OrderKind::Unknown));
        store.dispatch(Action::SetLoading(false));

        assert_eq!(*seen.lock().unwrap(), vec![true, false]);
    }

    #[test]
    fn test_page_size_is_carried_by_snapshot() {
        let mut store = Store::with_page_size(2);
        store.dispatch(Action::ReceiveAllCountries(sample_countries()));
        assert_eq!(store.snapshot().pagination.total_pages, 3);
        assert_eq!(store.snapshot().pagination.page_items.len(), 2);
    }

    #[test]
    fn test_sender_forwards_to_store() {
        let (mut tx, rx) = mpsc::channel();
        Dispatch::dispatch(&mut tx, Action::SetPage(2));
        Dispatch::dispatch(&mut tx, Action::SetPage(3));
        drop(tx);

        let mut store = Store::default();
        store.dispatch(Action::ReceiveAllCountries(numbered_countries(25)));
        for action in rx {
            store.dispatch(action);
        }
        assert_eq!(store.snapshot().pagination.current_page, 3);
    }

    #[test]
    fn test_replay_action_log() {
        let log = r#"
{"type":"SET_LOADING","payload":true}
{"type":"RECEIVE_ALL_COUNTRIES","payload":[{"id":"ARG","name":"Argentina","continent":"Americas","population":45000000},{"id":"FRA","name":"France","continent":"Europe","population":67000000}]}
{"type":"ORDER_COUNTRIES","payload":"POP_DESC"}
{"type":"SOMETHING_NEW"}
{"type":"SET_LOADING","payload":false}
"#;
        let mut store = Store::default();
        let applied = store.replay(log).unwrap();
        assert_eq!(applied, 5);
        let snapshot = store.snapshot();
        assert!(!snapshot.is_loading);
        assert_eq!(snapshot.sorted_countries[0].name, "France");
        assert_eq!(snapshot.continents, vec!["Americas", "Europe"]);
    }

    #[test]
    fn test_replay_rejects_malformed_lines() {
        let mut store = Store::default();
        assert!(store.replay("{not json").is_err());
    }
}
