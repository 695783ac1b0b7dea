//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the catalog,
//! and translates keyboard events into core `Action`s and intents.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Background requests
//!
//! Gateway calls run on tokio tasks. Each task gets a clone of the action
//! channel's sender as its `Dispatch` sink, so `SetLoading`, results and
//! errors flow back into the event loop and are applied to the store in
//! arrival order.
//!
//! ## Redraw Strategy
//!
//! - **Loading**: draws every ~80ms so the spinner moves.
//! - **Idle**: sleeps up to 500ms, only redraws on events or resize.

mod event;
mod ui;

use log::{debug, info};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, Show};
use crossterm::execute;

use crate::core::action::{Action, FilterKind, OrderKind};
use crate::core::store::Store;
use crate::gateway::CountryGateway;
use crate::intents;
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// Modal input mode: determines how keyboard events are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Single-key commands (order, filter, page).
    Browse,
    /// Typing into the search box.
    Search,
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub input_mode: InputMode,
    pub search_input: String,
    /// Ordering last picked, for the header. Cleared when a filter drops it.
    pub order: Option<OrderKind>,
    /// Index into `Snapshot::continents` of the active continent filter.
    pub continent: Option<usize>,
    /// Index into `Snapshot::activity_names()` of the active activity filter.
    pub activity: Option<usize>,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            input_mode: InputMode::Browse,
            search_input: String::new(),
            order: None,
            continent: None,
            activity: None,
        }
    }

    fn clear_filters(&mut self) {
        self.order = None;
        self.continent = None;
        self.activity = None;
    }

    fn next_order(&self) -> OrderKind {
        let selectable = OrderKind::SELECTABLE;
        match self.order.and_then(|o| selectable.iter().position(|k| *k == o)) {
            Some(i) => selectable[(i + 1) % selectable.len()],
            None => selectable[0],
        }
    }
}

/// Steps through `0..len` and then back to "no selection".
fn cycle(current: Option<usize>, len: usize) -> Option<usize> {
    match current {
        None if len > 0 => Some(0),
        Some(i) if i + 1 < len => Some(i + 1),
        _ => None,
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(stdout(), Hide)?;
        info!("Terminal modes enabled (cursor hidden)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), Show);
    }
}

/// Background work the browser can start.
#[derive(Debug)]
enum Request {
    Initialize,
    Search(String),
    Refresh,
}

fn spawn_request(request: Request, gateway: &Arc<dyn CountryGateway>, tx: &mpsc::Sender<Action>) {
    info!("Spawning request: {:?}", request);
    let gateway = gateway.clone();
    let mut sink = tx.clone();
    tokio::spawn(async move {
        let result = match request {
            Request::Initialize => intents::initialize(&mut sink, gateway.as_ref()).await,
            Request::Search(term) => {
                intents::search_countries(&mut sink, gateway.as_ref(), &term).await
            }
            Request::Refresh => intents::refresh(&mut sink, gateway.as_ref()).await,
        };
        if let Err(e) = result {
            info!("Request ended with error: {}", e);
        }
    });
}

pub fn run(gateway: Arc<dyn CountryGateway>, items_per_page: usize) -> std::io::Result<()> {
    let mut store = Store::with_page_size(items_per_page);
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    spawn_request(Request::Initialize, &gateway, &tx);

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    loop {
        let animating = store.snapshot().is_loading;
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, store.snapshot(), &tui, spinner_frame))?;
            needs_redraw = false;
        }

        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if handle_event(event, &mut store, &mut tui, &gateway, &tx) {
                should_quit = true;
                break;
            }
        }
        if should_quit {
            break;
        }

        // Handle background task actions
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {}", action.name());
            store.dispatch(action);
        }
    }

    ratatui::restore();
    Ok(())
}

/// Applies one key event. Returns true when the app should quit.
fn handle_event(
    event: TuiEvent,
    store: &mut Store,
    tui: &mut TuiState,
    gateway: &Arc<dyn CountryGateway>,
    tx: &mpsc::Sender<Action>,
) -> bool {
    match event {
        TuiEvent::ForceQuit => return true,
        TuiEvent::Resize => return false,
        _ => {}
    }

    // The error view is sticky: it stays until dismissed or retried.
    if store.snapshot().error.is_some() {
        match event {
            TuiEvent::Escape => {
                store.dispatch(Action::ResetError);
            }
            TuiEvent::Char('r') => {
                tui.clear_filters();
                tui.search_input.clear();
                store.dispatch(Action::ResetError);
                store.dispatch(Action::SetPage(1));
                spawn_request(Request::Refresh, gateway, tx);
            }
            TuiEvent::Char('q') => return true,
            _ => {}
        }
        return false;
    }

    match tui.input_mode {
        InputMode::Search => match event {
            TuiEvent::Char(c) => tui.search_input.push(c),
            TuiEvent::Backspace => {
                tui.search_input.pop();
            }
            TuiEvent::Submit => {
                tui.input_mode = InputMode::Browse;
                tui.clear_filters();
                spawn_request(Request::Search(tui.search_input.clone()), gateway, tx);
            }
            TuiEvent::Escape => tui.input_mode = InputMode::Browse,
            _ => {}
        },
        InputMode::Browse => match event {
            TuiEvent::Char('q') => return true,
            TuiEvent::Char('/') => tui.input_mode = InputMode::Search,
            TuiEvent::Char('o') => {
                let kind = tui.next_order();
                tui.order = Some(kind);
                store.dispatch(Action::OrderCountries(kind));
            }
            TuiEvent::Char('c') => {
                let continents = store.snapshot().continents.clone();
                tui.continent = cycle(tui.continent, continents.len());
                tui.activity = None;
                tui.order = None;
                store.dispatch(Action::ResetFilter);
                if let Some(value) = tui.continent.and_then(|i| continents.get(i)) {
                    store.dispatch(Action::FilterCountries {
                        kind: FilterKind::Continent,
                        value: value.clone(),
                    });
                }
            }
            TuiEvent::Char('a') => {
                let names = store.snapshot().activity_names();
                tui.activity = cycle(tui.activity, names.len());
                tui.continent = None;
                tui.order = None;
                store.dispatch(Action::ResetFilter);
                if let Some(value) = tui.activity.and_then(|i| names.get(i)) {
                    store.dispatch(Action::FilterCountries {
                        kind: FilterKind::Activity,
                        value: value.clone(),
                    });
                }
            }
            TuiEvent::Char('r') => {
                tui.clear_filters();
                tui.search_input.clear();
                store.dispatch(Action::ResetFilter);
                spawn_request(Request::Refresh, gateway, tx);
            }
            TuiEvent::PagePrev => {
                let page = store.snapshot().pagination.current_page;
                store.dispatch(Action::SetPage(page.saturating_sub(1)));
            }
            TuiEvent::PageNext => {
                let page = store.snapshot().pagination.current_page;
                store.dispatch(Action::SetPage(page + 1));
            }
            _ => {}
        },
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeGateway, numbered_countries, sample_countries};

    fn setup() -> (Store, TuiState, Arc<dyn CountryGateway>, mpsc::Sender<Action>) {
        let mut store = Store::default();
        store.dispatch(Action::ReceiveAllCountries(sample_countries()));
        let gateway: Arc<dyn CountryGateway> = Arc::new(FakeGateway::default());
        let (tx, _rx) = mpsc::channel();
        (store, TuiState::new(), gateway, tx)
    }

    #[test]
    fn test_cycle_wraps_to_none() {
        assert_eq!(cycle(None, 2), Some(0));
        assert_eq!(cycle(Some(0), 2), Some(1));
        assert_eq!(cycle(Some(1), 2), None);
        assert_eq!(cycle(None, 0), None);
    }

    #[test]
    fn test_order_key_cycles_orderings() {
        let (mut store, mut tui, gateway, tx) = setup();
        handle_event(TuiEvent::Char('o'), &mut store, &mut tui, &gateway, &tx);
        assert_eq!(tui.order, Some(OrderKind::AlphaAsc));
        assert_eq!(store.snapshot().sorted_countries[0].name, "Argentina");

        handle_event(TuiEvent::Char('o'), &mut store, &mut tui, &gateway, &tx);
        assert_eq!(tui.order, Some(OrderKind::AlphaDesc));
        assert_eq!(store.snapshot().sorted_countries[0].name, "Spain");
    }

    #[test]
    fn test_continent_key_replaces_activity_filter() {
        let (mut store, mut tui, gateway, tx) = setup();
        store.dispatch(Action::ReceiveActivities(vec![crate::test_support::activity(1, "Surfing")]));

        handle_event(TuiEvent::Char('a'), &mut store, &mut tui, &gateway, &tx);
        assert_eq!(store.snapshot().sorted_countries.len(), 2);

        handle_event(TuiEvent::Char('c'), &mut store, &mut tui, &gateway, &tx);
        assert_eq!(tui.activity, None);
        assert_eq!(tui.continent, Some(0));
        let continents: Vec<&str> = store
            .snapshot()
            .sorted_countries
            .iter()
            .map(|c| c.continent.as_str())
            .collect();
        assert_eq!(continents, vec!["Europe", "Europe"]);
    }

    #[test]
    fn test_paging_keys_stay_in_range() {
        let (mut store, mut tui, gateway, tx) = setup();
        store.dispatch(Action::ReceiveAllCountries(numbered_countries(25)));

        handle_event(TuiEvent::PagePrev, &mut store, &mut tui, &gateway, &tx);
        assert_eq!(store.snapshot().pagination.current_page, 1);
        for _ in 0..5 {
            handle_event(TuiEvent::PageNext, &mut store, &mut tui, &gateway, &tx);
        }
        assert_eq!(store.snapshot().pagination.current_page, 3);
    }

    #[test]
    fn test_error_view_only_dismisses() {
        let (mut store, mut tui, gateway, tx) = setup();
        store.dispatch(Action::SetError(Default::default()));

        handle_event(TuiEvent::Char('o'), &mut store, &mut tui, &gateway, &tx);
        assert!(tui.order.is_none());
        assert!(store.snapshot().error.is_some());

        handle_event(TuiEvent::Escape, &mut store, &mut tui, &gateway, &tx);
        assert!(store.snapshot().error.is_none());
    }

    #[test]
    fn test_search_mode_collects_input() {
        let (mut store, mut tui, gateway, tx) = setup();
        handle_event(TuiEvent::Char('/'), &mut store, &mut tui, &gateway, &tx);
        for c in "per".chars() {
            handle_event(TuiEvent::Char(c), &mut store, &mut tui, &gateway, &tx);
        }
        handle_event(TuiEvent::Backspace, &mut store, &mut tui, &gateway, &tx);
        assert_eq!(tui.search_input, "pe");
        // 'q' is text while searching, not quit
        assert!(!handle_event(TuiEvent::Char('q'), &mut store, &mut tui, &gateway, &tx));
        handle_event(TuiEvent::Escape, &mut store, &mut tui, &gateway, &tx);
        assert_eq!(tui.input_mode, InputMode::Browse);
        assert!(handle_event(TuiEvent::Char('q'), &mut store, &mut tui, &gateway, &tx));
    }
}
