use crate::cli::format_population;
use crate::core::state::Snapshot;
use crate::gateway::{ApiError, Country};
use crate::tui::{InputMode, TuiState};

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Row, Table, Wrap};

const SPINNER: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

pub fn draw_ui(frame: &mut Frame, snapshot: &Snapshot, tui: &TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Length(3), Min(0), Length(1)]);
    let [title_area, search_area, main_area, footer_area] = layout.areas(frame.area());

    frame.render_widget(Span::raw(title_text(snapshot, tui, spinner_frame)), title_area);

    let search_style = if tui.input_mode == InputMode::Search {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().add_modifier(Modifier::DIM)
    };
    let search = Paragraph::new(tui.search_input.as_str())
        .block(Block::bordered().title("Search").border_style(search_style));
    frame.render_widget(search, search_area);

    // Main area - show error OR the current page
    if let Some(error) = &snapshot.error {
        draw_error_view(frame, main_area, error);
    } else if snapshot.pagination.page_items.is_empty() {
        let message = if snapshot.is_loading {
            "Loading countries..."
        } else {
            "No countries match."
        };
        let empty = Paragraph::new(message)
            .block(Block::bordered().title("Countries"))
            .alignment(Alignment::Center);
        frame.render_widget(empty, main_area);
    } else {
        draw_country_table(frame, main_area, &snapshot.pagination.page_items);
    }

    frame.render_widget(Line::from(footer_text(snapshot, tui)), footer_area);
}

fn title_text(snapshot: &Snapshot, tui: &TuiState, spinner_frame: usize) -> String {
    let mut parts = vec!["Atlas".to_string()];
    if let Some(order) = tui.order {
        parts.push(format!("order: {}", order.label()));
    }
    if let Some(continent) = tui.continent.and_then(|i| snapshot.continents.get(i)) {
        parts.push(format!("continent: {continent}"));
    }
    let names = snapshot.activity_names();
    if let Some(activity) = tui.activity.and_then(|i| names.get(i)) {
        parts.push(format!("activity: {activity}"));
    }
    if snapshot.is_loading {
        parts.push(SPINNER[spinner_frame % SPINNER.len()].to_string());
    }
    parts.join(" | ")
}

fn footer_text(snapshot: &Snapshot, tui: &TuiState) -> String {
    let pagination = &snapshot.pagination;
    let keys = if snapshot.error.is_some() {
        "Esc dismiss  r retry  q quit"
    } else if tui.input_mode == InputMode::Search {
        "Enter search  Esc cancel"
    } else {
        "/ search  o order  c continent  a activity  r reset  ←/→ page  q quit"
    };
    format!(
        "Page {}/{} ({} shown) | {}",
        pagination.current_page,
        pagination.total_pages.max(1),
        snapshot.sorted_countries.len(),
        keys
    )
}

fn draw_country_table(frame: &mut Frame, area: Rect, countries: &[Country]) {
    let header = Row::new(["Name", "Continent", "Population", "Activities"])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows = countries.iter().map(|c| {
        let activities: Vec<&str> = c.activities.iter().map(|a| a.name.as_str()).collect();
        Row::new([
            c.name.clone(),
            c.continent.clone(),
            format_population(c.population),
            activities.join(", "),
        ])
    });
    let widths = [
        Constraint::Percentage(30),
        Constraint::Percentage(20),
        Constraint::Percentage(15),
        Constraint::Percentage(35),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::bordered().title("Countries"));
    frame.render_widget(table, area);
}

fn draw_error_view(frame: &mut Frame, area: Rect, error: &ApiError) {
    let text = vec![
        Line::from(Span::styled(
            format!("{} {}", error.status, error.message),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(error.description.as_str()),
    ];
    let error_paragraph = Paragraph::new(text)
        .block(Block::bordered().title("ERROR"))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(error_paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::{Action, OrderKind, reduce};
    use crate::test_support::sample_countries;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn rendered(snapshot: &Snapshot, tui: &TuiState) -> String {
        let backend = TestBackend::new(100, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw_ui(f, snapshot, tui, 0)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_draw_ui_lists_page_items() {
        let snapshot = reduce(
            Snapshot::default(),
            Action::ReceiveAllCountries(sample_countries()),
        );
        let screen = rendered(&snapshot, &TuiState::new());
        assert!(screen.contains("France"));
        assert!(screen.contains("Page 1/1"));
    }

    #[test]
    fn test_draw_ui_error_replaces_table() {
        let snapshot = reduce(
            reduce(
                Snapshot::default(),
                Action::ReceiveAllCountries(sample_countries()),
            ),
            Action::SetError(ApiError {
                status: 404,
                message: "Not Found".to_string(),
                description: "No such country".to_string(),
            }),
        );
        let screen = rendered(&snapshot, &TuiState::new());
        assert!(screen.contains("ERROR"));
        assert!(screen.contains("404 Not Found"));
        assert!(!screen.contains("France"));
    }

    #[test]
    fn test_title_shows_active_order() {
        let snapshot = Snapshot::default();
        let mut tui = TuiState::new();
        tui.order = Some(OrderKind::PopDesc);
        assert_eq!(title_text(&snapshot, &tui, 0), "Atlas | order: Population ↓");
    }

    #[test]
    fn test_empty_view_message() {
        let screen = rendered(&Snapshot::default(), &TuiState::new());
        assert!(screen.contains("No countries match."));
    }
}
