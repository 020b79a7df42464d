use crossterm::event::KeyCode;
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::error::DataFetchError;
use crate::format::{format_currency, format_date_to_local};
use crate::gateway::Gateway;
use crate::models::{InvoiceRow, InvoiceStatus};
use crate::ui::components::pagination::render_pagination;
use crate::ui::components::search_input::{render_search_input, SearchInputState};
use crate::ui::render_error;

// Represents the state of the invoices table screen
pub struct InvoicesState {
    search: SearchInputState,
    current_page: i64,
    total_pages: i64,
    invoices: Result<Vec<InvoiceRow>, DataFetchError>,
    table_state: TableState,
}

impl InvoicesState {
    pub fn new() -> Self {
        Self {
            search: SearchInputState::new("Search invoices..."),
            current_page: 1,
            total_pages: 0,
            invoices: Ok(Vec::new()),
            table_state: TableState::default(),
        }
    }

    pub fn query(&self) -> &str {
        self.search.query()
    }

    pub fn current_page(&self) -> i64 {
        self.current_page
    }

    fn set_results(&mut self, invoices: Result<Vec<InvoiceRow>, DataFetchError>, total_pages: i64) {
        let has_rows = invoices.as_ref().map(|rows| !rows.is_empty()).unwrap_or(false);
        self.table_state.select(if has_rows { Some(0) } else { None });
        self.invoices = invoices;
        self.total_pages = total_pages;
    }

    fn rows(&self) -> &[InvoiceRow] {
        self.invoices.as_deref().unwrap_or(&[])
    }

    pub fn next(&mut self) {
        let len = self.rows().len();
        if len == 0 {
            return;
        }

        let i = match self.table_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.rows().len();
        if len == 0 {
            return;
        }

        let i = match self.table_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.table_state.select(Some(i));
    }

    pub fn next_page(&mut self) -> bool {
        if self.current_page < self.total_pages {
            self.current_page += 1;
            return true;
        }
        false
    }

    pub fn previous_page(&mut self) -> bool {
        if self.current_page > 1 {
            self.current_page -= 1;
            return true;
        }
        false
    }
}

pub enum InvoiceAction {
    Back,
    ShowCustomers,
    Reload,
}

/// Reload the current page and the page count for the current search
pub async fn load_invoices(gateway: &Gateway, state: &mut InvoicesState) {
    let query = state.query().to_string();
    let (invoices, pages) = tokio::join!(
        gateway.fetch_filtered_invoices(&query, state.current_page()),
        gateway.fetch_invoice_pages(&query),
    );

    // a failed count leaves the pager empty; the table shows whatever it got
    state.set_results(invoices, pages.unwrap_or(0));
}

fn status_cell(status: InvoiceStatus) -> Cell<'static> {
    match status {
        InvoiceStatus::Paid => Cell::from("Paid").style(Style::default().fg(Color::Green)),
        InvoiceStatus::Pending => Cell::from("Pending").style(Style::default().fg(Color::Yellow)),
    }
}

pub fn render_invoices<B: Backend>(frame: &mut Frame<B>, state: &mut InvoicesState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(1),
                Constraint::Length(2),
            ]
            .as_ref(),
        )
        .split(frame.size());

    render_search_input(frame, chunks[0], &state.search);

    if let Err(err) = &state.invoices {
        render_error(frame, chunks[1], "Invoices", err);
    } else {
        let header_cells = ["Customer", "Email", "Amount", "Date", "Status"]
            .iter()
            .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow)));
        let header = Row::new(header_cells).height(1).bottom_margin(1);

        let rows: Vec<Row> = state
            .rows()
            .iter()
            .map(|invoice| {
                Row::new(vec![
                    Cell::from(invoice.name.clone()),
                    Cell::from(invoice.email.clone()),
                    Cell::from(format_currency(i64::from(invoice.amount))),
                    Cell::from(format_date_to_local(invoice.date)),
                    status_cell(invoice.status),
                ])
            })
            .collect();

        let table = Table::new(rows)
            .header(header)
            .block(Block::default().title("Invoices").borders(Borders::ALL))
            .highlight_style(
                Style::default()
                    .bg(Color::Blue)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )
            .widths(&[
                Constraint::Percentage(22),
                Constraint::Percentage(30),
                Constraint::Percentage(16),
                Constraint::Percentage(16),
                Constraint::Percentage(16),
            ]);

        frame.render_stateful_widget(table, chunks[1], &mut state.table_state);
    }

    render_pagination(frame, chunks[2], state.current_page, state.total_pages);

    let buttons = Paragraph::new("Type to search | <←/→> Page | <Tab> Customers | <Esc> Overview")
        .block(Block::default().borders(Borders::TOP))
        .style(Style::default().fg(Color::White));
    frame.render_widget(buttons, chunks[3]);
}

pub fn handle_key(state: &mut InvoicesState, key: KeyCode) -> Option<InvoiceAction> {
    match key {
        KeyCode::Esc => Some(InvoiceAction::Back),
        KeyCode::Tab => Some(InvoiceAction::ShowCustomers),
        KeyCode::Down => {
            state.next();
            None
        }
        KeyCode::Up => {
            state.previous();
            None
        }
        KeyCode::Right => state.next_page().then_some(InvoiceAction::Reload),
        KeyCode::Left => state.previous_page().then_some(InvoiceAction::Reload),
        key => {
            if state.search.handle_input(key) {
                // a new search starts over on the first page
                state.current_page = 1;
                Some(InvoiceAction::Reload)
            } else {
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::ui::tests::buffer_text;
    use std::sync::Arc;
    use tui::{backend::TestBackend, Terminal};

    fn gateway() -> Gateway {
        Gateway::new(Arc::new(MemoryStore::placeholder()))
    }

    #[tokio::test]
    async fn paging_stops_at_the_last_page() {
        let gateway = gateway();
        let mut state = InvoicesState::new();
        load_invoices(&gateway, &mut state).await;

        assert_eq!(state.total_pages, 3);
        assert!(matches!(handle_key(&mut state, KeyCode::Right), Some(InvoiceAction::Reload)));
        assert!(matches!(handle_key(&mut state, KeyCode::Right), Some(InvoiceAction::Reload)));
        assert!(handle_key(&mut state, KeyCode::Right).is_none());
        assert_eq!(state.current_page(), 3);

        load_invoices(&gateway, &mut state).await;
        assert_eq!(state.rows().len(), 1);
    }

    #[tokio::test]
    async fn typing_resets_to_first_page() {
        let gateway = gateway();
        let mut state = InvoicesState::new();
        load_invoices(&gateway, &mut state).await;
        handle_key(&mut state, KeyCode::Right);

        for c in "paid".chars() {
            handle_key(&mut state, KeyCode::Char(c));
        }
        assert_eq!(state.current_page(), 1);
        assert_eq!(state.query(), "paid");

        load_invoices(&gateway, &mut state).await;
        assert!(state.rows().iter().all(|r| r.status == InvoiceStatus::Paid));
    }

    #[tokio::test]
    async fn table_shows_formatted_amounts_and_dates() {
        let gateway = gateway();
        let mut state = InvoicesState::new();
        for c in "rabbit".chars() {
            handle_key(&mut state, KeyCode::Char(c));
        }
        load_invoices(&gateway, &mut state).await;

        let mut terminal = Terminal::new(TestBackend::new(120, 20)).unwrap();
        terminal.draw(|f| render_invoices(f, &mut state)).unwrap();
        let text = buffer_text(terminal.backend().buffer());

        assert!(text.contains("Evil Rabbit"));
        assert!(text.contains("$157.95"));
        assert!(text.contains("Dec 6, 2022"));
        assert!(text.contains("$6.66"));
    }
}
