use crossterm::event::KeyCode;
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::error::DataFetchError;
use crate::gateway::Gateway;
use crate::models::CustomerSummary;
use crate::ui::components::search_input::{render_search_input, SearchInputState};
use crate::ui::render_error;

// Represents the state of the customers table screen
pub struct CustomersState {
    search: SearchInputState,
    customers: Result<Vec<CustomerSummary>, DataFetchError>,
    table_state: TableState,
}

impl CustomersState {
    pub fn new() -> Self {
        Self {
            search: SearchInputState::new("Search customers..."),
            customers: Ok(Vec::new()),
            table_state: TableState::default(),
        }
    }

    pub fn query(&self) -> &str {
        self.search.query()
    }

    fn rows(&self) -> &[CustomerSummary] {
        self.customers.as_deref().unwrap_or(&[])
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
}

pub enum CustomerAction {
    Back,
    ShowInvoices,
    Reload,
}

pub async fn load_customers(gateway: &Gateway, state: &mut CustomersState) {
    let customers = gateway.fetch_filtered_customers(state.query()).await;

    let has_rows = customers.as_ref().map(|rows| !rows.is_empty()).unwrap_or(false);
    state.table_state.select(if has_rows { Some(0) } else { None });
    state.customers = customers;
}

pub fn render_customers<B: Backend>(frame: &mut Frame<B>, state: &mut CustomersState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(2),
            ]
            .as_ref(),
        )
        .split(frame.size());

    render_search_input(frame, chunks[0], &state.search);

    if let Err(err) = &state.customers {
        render_error(frame, chunks[1], "Customers", err);
    } else {
        let header_cells = ["Name", "Email", "Total Invoices", "Total Pending", "Total Paid"]
            .iter()
            .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow)));
        let header = Row::new(header_cells).height(1).bottom_margin(1);

        let rows: Vec<Row> = state
            .rows()
            .iter()
            .map(|customer| {
                Row::new(vec![
                    Cell::from(customer.name.clone()),
                    Cell::from(customer.email.clone()),
                    Cell::from(customer.total_invoices.to_string()),
                    Cell::from(customer.total_pending.clone()),
                    Cell::from(customer.total_paid.clone()),
                ])
            })
            .collect();

        let table = Table::new(rows)
            .header(header)
            .block(Block::default().title("Customers").borders(Borders::ALL))
            .highlight_style(
                Style::default()
                    .bg(Color::Blue)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )
            .widths(&[
                Constraint::Percentage(22),
                Constraint::Percentage(28),
                Constraint::Percentage(16),
                Constraint::Percentage(17),
                Constraint::Percentage(17),
            ]);

        frame.render_stateful_widget(table, chunks[1], &mut state.table_state);
    }

    let buttons = Paragraph::new("Type to search | <Tab> Invoices | <Esc> Overview")
        .block(Block::default().borders(Borders::TOP))
        .style(Style::default().fg(Color::White));
    frame.render_widget(buttons, chunks[2]);
}

pub fn handle_key(state: &mut CustomersState, key: KeyCode) -> Option<CustomerAction> {
    match key {
        KeyCode::Esc => Some(CustomerAction::Back),
        KeyCode::Tab => Some(CustomerAction::ShowInvoices),
        KeyCode::Down => {
            state.next();
            None
        }
        KeyCode::Up => {
            state.previous();
            None
        }
        key => state.search.handle_input(key).then_some(CustomerAction::Reload),
    }
}
