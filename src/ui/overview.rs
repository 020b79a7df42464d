use crossterm::event::KeyCode;
use tui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::error::DataFetchError;
use crate::gateway::Gateway;
use crate::models::{CardSummary, LatestInvoice, Revenue};
use crate::ui::render_error;
use crate::ui::revenue_chart::render_revenue_chart;

// Represents the state of the dashboard overview screen
pub struct OverviewState {
    cards: Result<CardSummary, DataFetchError>,
    revenue: Result<Vec<Revenue>, DataFetchError>,
    latest_invoices: Result<Vec<LatestInvoice>, DataFetchError>,
}

impl OverviewState {
    pub fn new(
        cards: Result<CardSummary, DataFetchError>,
        revenue: Result<Vec<Revenue>, DataFetchError>,
        latest_invoices: Result<Vec<LatestInvoice>, DataFetchError>,
    ) -> Self {
        Self {
            cards,
            revenue,
            latest_invoices,
        }
    }
}

pub enum OverviewAction {
    Exit,
    Refresh,
    ShowInvoices,
    ShowCustomers,
}

/// Fetch the three overview sections concurrently; each one fails on its own
pub async fn load_overview(gateway: &Gateway) -> OverviewState {
    let (cards, revenue, latest_invoices) = tokio::join!(
        gateway.fetch_card_data(),
        gateway.fetch_revenue(),
        gateway.fetch_latest_invoices(),
    );

    OverviewState::new(cards, revenue, latest_invoices)
}

pub fn render_overview<B: Backend>(frame: &mut Frame<B>, state: &OverviewState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(5),
                Constraint::Min(10),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(frame.size());

    match &state.cards {
        Ok(cards) => render_cards(frame, chunks[0], cards),
        Err(err) => render_error(frame, chunks[0], "Cards", err),
    }

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)].as_ref())
        .split(chunks[1]);

    match &state.revenue {
        Ok(revenue) => render_revenue_chart(frame, body[0], revenue),
        Err(err) => render_error(frame, body[0], "Recent Revenue", err),
    }

    match &state.latest_invoices {
        Ok(invoices) => render_latest_invoices(frame, body[1], invoices),
        Err(err) => render_error(frame, body[1], "Latest Invoices", err),
    }

    let help = Paragraph::new("<I> Invoices | <C> Customers | <R> Refresh | <Q> Quit")
        .block(Block::default().borders(Borders::TOP))
        .style(Style::default().fg(Color::White));
    frame.render_widget(help, chunks[2]);
}

pub fn render_cards<B: Backend>(frame: &mut Frame<B>, area: Rect, cards: &CardSummary) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25); 4].as_ref())
        .split(area);

    let entries = [
        ("Collected", cards.total_paid_invoices.clone()),
        ("Pending", cards.total_pending_invoices.clone()),
        ("Total Invoices", cards.number_of_invoices.to_string()),
        ("Total Customers", cards.number_of_customers.to_string()),
    ];

    for ((title, value), column) in entries.into_iter().zip(columns) {
        let card = Paragraph::new(Spans::from(Span::styled(
            value,
            Style::default().add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(Block::default().title(title).borders(Borders::ALL));

        frame.render_widget(card, column);
    }
}

/// Invoices are listed in the order received
pub fn render_latest_invoices<B: Backend>(frame: &mut Frame<B>, area: Rect, invoices: &[LatestInvoice]) {
    let items: Vec<ListItem> = invoices
        .iter()
        .map(|invoice| {
            ListItem::new(vec![
                Spans::from(vec![
                    Span::styled(invoice.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
                    Span::raw("  "),
                    Span::styled(invoice.amount.clone(), Style::default().fg(Color::Yellow)),
                ]),
                Spans::from(Span::styled(invoice.email.clone(), Style::default().fg(Color::Gray))),
            ])
        })
        .collect();

    let list = List::new(items).block(Block::default().title("Latest Invoices").borders(Borders::ALL));

    frame.render_widget(list, area);
}

pub fn handle_key(key: KeyCode) -> Option<OverviewAction> {
    match key {
        KeyCode::Char('q') | KeyCode::Esc => Some(OverviewAction::Exit),
        KeyCode::Char('r') => Some(OverviewAction::Refresh),
        KeyCode::Char('i') | KeyCode::Tab => Some(OverviewAction::ShowInvoices),
        KeyCode::Char('c') => Some(OverviewAction::ShowCustomers),
        _ => None,
    }
}
