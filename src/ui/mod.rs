pub mod components;
pub mod customers;
pub mod invoices;
pub mod overview;
pub mod revenue_chart;

use tui::{
    backend::Backend,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::error::DataFetchError;

/// Stand-in for a section whose data could not be fetched
pub fn render_error<B: Backend>(frame: &mut Frame<B>, area: Rect, title: &str, err: &DataFetchError) {
    let text = vec![
        Spans::from(Span::styled(
            "Something went wrong!",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Spans::from(err.message()),
    ];

    let panel = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(Block::default().title(title.to_string()).borders(Borders::ALL));

    frame.render_widget(panel, area);
}
