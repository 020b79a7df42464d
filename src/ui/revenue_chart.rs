use tui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::models::Revenue;
use crate::pagination::generate_y_axis;

const NO_DATA: &str = "No data available.";
const AXIS_WIDTH: u16 = 5;
const BAR_WIDTH: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub month: String,
    pub height: f64,
}

/// Bar heights scaled so that `top_label` maps to `chart_height`
pub fn bar_heights(revenue: &[Revenue], chart_height: f64, top_label: i64) -> Vec<Bar> {
    revenue
        .iter()
        .map(|point| Bar {
            month: point.month.clone(),
            height: if top_label > 0 {
                (chart_height / top_label as f64) * f64::from(point.revenue)
            } else {
                0.0
            },
        })
        .collect()
}

pub fn render_revenue_chart<B: Backend>(frame: &mut Frame<B>, area: Rect, revenue: &[Revenue]) {
    let block = Block::default()
        .title("Recent Revenue · Last 12 months")
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if revenue.is_empty() {
        let empty = Paragraph::new(NO_DATA).style(Style::default().fg(Color::Gray));
        frame.render_widget(empty, inner);
        return;
    }

    let axis = generate_y_axis(revenue);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(AXIS_WIDTH), Constraint::Min(1)].as_ref())
        .split(inner);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)].as_ref())
        .split(columns[1]);

    let chart_height = rows[0].height;
    let bars = bar_heights(revenue, f64::from(chart_height), axis.top_label);

    frame.render_widget(
        Paragraph::new(axis_lines(&axis.labels, chart_height))
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Right),
        columns[0],
    );
    frame.render_widget(Paragraph::new(bar_lines(&bars, chart_height)), rows[0]);

    let months: String = bars
        .iter()
        .map(|bar| format!("{:<width$} ", truncate(&bar.month, BAR_WIDTH), width = BAR_WIDTH))
        .collect();
    frame.render_widget(
        Paragraph::new(months).style(Style::default().fg(Color::Gray)),
        rows[1],
    );
}

/// Spread the tick labels over the chart rows, top label on the first row
fn axis_lines(labels: &[String], chart_height: u16) -> Vec<Spans<'static>> {
    let height = usize::from(chart_height);
    if height == 0 {
        return Vec::new();
    }

    let mut lines = vec![String::new(); height];
    let last = labels.len().saturating_sub(1).max(1);
    for (i, label) in labels.iter().enumerate() {
        let row = if labels.len() == 1 {
            height - 1
        } else {
            i * (height - 1) / last
        };
        lines[row] = label.clone();
    }

    lines.into_iter().map(Spans::from).collect()
}

fn bar_lines(bars: &[Bar], chart_height: u16) -> Vec<Spans<'static>> {
    (0..chart_height)
        .map(|row| {
            // rows count down from the top of the chart
            let level = f64::from(chart_height - row);
            let cells: Vec<Span> = bars
                .iter()
                .map(|bar| {
                    if bar.height.round() >= level {
                        Span::styled("███ ", Style::default().fg(Color::LightBlue))
                    } else {
                        Span::raw("    ")
                    }
                })
                .collect();
            Spans::from(cells)
        })
        .collect()
}

fn truncate(value: &str, width: usize) -> String {
    value.chars().take(width).collect()
}
