use tui::{
    backend::Backend,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::Paragraph,
    Frame,
};

use crate::pagination::{generate_pagination, PageItem};

pub fn pagination_spans(current_page: i64, total_pages: i64) -> Spans<'static> {
    let mut spans = vec![Span::raw("◀ ")];

    for item in generate_pagination(current_page, total_pages) {
        let span = match item {
            PageItem::Page(page) if page == current_page => Span::styled(
                format!("[{}]", page),
                Style::default()
                    .fg(Color::White)
                    .bg(Color::Blue)
                    .add_modifier(Modifier::BOLD),
            ),
            PageItem::Page(page) => Span::raw(format!(" {} ", page)),
            PageItem::Ellipsis => Span::styled(" … ", Style::default().fg(Color::DarkGray)),
        };
        spans.push(span);
    }

    spans.push(Span::raw(" ▶"));
    Spans::from(spans)
}

pub fn render_pagination<B: Backend>(frame: &mut Frame<B>, area: Rect, current_page: i64, total_pages: i64) {
    let pager = Paragraph::new(pagination_spans(current_page, total_pages)).alignment(Alignment::Center);

    frame.render_widget(pager, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(spans: &Spans) -> String {
        spans.0.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn marks_current_page() {
        let spans = pagination_spans(2, 3);
        assert_eq!(text(&spans), "◀  1 [2] 3  ▶");
    }

    #[test]
    fn collapses_long_ranges() {
        let spans = pagination_spans(5, 10);
        assert_eq!(text(&spans), "◀  1  …  4 [5] 6  …  10  ▶");
    }
}
