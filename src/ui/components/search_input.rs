use crossterm::event::KeyCode;
use tui::{
    backend::Backend,
    layout::Rect,
    style::{Color, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub struct SearchInputState {
    pub value: String,
    placeholder: &'static str,
}

impl SearchInputState {
    pub fn new(placeholder: &'static str) -> Self {
        Self {
            value: String::new(),
            placeholder,
        }
    }

    /// Apply a key press; returns true when the search term changed
    pub fn handle_input(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char(c) if !c.is_control() => {
                self.value.push(c);
                true
            }
            KeyCode::Backspace => self.value.pop().is_some(),
            _ => false,
        }
    }

    pub fn query(&self) -> &str {
        self.value.trim()
    }
}

pub fn render_search_input<B: Backend>(frame: &mut Frame<B>, area: Rect, state: &SearchInputState) {
    let line = if state.value.is_empty() {
        Spans::from(Span::styled(state.placeholder, Style::default().fg(Color::DarkGray)))
    } else {
        Spans::from(vec![
            Span::raw(state.value.clone()),
            Span::styled("_", Style::default().fg(Color::Yellow)),
        ])
    };

    let input = Paragraph::new(line).block(Block::default().title("Search").borders(Borders::ALL));

    frame.render_widget(input, area);
}
