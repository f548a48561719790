use crate::interactive::ui::components::Component;
use crate::interactive::ui::events::Message;
use crate::query::FLAG_CHARS;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

#[derive(Default)]
pub struct SearchBar {
    query: String,
    cursor_position: usize,
    message: Option<String>,
}

impl SearchBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_query(&mut self, query: String) {
        self.query = query;
        self.cursor_position = self.query.chars().count();
    }

    pub fn set_message(&mut self, message: Option<String>) {
        self.message = message;
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    fn byte_index(&self, char_pos: usize) -> usize {
        self.query
            .chars()
            .take(char_pos)
            .map(|c| c.len_utf8())
            .sum()
    }

    fn delete_char_before_cursor(&mut self) -> bool {
        if self.cursor_position == 0 {
            return false;
        }
        let start = self.byte_index(self.cursor_position - 1);
        let end = self.byte_index(self.cursor_position);
        self.query.drain(start..end);
        self.cursor_position -= 1;
        true
    }

    fn delete_char_at_cursor(&mut self) -> bool {
        if self.cursor_position >= self.query.chars().count() {
            return false;
        }
        let start = self.byte_index(self.cursor_position);
        let end = self.byte_index(self.cursor_position + 1);
        self.query.drain(start..end);
        true
    }
}

impl Component for SearchBar {
    fn render(&mut self, f: &mut Frame, area: Rect) {
        let input_text = if self.cursor_position < self.query.chars().count() {
            let split = self.byte_index(self.cursor_position);
            let (before, after) = self.query.split_at(split);
            let mut chars = after.chars();
            let under_cursor = chars.next().unwrap_or(' ');
            vec![
                Span::raw(before.to_string()),
                Span::styled(
                    under_cursor.to_string(),
                    Style::default().bg(Color::White).fg(Color::Black),
                ),
                Span::raw(chars.collect::<String>()),
            ]
        } else {
            vec![
                Span::raw(self.query.clone()),
                Span::styled(" ", Style::default().bg(Color::White).fg(Color::Black)),
            ]
        };

        let mut title = format!("Search [flags: {}]", FLAG_CHARS.trim_end_matches('<'));
        if let Some(msg) = &self.message {
            title.push_str(&format!(" - {msg}"));
        }

        let input = Paragraph::new(Line::from(input_text))
            .block(Block::default().title(title).borders(Borders::ALL))
            .style(Style::default().fg(Color::Yellow));

        f.render_widget(input, area);
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Message> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('a') => {
                    self.cursor_position = 0;
                    return None;
                }
                KeyCode::Char('e') => {
                    self.cursor_position = self.query.chars().count();
                    return None;
                }
                KeyCode::Char('u') => {
                    if self.cursor_position > 0 {
                        let end = self.byte_index(self.cursor_position);
                        self.query.drain(0..end);
                        self.cursor_position = 0;
                        return Some(Message::QueryChanged(self.query.clone()));
                    }
                    return None;
                }
                _ => return None,
            }
        }

        match key.code {
            KeyCode::Enter => Some(Message::SearchRequested),
            KeyCode::Char(c) => {
                let byte_pos = self.byte_index(self.cursor_position);
                self.query.insert(byte_pos, c);
                self.cursor_position += 1;
                Some(Message::QueryChanged(self.query.clone()))
            }
            KeyCode::Backspace => self
                .delete_char_before_cursor()
                .then(|| Message::QueryChanged(self.query.clone())),
            KeyCode::Delete => self
                .delete_char_at_cursor()
                .then(|| Message::QueryChanged(self.query.clone())),
            KeyCode::Left => {
                self.cursor_position = self.cursor_position.saturating_sub(1);
                None
            }
            KeyCode::Right => {
                if self.cursor_position < self.query.chars().count() {
                    self.cursor_position += 1;
                }
                None
            }
            _ => None,
        }
    }
}
