use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What the app should do after a key press in the ticker field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    None,
    Submit(String),
    Quit,
}

/// Single-line ticker text field with a cursor
#[derive(Debug, Default, Clone)]
pub struct TickerInput {
    value: String,
    cursor_position: usize,
}

impl TickerInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor_position
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor_position = 0;
    }

    /// Handle key events
    pub fn handle_key_event(&mut self, key: KeyEvent) -> InputAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') | KeyCode::Char('d') => InputAction::Quit,
                KeyCode::Char('u') => {
                    self.clear();
                    InputAction::None
                }
                _ => InputAction::None,
            };
        }

        match key.code {
            KeyCode::Esc => return InputAction::Quit,
            KeyCode::Enter => {
                // Blank submissions are ignored, like an empty text box
                if self.value.trim().is_empty() {
                    return InputAction::None;
                }
                return InputAction::Submit(self.value.clone());
            }
            KeyCode::Char(c) => {
                if is_ticker_char(c) {
                    // Ticker input is case-insensitive; show it the way it is queried
                    self.value.insert(self.cursor_position, c.to_ascii_uppercase());
                    self.cursor_position += 1;
                }
            }
            KeyCode::Backspace => {
                if self.cursor_position > 0 {
                    self.value.remove(self.cursor_position - 1);
                    self.cursor_position -= 1;
                }
            }
            KeyCode::Delete => {
                if self.cursor_position < self.value.len() {
                    self.value.remove(self.cursor_position);
                }
            }
            KeyCode::Left => {
                self.cursor_position = self.cursor_position.saturating_sub(1);
            }
            KeyCode::Right => {
                if self.cursor_position < self.value.len() {
                    self.cursor_position += 1;
                }
            }
            KeyCode::Home => self.cursor_position = 0,
            KeyCode::End => self.cursor_position = self.value.len(),
            _ => {}
        }
        InputAction::None
    }

    /// Render input with cursor
    pub fn render_with_cursor(&self) -> String {
        let mut result = self.value.clone();
        result.insert(self.cursor_position.min(result.len()), '|');
        result
    }
}

// Cursor arithmetic above relies on single-byte characters.
fn is_ticker_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '=')
}
