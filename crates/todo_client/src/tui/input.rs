use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A single-line text field with a character cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    cursor: usize,
}

impl TextInput {
    pub fn with_value(value: impl Into<String>) -> Self {
        let value = value.into();
        let cursor = char_count(&value);
        Self { value, cursor }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Returns whether the key was consumed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => self.clear(),
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => self.insert(ch),
            KeyCode::Backspace => self.remove_before_cursor(),
            KeyCode::Delete => self.remove_at_cursor(),
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(char_count(&self.value)),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = char_count(&self.value),
            _ => return false,
        }
        true
    }

    /// The value with `_` at the cursor, or masked when `secret`.
    pub fn rendered(&self, focused: bool, secret: bool) -> String {
        let shown = if secret {
            "*".repeat(char_count(&self.value))
        } else {
            self.value.clone()
        };
        if !focused {
            return shown;
        }
        let idx = cursor_to_byte(&shown, self.cursor);
        let mut rendered = String::with_capacity(shown.len() + 1);
        rendered.push_str(&shown[..idx]);
        rendered.push('_');
        rendered.push_str(&shown[idx..]);
        rendered
    }

    fn insert(&mut self, ch: char) {
        let idx = cursor_to_byte(&self.value, self.cursor);
        self.value.insert(idx, ch);
        self.cursor += 1;
    }

    fn remove_before_cursor(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let start = cursor_to_byte(&self.value, self.cursor - 1);
        self.value.remove(start);
        self.cursor -= 1;
    }

    fn remove_at_cursor(&mut self) {
        if self.cursor >= char_count(&self.value) {
            return;
        }
        let start = cursor_to_byte(&self.value, self.cursor);
        self.value.remove(start);
    }
}

fn char_count(input: &str) -> usize {
    input.chars().count()
}

fn cursor_to_byte(input: &str, cursor: usize) -> usize {
    input
        .char_indices()
        .nth(cursor)
        .map(|(idx, _)| idx)
        .unwrap_or(input.len())
}
