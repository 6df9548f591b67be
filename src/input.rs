//! Single-line text input with a cursor.

/// A text input field with cursor position and active state management.
///
/// The cursor counts characters, not bytes, so multi-byte input edits cleanly.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputField {
    pub value: String,
    pub cursor: usize,
    pub active: bool,
}

impl InputField {
    /// Create a new empty input field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an input field with initial text value, cursor at the end.
    #[cfg(test)]
    pub fn with_value(value: &str) -> Self {
        Self {
            value: value.to_string(),
            cursor: value.chars().count(),
            active: false,
        }
    }

    /// Replace the content, keeping the active flag.
    pub fn set(&mut self, value: &str) {
        self.value = value.to_string();
        self.cursor = value.chars().count();
    }

    #[cfg(test)]
    pub fn clear(&mut self) {
        self.set("");
    }

    /// Insert a character at the current cursor position.
    pub fn handle_char(&mut self, c: char) {
        let at = self.byte_offset(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    /// Delete the character before the cursor.
    pub fn handle_backspace(&mut self) {
        if self.cursor > 0 {
            let at = self.byte_offset(self.cursor - 1);
            self.value.remove(at);
            self.cursor -= 1;
        }
    }

    /// Delete the character at the cursor position.
    pub fn handle_delete(&mut self) {
        if self.cursor < self.value.chars().count() {
            let at = self.byte_offset(self.cursor);
            self.value.remove(at);
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor < self.value.chars().count() {
            self.cursor += 1;
        }
    }

    fn byte_offset(&self, char_idx: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_idx)
            .map_or(self.value.len(), |(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typing_and_editing() {
        let mut field = InputField::new();
        for c in "milk".chars() {
            field.handle_char(c);
        }
        field.move_cursor_left();
        field.move_cursor_left();
        field.move_cursor_left();
        field.move_cursor_left();
        field.move_cursor_left();
        assert_eq!(field.cursor, 0);
        for c in "oat ".chars() {
            field.handle_char(c);
        }
        assert_eq!(field.value, "oat milk");

        field.handle_delete();
        assert_eq!(field.value, "oat ilk");
        field.handle_backspace();
        assert_eq!(field.value, "oatilk");
        assert_eq!(field.cursor, 3);
    }

    #[test]
    fn test_multibyte_cursor() {
        let mut field = InputField::with_value("café");
        assert_eq!(field.cursor, 4);
        field.handle_backspace();
        assert_eq!(field.value, "caf");
        field.handle_char('é');
        field.handle_char('!');
        assert_eq!(field.value, "café!");
        field.move_cursor_right();
        assert_eq!(field.cursor, 5);
    }

    #[test]
    fn test_set_and_clear() {
        let mut field = InputField::new();
        field.active = true;
        field.set("abc");
        assert_eq!(field.cursor, 3);
        assert!(field.active);
        field.clear();
        assert_eq!(field.value, "");
        assert_eq!(field.cursor, 0);
    }
}
