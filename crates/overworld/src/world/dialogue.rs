pub const DEFAULT_CHAR_INTERVAL_MS: f32 = 30.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DialogueState {
    #[default]
    Closed,
    Revealing,
    AwaitingAdvance,
}

/// Typewriter dialogue box. Pages are revealed one character at a time and
/// the player advances through them; the box is modal while open.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogueController {
    state: DialogueState,
    pages: Vec<String>,
    page_index: usize,
    revealed_chars: usize,
    char_timer_ms: f32,
    char_interval_ms: f32,
}

impl Default for DialogueController {
    fn default() -> Self {
        Self::new(DEFAULT_CHAR_INTERVAL_MS)
    }
}

impl DialogueController {
    pub fn new(char_interval_ms: f32) -> Self {
        let char_interval_ms = if char_interval_ms.is_finite() && char_interval_ms > 0.0 {
            char_interval_ms
        } else {
            DEFAULT_CHAR_INTERVAL_MS
        };
        Self {
            state: DialogueState::Closed,
            pages: Vec::new(),
            page_index: 0,
            revealed_chars: 0,
            char_timer_ms: 0.0,
            char_interval_ms,
        }
    }

    /// Opens the box on the first non-empty page. Returns `false` without
    /// touching state when a dialogue is already open or nothing is left
    /// to show once empty pages are dropped.
    pub fn start<S: AsRef<str>>(&mut self, pages: &[S]) -> bool {
        if self.is_open() {
            return false;
        }
        let pages: Vec<String> = pages
            .iter()
            .map(|page| page.as_ref())
            .filter(|page| !page.is_empty())
            .map(str::to_string)
            .collect();
        if pages.is_empty() {
            return false;
        }
        self.pages = pages;
        self.page_index = 0;
        self.revealed_chars = 0;
        self.char_timer_ms = 0.0;
        self.state = DialogueState::Revealing;
        true
    }

    pub fn update(&mut self, dt_ms: f32) {
        if self.state != DialogueState::Revealing {
            return;
        }
        let page_len = self.current_page_len();
        self.char_timer_ms += dt_ms.max(0.0);
        while self.char_timer_ms >= self.char_interval_ms && self.revealed_chars < page_len {
            self.revealed_chars += 1;
            self.char_timer_ms -= self.char_interval_ms;
        }
        if self.revealed_chars >= page_len {
            self.finish_page();
        }
    }

    pub fn advance(&mut self) {
        match self.state {
            DialogueState::Closed => {}
            DialogueState::Revealing => {
                self.revealed_chars = self.current_page_len();
                self.finish_page();
            }
            DialogueState::AwaitingAdvance => {
                if self.page_index + 1 < self.pages.len() {
                    self.page_index += 1;
                    self.revealed_chars = 0;
                    self.char_timer_ms = 0.0;
                    self.state = DialogueState::Revealing;
                } else {
                    self.close();
                }
            }
        }
    }

    pub fn close(&mut self) {
        self.state = DialogueState::Closed;
        self.pages.clear();
        self.page_index = 0;
        self.revealed_chars = 0;
        self.char_timer_ms = 0.0;
    }

    pub fn state(&self) -> DialogueState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != DialogueState::Closed
    }

    pub fn is_waiting(&self) -> bool {
        self.state == DialogueState::AwaitingAdvance
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn revealed_chars(&self) -> usize {
        self.revealed_chars
    }

    pub fn current_page(&self) -> Option<&str> {
        if !self.is_open() {
            return None;
        }
        self.pages.get(self.page_index).map(String::as_str)
    }

    pub fn revealed_text(&self) -> &str {
        let Some(page) = self.current_page() else {
            return "";
        };
        match page.char_indices().nth(self.revealed_chars) {
            Some((byte_index, _)) => &page[..byte_index],
            None => page,
        }
    }

    fn current_page_len(&self) -> usize {
        self.current_page().map_or(0, |page| page.chars().count())
    }

    fn finish_page(&mut self) {
        self.char_timer_ms = 0.0;
        self.state = DialogueState::AwaitingAdvance;
    }
}

/// Greedy word wrap on whitespace. Words longer than a line are split.
pub fn wrap_text(text: &str, max_columns: usize) -> Vec<String> {
    let max_columns = max_columns.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_len = 0usize;

    for word in text.split_whitespace() {
        let mut word_chars: Vec<char> = word.chars().collect();
        while word_chars.len() > max_columns {
            if line_len > 0 {
                lines.push(std::mem::take(&mut line));
                line_len = 0;
            }
            let rest = word_chars.split_off(max_columns);
            lines.push(word_chars.into_iter().collect());
            word_chars = rest;
        }
        if word_chars.is_empty() {
            continue;
        }

        let needed = if line_len == 0 {
            word_chars.len()
        } else {
            line_len + 1 + word_chars.len()
        };
        if needed > max_columns && line_len > 0 {
            lines.push(std::mem::take(&mut line));
            line_len = 0;
        }
        if line_len > 0 {
            line.push(' ');
            line_len += 1;
        }
        line_len += word_chars.len();
        line.extend(word_chars);
    }

    if line_len > 0 {
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_opens_first_page() {
        let mut dialogue = DialogueController::default();
        assert!(dialogue.start(&["Hello traveler!", "Bye"]));
        assert_eq!(dialogue.state(), DialogueState::Revealing);
        assert_eq!(dialogue.page_index(), 0);
        assert_eq!(dialogue.revealed_text(), "");
    }

    #[test]
    fn page_integrity_two_pages_close_after_four_advances() {
        let mut dialogue = DialogueController::default();
        assert!(dialogue.start(&["a", "bb"]));

        dialogue.advance();
        assert_eq!(dialogue.state(), DialogueState::AwaitingAdvance);
        assert_eq!(dialogue.page_index(), 0);
        assert_eq!(dialogue.revealed_text(), "a");

        dialogue.advance();
        assert_eq!(dialogue.state(), DialogueState::Revealing);
        assert_eq!(dialogue.page_index(), 1);
        assert_eq!(dialogue.revealed_chars(), 0);

        dialogue.advance();
        assert_eq!(dialogue.state(), DialogueState::AwaitingAdvance);
        assert_eq!(dialogue.revealed_text(), "bb");

        dialogue.advance();
        assert_eq!(dialogue.state(), DialogueState::Closed);
        assert!(!dialogue.is_open());
    }

    #[test]
    fn reveal_is_timed_per_character() {
        let mut dialogue = DialogueController::new(30.0);
        dialogue.start(&["abcd"]);

        dialogue.update(29.0);
        assert_eq!(dialogue.revealed_chars(), 0);
        dialogue.update(1.0);
        assert_eq!(dialogue.revealed_chars(), 1);
        dialogue.update(65.0);
        assert_eq!(dialogue.revealed_chars(), 3);
        assert_eq!(dialogue.state(), DialogueState::Revealing);
        dialogue.update(30.0);
        assert_eq!(dialogue.revealed_text(), "abcd");
        assert_eq!(dialogue.state(), DialogueState::AwaitingAdvance);
    }

    #[test]
    fn reveal_never_exceeds_page_length() {
        let mut dialogue = DialogueController::default();
        dialogue.start(&["hi"]);
        dialogue.update(10_000.0);
        assert_eq!(dialogue.revealed_chars(), 2);
        assert!(dialogue.is_waiting());
    }

    #[test]
    fn advance_while_closed_is_noop() {
        let mut dialogue = DialogueController::default();
        dialogue.advance();
        dialogue.update(100.0);
        assert_eq!(dialogue, DialogueController::default());
    }

    #[test]
    fn empty_inputs_do_not_open() {
        let mut dialogue = DialogueController::default();
        let none: [&str; 0] = [];
        assert!(!dialogue.start(&none));
        assert!(!dialogue.start(&["", ""]));
        assert!(!dialogue.is_open());
    }

    #[test]
    fn empty_pages_are_dropped() {
        let mut dialogue = DialogueController::default();
        assert!(dialogue.start(&["", "x", ""]));
        assert_eq!(dialogue.page_count(), 1);
        assert_eq!(dialogue.current_page(), Some("x"));
    }

    #[test]
    fn start_while_open_keeps_current_session() {
        let mut dialogue = DialogueController::default();
        dialogue.start(&["first"]);
        assert!(!dialogue.start(&["second"]));
        assert_eq!(dialogue.current_page(), Some("first"));
    }

    #[test]
    fn revealed_text_respects_char_boundaries() {
        let mut dialogue = DialogueController::new(10.0);
        dialogue.start(&["héllo"]);
        dialogue.update(20.0);
        assert_eq!(dialogue.revealed_text(), "hé");
    }

    #[test]
    fn wrap_text_breaks_on_words() {
        let lines = wrap_text("The water here has healing properties.", 16);
        assert_eq!(lines, vec!["The water here", "has healing", "properties."]);
        assert!(lines.iter().all(|line| line.chars().count() <= 16));
    }

    #[test]
    fn wrap_text_splits_long_words() {
        assert_eq!(wrap_text("abcdefgh ij", 3), vec!["abc", "def", "gh", "ij"]);
        assert!(wrap_text("   ", 10).is_empty());
    }
}
