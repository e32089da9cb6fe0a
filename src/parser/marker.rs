//! List and task marker recognition.
//!
//! Both the streaming tokenizer and the caret-driven list creation in
//! [`crate::restyle`] go through [`MarkerScanner`], so a line opens a list
//! item under exactly the same conditions on either path.

/// Longest ordered-list number accepted, in digits.
const MAX_ORDINAL_DIGITS: usize = 9;

/// Kind of list marker found at the start of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMarker {
    /// `N. `
    Ordered,
    /// `- `
    Bullet,
}

impl ListMarker {
    pub const fn is_ordered(self) -> bool {
        matches!(self, Self::Ordered)
    }

    /// Recognize a marker at the start of `text`.
    ///
    /// Returns the marker and its length in characters, including the
    /// trailing space.
    pub fn recognize(text: &str) -> Option<(Self, usize)> {
        let mut scanner = MarkerScanner::new();
        for (consumed, ch) in text.chars().enumerate() {
            match scanner.push(ch) {
                Scan::Pending => {}
                Scan::Matched(marker) => return Some((marker, consumed + 1)),
                Scan::Rejected => return None,
            }
        }
        None
    }

    /// Length of a leading `[ ] ` / `[x] ` task marker in `text`.
    pub fn task_prefix_len(text: &str) -> Option<usize> {
        let mut scanner = TaskScanner::new();
        for (consumed, ch) in text.chars().enumerate() {
            match scanner.push(ch) {
                Scan::Pending => {}
                Scan::Matched(_) => return Some(consumed + 1),
                Scan::Rejected => return None,
            }
        }
        None
    }
}

/// Outcome of feeding one character to a scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scan<T> {
    Pending,
    Matched(T),
    /// The character does not continue the marker. It was not consumed.
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum MarkerPhase {
    #[default]
    Start,
    Digits,
    Dot,
    Dash,
}

/// Incremental recognizer for `N. ` and `- ` list markers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkerScanner {
    phase: MarkerPhase,
    consumed: String,
}

impl MarkerScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `ch` can begin a list marker.
    pub const fn can_start(ch: char) -> bool {
        ch.is_ascii_digit() || ch == '-'
    }

    pub fn push(&mut self, ch: char) -> Scan<ListMarker> {
        let next = match (self.phase, ch) {
            (MarkerPhase::Start, '-') => MarkerPhase::Dash,
            (MarkerPhase::Start, d) if d.is_ascii_digit() => MarkerPhase::Digits,
            (MarkerPhase::Digits, d)
                if d.is_ascii_digit() && self.consumed.len() < MAX_ORDINAL_DIGITS =>
            {
                MarkerPhase::Digits
            }
            (MarkerPhase::Digits, '.') => MarkerPhase::Dot,
            (MarkerPhase::Dot, ' ') => return Scan::Matched(ListMarker::Ordered),
            (MarkerPhase::Dash, ' ') => return Scan::Matched(ListMarker::Bullet),
            _ => return Scan::Rejected,
        };
        self.phase = next;
        self.consumed.push(ch);
        Scan::Pending
    }

    /// Characters consumed so far, for flushing back as literal text.
    pub fn consumed(&self) -> &str {
        &self.consumed
    }
}

/// Incremental recognizer for `[ ] `, `[x] ` and `[X] ` task markers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskScanner {
    consumed: String,
    checked: bool,
}

impl TaskScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one character. A match yields whether the box is checked.
    pub fn push(&mut self, ch: char) -> Scan<bool> {
        let accepted = match (self.consumed.len(), ch) {
            (0, '[') | (2, ']') => true,
            (1, ' ') => {
                self.checked = false;
                true
            }
            (1, 'x' | 'X') => {
                self.checked = true;
                true
            }
            (3, ' ') => return Scan::Matched(self.checked),
            _ => false,
        };
        if !accepted {
            return Scan::Rejected;
        }
        self.consumed.push(ch);
        Scan::Pending
    }

    pub fn consumed(&self) -> &str {
        &self.consumed
    }
}
