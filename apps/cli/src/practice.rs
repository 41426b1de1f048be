//! Typing drill state, independent of the terminal.
//!
//! A [`LineDrill`] walks one target line, leading indentation skipped, and
//! scores every keystroke into [`Analytics`].

use console::Key;
use std::time::Duration;

/// Spaces a tab stands for.
pub const TAB_WIDTH: usize = 4;

/// A keystroke the drill understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// A printable character.
    Char(char),
    /// Remove the last typed character.
    Backspace,
    /// Up to [`TAB_WIDTH`] characters typed as spaces.
    Tab,
    /// Finish the line.
    Enter,
    /// Stop practising.
    Esc,
}

impl Input {
    /// Map a terminal key. Keys with no meaning in the drill map to `None`.
    pub fn from_key(key: &Key) -> Option<Self> {
        match key {
            Key::Char(c) => Some(Self::Char(*c)),
            Key::Backspace => Some(Self::Backspace),
            Key::Tab => Some(Self::Tab),
            Key::Enter => Some(Self::Enter),
            Key::Escape => Some(Self::Esc),
            _ => None,
        }
    }
}

/// Running score.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Analytics {
    /// Mistyped and meaningless keystrokes.
    pub errors: u64,
    /// Every keystroke that did something, backspaces included.
    pub total_input_chars: u64,
    /// Characters advanced over, plus one per finished line.
    pub line_length: u64,
}

impl Analytics {
    /// Add another line's score.
    pub fn merge(&mut self, other: Analytics) {
        self.errors += other.errors;
        self.total_input_chars += other.total_input_chars;
        self.line_length += other.line_length;
    }

    /// Percentage of keystrokes that were not errors, floored at zero.
    /// `None` before anything was typed.
    pub fn accuracy(&self) -> Option<f64> {
        if self.total_input_chars == 0 {
            return None;
        }
        let ratio = self.errors as f64 / self.total_input_chars as f64;
        Some(((1.0 - ratio) * 100.0).max(0.0))
    }

    /// Words per minute, counting five characters as a word.
    pub fn wpm(&self, elapsed: Duration) -> f64 {
        let minutes = elapsed.as_secs_f64() / 60.0;
        if minutes == 0.0 {
            return 0.0;
        }
        self.line_length as f64 / (5.0 * minutes)
    }

    /// Keystrokes beyond what the text required.
    pub fn excess(&self) -> i64 {
        self.total_input_chars as i64 - self.line_length as i64
    }
}

/// One character echoed back to the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark {
    /// The typed character when correct, the expected one when not.
    pub ch: char,
    /// Whether the keystroke matched.
    pub correct: bool,
}

/// What the terminal should do after a keystroke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Draw these marks at the cursor.
    Echo(Vec<Mark>),
    /// Move the cursor back one column.
    Back,
    /// Nothing to draw.
    Idle,
    /// The line is finished.
    Done,
    /// The user asked to stop.
    Quit,
}

/// Drill over a single line.
#[derive(Debug, Clone)]
pub struct LineDrill {
    target: Vec<char>,
    indent: usize,
    pos: usize,
    analytics: Analytics,
}

impl LineDrill {
    /// Start a drill over `line`. Trailing whitespace is ignored and the
    /// leading indentation is skipped.
    pub fn new(line: &str) -> Self {
        let target: Vec<char> = line.trim_end().chars().collect();
        let indent = target.iter().take_while(|c| **c == ' ').count();
        Self {
            target,
            indent,
            pos: indent,
            analytics: Analytics::default(),
        }
    }

    /// Columns skipped before the first character to type.
    pub fn indent(&self) -> usize {
        self.indent
    }

    /// Score so far.
    pub fn analytics(&self) -> Analytics {
        self.analytics
    }

    /// Count a key the drill has no use for.
    pub fn ignored(&mut self) {
        self.analytics.errors += 1;
    }

    /// Apply one keystroke.
    pub fn press(&mut self, input: Input) -> Step {
        match input {
            Input::Esc => Step::Quit,
            Input::Backspace => self.backspace(),
            Input::Char(c) if self.pos < self.target.len() => Step::Echo(vec![self.advance(c)]),
            Input::Char(c) => {
                if c != ' ' {
                    self.analytics.errors += 1;
                }
                Step::Idle
            }
            Input::Tab if self.pos < self.target.len() => {
                let mut marks = Vec::with_capacity(TAB_WIDTH);
                while marks.len() < TAB_WIDTH && self.pos < self.target.len() {
                    marks.push(self.advance(' '));
                }
                Step::Echo(marks)
            }
            Input::Tab => {
                self.analytics.errors += 1;
                Step::Idle
            }
            Input::Enter if self.pos < self.target.len() => {
                self.analytics.errors += 1;
                self.analytics.total_input_chars += 1;
                Step::Idle
            }
            Input::Enter => {
                self.analytics.total_input_chars += 1;
                self.analytics.line_length += 1;
                Step::Done
            }
        }
    }

    fn advance(&mut self, typed: char) -> Mark {
        let expected = self.target[self.pos];
        self.pos += 1;
        self.analytics.total_input_chars += 1;
        self.analytics.line_length += 1;
        self.score(expected, typed)
    }

    fn score(&mut self, expected: char, typed: char) -> Mark {
        if expected == typed {
            Mark {
                ch: typed,
                correct: true,
            }
        } else {
            self.analytics.errors += 1;
            Mark {
                ch: expected,
                correct: false,
            }
        }
    }

    fn backspace(&mut self) -> Step {
        if self.pos == self.indent {
            return Step::Idle;
        }
        self.pos -= 1;
        self.analytics.line_length -= 1;
        self.analytics.total_input_chars += 1;
        Step::Back
    }
}
