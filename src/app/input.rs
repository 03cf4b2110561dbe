//! Text input for the bottom prompt line.

/// What the prompt line is currently editing.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PromptKind {
    /// Playback rate, applied on Enter.
    Rate,
    /// Ramp speed in percent per second, applied on every keystroke.
    RampPercent,
    /// A file or directory to load.
    OpenPath,
}

impl PromptKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Rate => "rate",
            Self::RampPercent => "ramp %/s",
            Self::OpenPath => "open",
        }
    }
}

/// True if `s` is a (possibly partial) decimal number: optional leading
/// minus, digits, at most one dot. Empty and "-" / "." / "-." are accepted
/// so the user can type through them.
pub fn is_numeric_prefix(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    let mut seen_dot = false;
    digits.chars().all(|c| match c {
        '0'..='9' => true,
        '.' if !seen_dot => {
            seen_dot = true;
            true
        }
        _ => false,
    })
}

/// A numeric text field that only ever holds a numeric prefix and remembers
/// the last text that parsed to a finite number.
#[derive(Debug, Clone)]
pub struct NumericField {
    text: String,
    last_valid: f64,
}

impl NumericField {
    pub fn new(value: f64) -> Self {
        Self {
            text: format_value(value),
            last_valid: value,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Current text as a number, if it is one.
    pub fn value(&self) -> Option<f64> {
        self.text.parse::<f64>().ok().filter(|v| v.is_finite())
    }

    /// Current value, or the last valid one while the text is incomplete.
    pub fn effective(&self) -> f64 {
        self.value().unwrap_or(self.last_valid)
    }

    /// Append `c` if the result is still a numeric prefix. Returns whether
    /// the character was taken.
    pub fn push(&mut self, c: char) -> bool {
        let mut next = self.text.clone();
        next.push(c);
        if !is_numeric_prefix(&next) {
            return false;
        }
        self.text = next;
        self.remember();
        true
    }

    pub fn pop(&mut self) {
        self.text.pop();
        self.remember();
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Replace the text with `value` (e.g. the engine's current rate).
    pub fn reset(&mut self, value: f64) {
        self.text = format_value(value);
        self.last_valid = value;
    }

    fn remember(&mut self) {
        if let Some(v) = self.value() {
            self.last_valid = v;
        }
    }
}

/// Shortest text that parses back to `v`. `f64`'s `Display` never uses
/// exponent notation, so the result is always a numeric prefix.
fn format_value(v: f64) -> String {
    if !v.is_finite() || v == 0.0 {
        "0".to_string()
    } else {
        format!("{v}")
    }
}
