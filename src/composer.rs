use crate::expr::{self, is_operator};

pub const ERROR_SENTINEL: &str = "Error";
const ROUND_DIGITS: i32 = 8;

/// A single calculator key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Digit(char),
    Point,
    Operator(char),
    Delete,
    Clear,
    Evaluate,
}

impl Key {
    pub fn from_char(c: char) -> Option<Key> {
        match c {
            '0'..='9' => Some(Key::Digit(c)),
            '.' => Some(Key::Point),
            c if is_operator(c) => Some(Key::Operator(c)),
            '=' => Some(Key::Evaluate),
            _ => None,
        }
    }
}

/// The in-progress expression shown on the calculator display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Composer {
    buffer: String,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn press(&mut self, key: Key) {
        match key {
            Key::Digit(d) => self.append_digit_or_point(d),
            Key::Point => self.append_digit_or_point('.'),
            Key::Operator(op) => self.append_operator(op),
            Key::Delete => self.delete_last(),
            Key::Clear => self.clear(),
            Key::Evaluate => self.evaluate(),
        }
    }

    pub fn append_operator(&mut self, op: char) {
        if !is_operator(op) {
            return;
        }
        if self.buffer.is_empty() && op != '-' {
            return;
        }
        if self.buffer.ends_with(is_operator) {
            self.buffer.pop();
        }
        self.buffer.push(op);
    }

    pub fn append_digit_or_point(&mut self, token: char) {
        if !(token.is_ascii_digit() || token == '.') {
            return;
        }
        if self.buffer == ERROR_SENTINEL {
            self.buffer.clear();
        }
        if token == '.' {
            let segment = self.buffer.rsplit(is_operator).next().unwrap_or("");
            if segment.contains('.') {
                return;
            }
        }
        self.buffer.push(token);
    }

    pub fn evaluate(&mut self) {
        self.buffer = match expr::evaluate(&self.buffer) {
            Ok(value) if value.is_finite() => format_result(value),
            Ok(value) => {
                log::debug!("calculation produced non-finite value {value}");
                ERROR_SENTINEL.to_string()
            }
            Err(error) => {
                log::debug!("calculation rejected: {error}");
                ERROR_SENTINEL.to_string()
            }
        };
    }

    pub fn delete_last(&mut self) {
        self.buffer.pop();
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

/// Rounds to eight decimals and prints the shortest form.
pub fn format_result(value: f64) -> String {
    let rounded = round_decimal(value, ROUND_DIGITS);
    // Avoid printing "-0".
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded}")
}

// Shifting through the decimal text (instead of multiplying by 10^n) keeps
// values like 1.005 from rounding the wrong way. Halves round toward +inf.
fn round_decimal(value: f64, digits: i32) -> f64 {
    let shifted = match format!("{value}e{digits}").parse::<f64>() {
        Ok(shifted) if shifted.is_finite() => shifted,
        _ => return value,
    };
    let floor = shifted.floor();
    let whole = if shifted - floor >= 0.5 { floor + 1.0 } else { floor };
    format!("{whole}e{}", -digits).parse::<f64>().unwrap_or(value)
}
