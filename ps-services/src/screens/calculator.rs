//! Four-function calculator.
//!
//! A pure state machine over the display string, the pending left operand,
//! the pending operator and a flag telling the next digit to replace the
//! display. Arithmetic follows IEEE-754: dividing by zero shows `Infinity`
//! or `NaN` rather than failing.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use ps_core::error::PsError;

/// Binary operator keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    pub fn symbol(&self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '×',
            Operator::Divide => '÷',
        }
    }

    pub fn apply(&self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Operator::Add => lhs + rhs,
            Operator::Subtract => lhs - rhs,
            Operator::Multiply => lhs * rhs,
            Operator::Divide => lhs / rhs,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Operator {
    type Err = PsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "+" => Ok(Operator::Add),
            "-" | "−" => Ok(Operator::Subtract),
            "×" | "*" | "x" | "X" => Ok(Operator::Multiply),
            "÷" | "/" => Ok(Operator::Divide),
            other => Err(PsError::validation(format!("unknown operator: {other}"))),
        }
    }
}

/// One button on the keypad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Digit(char),
    Decimal,
    Op(Operator),
    Equals,
    Clear,
    ToggleSign,
    Percent,
}

impl FromStr for Key {
    type Err = PsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_ascii_digit() {
                return Ok(Key::Digit(c));
            }
        }
        match s {
            "." => Ok(Key::Decimal),
            "=" => Ok(Key::Equals),
            "C" | "c" | "AC" => Ok(Key::Clear),
            "±" | "+/-" | "neg" => Ok(Key::ToggleSign),
            "%" => Ok(Key::Percent),
            other => other
                .parse::<Operator>()
                .map(Key::Op)
                .map_err(|_| PsError::validation(format!("unknown key: {other}"))),
        }
    }
}

/// Calculator state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Calculator {
    display: String,
    previous: Option<f64>,
    operator: Option<Operator>,
    replace_display: bool,
}

impl Default for Calculator {
    fn default() -> Self {
        Self {
            display: "0".to_string(),
            previous: None,
            operator: None,
            replace_display: false,
        }
    }
}

impl Calculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn pending_operator(&self) -> Option<Operator> {
        self.operator
    }

    pub fn pending_operand(&self) -> Option<f64> {
        self.previous
    }

    /// Apply one key press.
    pub fn press(&mut self, key: Key) {
        match key {
            Key::Digit(d) => self.input_digit(d),
            Key::Decimal => self.input_decimal(),
            Key::Op(op) => self.input_operator(op),
            Key::Equals => self.equals(),
            Key::Clear => self.clear(),
            Key::ToggleSign => self.toggle_sign(),
            Key::Percent => self.percent(),
        }
    }

    /// Press a sequence of whitespace-separated keys, e.g. `"7 + 3 ="`.
    pub fn press_all(&mut self, keys: &str) -> Result<(), PsError> {
        let keys = keys
            .split_whitespace()
            .map(str::parse)
            .collect::<Result<Vec<Key>, _>>()?;
        for key in keys {
            self.press(key);
        }
        Ok(())
    }

    pub fn input_digit(&mut self, digit: char) {
        if self.replace_display {
            self.display = digit.to_string();
            self.replace_display = false;
        } else if self.display == "0" {
            self.display = digit.to_string();
        } else {
            self.display.push(digit);
        }
    }

    pub fn input_decimal(&mut self) {
        if self.replace_display {
            self.display = "0.".to_string();
            self.replace_display = false;
        } else if !self.display.contains('.') {
            self.display.push('.');
        }
    }

    /// Select an operator, first folding any pending operation into the display.
    pub fn input_operator(&mut self, next: Operator) {
        let input = parse_display(&self.display);

        match (self.previous, self.operator) {
            (None, _) => self.previous = Some(input),
            (Some(prev), Some(op)) => {
                let lhs = if prev.is_nan() { 0.0 } else { prev };
                let result = op.apply(lhs, input);
                self.display = format_number(result);
                self.previous = Some(result);
            }
            (Some(_), None) => {}
        }

        self.replace_display = true;
        self.operator = Some(next);
    }

    pub fn equals(&mut self) {
        if let (Some(prev), Some(op)) = (self.previous, self.operator) {
            let result = op.apply(prev, parse_display(&self.display));
            self.display = format_number(result);
            self.previous = None;
            self.operator = None;
            self.replace_display = true;
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn toggle_sign(&mut self) {
        self.display = format_number(parse_display(&self.display) * -1.0);
    }

    pub fn percent(&mut self) {
        self.display = format_number(parse_display(&self.display) / 100.0);
    }
}

/// Parse the display; anything unparseable reads as NaN.
fn parse_display(display: &str) -> f64 {
    display.trim().parse::<f64>().unwrap_or(f64::NAN)
}

/// Render a value the way the display shows it: no trailing `.0`,
/// `Infinity`/`-Infinity`/`NaN` for non-finite values, and `0` for negative zero.
/// Magnitudes from `1e21` up or below `1e-6` switch to exponent form (`1e+21`, `1.5e-7`).
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "Infinity".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if value == 0.0 {
        "0".to_string()
    } else if value.abs() >= 1e21 || value.abs() < 1e-6 {
        let exp = format!("{value:e}");
        match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
            _ => exp,
        }
    } else {
        format!("{value}")
    }
}
