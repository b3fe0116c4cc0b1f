//! Diagnostic codes with category prefixes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The category of a diagnostic code, determining its prefix letter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Structural errors in the netlist snapshot, prefixed with `E`.
    Error,
    /// Warnings about the design that still allow generation, prefixed with `W`.
    Warning,
}

impl Category {
    /// Returns the single-character prefix for this category.
    pub fn prefix(self) -> char {
        match self {
            Category::Error => 'E',
            Category::Warning => 'W',
        }
    }
}

/// A structured diagnostic code: a category prefix and a numeric identifier.
///
/// Displayed as the prefix followed by a zero-padded 3-digit number, e.g.
/// `E106` or `W101`. The same text form is accepted by [`FromStr`] so lint
/// settings in `netforge.toml` can name codes directly.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The category of this diagnostic.
    pub category: Category,
    /// The numeric identifier within the category.
    pub number: u16,
}

impl DiagnosticCode {
    /// Creates a new diagnostic code.
    pub const fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}

impl FromStr for DiagnosticCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let category = match chars.next() {
            Some('E') | Some('e') => Category::Error,
            Some('W') | Some('w') => Category::Warning,
            _ => return Err(format!("invalid diagnostic code '{s}'")),
        };
        let number = chars
            .as_str()
            .parse::<u16>()
            .map_err(|_| format!("invalid diagnostic code '{s}'"))?;
        Ok(Self { category, number })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_prefixes() {
        assert_eq!(Category::Error.prefix(), 'E');
        assert_eq!(Category::Warning.prefix(), 'W');
    }

    #[test]
    fn display_format() {
        let code = DiagnosticCode::new(Category::Error, 106);
        assert_eq!(format!("{code}"), "E106");

        let code = DiagnosticCode::new(Category::Warning, 1);
        assert_eq!(format!("{code}"), "W001");
    }

    #[test]
    fn parse_codes() {
        let code: DiagnosticCode = "W101".parse().unwrap();
        assert_eq!(code, DiagnosticCode::new(Category::Warning, 101));
        let code: DiagnosticCode = "e7".parse().unwrap();
        assert_eq!(code, DiagnosticCode::new(Category::Error, 7));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("X101".parse::<DiagnosticCode>().is_err());
        assert!("W".parse::<DiagnosticCode>().is_err());
        assert!("Wabc".parse::<DiagnosticCode>().is_err());
        assert!("".parse::<DiagnosticCode>().is_err());
    }

    #[test]
    fn serde_roundtrip() {
        let code = DiagnosticCode::new(Category::Error, 109);
        let json = serde_json::to_string(&code).unwrap();
        let back: DiagnosticCode = serde_json::from_str(&json).unwrap();
        assert_eq!(code, back);
    }
}
