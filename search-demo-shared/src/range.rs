//! Inclusive age range used to filter the scroll search.

use std::fmt;

/// Inclusive `[from, to]` bounds on the `age` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeRange {
    pub from: i64,
    pub to: i64,
}

impl AgeRange {
    pub fn new(from: i64, to: i64) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for AgeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.from, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(AgeRange::new(15, 50).to_string(), "[15, 50]");
    }
}
