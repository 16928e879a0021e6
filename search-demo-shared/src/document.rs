//! The flat `name`/`age` record written to the demo index.

use serde_json::{json, Value};

/// Sample records seeded into a freshly created index, in insertion order.
pub const SAMPLE_DOCUMENTS: [(&str, i64); 5] = [
    ("Mark Twain", 75),
    ("Tom Sawyer", 12),
    ("John Doe", 20),
    ("Peter Pan", 15),
    ("Johnnie Walker", 37),
];

/// A demo document.
///
/// Documents are fire-and-forget: once submitted nothing keeps a local copy,
/// so this type only exists to build request bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Display name, indexed as text.
    pub name: String,
    /// Age in years, indexed as an integer.
    pub age: i64,
}

impl Document {
    pub fn new(name: impl Into<String>, age: i64) -> Self {
        Self {
            name: name.into(),
            age,
        }
    }

    /// The built-in sample set.
    pub fn samples() -> Vec<Document> {
        SAMPLE_DOCUMENTS
            .iter()
            .map(|(name, age)| Document::new(*name, *age))
            .collect()
    }

    /// JSON source for an index request.
    pub fn to_source(&self) -> Value {
        json!({
            "name": self.name,
            "age": self.age,
        })
    }
}
