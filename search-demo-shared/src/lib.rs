//! # Search Demo Shared
//!
//! Plain data types shared between the connector crate and the demo binary:
//! the demo document, the age range filter and the search hit returned by a
//! scroll.

mod document;
mod hit;
mod range;

pub use document::{Document, SAMPLE_DOCUMENTS};
pub use hit::SearchHit;
pub use range::AgeRange;
