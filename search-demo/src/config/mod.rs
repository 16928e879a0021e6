//! Configuration loading for the search demo.
//!
//! Raw key-value pairs come from a properties file (`PropertyReader`); the
//! typed view used by the rest of the crate is `DemoSettings`.

pub mod keys;
mod properties;
mod settings;

pub use properties::PropertyReader;
pub use settings::DemoSettings;
