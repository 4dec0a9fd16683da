//! Query pipeline: filter, generate, resolve metadata, enrich.

pub mod ask;
pub mod types;

pub use ask::{ask, QueryContext};
pub use types::{AskOptions, AskOutcome};
