//! Metadata side-car resolution.
//!
//! Every source document in the knowledge base has a companion
//! `<key>.metadata.json` object holding its attributes (content type,
//! episode number, guest, links). This module locates, fetches and parses
//! those side-cars for the sources cited in one response.

mod locator;
mod resolver;
mod store;
mod types;

pub use locator::{ObjectLocator, LOCATOR_SCHEME};
pub use resolver::{unique_primary_locators, MetadataResolver};
pub use store::{ObjectStore, S3ObjectStore};
pub use types::{attribute_text, Attributes, LocatorFailure, MetadataResolution, SourceMetadata};
