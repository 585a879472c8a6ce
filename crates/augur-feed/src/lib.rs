//! Upstream access for Augur: the world API client, its document parsers,
//! the regions dump reader, and the live event observer.
//!
//! # Modules
//!
//! - [`api`] -- [`NationStatesApi`]: the queries the rest of Augur needs.
//! - [`client`] -- [`NsClient`]: throttled HTTP implementation.
//! - [`happenings`] -- Happenings feed parsing and event classification.
//! - [`documents`] -- Nation-region and region-list documents.
//! - [`dump`] -- Gzip regions dump reader.
//! - [`observer`] -- [`EventObserver`]: one feed poll to one observation.

pub mod api;
pub mod client;
pub mod documents;
pub mod dump;
pub mod error;
pub mod happenings;
pub mod observer;

pub use api::NationStatesApi;
pub use client::NsClient;
pub use dump::load_regions_dump;
pub use error::FeedError;
pub use happenings::{FeedEntry, QualifyingEvent};
pub use observer::EventObserver;
