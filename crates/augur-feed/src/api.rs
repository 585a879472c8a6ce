//! The upstream queries Augur depends on.
//!
//! [`NationStatesApi`] is the seam between the observer/session logic and
//! the network. [`NsClient`](crate::client::NsClient) implements it over
//! HTTP; tests substitute scripted implementations.

use std::collections::BTreeSet;
use std::future::Future;

use crate::error::FeedError;
use crate::happenings::FeedEntry;

/// Read-only queries against the world API.
pub trait NationStatesApi: Send + Sync + 'static {
    /// Fetch the latest batch of change happenings, classified, in feed
    /// order.
    fn happenings(&self) -> impl Future<Output = Result<Vec<FeedEntry>, FeedError>> + Send;

    /// Resolve a nation identifier to the name of the region it is in now.
    fn nation_region(
        &self,
        nation: &str,
    ) -> impl Future<Output = Result<String, FeedError>> + Send;

    /// Names of all founderless regions.
    fn founderless_regions(
        &self,
    ) -> impl Future<Output = Result<BTreeSet<String>, FeedError>> + Send;
}
