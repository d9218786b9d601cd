//! `klaviyo-http` is an async client for the Klaviyo REST API.
//!
//! It covers list and group membership management, person lookup and
//! update, event timelines, and the public identify/track endpoints:
//! - [`KlaviyoClient::lists`]
//! - [`KlaviyoClient::profiles`]
//! - [`KlaviyoClient::identify`] and [`KlaviyoClient::track`]
//!
//! Paginated endpoints are followed to the last page and returned as one
//! vector. Rate-limited requests (429) are retried after the `retry-after`
//! delay, and lookups of missing resources return `None` or an empty vector
//! instead of an error.

mod client;
mod decode;
mod error;
mod lists;
mod options;
mod page;
mod profiles;
mod request;
mod track;
mod types;
mod wire;

pub use client::{KlaviyoClient, DEFAULT_BASE_URL};
pub use error::KlaviyoError;
pub use lists::ListsApi;
pub use options::ClientOptions;
pub use profiles::ProfilesApi;
pub use types::{
    CustomProperties, Event, EventProperties, List, ListDetails, ListIdentifier, Profile,
    ProfileIdentifier, ProfileProperties, SortOrder, TimelineQuery,
};

pub type Result<T> = std::result::Result<T, KlaviyoError>;
