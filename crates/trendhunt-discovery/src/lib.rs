//! Discovery Agent for trendhunt.
//!
//! Scans external sources for terms that are not tracked yet and queues them
//! as `pending` candidates. Every submission is a single atomic
//! insert-if-absent at the gateway, so overlapping runs never queue the same
//! term twice.

pub mod agent;
pub mod error;
pub mod sources;

pub use agent::{DiscoveryAgent, DiscoveryReport};
pub use error::DiscoveryError;
pub use sources::{build_sources, CommunityTitles, DiscoverySource, HotAndNew, RisingQueries};
