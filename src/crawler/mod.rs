//! Crawl engine
//!
//! This module contains the traversal logic, including:
//! - Deduplication and the page budget (`VisitedSet`)
//! - The per-URL fetch pipeline with pacing and background detection
//! - Recursive same-host traversal bounded by depth
//! - Step timing for debug runs

mod coordinator;
mod fetcher;
mod timer;
mod visited;

#[cfg(test)]
pub(crate) mod test_support;

pub use coordinator::{Crawler, NodeState};
pub use fetcher::Fetcher;
pub use timer::StepTimer;
pub use visited::{Claim, VisitedSet};
