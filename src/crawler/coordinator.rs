//! Crawl coordinator - recursive traversal
//!
//! Each node fetches its page, then fans out over the same-host links it
//! found. Siblings run concurrently on the caller's task and are joined
//! before the node completes, so the top-level call returns only when the
//! whole tree is done.

use crate::config::CrawlOptions;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::timer::StepTimer;
use crate::url::{same_host_links, FrontierUrl};
use futures::future::{join_all, BoxFuture};
use futures::FutureExt;
use std::fmt;
use std::sync::Arc;

/// Lifecycle of one URL node in the traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    Pending,
    Fetching,
    /// Duplicate, over budget, or no response
    Skipped,
    /// Fetched, but recursion is off or the depth budget is spent
    FetchedNoLinks,
    FetchedRecursing,
    Done,
}

impl fmt::Display for NodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Fetching => "fetching",
            Self::Skipped => "skipped",
            Self::FetchedNoLinks => "fetched-no-links",
            Self::FetchedRecursing => "fetched-recursing",
            Self::Done => "done",
        };
        f.write_str(s)
    }
}

/// Recursive crawl controller
pub struct Crawler {
    fetcher: Fetcher,
    options: Arc<CrawlOptions>,
    seed_host: String,
    timer: Arc<StepTimer>,
}

impl Crawler {
    /// Creates a crawler that only follows links on `seed_host`
    pub fn new(
        fetcher: Fetcher,
        options: Arc<CrawlOptions>,
        seed_host: impl Into<String>,
        timer: Arc<StepTimer>,
    ) -> Self {
        Self {
            fetcher,
            options,
            seed_host: seed_host.into(),
            timer,
        }
    }

    /// Crawls `url` and, when allowed, everything reachable from it
    ///
    /// # Arguments
    ///
    /// * `url` - The page to start from
    /// * `index` - 1-based position among its siblings
    /// * `depth` - Recursion depth, the seed being 1
    pub fn crawl(&self, url: FrontierUrl, index: usize, depth: u32) -> BoxFuture<'_, ()> {
        async move {
            self.timer.mark("crawl");
            transition(&url, NodeState::Pending, NodeState::Fetching);

            let links = match self.fetcher.fetch(&url, index, depth).await {
                Some(links) => links,
                None => {
                    transition(&url, NodeState::Fetching, NodeState::Skipped);
                    transition(&url, NodeState::Skipped, NodeState::Done);
                    return;
                }
            };

            if !self.options.recursive || depth >= self.options.max_depth {
                transition(&url, NodeState::Fetching, NodeState::FetchedNoLinks);
                transition(&url, NodeState::FetchedNoLinks, NodeState::Done);
                return;
            }

            let children = same_host_links(&links, &self.seed_host);
            transition(&url, NodeState::Fetching, NodeState::FetchedRecursing);
            tracing::debug!(
                source = "driver",
                "{} same-host links of {} found on {}",
                children.len(),
                links.len(),
                url
            );

            join_all(
                children
                    .into_iter()
                    .enumerate()
                    .map(|(i, child)| self.crawl(child, i + 1, depth + 1)),
            )
            .await;

            transition(&url, NodeState::FetchedRecursing, NodeState::Done);
        }
        .boxed()
    }
}

fn transition(url: &FrontierUrl, from: NodeState, to: NodeState) {
    tracing::trace!(source = "driver", "{}: {} -> {}", url, from, to);
}
