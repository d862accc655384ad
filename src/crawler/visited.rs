use std::collections::HashSet;
use std::sync::Mutex;

/// Outcome of trying to claim a URL for fetching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Claim {
    /// The URL was new and is now recorded; the caller fetches it
    Claimed,
    /// The URL was already dispatched
    Duplicate,
    /// The page budget is used up
    BudgetExhausted,
}

#[derive(Debug, Default)]
struct Visited {
    seen: HashSet<String>,
    order: Vec<String>,
}

/// URLs already dispatched to the fetcher
///
/// Append-only. Membership test, budget test and insert happen under one
/// lock, so two concurrent branches can never both claim the same URL.
#[derive(Debug, Default)]
pub struct VisitedSet {
    inner: Mutex<Visited>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `url` unless it was already seen or `limit` URLs are recorded
    ///
    /// # Example
    ///
    /// ```
    /// use techcrawl::crawler::{Claim, VisitedSet};
    ///
    /// let visited = VisitedSet::new();
    /// assert_eq!(visited.try_claim("https://example.com/", 10), Claim::Claimed);
    /// assert_eq!(visited.try_claim("https://example.com/", 10), Claim::Duplicate);
    /// ```
    pub fn try_claim(&self, url: &str, limit: usize) -> Claim {
        let mut visited = self.inner.lock().unwrap_or_else(|e| e.into_inner());

        if visited.seen.contains(url) {
            return Claim::Duplicate;
        }

        if visited.order.len() >= limit {
            return Claim::BudgetExhausted;
        }

        visited.seen.insert(url.to_string());
        visited.order.push(url.to_string());
        Claim::Claimed
    }

    pub fn contains(&self, url: &str) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .seen
            .contains(url)
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .order
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Claimed URLs in dispatch order
    pub fn urls(&self) -> Vec<String> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .order
            .clone()
    }
}
