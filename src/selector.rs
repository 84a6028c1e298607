//! Strategies choosing which recorded entry answers a request

use dashmap::DashSet;
use hyper::http::request::Parts;

use crate::entry::Entry;

/// Chooses a recorded entry to respond to a request.
///
/// Closures with the same signature implement this trait, so ad-hoc
/// strategies do not need their own type.
pub trait Selector: Send + Sync {
    /// Pick an entry for `request`, or `None` when nothing answers it
    fn select(&self, entries: &[Entry], request: &Parts) -> Option<Entry>;
}

impl<F> Selector for F
where
    F: Fn(&[Entry], &Parts) -> Option<Entry> + Send + Sync,
{
    fn select(&self, entries: &[Entry], request: &Parts) -> Option<Entry> {
        self(entries, request)
    }
}

/// Default selection: the first entry whose method and URL match, ignoring
/// ASCII case. The same request always yields the same entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstMatch;

impl FirstMatch {
    /// First entry recorded for `method` and `url`
    #[must_use]
    pub fn find(entries: &[Entry], method: &str, url: &str) -> Option<Entry> {
        entries
            .iter()
            .find(|entry| entry.request.matches(method, url))
            .cloned()
    }
}

impl Selector for FirstMatch {
    fn select(&self, entries: &[Entry], request: &Parts) -> Option<Entry> {
        Self::find(entries, request.method.as_str(), &request.uri.to_string())
    }
}

/// Matches like [`FirstMatch`], but returns each recorded position at most
/// once. When every matching position has been used it returns `None`.
///
/// The set of used positions belongs to the selector, so sharing one
/// selector between recorders shares the bookkeeping.
#[derive(Debug, Default)]
pub struct OncePerCall {
    used: DashSet<usize>,
}

impl OncePerCall {
    /// Create a selector with no positions used
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of positions handed out so far
    #[must_use]
    pub fn used_count(&self) -> usize {
        self.used.len()
    }

    /// Forget every handed out position
    pub fn reset(&self) {
        self.used.clear();
    }
}

impl Selector for OncePerCall {
    fn select(&self, entries: &[Entry], request: &Parts) -> Option<Entry> {
        let method = request.method.as_str();
        let url = request.uri.to_string();

        // `insert` claims a position atomically, so two concurrent callers
        // never receive the same one.
        entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.request.matches(method, &url))
            .find(|(i, _)| self.used.insert(*i))
            .map(|(_, entry)| entry.clone())
    }
}
