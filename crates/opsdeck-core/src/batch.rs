// ── Fan-out aggregation ──
//
// Runs one fetch per key concurrently and collects every outcome into an
// ordered batch. A failed sub-fetch becomes a `Failed` entry for its key;
// it never cancels or taints the other in-flight sub-fetches.

use std::future::Future;

use futures_util::future::join_all;

use crate::error::ErrorKind;

/// The outcome of one fetch: a typed value or a classified failure.
pub type FetchResult<T> = Result<T, ErrorKind>;

/// Ordered results of a fan-out: one entry per requested key, entry order
/// matching the request order regardless of completion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedBatch<K, T> {
    entries: Vec<(K, FetchResult<T>)>,
}

impl<K, T> AggregatedBatch<K, T> {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub(crate) fn from_entries(entries: Vec<(K, FetchResult<T>)>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[(K, FetchResult<T>)] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &(K, FetchResult<T>)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Number of entries that fetched successfully.
    pub fn ok_count(&self) -> usize {
        self.entries.iter().filter(|(_, r)| r.is_ok()).count()
    }

    /// Number of degraded entries.
    pub fn failed_count(&self) -> usize {
        self.entries.iter().filter(|(_, r)| r.is_err()).count()
    }

    pub fn into_entries(self) -> Vec<(K, FetchResult<T>)> {
        self.entries
    }
}

impl<K: PartialEq, T> AggregatedBatch<K, T> {
    /// Look up the result for `key`, if it was part of the request.
    pub fn get(&self, key: &K) -> Option<&FetchResult<T>> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, r)| r)
    }
}

impl<'a, K, T> IntoIterator for &'a AggregatedBatch<K, T> {
    type Item = &'a (K, FetchResult<T>);
    type IntoIter = std::slice::Iter<'a, (K, FetchResult<T>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Fetch every key concurrently and aggregate the outcomes.
///
/// The batch completes only once every sub-fetch has resolved; there are
/// no first-completion or partial-result semantics. An empty key set
/// returns an empty batch without issuing any fetch.
pub async fn fan_out<K, T, F, Fut>(keys: Vec<K>, fetch_one: F) -> AggregatedBatch<K, T>
where
    K: Clone,
    F: Fn(K) -> Fut,
    Fut: Future<Output = FetchResult<T>>,
{
    if keys.is_empty() {
        return AggregatedBatch::empty();
    }

    let entries = join_all(keys.into_iter().map(|key| {
        let fut = fetch_one(key.clone());
        async move { (key, fut.await) }
    }))
    .await;

    AggregatedBatch::from_entries(entries)
}
