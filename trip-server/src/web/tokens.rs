//! Request supersession tokens.
//!
//! Currency conversion and route optimization are fire-and-await calls
//! with no cancellation primitive. Instead, a newly issued request for the
//! same target supersedes any prior in-flight one: tokens are globally
//! monotonic, and a response is applied only while its token is still the
//! latest for its target key. A slow stale response then simply has no
//! observable effect.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::Mutex;

/// Per-target monotonic request tokens.
///
/// Keys name the target of an operation (`"optimize:3"` for day 3,
/// `"currency"` for a display-currency switch).
#[derive(Debug, Default)]
pub struct RequestTokens {
    counter: AtomicU64,
    latest: Mutex<HashMap<String, u64>>,
}

impl RequestTokens {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new token for a target, superseding any outstanding one.
    pub async fn issue(&self, key: &str) -> u64 {
        let token = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        self.latest.lock().await.insert(key.to_string(), token);
        token
    }

    /// True while `token` is the latest issued for its target.
    pub async fn is_current(&self, key: &str, token: u64) -> bool {
        self.latest.lock().await.get(key) == Some(&token)
    }

    /// Mark a request finished; clears the in-flight marker unless a newer
    /// request has already superseded it.
    pub async fn finish(&self, key: &str, token: u64) {
        let mut latest = self.latest.lock().await;
        if latest.get(key) == Some(&token) {
            latest.remove(key);
        }
    }

    /// Invalidate any outstanding request for a target without issuing a
    /// new one. Used when a mutation makes an in-flight result meaningless
    /// (say, a destination edit while its day is being optimized).
    pub async fn supersede(&self, key: &str) {
        self.latest.lock().await.remove(key);
    }

    /// Invalidate every outstanding request (trip replacement).
    pub async fn supersede_all(&self) {
        self.latest.lock().await.clear();
    }

    /// True while a request for the target is outstanding.
    pub async fn in_flight(&self, key: &str) -> bool {
        self.latest.lock().await.contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn tokens_increase_monotonically() {
        let tokens = RequestTokens::new();
        let a = tokens.issue("x").await;
        let b = tokens.issue("x").await;
        let c = tokens.issue("y").await;
        assert!(a < b);
        assert!(b < c);
    }

    #[tokio::test]
    async fn newer_request_supersedes_older() {
        let tokens = RequestTokens::new();
        let old = tokens.issue("optimize:1").await;
        let new = tokens.issue("optimize:1").await;

        assert!(!tokens.is_current("optimize:1", old).await);
        assert!(tokens.is_current("optimize:1", new).await);
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let tokens = RequestTokens::new();
        let one = tokens.issue("optimize:1").await;
        let two = tokens.issue("optimize:2").await;

        assert!(tokens.is_current("optimize:1", one).await);
        assert!(tokens.is_current("optimize:2", two).await);
    }

    #[tokio::test]
    async fn finish_clears_in_flight() {
        let tokens = RequestTokens::new();
        let token = tokens.issue("currency").await;
        assert!(tokens.in_flight("currency").await);

        tokens.finish("currency", token).await;
        assert!(!tokens.in_flight("currency").await);
    }

    #[tokio::test]
    async fn finish_of_stale_token_keeps_newer() {
        let tokens = RequestTokens::new();
        let old = tokens.issue("currency").await;
        let new = tokens.issue("currency").await;

        tokens.finish("currency", old).await;
        assert!(tokens.is_current("currency", new).await);
    }

    #[tokio::test]
    async fn supersede_invalidates_without_new_request() {
        let tokens = RequestTokens::new();
        let token = tokens.issue("optimize:1").await;

        tokens.supersede("optimize:1").await;
        assert!(!tokens.is_current("optimize:1", token).await);
        assert!(!tokens.in_flight("optimize:1").await);
    }

    #[tokio::test]
    async fn supersede_all_clears_everything() {
        let tokens = RequestTokens::new();
        let a = tokens.issue("a").await;
        let b = tokens.issue("b").await;

        tokens.supersede_all().await;
        assert!(!tokens.is_current("a", a).await);
        assert!(!tokens.is_current("b", b).await);
    }
}
