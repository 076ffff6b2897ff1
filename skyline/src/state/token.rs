use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one asynchronous request. Tokens grow monotonically, so a response carrying a
/// token different from the one the state waits for is stale.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    /// Numeric value of the token.
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Source of request tokens.
#[derive(Debug, Default)]
pub struct TokenSource {
    last: AtomicU64,
}

impl TokenSource {
    /// Returns a token greater than all previously issued ones.
    pub fn next(&self) -> RequestToken {
        RequestToken(self.last.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_grow() {
        let source = TokenSource::default();
        let first = source.next();
        let second = source.next();

        assert!(second > first);
        assert_eq!(first.value(), 1);
    }
}
