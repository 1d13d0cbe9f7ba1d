//! Bearer-credential capability.

/// Yields the current bearer credential on demand.
///
/// Implementations must be local reads; retrieval never blocks on
/// network I/O, which is why this trait is synchronous.
pub trait TokenSource: Send + Sync {
    fn access_token(&self) -> String;
}

/// Token source backed by a fixed, configured credential.
pub struct StaticTokenSource {
    access_token: String,
}

impl StaticTokenSource {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }
}

impl TokenSource for StaticTokenSource {
    fn access_token(&self) -> String {
        self.access_token.clone()
    }
}
