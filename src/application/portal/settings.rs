//! Controller settings resolved from configuration at startup.

/// Behavior switches for the portal controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalSettings {
    /// Wallet provider name accepted by the wallet check.
    pub expected_provider: String,
    /// Re-fetch the record list after a successful vote.
    pub refresh_after_vote: bool,
}

impl PortalSettings {
    /// Creates settings accepting `expected_provider`.
    #[must_use]
    pub fn new(expected_provider: impl Into<String>) -> Self {
        Self {
            expected_provider: expected_provider.into(),
            refresh_after_vote: true,
        }
    }

    /// Sets refresh-after-vote behavior.
    #[must_use]
    pub const fn with_refresh_after_vote(mut self, refresh: bool) -> Self {
        self.refresh_after_vote = refresh;
        self
    }
}
