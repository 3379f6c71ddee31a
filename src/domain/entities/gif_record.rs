//! GIF record stored by the portal program.

use super::Pubkey;

/// One submitted link plus its accumulated votes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GifRecord {
    link: String,
    votes: u64,
    submitter: Pubkey,
}

impl GifRecord {
    /// Creates new record.
    #[must_use]
    pub fn new(link: impl Into<String>, votes: u64, submitter: Pubkey) -> Self {
        Self {
            link: link.into(),
            votes,
            submitter,
        }
    }

    /// Returns the GIF link.
    #[must_use]
    pub fn link(&self) -> &str {
        &self.link
    }

    /// Returns the vote count.
    #[must_use]
    pub const fn votes(&self) -> u64 {
        self.votes
    }

    /// Returns the vote count formatted for display.
    #[must_use]
    pub fn votes_display(&self) -> String {
        self.votes.to_string()
    }

    /// Returns the wallet that submitted the link.
    #[must_use]
    pub const fn submitter(&self) -> &Pubkey {
        &self.submitter
    }
}
