//! Pipeline configuration.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::types::RequestStatus;

/// Which target statuses require a reviewer comment before submitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommentPolicy {
    /// Only rejections need a reason.
    #[default]
    RejectedOnly,
    /// Every status change needs a comment.
    Always,
}

impl CommentPolicy {
    pub fn requires_comment(&self, target: RequestStatus) -> bool {
        match self {
            CommentPolicy::RejectedOnly => target == RequestStatus::Rejected,
            CommentPolicy::Always => true,
        }
    }
}

impl fmt::Display for CommentPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommentPolicy::RejectedOnly => f.write_str("rejected"),
            CommentPolicy::Always => f.write_str("always"),
        }
    }
}

impl FromStr for CommentPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rejected" | "rejected-only" | "rejected_only" => Ok(CommentPolicy::RejectedOnly),
            "always" | "all" => Ok(CommentPolicy::Always),
            other => Err(format!(
                "unknown comment policy '{other}' (expected 'rejected' or 'always')"
            )),
        }
    }
}

/// Configuration for the moderation console.
#[derive(Debug, Clone)]
pub struct ModerationConfig {
    /// Budget for the single list call of a pass.
    ///
    /// Default: 10 seconds.
    pub list_timeout: Duration,

    /// Budget for each per-record detail call.
    ///
    /// One hung lookup must not stall the whole pass, so this is tighter
    /// than the list budget. Default: 5 seconds.
    pub detail_timeout: Duration,

    /// Budget for a status update. Default: 10 seconds.
    pub update_timeout: Duration,

    /// Comment requirement for status changes. Default: rejections only.
    pub comment_policy: CommentPolicy,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            list_timeout: Duration::from_secs(10),
            detail_timeout: Duration::from_secs(5),
            update_timeout: Duration::from_secs(10),
            comment_policy: CommentPolicy::default(),
        }
    }
}

impl ModerationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_list_timeout(mut self, timeout: Duration) -> Self {
        self.list_timeout = timeout;
        self
    }

    pub fn with_detail_timeout(mut self, timeout: Duration) -> Self {
        self.detail_timeout = timeout;
        self
    }

    pub fn with_update_timeout(mut self, timeout: Duration) -> Self {
        self.update_timeout = timeout;
        self
    }

    pub fn with_comment_policy(mut self, policy: CommentPolicy) -> Self {
        self.comment_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_only_policy() {
        let policy = CommentPolicy::RejectedOnly;
        assert!(policy.requires_comment(RequestStatus::Rejected));
        assert!(!policy.requires_comment(RequestStatus::Approved));
        assert!(!policy.requires_comment(RequestStatus::Pending));
    }

    #[test]
    fn test_always_policy() {
        for status in RequestStatus::variants() {
            assert!(CommentPolicy::Always.requires_comment(*status));
        }
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("Rejected".parse(), Ok(CommentPolicy::RejectedOnly));
        assert_eq!("always".parse(), Ok(CommentPolicy::Always));
        assert!("sometimes".parse::<CommentPolicy>().is_err());
    }

    #[test]
    fn test_detail_budget_is_tighter_than_list_budget() {
        let config = ModerationConfig::default();
        assert!(config.detail_timeout < config.list_timeout);
    }
}
