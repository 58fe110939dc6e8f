//! Recovery link detection.
//!
//! The auth provider delivers recovery links back to the app as a URL
//! fragment (`#access_token=...&type=recovery`). Only the marker matters
//! here; the token exchange itself happens in the host page before the
//! shell mounts.

/// Parsed navigation target the shell was mounted with.
#[derive(Debug, Clone, Default)]
pub struct NavigationTarget {
    recovery: bool,
}

impl NavigationTarget {
    /// Parse a URL fragment (with or without the leading `#`).
    pub fn from_fragment(fragment: &str) -> Self {
        let recovery = fragment
            .trim_start_matches('#')
            .split('&')
            .any(|pair| pair == "type=recovery");

        Self { recovery }
    }

    /// A plain navigation with no fragment.
    pub fn none() -> Self {
        Self::default()
    }

    /// Returns true if the fragment carries the provider's recovery marker.
    pub fn has_recovery_marker(&self) -> bool {
        self.recovery
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recovery_fragment_detected() {
        let nav = NavigationTarget::from_fragment(
            "#access_token=abc123&expires_in=3600&refresh_token=def&type=recovery",
        );
        assert!(nav.has_recovery_marker());
    }

    #[test]
    fn test_fragment_without_leading_hash() {
        let nav = NavigationTarget::from_fragment("type=recovery");
        assert!(nav.has_recovery_marker());
    }

    #[test]
    fn test_non_recovery_fragment() {
        let nav = NavigationTarget::from_fragment("#access_token=abc123&type=signup");
        assert!(!nav.has_recovery_marker());
    }

    #[test]
    fn test_type_substring_does_not_count() {
        // "type=recovery" must be a whole pair, not a substring of one
        let nav = NavigationTarget::from_fragment("#subtype=recovery");
        assert!(!nav.has_recovery_marker());
    }

    #[test]
    fn test_empty_fragment() {
        let nav = NavigationTarget::from_fragment("");
        assert!(!nav.has_recovery_marker());
        assert!(!NavigationTarget::none().has_recovery_marker());
    }
}
