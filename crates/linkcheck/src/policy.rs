/// Schemes accepted in QR payloads, in the order scheme insertion tries them.
pub const ALLOWED_SCHEMES: &[&str] = &["https", "http", "ftp"];

/// Immutable, ordered set of allowed URL schemes.
///
/// Used both as the acceptance filter for fully qualified input and as the
/// priority order for scheme insertion.
///
/// ```
/// use linkcheck::SchemePolicy;
///
/// let policy = SchemePolicy::default();
/// assert!(policy.allows("HTTPS"));
/// assert!(!policy.allows("javascript"));
/// assert_eq!(policy.schemes()[0], "https");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemePolicy {
    schemes: &'static [&'static str],
}

impl SchemePolicy {
    pub const fn new(schemes: &'static [&'static str]) -> Self {
        Self { schemes }
    }

    pub fn schemes(&self) -> &'static [&'static str] {
        self.schemes
    }

    /// Case-insensitive membership test.
    pub fn allows(&self, scheme: &str) -> bool {
        self.schemes
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(scheme))
    }
}

impl Default for SchemePolicy {
    fn default() -> Self {
        Self::new(ALLOWED_SCHEMES)
    }
}
