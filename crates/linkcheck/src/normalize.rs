use std::fmt;
use tracing::{debug, info};
use url::{ParseError, Url};

use crate::probe::is_reachable_status;
use crate::{Probe, SchemePolicy, UrlRejection};

/// A URL approved for QR encoding.
///
/// Only [`extract_url`] constructs this type. The wrapped string always parses
/// as an absolute URL with a non-empty host and an allowed scheme.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AcceptedUrl(String);

impl AcceptedUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for AcceptedUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AcceptedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalize raw message text into an [`AcceptedUrl`].
///
/// Fully qualified input is returned unchanged once its host and scheme check
/// out. Input that does not parse as an absolute URL goes through scheme
/// insertion: `scheme://text` is tried for every scheme in `policy` order and
/// the first candidate `probe` reports as reachable wins.
///
/// An input that parses but fails validation (`http://`, `http:host`,
/// `foo://bar`) is rejected outright. Scheme insertion only runs on hard
/// parse failures.
pub async fn extract_url<P>(
    text: &str,
    policy: &SchemePolicy,
    probe: &P,
) -> Result<AcceptedUrl, UrlRejection>
where
    P: Probe + ?Sized,
{
    match parse_absolute(text) {
        Ok(parsed) => validate_absolute(text, &parsed, policy),
        Err(Malformed::EmptyHost) => Err(UrlRejection::HostEmpty),
        Err(Malformed::Invalid) => {
            debug!("input is not an absolute URL, trying scheme insertion");
            insert_scheme(text, policy, probe).await
        }
    }
}

/// Why [`parse_absolute`] refused its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Malformed {
    /// Absolute URL whose authority is missing or empty.
    EmptyHost,
    Invalid,
}

/// Parse `text` as an absolute URL without the WHATWG parser's leniency.
///
/// `Url::parse` trims surrounding spaces, drops tabs and newlines anywhere,
/// and reads `http:host` or `http:///host` as if `//host` had been typed.
/// Such input is refused here, so an accepted string is exactly the URL that
/// was checked.
fn parse_absolute(text: &str) -> Result<Url, Malformed> {
    let padded = text.starts_with(char::is_whitespace) || text.ends_with(char::is_whitespace);
    if padded || text.chars().any(|c| c.is_ascii_control()) {
        return Err(Malformed::Invalid);
    }

    let parsed = match Url::parse(text) {
        Ok(parsed) => parsed,
        Err(ParseError::EmptyHost) => return Err(Malformed::EmptyHost),
        Err(_) => return Err(Malformed::Invalid),
    };

    if parsed.has_host() && !has_authority(text, parsed.scheme()) {
        return Err(Malformed::EmptyHost);
    }
    Ok(parsed)
}

/// Whether `text` spells out a non-empty `//authority` right after `scheme:`.
fn has_authority(text: &str, scheme: &str) -> bool {
    let authority = match text
        .get(scheme.len()..)
        .and_then(|rest| rest.strip_prefix("://"))
    {
        Some(authority) => authority,
        None => return false,
    };
    !(authority.is_empty() || authority.starts_with(['/', '\\']))
}

fn validate_absolute(
    text: &str,
    parsed: &Url,
    policy: &SchemePolicy,
) -> Result<AcceptedUrl, UrlRejection> {
    match parsed.host_str() {
        Some(host) if !host.is_empty() => {}
        _ => return Err(UrlRejection::HostEmpty),
    }

    if !policy.allows(parsed.scheme()) {
        return Err(UrlRejection::SchemeNotAllowed {
            scheme: parsed.scheme().to_string(),
        });
    }

    Ok(AcceptedUrl(text.to_string()))
}

async fn insert_scheme<P>(
    text: &str,
    policy: &SchemePolicy,
    probe: &P,
) -> Result<AcceptedUrl, UrlRejection>
where
    P: Probe + ?Sized,
{
    for scheme in policy.schemes() {
        let candidate = format!("{scheme}://{text}");
        let parsed = match parse_absolute(&candidate) {
            Ok(parsed) => parsed,
            Err(reason) => {
                debug!(scheme, ?reason, "candidate does not parse, skipping");
                continue;
            }
        };

        match probe.probe(&parsed).await {
            Ok(status) if is_reachable_status(status) => {
                info!(scheme, status, "scheme insertion accepted candidate");
                return Ok(AcceptedUrl(candidate));
            }
            Ok(status) => debug!(scheme, status, "candidate answered with unusable status"),
            Err(err) => debug!(scheme, error = %err, "candidate unreachable"),
        }
    }

    Err(UrlRejection::Unreachable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProbeError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Answers from a fixed table keyed by (scheme, host); everything else
    /// fails like a DNS miss. Records every probed URL.
    #[derive(Default)]
    struct TableProbe {
        answers: Vec<(String, String, u16)>,
        calls: Mutex<Vec<String>>,
    }

    impl TableProbe {
        fn answering(answers: &[(&str, &str, u16)]) -> Self {
            Self {
                answers: answers
                    .iter()
                    .map(|(s, h, c)| (s.to_string(), h.to_string(), *c))
                    .collect(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Probe for TableProbe {
        async fn probe(&self, url: &Url) -> Result<u16, ProbeError> {
            self.calls.lock().unwrap().push(url.scheme().to_string());
            let host = url.host_str().unwrap_or_default();
            self.answers
                .iter()
                .find(|(scheme, h, _)| scheme == url.scheme() && h == host)
                .map(|(_, _, status)| *status)
                .ok_or_else(|| ProbeError::Other(format!("no route to {host}")))
        }
    }

    async fn check(text: &str, probe: &TableProbe) -> Result<AcceptedUrl, UrlRejection> {
        extract_url(text, &SchemePolicy::default(), probe).await
    }

    #[tokio::test]
    async fn fully_qualified_urls_are_returned_unchanged() {
        let probe = TableProbe::default();
        for text in ["https://google.com", "https://ya.ru", "http://127.0.0.1"] {
            let accepted = check(text, &probe).await.expect("accepted");
            assert_eq!(accepted.as_str(), text);
        }
        assert!(probe.calls().is_empty(), "qualified input must not be probed");
    }

    #[tokio::test]
    async fn scheme_check_ignores_case() {
        let probe = TableProbe::default();
        let accepted = check("HTTPS://Example.com/Path", &probe).await.unwrap();
        assert_eq!(accepted.as_str(), "HTTPS://Example.com/Path");
    }

    #[tokio::test]
    async fn empty_host_is_rejected_without_fallback() {
        let probe = TableProbe::answering(&[("https", "http", 200)]);
        assert_eq!(check("http://", &probe).await, Err(UrlRejection::HostEmpty));
        assert_eq!(
            check("mailto:someone@example.com", &probe).await,
            Err(UrlRejection::HostEmpty)
        );
        assert!(probe.calls().is_empty());
    }

    #[tokio::test]
    async fn host_with_port_and_no_scheme_reads_as_scheme() {
        let probe = TableProbe::answering(&[("https", "example.com", 200)]);
        assert_eq!(
            check("example.com:8080", &probe).await,
            Err(UrlRejection::HostEmpty)
        );
        assert!(probe.calls().is_empty());
    }

    #[tokio::test]
    async fn disallowed_scheme_is_rejected_without_fallback() {
        let probe = TableProbe::answering(&[("https", "bar", 200)]);
        assert_eq!(
            check("foo://bar", &probe).await,
            Err(UrlRejection::SchemeNotAllowed {
                scheme: "foo".into()
            })
        );
        assert!(probe.calls().is_empty());
    }

    #[tokio::test]
    async fn bare_host_takes_first_reachable_scheme() {
        let probe = TableProbe::answering(&[("https", "vk.com", 200), ("http", "vk.com", 200)]);
        let accepted = check("vk.com", &probe).await.unwrap();
        assert_eq!(accepted.as_str(), "https://vk.com");
        assert_eq!(probe.calls(), vec!["https"]);
    }

    #[tokio::test]
    async fn bare_host_falls_through_to_later_schemes() {
        let probe = TableProbe::answering(&[("https", "vk.com", 404), ("http", "vk.com", 302)]);
        let accepted = check("vk.com", &probe).await.unwrap();
        assert_eq!(accepted.as_str(), "http://vk.com");
        assert_eq!(probe.calls(), vec!["https", "http"]);
    }

    #[tokio::test]
    async fn ftp_is_the_last_resort() {
        let probe = TableProbe::answering(&[("ftp", "files.example.org", 200)]);
        let accepted = check("files.example.org/pub", &probe).await.unwrap();
        assert_eq!(accepted.as_str(), "ftp://files.example.org/pub");
        assert_eq!(probe.calls(), vec!["https", "http", "ftp"]);
    }

    #[tokio::test]
    async fn unreachable_bare_host_is_rejected() {
        let probe = TableProbe::answering(&[("https", "vk.com", 500), ("http", "vk.com", 199)]);
        assert_eq!(check("vk.com", &probe).await, Err(UrlRejection::Unreachable));
        assert_eq!(probe.calls(), vec!["https", "http", "ftp"]);
    }

    #[tokio::test]
    async fn internationalized_domain_is_accepted() {
        let idn_host = Url::parse("https://www.россия.рф")
            .unwrap()
            .host_str()
            .unwrap()
            .to_string();
        let probe = TableProbe::answering(&[("https", idn_host.as_str(), 200)]);
        let accepted = check("www.россия.рф", &probe).await.unwrap();
        assert_eq!(accepted.as_str(), "https://www.россия.рф");
    }

    #[tokio::test]
    async fn qualified_idn_is_accepted_as_is() {
        let probe = TableProbe::default();
        let accepted = check("http://www.россия.рф", &probe).await.unwrap();
        assert_eq!(accepted.as_str(), "http://www.россия.рф");
    }

    #[tokio::test]
    async fn unparseable_candidates_are_skipped() {
        let probe = TableProbe::default();
        assert_eq!(
            check("hello world", &probe).await,
            Err(UrlRejection::Unreachable)
        );
        assert_eq!(check("", &probe).await, Err(UrlRejection::Unreachable));
        assert!(probe.calls().is_empty());
    }

    #[tokio::test]
    async fn padded_or_control_text_is_never_accepted() {
        let probe = TableProbe::answering(&[
            ("https", "google.com", 200),
            ("http", "google.com", 200),
            ("ftp", "google.com", 200),
        ]);
        for text in [
            "  https://google.com  ",
            "https://google.com ",
            " https://google.com",
            "https://example.com/a\nb",
            "https://goo\tgle.com",
            "https://google.com\r",
            " google.com",
            "google.com\n",
            "goo\tgle.com",
        ] {
            assert_eq!(
                check(text, &probe).await,
                Err(UrlRejection::Unreachable),
                "{text:?}"
            );
        }
        assert!(probe.calls().is_empty());
    }

    #[tokio::test]
    async fn missing_authority_slashes_mean_empty_host() {
        let probe = TableProbe::answering(&[("https", "example.com", 200)]);
        for text in [
            "http:example.com",
            "http:/example.com",
            "http:///example.com",
            "https:\\\\example.com",
        ] {
            assert_eq!(check(text, &probe).await, Err(UrlRejection::HostEmpty), "{text:?}");
        }
        assert!(probe.calls().is_empty());
    }

    #[tokio::test]
    async fn candidates_get_the_same_strict_parse() {
        let probe = TableProbe::answering(&[("https", "vk.com", 200), ("http", "vk.com", 200)]);
        assert_eq!(check("//vk.com", &probe).await, Err(UrlRejection::Unreachable));
        assert!(probe.calls().is_empty());
    }

    #[test]
    fn authority_detection() {
        assert!(has_authority("https://vk.com", "https"));
        assert!(has_authority("HTTPS://vk.com", "https"));
        assert!(!has_authority("https:vk.com", "https"));
        assert!(!has_authority("https:///vk.com", "https"));
        assert!(!has_authority("https://", "https"));
    }

    #[tokio::test]
    async fn normalizing_twice_is_idempotent() {
        let probe = TableProbe::answering(&[("http", "vk.com", 200)]);
        let first = check("vk.com", &probe).await.unwrap();
        let second = check(first.as_str(), &probe).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(second.as_str(), "http://vk.com");
    }

    #[tokio::test]
    async fn custom_policy_limits_insertion() {
        static ONLY_HTTP: &[&str] = &["http"];
        let probe = TableProbe::answering(&[("https", "vk.com", 200), ("http", "vk.com", 200)]);
        let accepted = extract_url("vk.com", &SchemePolicy::new(ONLY_HTTP), &probe)
            .await
            .unwrap();
        assert_eq!(accepted.as_str(), "http://vk.com");
        assert_eq!(
            extract_url("https://vk.com", &SchemePolicy::new(ONLY_HTTP), &probe).await,
            Err(UrlRejection::SchemeNotAllowed {
                scheme: "https".into()
            })
        );
    }

    #[test]
    fn accepted_url_displays_inner_string() {
        let url = AcceptedUrl("https://example.com".into());
        assert_eq!(url.to_string(), "https://example.com");
        assert_eq!(url.as_ref(), "https://example.com");
        assert_eq!(url.into_string(), "https://example.com");
    }
}
