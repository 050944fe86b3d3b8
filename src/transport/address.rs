//! Endpoint address normalization.
//!
//! Users usually type the relay address the way a browser shows it
//! (`http://10.0.0.5:8765/stream`) or as a bare `host:port`. The transport
//! needs a WebSocket URL, so the hypertext scheme is rewritten:
//!
//! | Input prefix | Result |
//! |--------------|--------|
//! | `http://` | `ws://` |
//! | `https://` | `wss://` |
//! | `ws://`, `wss://` | unchanged |
//! | none | `ws://` prepended |
//!
//! Host, port and path are preserved. Secure endpoints are rejected up
//! front unless the crate is built with the `native-tls` feature.

// ============================================================================
// Imports
// ============================================================================

use url::Url;

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Prefix rewrites, matched case-insensitively.
const SCHEME_REWRITES: [(&str, &str); 4] = [
    ("https://", "wss://"),
    ("http://", "ws://"),
    ("wss://", "wss://"),
    ("ws://", "ws://"),
];

/// Scheme used when the address has none.
const DEFAULT_PREFIX: &str = "ws://";

/// Whether `wss://` endpoints can be reached by this build.
const TLS_ENABLED: bool = cfg!(feature = "native-tls");

// ============================================================================
// Functions
// ============================================================================

/// Rewrites a user-supplied address into a WebSocket URL.
///
/// # Errors
///
/// Returns [`Error::InvalidAddress`] if the address is empty, does not parse,
/// uses a scheme other than the ones above, or has no host.
pub fn normalize(address: &str) -> Result<Url> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_address(address, "address is empty"));
    }

    let rewritten = rewrite_scheme(trimmed);
    let url = Url::parse(&rewritten).map_err(|e| Error::invalid_address(address, e.to_string()))?;

    validate(address, &url)?;
    Ok(url)
}

/// Builds a WebSocket URL from a separate host and port.
///
/// # Errors
///
/// Returns [`Error::InvalidAddress`] if the host is empty or not valid in a URL.
pub fn endpoint(host: &str, port: u16) -> Result<Url> {
    let host = host.trim();
    if host.is_empty() {
        return Err(Error::invalid_address(host, "host is empty"));
    }

    normalize(&format!("{host}:{port}"))
}

/// Checks that a parsed URL can be handed to the transport.
pub(crate) fn validate(address: &str, url: &Url) -> Result<()> {
    match url.scheme() {
        "wss" if !TLS_ENABLED => {
            return Err(Error::invalid_address(
                address,
                "secure endpoints require the `native-tls` feature",
            ));
        }
        "ws" | "wss" => {}
        other => {
            return Err(Error::invalid_address(
                address,
                format!("unsupported scheme '{other}'"),
            ));
        }
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(Error::invalid_address(address, "missing host"));
    }

    Ok(())
}

fn rewrite_scheme(address: &str) -> String {
    for (from, to) in SCHEME_REWRITES {
        if let Some(prefix) = address.get(..from.len())
            && prefix.eq_ignore_ascii_case(from)
        {
            return format!("{to}{}", &address[from.len()..]);
        }
    }

    if address.contains("://") {
        // Foreign scheme; let validation reject it with a clear reason.
        return address.to_owned();
    }

    format!("{DEFAULT_PREFIX}{address}")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    #[test]
    fn test_http_becomes_ws() {
        let url = normalize("http://192.168.1.20:8765/stream").unwrap();
        assert_eq!(url.as_str(), "ws://192.168.1.20:8765/stream");
    }

    #[test]
    #[cfg(feature = "native-tls")]
    fn test_https_becomes_wss() {
        let url = normalize("https://relay.example.com/live").unwrap();
        assert_eq!(url.as_str(), "wss://relay.example.com/live");
        assert_eq!(normalize("wss://cam.local").unwrap().scheme(), "wss");
        assert_eq!(normalize("HTTPS://Cam.Local").unwrap().scheme(), "wss");
    }

    #[test]
    #[cfg(not(feature = "native-tls"))]
    fn test_secure_endpoints_rejected_without_tls() {
        for address in ["https://relay.example.com/live", "wss://cam.local", "HTTPS://Cam.Local"] {
            let err = normalize(address).unwrap_err();
            assert!(matches!(err, Error::InvalidAddress { .. }), "{address}");
            assert!(err.to_string().contains("native-tls"), "{address}");
        }
    }

    #[test]
    fn test_ws_scheme_unchanged() {
        assert_eq!(
            normalize("ws://cam.local:9000").unwrap().as_str(),
            "ws://cam.local:9000/"
        );
    }

    #[test]
    fn test_bare_host_port_defaults_to_ws() {
        let url = normalize("10.0.0.5:8765").unwrap();
        assert_eq!(url.scheme(), "ws");
        assert_eq!(url.host_str(), Some("10.0.0.5"));
        assert_eq!(url.port(), Some(8765));
    }

    #[test]
    fn test_scheme_prefix_is_case_insensitive() {
        assert_eq!(normalize("HTTP://Cam.Local").unwrap().scheme(), "ws");
        assert_eq!(normalize("Ws://Cam.Local").unwrap().scheme(), "ws");
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        assert_eq!(normalize("  http://cam:1  ").unwrap().port(), Some(1));
    }

    #[test]
    fn test_rejects_empty() {
        assert!(matches!(normalize("   "), Err(Error::InvalidAddress { .. })));
    }

    #[test]
    fn test_rejects_foreign_scheme() {
        let err = normalize("ftp://cam.local").unwrap_err();
        assert!(err.to_string().contains("unsupported scheme 'ftp'"));
    }

    #[test]
    fn test_rejects_missing_host() {
        assert!(normalize("http://").is_err());
        assert!(normalize("ws://:8080").is_err());
    }

    #[test]
    fn test_rejects_bad_port() {
        assert!(normalize("cam.local:99999").is_err());
    }

    #[test]
    fn test_endpoint_from_host_and_port() {
        let url = endpoint("192.168.0.7", 8765).unwrap();
        assert_eq!(url.as_str(), "ws://192.168.0.7:8765/");
        assert!(endpoint("", 8765).is_err());
    }

    proptest! {
        #[test]
        fn prop_hypertext_scheme_rewrite_preserves_location(
            secure in any::<bool>(),
            host in "[a-z][a-z0-9]{0,12}(\\.[a-z][a-z0-9]{0,8}){0,2}",
            port in 1u16..,
            path in "(/[a-z0-9_]{1,8}){0,3}",
        ) {
            let scheme = if secure { "https" } else { "http" };
            let normalized = normalize(&format!("{scheme}://{host}:{port}{path}"));
            if secure && !TLS_ENABLED {
                prop_assert!(normalized.is_err());
                return Ok(());
            }
            let url = normalized.unwrap();

            prop_assert_eq!(url.scheme(), if secure { "wss" } else { "ws" });
            prop_assert_eq!(url.host_str(), Some(host.as_str()));
            let expected_path = if path.is_empty() { "/".to_string() } else { path.clone() };
            prop_assert_eq!(url.path(), expected_path.as_str());
            let default_port = if secure { 443 } else { 80 };
            if port == default_port {
                prop_assert_eq!(url.port(), None);
            } else {
                prop_assert_eq!(url.port(), Some(port));
            }
        }
    }
}
