// src/telemetry.rs
//! Tracing setup and log-safe identifiers.

use sha2::{Digest, Sha256};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Set to `1` / `true` for JSON log lines instead of the compact format.
pub const ENV_LOG_JSON: &str = "ANALYZER_LOG_JSON";

/// Install the global subscriber. Logs go to stderr so stdout stays clean for the
/// report (and for `--json`). Default level is `warn`; override with `RUST_LOG`.
/// Calling twice is harmless.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let json = std::env::var(ENV_LOG_JSON)
        .map(|v| matches!(v.trim(), "1" | "true" | "TRUE"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    let _ = if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .try_init()
    };
}

/// Short stable hash of a transcript lexeme for log fields: short enough to grep,
/// without writing caller speech into logs.
pub fn anon_hash(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    digest[..6].iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anon_hash_is_short_hex_and_stable() {
        let a = anon_hash("hola");
        assert_eq!(a.len(), 12);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(a, anon_hash("hola"));
        assert_ne!(a, anon_hash("adios"));
    }
}
