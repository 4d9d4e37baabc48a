//! Secret and PII scrubbing
//!
//! First stage of the pipeline: pure text redaction applied to every
//! free-text field before anything leaves the process. Includes:
//! - Ordered pattern catalog (provider keys, JWTs, hex tokens, PEM blocks,
//!   secret assignments, credentialed URIs, home paths, emails, IPv4)
//! - Idempotent scrubber that never fails on any input
//! - Structural URL sanitizer with a sensitive-parameter vocabulary

pub mod patterns;
pub mod scrubber;
pub mod url;

pub use patterns::{all_patterns, ScrubPattern};
pub use scrubber::Scrubber;
pub use url::{sanitize_url, UrlMode, INVALID_URL_SENTINEL};
