use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Compare two secrets without leaking their content or length via timing.
///
/// Both inputs are hashed to fixed-length digests first, then compared with
/// `subtle`.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    let ha = Sha256::digest(a);
    let hb = Sha256::digest(b);
    ha.ct_eq(&hb).into()
}

/// Check an `Authorization: Bearer <token>` header value against `expected`.
pub fn bearer_matches(header: Option<&str>, expected: &str) -> bool {
    header
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|token| constant_time_eq(token.as_bytes(), expected.as_bytes()))
        .unwrap_or(false)
}
