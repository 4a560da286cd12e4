//! Intentionally empty. See `tests/security_invariants.rs`.
