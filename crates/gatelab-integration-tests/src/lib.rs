//! Intentionally empty: this crate exists to host the cross-crate
//! integration tests under `tests/`.
