//! Async HTTP clients for upstream license data.
//!
//! Each module exposes a `fetch_*` function returning `Ok(Some(..))` on success,
//! `Ok(None)` when the upstream has no such entry, and `Err` on network failures.

pub mod spdx;
