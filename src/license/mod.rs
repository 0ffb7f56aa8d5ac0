//! Canonical license text lookup.
//!
//! - [`spdx`]: identifier cleanup and compound expression splitting.
//! - [`cache`]: the [`cache::LicenseCache`] seam and its on-disk implementation.
//! - [`provider`]: cache-first lookup with a network fallback and write-through.

pub mod cache;
pub mod provider;
pub mod spdx;
