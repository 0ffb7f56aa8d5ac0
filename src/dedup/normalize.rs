//! Copyright-year normalization for license bodies.

use std::sync::LazyLock;

use regex::Regex;
use sha2::{Digest, Sha256};

/// Applied in order, each rule over the output of the previous one.
static YEAR_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        // Copyright (c) 2020-2023
        (r"Copyright\s*\([cC]\)\s*\d{4}(?:-\d{4})?", "Copyright (c) YYYY"),
        // Copyright (c) 2020, 2021, 2022
        (r"Copyright\s*\([cC]\)\s*(?:\d{4},?\s*)+", "Copyright (c) YYYY"),
        // Copyright 2020-2023
        (r"Copyright\s+\d{4}(?:-\d{4})?", "Copyright YYYY"),
        // Copyright 2020, 2021
        (r"Copyright\s+(?:\d{4},?\s*)+", "Copyright YYYY"),
        (r"\b\d{4}-\d{4}\b", "YYYY-YYYY"),
        (r"\b\d{4}\b", "YYYY"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| (Regex::new(pattern).unwrap(), replacement))
    .collect()
});

/// Replace calendar years and year ranges with placeholder tokens.
pub fn normalize_copyright_years(text: &str) -> String {
    YEAR_RULES
        .iter()
        .fold(text.to_string(), |acc, (re, replacement)| {
            re.replace_all(&acc, *replacement).into_owned()
        })
}

/// Hex SHA-256 of the year-normalized text.
pub fn normalized_digest(text: &str) -> String {
    hex::encode(Sha256::digest(normalize_copyright_years(text).as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_ranges_collapse() {
        let a = normalize_copyright_years("Copyright (c) 2020-2023, X");
        let b = normalize_copyright_years("Copyright (c) 2022-2024, X");
        assert_eq!(a, "Copyright (c) YYYY, X");
        assert_eq!(a, b);
        assert_eq!(
            normalized_digest("Copyright (c) 2020-2023, X"),
            normalized_digest("Copyright (c) 2022-2024, X")
        );
    }

    #[test]
    fn test_uppercase_marker() {
        assert_eq!(
            normalize_copyright_years("Copyright (C) 2019 Foo"),
            "Copyright (c) YYYY Foo"
        );
    }

    #[test]
    fn test_bare_copyright() {
        assert_eq!(
            normalize_copyright_years("Copyright 2018-2021 The Authors"),
            "Copyright YYYY The Authors"
        );
    }

    #[test]
    fn test_loose_years() {
        assert_eq!(
            normalize_copyright_years("Portions 1999-2004 and 2010 by Bar"),
            "Portions YYYY-YYYY and YYYY by Bar"
        );
    }

    #[test]
    fn test_year_list() {
        let a = normalize_copyright_years("Copyright (c) 2020, 2021 Foo");
        let b = normalize_copyright_years("Copyright (c) 2023 Foo");
        assert_eq!(a, "Copyright (c) YYYY, YYYY Foo");
        assert_ne!(a, b);
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let once = normalize_copyright_years("Copyright (c) 2020-2023 NVIDIA\nVersion 2.0, 2004");
        assert_eq!(normalize_copyright_years(&once), once);
    }

    #[test]
    fn test_text_without_years_unchanged() {
        let text = "Permission is hereby granted, free of charge";
        assert_eq!(normalize_copyright_years(text), text);
    }
}
