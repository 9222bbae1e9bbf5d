//! Token scanner: extracts macro dependency names from SAS source text.
//!
//! SAS programs in a sasb project declare the macros they use in the program
//! header, one per `@li` item:
//!
//! ```sas
//! /**
//!   @file example.sas
//!   <h4> SAS Macros </h4>
//!   @li mf_abort.sas
//!   @li mf_getuniquefileref
//! **/
//! ```
//!
//! The scanner is lexically naive by design: it pattern-matches `@li <name>`
//! anywhere in the text - comments and string literals included - rather
//! than tokenizing SAS. The targets are human-authored macro names following
//! the naming convention, so a regex is all the precision this needs.

use crate::constants::SAS_FILE_EXTENSION;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static DEPENDENCY_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@li\s+([0-9A-Za-z_\-.]+)").expect("valid dependency regex"));

/// Scans source text for macro dependency names.
///
/// Returns names in first-discovery order, de-duplicated, each normalized to
/// carry the `.sas` suffix. References carrying any other extension (data
/// files and the like) are dropped.
///
/// Pure function; an empty result is a valid outcome.
pub fn scan(source: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();

    for capture in DEPENDENCY_REF.captures_iter(source) {
        let Some(name) = normalize(&capture[1]) else {
            continue;
        };
        if seen.insert(name.clone()) {
            names.push(name);
        }
    }

    names
}

/// Normalizes one reference: bare names gain the `.sas` suffix, `.sas` names
/// pass through, anything with another extension is rejected.
fn normalize(reference: &str) -> Option<String> {
    if !reference.contains('.') {
        return Some(format!("{reference}{SAS_FILE_EXTENSION}"));
    }
    if reference.ends_with(SAS_FILE_EXTENSION) {
        return Some(reference.to_string());
    }
    None
}
