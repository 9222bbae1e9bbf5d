//! Dependency path resolver: maps dependency names to concrete files.
//!
//! The same macro name may legitimately exist in several search folders -
//! override folders exist precisely to create that situation - so ambiguity
//! is resolved silently by a deterministic three-tier ranking rather than
//! surfaced as an error:
//!
//! 1. a candidate under the first matching entry of an explicit
//!    preferred-folder list wins outright,
//! 2. otherwise any project-local candidate beats one inside the bundled
//!    core library,
//! 3. otherwise the first candidate in root-scan order wins.
//!
//! The ranking operates on plain path strings (both `/` and `\` separators)
//! and never touches the filesystem, so it can be exercised with synthetic
//! path lists. Candidate discovery lives in [`find_candidates`], the one
//! function here that reads the disk.

use crate::constants::{CORE_LIB_FOLDER, SAS_FILE_EXTENSION};
use anyhow::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Splits a path string into segments on either separator.
///
/// Ranking must behave identically for `sas/macros/mf_abort.sas` and
/// `sas\macros\mf_abort.sas`, independent of the host OS.
fn segments(path: &str) -> impl DoubleEndedIterator<Item = &str> {
    path.split(['/', '\\']).filter(|s| !s.is_empty())
}

/// Bare file name of a path string, separator-agnostic.
fn basename(path: &str) -> &str {
    segments(path).next_back().unwrap_or(path)
}

/// Whether a candidate lives inside the bundled core library.
fn is_core_candidate(path: &str) -> bool {
    segments(path).any(|s| s == CORE_LIB_FOLDER)
}

/// Picks exactly one candidate path per dependency name.
///
/// `candidate_paths` is the pre-gathered pool in root-scan order; a name's
/// candidates are those whose basename matches it exactly (case-sensitive).
/// Names with no candidate at all are simply absent from the result - use
/// [`resolve`] when the unresolved set matters.
pub fn prioritise_overrides(
    names: &[String],
    candidate_paths: &[String],
    preferred_folders: &[String],
) -> Vec<String> {
    names
        .iter()
        .filter_map(|name| {
            let mut candidates: Vec<&String> =
                candidate_paths.iter().filter(|path| basename(path) == name).collect();
            // Exact duplicates collapse, keeping first-seen position.
            let mut seen = std::collections::HashSet::new();
            candidates.retain(|path| seen.insert(path.as_str()));

            pick(&candidates, preferred_folders).cloned()
        })
        .collect()
}

fn pick<'a>(candidates: &[&'a String], preferred_folders: &[String]) -> Option<&'a String> {
    for folder in preferred_folders {
        if let Some(hit) =
            candidates.iter().find(|path| segments(path).any(|s| s == folder.as_str()))
        {
            return Some(hit);
        }
    }
    // No preferred match: local overrides the bundled core library.
    candidates
        .iter()
        .find(|path| !is_core_candidate(path))
        .or_else(|| candidates.first())
        .copied()
}

/// Partitions `names` into resolved `(name, path)` pairs and unresolved
/// names, both in input order.
///
/// Totality invariant: every requested name appears in exactly one of the
/// two lists, never both, never neither.
pub fn resolve(
    names: &[String],
    candidate_paths: &[String],
    preferred_folders: &[String],
) -> (Vec<(String, PathBuf)>, Vec<String>) {
    let mut resolved = Vec::new();
    let mut unresolved = Vec::new();

    for name in names {
        let picked =
            prioritise_overrides(std::slice::from_ref(name), candidate_paths, preferred_folders);
        match picked.into_iter().next() {
            Some(path) => resolved.push((name.clone(), PathBuf::from(path))),
            None => unresolved.push(name.clone()),
        }
    }

    (resolved, unresolved)
}

/// Gathers every `.sas` file under the given search roots, in root order.
///
/// Missing roots are skipped silently - a target may configure folders that
/// only exist in some checkouts. Entries within a root are visited in sorted
/// order so resolution is deterministic across platforms.
pub fn find_candidates(roots: &[PathBuf]) -> Result<Vec<String>> {
    let mut candidates = Vec::new();
    for root in roots {
        if !root.is_dir() {
            continue;
        }
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry?;
            if entry.file_type().is_file() && has_sas_extension(entry.path()) {
                candidates.push(entry.path().to_string_lossy().into_owned());
            }
        }
    }
    Ok(candidates)
}

fn has_sas_extension(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(SAS_FILE_EXTENSION))
}
