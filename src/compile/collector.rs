//! Recursive dependency collector: closes the implicit include graph.
//!
//! Starting from one file's content, the collector repeatedly scans,
//! resolves and reads newly discovered macros until no new names appear (a
//! fixed point). The graph is never materialized; traversal is a worklist
//! over three pieces of state:
//!
//! - **frontier** - discovered names not yet processed,
//! - **resolved** - name -> path picks accumulated so far,
//! - **visited** - every name ever enqueued, which both prevents duplicate
//!   work and makes cycle termination an explicit invariant instead of an
//!   accident of recursion depth.
//!
//! Unresolvable names are not fatal per step; they accumulate across the
//! whole run and fail the collection in one aggregated error at the end, so
//! a user can fix every missing macro in a single pass.

use super::{resolver, scanner};
use crate::core::SasbError;
use futures::future::try_join_all;
use std::collections::HashSet;
use std::path::PathBuf;

/// Collects the transitive dependency closure of a source text.
pub struct DependencyCollector {
    roots: Vec<PathBuf>,
    preferred_folders: Vec<String>,
}

impl DependencyCollector {
    /// Creates a collector over the given ordered search roots.
    pub fn new(roots: Vec<PathBuf>, preferred_folders: Vec<String>) -> Self {
        Self { roots, preferred_folders }
    }

    /// Resolves every macro transitively referenced by `source`.
    ///
    /// On success, returns one path per dependency in an order safe for
    /// direct concatenation: a dependency never appears after its first
    /// referencer. If any name has no candidate anywhere, the whole run
    /// fails with [`SasbError::UnresolvedDependencies`] listing every
    /// missing name in first-discovery order.
    ///
    /// A file that cannot be read after being resolved is an invariant
    /// violation (resolution only returns existing paths) and surfaces as a
    /// propagated I/O error.
    pub async fn collect(&self, source: &str) -> Result<Vec<PathBuf>, SasbError> {
        let candidates = resolver::find_candidates(&self.roots)
            .map_err(|e| std::io::Error::other(e.to_string()))?;

        let mut frontier = scanner::scan(source);
        let mut visited: HashSet<String> = frontier.iter().cloned().collect();
        let mut collected: Vec<PathBuf> = Vec::new();
        let mut unresolved: Vec<String> = Vec::new();

        while !frontier.is_empty() {
            let (resolved, missing) =
                resolver::resolve(&frontier, &candidates, &self.preferred_folders);
            unresolved.extend(missing);

            // Reads within one step are independent; issue them together.
            // Aggregation back into the worklist stays in frontier order.
            let contents =
                try_join_all(resolved.iter().map(|(_, path)| tokio::fs::read_to_string(path)))
                    .await?;

            let mut next_frontier = Vec::new();
            for ((_, path), content) in resolved.into_iter().zip(contents) {
                collected.push(path);
                for name in scanner::scan(&content) {
                    if visited.insert(name.clone()) {
                        next_frontier.push(name);
                    }
                }
            }
            frontier = next_frontier;
        }

        if !unresolved.is_empty() {
            return Err(SasbError::UnresolvedDependencies { names: unresolved });
        }

        // Names are discovered after their first referencer, so reversing
        // the resolution order puts every dependency before it.
        collected.reverse();
        Ok(collected)
    }
}
