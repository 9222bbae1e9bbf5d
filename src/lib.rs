//! sasb - a build and deployment toolchain for SAS applications.
//!
//! SAS programs lean on reusable macros, but the server runs each service
//! as a standalone program. `sasb` closes that gap: it scans programs for
//! macro references, resolves each one to a physical file across the
//! project's macro folders (with override and core-library precedence
//! rules), and compiles self-contained programs with every dependency
//! inlined ahead of its first use. Around that core it offers project
//! scaffolding, job execution against SAS9/Viya servers, compute context
//! management, streaming web-app builds and Doxygen documentation.
//!
//! The library is organized leaf-first:
//!
//! - [`compile`] - the dependency scanner, resolver and collector
//! - [`config`] - `sasbconfig.json` parsing and project discovery
//! - [`adapter`] - the server boundary trait and its REST implementation
//! - [`job`], [`context`], [`web`], [`docs`] - the operations the CLI
//!   exposes
//! - [`cli`] - argument parsing and dispatch

pub mod adapter;
pub mod cli;
pub mod compile;
pub mod config;
pub mod constants;
pub mod context;
pub mod core;
pub mod docs;
pub mod job;
pub mod utils;
pub mod web;
