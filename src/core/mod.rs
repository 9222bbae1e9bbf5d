//! Core types shared across the toolchain.

pub mod error;

pub use error::{ErrorContext, SasbError, user_friendly_error};
