//! Core types shared across nginit.
//!
//! Currently this is the error taxonomy ([`NginitError`]) and the
//! user-facing error reporting built on top of it ([`ErrorContext`],
//! [`user_friendly_error`]).

pub mod error;

pub use error::{ErrorContext, NginitError, user_friendly_error};
