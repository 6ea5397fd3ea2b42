//! # lapsus
//!
//! Structured error chains: errors that know their kind, carry labels and
//! details, remember where they were created, and decide by label what is
//! safe to show to a user.
//!
//! ## Design Philosophy
//!
//! - **Kind**: Know what category of error occurred (e.g. NotFound, Timeout)
//! - **Identity**: Compare errors by the template they were built from, not
//!   by their rendered text
//! - **Labels**: Only links labelled `user-friendly` reach the default
//!   string form; everything else collapses to a generic fallback
//! - **Chain**: Wrap any error, foreign or not, and inspect the whole chain
//!   without knowing its shape
//!
//! ## Usage
//!
//! ```rust
//! use lapsus::{is, Error, Factory, Kind};
//!
//! let not_found = Factory::not_found("user {} not found");
//!
//! fn lookup(not_found: &Factory, id: u64) -> Result<(), Error> {
//!     Err(Error::persistence("query failed")
//!         .with_detail("table", "users")
//!         .wrap(not_found.create(&[&id])))
//! }
//!
//! let err = lookup(&not_found, 42).unwrap_err();
//! assert!(is(&err, &not_found));
//! assert_eq!(err.to_string(), "user 42 not found");
//! assert_eq!(err.raw().to_string(), "query failed: user 42 not found");
//! assert_eq!(err.details()["table"], "users");
//! ```
//!
//! ## Principles
//!
//! - Errors are compared with [`is`] / [`is_in`], never by message
//! - Foreign errors are normalized with [`from`] or wrapped with
//!   [`Error::wrap`]
//! - Logs use [`raw`] or [`Error::stack_trace`]; users get `Display`

mod chain;
mod error;
mod factory;
mod identity;
mod kind;
mod label;
mod macros;
mod raw;
mod stack;

pub use chain::{chain, from, is, is_in, is_user_friendly, join, kind_of, labels, Chain, Joined, Target};
pub use error::{Error, DEFAULT_USER_FRIENDLY_ERROR};
pub use factory::Factory;
pub use identity::{identity, render};
pub use kind::Kind;
pub use label::{Label, LabelSet};
pub use raw::{raw, Raw};
pub use stack::{location_of, stack_frames, stack_trace, Location, StackFrame, Stacker};

/// Result type alias using lapsus Error
pub type Result<T> = std::result::Result<T, Error>;
