//! The Error node

use crate::chain::{self, chain};
use crate::identity::identity;
use crate::raw::Raw;
use crate::stack::{self, Location, StackFrame, Stacker};
use crate::{Kind, Label, LabelSet};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt;

/// Text shown to users when no link of a chain is user-friendly.
pub const DEFAULT_USER_FRIENDLY_ERROR: &str = "something went wrong";

/// One link of an error chain.
///
/// An error carries:
/// - `kind`: the semantic category
/// - `identity`: a hash of the message template, so errors built from the
///   same template compare equal whatever their arguments were
/// - `message`: the rendered message, extended by [`Error::annotate`]
/// - `labels`: tags such as [`Label::USER_FRIENDLY`]
/// - `details`: key/value pairs for machine consumers
/// - `cause`: the next link of the chain
/// - `location`: where the error was constructed
///
/// `Display` only reveals messages of user-friendly links; use
/// [`Error::raw`] when every message is wanted.
///
/// # Example
///
/// ```rust
/// use lapsus::{Error, Kind};
///
/// let err = Error::new(Kind::Timeout, "upstream did not answer")
///     .with_labels(["user-friendly"])
///     .wrap(std::io::Error::new(std::io::ErrorKind::TimedOut, "read timed out"));
///
/// assert_eq!(err.kind(), Kind::Timeout);
/// assert_eq!(err.to_string(), "upstream did not answer");
/// assert_eq!(err.raw().to_string(), "upstream did not answer: read timed out");
/// ```
pub struct Error {
    id: u32,
    kind: Kind,
    labels: LabelSet,
    message: String,
    details: BTreeMap<String, String>,
    cause: Option<anyhow::Error>,
    // The cause is the foreign error this node was created from, and the
    // message is that error's rendering.
    adopted: bool,
    location: Location,
}

impl Error {
    /// Create a new error. The message doubles as the template its identity
    /// is computed from.
    #[track_caller]
    pub fn new(kind: Kind, message: impl Into<String>) -> Self {
        let message = message.into();
        Self::from_parts(identity(&message), kind, message, LabelSet::new())
    }

    /// Used by [`error!`](crate::error!): identity comes from the template
    /// while the message is the already rendered text.
    #[doc(hidden)]
    #[track_caller]
    pub fn from_template(kind: Kind, template: &str, message: String) -> Self {
        Self::from_parts(identity(template), kind, message, LabelSet::new())
    }

    #[track_caller]
    pub(crate) fn from_parts(id: u32, kind: Kind, message: String, labels: LabelSet) -> Self {
        Self {
            id,
            kind,
            labels,
            message,
            details: BTreeMap::new(),
            cause: None,
            adopted: false,
            location: Location::caller(),
        }
    }

    // =========================================================================
    // Getters
    // =========================================================================

    /// Get the error kind
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Get the kind name, usable as a machine-readable error code
    pub fn code(&self) -> &'static str {
        self.kind.as_str()
    }

    /// Get the template identity
    pub fn identity(&self) -> u32 {
        self.id
    }

    /// Get the raw message of this link, ignoring the rest of the chain
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the labels of this link
    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    /// Get the location the error was created at
    pub fn location(&self) -> Location {
        self.location
    }

    /// Get the wrapped cause (if any)
    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    pub(crate) fn is_adopted(&self) -> bool {
        self.adopted
    }

    // =========================================================================
    // Builders (chainable)
    // =========================================================================

    /// Append `": " + message` to the message
    pub fn annotate(mut self, message: impl fmt::Display) -> Self {
        use fmt::Write;
        // Writing into a String cannot fail.
        let _ = write!(self.message, ": {message}");
        self
    }

    /// Set the cause, replacing any previous one.
    ///
    /// Wrapping an error into its own chain is not detected; chains are
    /// built from already finished errors, so this cannot happen by
    /// accident.
    pub fn wrap(mut self, cause: impl Into<anyhow::Error>) -> Self {
        self.cause = Some(cause.into());
        self.adopted = false;
        self
    }

    pub(crate) fn adopt(mut self, cause: anyhow::Error) -> Self {
        self.cause = Some(cause);
        self.adopted = true;
        self
    }

    /// Extend the labels. A new set is allocated, so sets shared with a
    /// factory are left alone.
    pub fn with_labels<I>(mut self, labels: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Label>,
    {
        self.labels = self.labels.add(labels);
        self
    }

    /// Add a detail key/value pair
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    // =========================================================================
    // Chain inspection
    // =========================================================================

    /// Details of the whole chain.
    ///
    /// The deepest error's details are collected first and every ancestor
    /// overlays its own, so on a key collision the outermost link wins.
    pub fn details(&self) -> BTreeMap<String, String> {
        let mut details = self
            .source()
            .and_then(chain::find_node)
            .map(Error::details)
            .unwrap_or_default();
        details.extend(self.details.iter().map(|(k, v)| (k.clone(), v.clone())));
        details
    }

    /// Equality rule for a single link.
    ///
    /// Against another [`Error`], identity and kind decide; the messages
    /// are irrelevant. Against any other error, the raw message must equal
    /// that error's rendering.
    pub fn is(&self, target: &(dyn StdError + 'static)) -> bool {
        match target.downcast_ref::<Error>() {
            Some(other) => self == other,
            None => self.message == target.to_string(),
        }
    }

    /// User-friendly messages of the chain joined with `": "`, or
    /// `fallback` when the chain has none.
    pub fn user_message(&self, fallback: &str) -> String {
        let messages: Vec<&str> = chain(self)
            .filter_map(|link| link.downcast_ref::<Error>())
            .filter(|node| node.labels.has(Label::USER_FRIENDLY.as_str()))
            .map(Error::message)
            .collect();

        if messages.is_empty() {
            fallback.to_owned()
        } else {
            messages.join(": ")
        }
    }

    /// A view of the chain that renders every message
    pub fn raw(&self) -> Raw<'_> {
        crate::raw::raw(self)
    }

    /// Typed frames of the chain, head first
    pub fn stack_frames(&self) -> Vec<StackFrame> {
        stack::stack_frames(self)
    }

    /// The chain as a JSON array of frames, head first
    pub fn stack_trace(&self) -> serde_json::Value {
        stack::stack_trace(self)
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.kind == other.kind
    }
}

impl Eq for Error {}

// =============================================================================
// Display - user-facing, only user-friendly links are shown
// =============================================================================

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.user_message(DEFAULT_USER_FRIENDLY_ERROR))
    }
}

// =============================================================================
// Debug - verbose, multi-line format for debugging
// =============================================================================

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({:08x}) at {}", self.kind, self.id, self.location)?;
        writeln!(f)?;
        writeln!(f, "    Message: {}", self.message)?;

        if !self.labels.is_empty() {
            let labels: Vec<&str> = self.labels.iter().map(Label::as_str).collect();
            writeln!(f, "    Labels: {}", labels.join(", "))?;
        }

        if !self.details.is_empty() {
            writeln!(f)?;
            writeln!(f, "    Details:")?;
            for (key, value) in &self.details {
                writeln!(f, "        {}: {}", key, value)?;
            }
        }

        if let Some(cause) = &self.cause {
            writeln!(f)?;
            writeln!(f, "    Cause: {:?}", cause)?;
        }

        Ok(())
    }
}

// =============================================================================
// std::error::Error and friends
// =============================================================================

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause.as_deref().map(|c| c as &(dyn StdError + 'static))
    }
}

impl Stacker for Error {
    fn location(&self) -> Option<Location> {
        Some(self.location)
    }

    fn stack_trace(&self) -> serde_json::Value {
        stack::stack_trace(self)
    }
}

/// Serializes to the user-facing string only; the chain never leaks.
impl Serialize for Error {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// =============================================================================
// Adapters (the converted error is kept as the cause)
// =============================================================================

impl From<std::io::Error> for Error {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        use std::io::ErrorKind as Io;

        let kind = match err.kind() {
            Io::NotFound => Kind::NotFound,
            Io::PermissionDenied => Kind::Authorization,
            Io::AlreadyExists => Kind::AlreadyExists,
            Io::TimedOut => Kind::Timeout,
            Io::InvalidInput | Io::InvalidData => Kind::BadRequest,
            _ => Kind::Infrastructure,
        };
        Error::new(kind, err.to_string()).adopt(err.into())
    }
}
