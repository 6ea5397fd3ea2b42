//! Call-site capture and stack trace serialization

use crate::chain::{self, chain};
use crate::{Error, Kind, LabelSet};
use serde::{Deserialize, Serialize, Serializer};
use std::error::Error as StdError;
use std::fmt;

/// Something that knows where it was created and can describe its chain.
pub trait Stacker: StdError {
    /// The `file:line` where the head of the chain was created
    fn location(&self) -> Option<Location>;

    /// The whole chain as a JSON array of frames, head first
    fn stack_trace(&self) -> serde_json::Value;
}

/// Source location an error was constructed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    file: &'static str,
    line: u32,
}

impl Location {
    /// Captures the location of the caller.
    ///
    /// Every public constructor is `#[track_caller]`, so this resolves to
    /// the first frame outside the crate however many constructors are
    /// stacked on top of each other.
    #[track_caller]
    pub fn caller() -> Self {
        let location = std::panic::Location::caller();
        Location {
            file: location.file(),
            line: location.line(),
        }
    }

    /// Source file
    pub fn file(&self) -> &'static str {
        self.file
    }

    /// Line within the file
    pub fn line(&self) -> u32 {
        self.line
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

impl Serialize for Location {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One link of a serialized chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackFrame {
    pub kind: Kind,
    pub labels: LabelSet,
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Location of a single link, if the link records one.
pub fn location_of(err: &(dyn StdError + 'static)) -> Option<Location> {
    err.downcast_ref::<Error>().map(Error::location)
}

/// Builds one frame per link of the chain starting at `err`.
pub fn stack_frames(err: &(dyn StdError + 'static)) -> Vec<StackFrame> {
    chain(err)
        .map(|link| StackFrame {
            kind: chain::kind_of(link),
            labels: chain::labels(link),
            error: match link.downcast_ref::<Error>() {
                Some(node) => node.message().to_owned(),
                None => link.to_string(),
            },
            location: location_of(link).map(|l| l.to_string()),
        })
        .collect()
}

/// Serializes the chain starting at `err` into a JSON array of frames.
///
/// Never fails: if serialization breaks, a single `{"error": ...}` object
/// describing the failure is returned instead.
pub fn stack_trace(err: &(dyn StdError + 'static)) -> serde_json::Value {
    let frames = stack_frames(err);
    match serde_json::to_value(&frames) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, frames = frames.len(), "stack trace serialization failed");
            serde_json::json!({ "error": e.to_string() })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_display() {
        let (location, line) = (Location::caller(), line!());
        assert_eq!(location.file(), file!());
        assert_eq!(location.line(), line);
        assert_eq!(location.to_string(), format!("{}:{}", file!(), line));
    }

    #[test]
    fn test_two_node_stack_trace() {
        let (inner, inner_line) = (Error::new(Kind::Authorization, "access denied"), line!());
        let (err, outer_line) = (
            Error::new(Kind::Authentication, "invalid login/password")
                .with_labels([crate::Label::USER_FRIENDLY])
                .wrap(inner),
            line!(),
        );

        let frames: Vec<StackFrame> = serde_json::from_value(err.stack_trace()).unwrap();
        assert_eq!(
            frames,
            vec![
                StackFrame {
                    kind: Kind::Authentication,
                    labels: LabelSet::new().add(["user-friendly"]),
                    error: "invalid login/password".to_string(),
                    location: Some(format!("{}:{}", file!(), outer_line - 3)),
                },
                StackFrame {
                    kind: Kind::Authorization,
                    labels: LabelSet::new(),
                    error: "access denied".to_string(),
                    location: Some(format!("{}:{}", file!(), inner_line)),
                },
            ]
        );
        assert_eq!(err.stack_frames(), frames);
    }

    #[test]
    fn test_frames_for_foreign_error() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let frames = stack_frames(&io);

        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].kind, Kind::General);
        assert!(frames[0].labels.is_empty());
        assert_eq!(frames[0].error, "disk on fire");
        assert_eq!(frames[0].location, None);
    }

    #[test]
    fn test_location_is_omitted_when_absent() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let value = stack_trace(&io);
        assert_eq!(
            value,
            serde_json::json!([{ "kind": "General", "labels": [], "error": "disk on fire" }])
        );
    }
}
