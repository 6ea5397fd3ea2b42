//! Raw view: every message of the chain, regardless of labels
//!
//! Meant for trusted consumers such as logs, never for end users.

use crate::chain::chain;
use crate::stack::{self, location_of, Location, Stacker};
use crate::{Error, DEFAULT_USER_FRIENDLY_ERROR};
use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;

/// A view over a chain whose `Display` joins every link's message.
#[derive(Debug, Clone, Copy)]
pub struct Raw<'a> {
    head: &'a (dyn StdError + 'static),
}

/// View the chain starting at `err` with every message visible.
///
/// ```rust
/// use lapsus::{Error, Kind};
///
/// let err = Error::new(Kind::Authentication, "bad login")
///     .with_labels(["user-friendly"])
///     .wrap(Error::new(Kind::Persistence, "db timeout"));
///
/// assert_eq!(err.to_string(), "bad login");
/// assert_eq!(lapsus::raw(&err).to_string(), "bad login: db timeout");
/// ```
pub fn raw<'a>(err: &'a (dyn StdError + 'static)) -> Raw<'a> {
    Raw { head: err }
}

impl Raw<'_> {
    fn is_node(&self) -> bool {
        self.head.is::<Error>()
    }
}

impl fmt::Display for Raw<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // A view over a foreign error renders exactly like that error.
        if !self.is_node() {
            return fmt::Display::fmt(self.head, f);
        }

        let mut out: Vec<Cow<'_, str>> = Vec::new();
        let mut skip = false;
        for link in chain(self.head) {
            if std::mem::take(&mut skip) {
                continue;
            }
            match link.downcast_ref::<Error>() {
                Some(node) => {
                    out.push(Cow::Borrowed(node.message()));
                    // The adopted cause was already rendered into the message.
                    skip = node.is_adopted();
                }
                None => out.push(Cow::Owned(link.to_string())),
            }
        }

        if out.is_empty() {
            f.write_str(DEFAULT_USER_FRIENDLY_ERROR)
        } else {
            f.write_str(&out.join(": "))
        }
    }
}

impl StdError for Raw<'_> {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        if self.is_node() {
            Some(self.head)
        } else {
            self.head.source()
        }
    }
}

impl Stacker for Raw<'_> {
    fn location(&self) -> Option<Location> {
        location_of(self.head)
    }

    fn stack_trace(&self) -> serde_json::Value {
        stack::stack_trace(self.head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{from, Kind};
    use std::io;

    #[test]
    fn test_raw_ignores_labels() {
        let err = Error::new(Kind::Authentication, "bad login")
            .with_labels(["user-friendly"])
            .wrap(Error::new(Kind::Persistence, "db timeout").wrap(io::Error::new(io::ErrorKind::Other, "socket closed")));

        assert_eq!(raw(&err).to_string(), "bad login: db timeout: socket closed");
    }

    #[test]
    fn test_raw_over_foreign_error() {
        let io_err = io::Error::new(io::ErrorKind::Other, "plain");
        let view = raw(&io_err);
        assert_eq!(view.to_string(), "plain");
        assert!(view.source().is_none());
        assert_eq!(view.location(), None);
    }

    #[test]
    fn test_raw_does_not_repeat_adopted_cause() {
        let err = Error::new(Kind::General, "handler failed").wrap(from(io::Error::new(io::ErrorKind::Other, "kek: bek")));
        assert_eq!(raw(&err).to_string(), "handler failed: kek: bek");
    }

    #[test]
    fn test_raw_forwards_location_and_stack_trace() {
        let err = Error::new(Kind::Authentication, "invalid login/password")
            .with_labels(["user-friendly"])
            .wrap(Error::new(Kind::Authorization, "access denied"));
        let view = raw(&err);

        assert_eq!(view.location(), Some(err.location()));
        assert_eq!(view.stack_trace(), err.stack_trace());
        assert!(view.source().is_some_and(|head| head.is::<Error>()));
    }
}
