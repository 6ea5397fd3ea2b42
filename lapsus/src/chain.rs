//! Functions that inspect a chain without knowing its shape
//!
//! A chain may mix [`Error`] nodes with any other error type. Each link is
//! inspected for what it can do: nodes contribute kinds, labels, details and
//! locations, every link contributes its rendering and its source.

use crate::{Error, Factory, Kind, LabelSet};
use std::error::Error as StdError;
use std::fmt;

/// Iterator over the links of a chain, head first.
pub struct Chain<'a> {
    next: Option<&'a (dyn StdError + 'static)>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a (dyn StdError + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let link = self.next?;
        self.next = link.source();
        Some(link)
    }
}

/// Iterate over `err` and all of its sources
pub fn chain<'a>(err: &'a (dyn StdError + 'static)) -> Chain<'a> {
    Chain { next: Some(err) }
}

/// First [`Error`] node of the chain, `err` itself included.
///
/// A [`Joined`] link is searched member by member.
pub(crate) fn find_node<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a Error> {
    for link in chain(err) {
        if let Some(node) = link.downcast_ref::<Error>() {
            return Some(node);
        }
        if let Some(joined) = link.downcast_ref::<Joined>() {
            return joined.iter().find_map(find_node);
        }
    }
    None
}

/// Kind of `err`, or [`Kind::General`] if it is not an [`Error`]
pub fn kind_of(err: &(dyn StdError + 'static)) -> Kind {
    err.downcast_ref::<Error>().map(Error::kind).unwrap_or_default()
}

/// Labels of `err`, empty if it is not an [`Error`]
pub fn labels(err: &(dyn StdError + 'static)) -> LabelSet {
    err.downcast_ref::<Error>()
        .map(|node| node.labels().clone())
        .unwrap_or_default()
}

/// Check whether `err` itself is labelled user-friendly
pub fn is_user_friendly(err: &(dyn StdError + 'static)) -> bool {
    labels(err).has(crate::Label::USER_FRIENDLY.as_str())
}

/// Normalize any error into an [`Error`].
///
/// An [`Error`] passes through unchanged. Anything else becomes a
/// [`Kind::General`] error whose message is the original's rendering and
/// whose cause is the original itself, so no link of the chain is lost.
/// The new error is not user-friendly.
///
/// Optional errors map through `Option::map(lapsus::from)`.
#[track_caller]
pub fn from(err: impl Into<anyhow::Error>) -> Error {
    let err: anyhow::Error = err.into();
    // anyhow's downcast also sees through context wrappers; only a bare
    // node may pass through.
    let err = if (&*err as &(dyn StdError + 'static)).is::<Error>() {
        match err.downcast::<Error>() {
            Ok(node) => return node,
            Err(err) => err,
        }
    } else {
        err
    };
    tracing::trace!(error = %err, "adopting foreign error");
    Error::new(Kind::General, err.to_string()).adopt(err)
}

/// Something a chain can be compared against with [`is`].
pub trait Target {
    /// Whether a single link equals this target
    fn matches(&self, link: &(dyn StdError + 'static)) -> bool;
}

/// A factory matches every error it created, whatever the arguments.
impl Target for Factory {
    fn matches(&self, link: &(dyn StdError + 'static)) -> bool {
        link.downcast_ref::<Error>()
            .is_some_and(|node| node.identity() == self.identity() && node.kind() == self.kind())
    }
}

/// Node links apply [`Error::is`]; other links only match the very same
/// error value.
impl Target for dyn StdError + 'static {
    fn matches(&self, link: &(dyn StdError + 'static)) -> bool {
        match link.downcast_ref::<Error>() {
            Some(node) => node.is(self),
            None => same_value(link, self),
        }
    }
}

impl Target for dyn StdError + Send + Sync + 'static {
    fn matches(&self, link: &(dyn StdError + 'static)) -> bool {
        <dyn StdError as Target>::matches(self, link)
    }
}

impl<E: StdError + 'static> Target for E {
    fn matches(&self, link: &(dyn StdError + 'static)) -> bool {
        <dyn StdError as Target>::matches(self, link)
    }
}

fn same_value(a: &dyn StdError, b: &dyn StdError) -> bool {
    std::ptr::eq(a as *const dyn StdError as *const (), b as *const dyn StdError as *const ())
}

/// Check whether `err` or any error it wraps equals `target`.
///
/// Members of a [`Joined`] error are searched as well.
pub fn is<T: Target + ?Sized>(err: &(dyn StdError + 'static), target: &T) -> bool {
    for link in chain(err) {
        if target.matches(link) {
            return true;
        }
        if let Some(joined) = link.downcast_ref::<Joined>() {
            return joined.iter().any(|member| is(member, target));
        }
    }
    false
}

/// Check whether [`is`] holds for any of `targets`. Stops at the first match.
pub fn is_in(err: &(dyn StdError + 'static), targets: &[&dyn Target]) -> bool {
    targets.iter().any(|target| is(err, *target))
}

/// Several independent errors reported as one.
///
/// This is not a chain: members are siblings, reachable through
/// [`Joined::iter`].
#[derive(Debug)]
pub struct Joined {
    errors: Vec<anyhow::Error>,
}

impl Joined {
    /// Iterate over the members
    pub fn iter(&self) -> impl Iterator<Item = &(dyn StdError + 'static)> + '_ {
        self.errors.iter().map(|e| &**e as &(dyn StdError + 'static))
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Check if there are no members
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for Joined {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl StdError for Joined {}

/// Combine errors into a [`Joined`] error, or `None` if there are none.
pub fn join<I>(errors: I) -> Option<Joined>
where
    I: IntoIterator,
    I::Item: Into<anyhow::Error>,
{
    let errors: Vec<anyhow::Error> = errors.into_iter().map(Into::into).collect();
    if errors.is_empty() {
        None
    } else {
        Some(Joined { errors })
    }
}
