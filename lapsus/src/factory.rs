//! Error factories

use crate::identity::{identity, render};
use crate::{Error, Kind, Label, LabelSet};
use std::borrow::Cow;
use std::fmt;

/// A reusable error template bound to a kind.
///
/// Every error a factory creates carries the factory's identity, so
/// [`is`](crate::is) can check an error against the factory itself without
/// a sample instance. Factory-made errors are user-friendly.
///
/// Factories are immutable and meant to live in shared statics:
///
/// ```rust
/// use lapsus::Factory;
/// use once_cell::sync::Lazy;
///
/// static USER_NOT_FOUND: Lazy<Factory> = Lazy::new(|| Factory::not_found("user {} not found"));
///
/// let err = USER_NOT_FOUND.create(&[&42]);
/// assert_eq!(err.to_string(), "user 42 not found");
/// assert!(lapsus::is(&err, &*USER_NOT_FOUND));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Factory {
    // Hash of the template, shared by every error this factory creates.
    id: u32,
    kind: Kind,
    template: Cow<'static, str>,
    labels: LabelSet,
}

impl Factory {
    /// Create a factory for `kind` errors rendered from `template`.
    ///
    /// `{}` placeholders are substituted by [`Factory::create`] arguments in
    /// order; `{{` and `}}` are literal braces.
    pub fn new(kind: Kind, template: impl Into<Cow<'static, str>>) -> Self {
        let template = template.into();
        Self {
            id: identity(&template),
            kind,
            template,
            labels: LabelSet::user_friendly(),
        }
    }

    /// Get the error kind
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Get the template identity
    pub fn identity(&self) -> u32 {
        self.id
    }

    /// Get the template
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Get the labels attached to created errors
    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    /// Create a new error from the template.
    ///
    /// The error records the caller's location, not this function's.
    #[track_caller]
    pub fn create(&self, args: &[&dyn fmt::Display]) -> Error {
        Error::from_parts(self.id, self.kind, render(&self.template, args), self.labels.clone())
    }

    /// Derive a factory whose errors carry extra labels. `self` is left
    /// untouched.
    pub fn with_labels<I>(&self, labels: I) -> Factory
    where
        I: IntoIterator,
        I::Item: Into<Label>,
    {
        Factory {
            labels: self.labels.add(labels),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::is;

    #[test]
    fn test_create_renders_template() {
        let factory = Factory::new(Kind::NotFound, "user {} not found in {}");
        let (err, line) = (factory.create(&[&7, &"eu"]), line!());

        assert_eq!(err.kind(), Kind::NotFound);
        assert_eq!(err.message(), "user 7 not found in eu");
        assert_eq!(err.to_string(), "user 7 not found in eu");
        assert_eq!(err.identity(), factory.identity());
        assert!(err.labels().has("user-friendly"));
        assert_eq!(err.location().line(), line);
        assert_eq!(err.location().file(), file!());
    }

    #[test]
    fn test_created_errors_are_the_same_error() {
        let factory = Factory::new(Kind::Validation, "field {} is invalid");
        let a = factory.create(&[&"name"]);
        let b = factory.create(&[&"email"]);

        assert_eq!(a, b);
        assert!(is(&a, &b));
        assert!(is(&a, &factory));
        assert!(!is(&a, &Factory::new(Kind::Validation, "field {} is missing")));
        assert!(!is(&a, &Factory::new(Kind::BadRequest, "field {} is invalid")));
    }

    #[test]
    fn test_with_labels_copies() {
        let factory = Factory::new(Kind::BadRequest, "error");
        let derived = factory.with_labels(["TagFallbackable", "TagProcessing"]);

        let err = derived.create(&[]);
        let labels: Vec<&str> = err.labels().iter().map(Label::as_str).collect();
        assert_eq!(labels, ["user-friendly", "TagFallbackable", "TagProcessing"]);

        let plain = factory.create(&[]);
        assert_eq!(plain.labels().len(), 1);
        assert!(!plain.labels().has("TagFallbackable"));
        assert_eq!(factory.labels().len(), 1);
        assert_eq!(derived.identity(), factory.identity());
    }

    #[test]
    fn test_annotate_factory_error() {
        let err = Factory::new(Kind::BadRequest, "something").create(&[]).annotate(format_args!("test {}", "err"));
        assert_eq!(err.to_string(), "something: test err");
    }

    #[test]
    fn test_shared_across_threads() {
        let factory = Factory::new(Kind::LimitExceeded, "quota {} exceeded");

        std::thread::scope(|scope| {
            for i in 0..4 {
                let factory = &factory;
                scope.spawn(move || {
                    let derived = factory.with_labels([format!("worker-{i}")]);
                    let err = derived.create(&[&i]);
                    assert!(is(&err, factory));
                    assert_eq!(err.message(), format!("quota {i} exceeded"));
                });
            }
        });

        assert_eq!(factory.labels().len(), 1);
    }
}
