//! Labels attached to errors

use serde::{Deserialize, Serialize};
use std::borrow::{Borrow, Cow};
use std::fmt;

/// A string tag attached to an error.
///
/// Static strings are stored borrowed, so constant labels cost nothing to
/// attach.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Label(Cow<'static, str>);

impl Label {
    /// Marks an error message as safe to show to end users.
    pub const USER_FRIENDLY: Label = Label::from_static("user-friendly");

    /// Creates a label from a static string
    pub const fn from_static(name: &'static str) -> Self {
        Label(Cow::Borrowed(name))
    }

    /// Returns the label text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Label {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Label {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Label {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Label {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl From<&'static str> for Label {
    fn from(name: &'static str) -> Self {
        Label::from_static(name)
    }
}

impl From<String> for Label {
    fn from(name: String) -> Self {
        Label(Cow::Owned(name))
    }
}

const USER_FRIENDLY_ONLY: &[Label] = &[Label::USER_FRIENDLY];

/// An ordered, append-only sequence of labels.
///
/// The set is never changed in place: [`LabelSet::add`] returns a new set,
/// so sets can be shared between factories and the errors they produce.
/// Duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelSet(Cow<'static, [Label]>);

impl LabelSet {
    /// Creates an empty set
    pub const fn new() -> Self {
        LabelSet(Cow::Borrowed(&[]))
    }

    /// Creates a set backed by a static slice
    pub const fn from_static(labels: &'static [Label]) -> Self {
        LabelSet(Cow::Borrowed(labels))
    }

    /// The set that factory-made errors start with.
    pub(crate) fn user_friendly() -> Self {
        LabelSet::from_static(USER_FRIENDLY_ONLY)
    }

    /// Returns a new set holding these labels followed by `labels`.
    pub fn add<I>(&self, labels: I) -> LabelSet
    where
        I: IntoIterator,
        I::Item: Into<Label>,
    {
        let labels = labels.into_iter();
        let mut out = Vec::with_capacity(self.0.len() + labels.size_hint().0);
        out.extend_from_slice(&self.0);
        out.extend(labels.map(Into::into));
        LabelSet(Cow::Owned(out))
    }

    /// Checks whether `label` is in the set
    pub fn has(&self, label: &str) -> bool {
        self.0.iter().any(|l| l.as_str() == label)
    }

    /// Number of labels, duplicates included
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the set is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the labels in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, Label> {
        self.0.iter()
    }

    /// Returns the labels as a slice
    pub fn as_slice(&self) -> &[Label] {
        &self.0
    }
}

impl<L: Into<Label>> FromIterator<L> for LabelSet {
    fn from_iter<T: IntoIterator<Item = L>>(iter: T) -> Self {
        LabelSet::new().add(iter)
    }
}

impl<'a> IntoIterator for &'a LabelSet {
    type Item = &'a Label;
    type IntoIter = std::slice::Iter<'a, Label>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_does_not_touch_receiver() {
        let base = LabelSet::user_friendly();
        let derived = base.add(["retryable", "processing"]);

        assert_eq!(base.len(), 1);
        assert!(!base.has("retryable"));
        assert_eq!(derived.as_slice(), &[Label::USER_FRIENDLY, "retryable".into(), "processing".into()]);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let set: LabelSet = ["a", "a"].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert!(set.has("a"));
        assert!(!set.has("b"));
    }

    #[test]
    fn test_owned_and_static_labels_compare_equal() {
        let owned = Label::from(String::from("user-friendly"));
        assert_eq!(owned, Label::USER_FRIENDLY);
        assert_eq!(owned, "user-friendly");
    }

    #[test]
    fn test_empty() {
        assert!(LabelSet::new().is_empty());
        assert!(!LabelSet::default().has("user-friendly"));
    }

    #[test]
    fn test_serialize_as_array() {
        let set = LabelSet::user_friendly().add([String::from("io")]);
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["user-friendly","io"]"#);
        let back: LabelSet = serde_json::from_str(r#"["user-friendly","io"]"#).unwrap();
        assert_eq!(back, set);
    }
}
