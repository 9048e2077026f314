//! Boolean combination of filters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::error::ParseError;

use super::Filter;

/// How a group combines its children.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupMode {
    /// Every child matches. An empty group matches everything.
    #[default]
    And,
    /// At least one child matches. An empty group matches nothing.
    Or,
    /// No child matches. An empty group matches everything.
    Nor,
}

impl GroupMode {
    pub const ALL: [GroupMode; 3] = [GroupMode::And, GroupMode::Or, GroupMode::Nor];

    /// Keyword of the text and binary forms.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            GroupMode::And => "AND",
            GroupMode::Or => "OR",
            GroupMode::Nor => "NOR",
        }
    }

    /// Combine child results lazily.
    pub fn test<I>(self, mut results: I) -> bool
    where
        I: Iterator<Item = bool>,
    {
        match self {
            GroupMode::And => results.all(|r| r),
            GroupMode::Or => results.any(|r| r),
            GroupMode::Nor => !results.any(|r| r),
        }
    }
}

impl FromStr for GroupMode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GroupMode::ALL
            .into_iter()
            .find(|m| m.keyword().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseError::UnknownMode(s.to_string()))
    }
}

impl fmt::Display for GroupMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// An ordered list of child filters combined by a [`GroupMode`].
///
/// Children are owned: moving a filter into a group moves it out of
/// wherever it was before. Equality ignores child order and the comment.
///
/// ## Usage
///
/// ```
/// use card_filter::filter::{Filter, FilterAttribute, FilterGroup, GroupMode};
///
/// let mut group = FilterGroup::new(GroupMode::Or);
/// group.push(FilterAttribute::Name.default_leaf());
/// group.push(FilterAttribute::ManaValue.default_leaf());
///
/// // Wrap the second child in a NOR group in place.
/// assert!(group.promote(1, GroupMode::Nor));
/// assert!(group.children()[1].as_group().is_some());
///
/// let detached = group.detach(0).unwrap();
/// assert_eq!(detached.kind(), "n");
/// assert_eq!(group.len(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct FilterGroup {
    pub mode: GroupMode,
    /// Free-form note shown by editors; preserved by every codec.
    pub comment: String,
    children: Vec<Filter>,
}

impl FilterGroup {
    #[must_use]
    pub fn new(mode: GroupMode) -> Self {
        Self {
            mode,
            comment: String::new(),
            children: Vec::new(),
        }
    }

    /// Add a child (builder pattern).
    #[must_use]
    pub fn with_child(mut self, child: impl Into<Filter>) -> Self {
        self.push(child);
        self
    }

    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    #[must_use]
    pub fn children(&self) -> &[Filter] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<Filter> {
        &mut self.children
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Append a child at the end.
    pub fn push(&mut self, child: impl Into<Filter>) {
        self.children.push(child.into());
    }

    /// Insert a child at `index`, clamped to the end.
    pub fn insert(&mut self, index: usize, child: impl Into<Filter>) {
        let index = index.min(self.children.len());
        self.children.insert(index, child.into());
    }

    /// Remove and return the child at `index`.
    pub fn detach(&mut self, index: usize) -> Option<Filter> {
        (index < self.children.len()).then(|| self.children.remove(index))
    }

    /// Replace the child at `index` with a new group of `mode` containing it.
    ///
    /// Returns `false` if there is no such child.
    pub fn promote(&mut self, index: usize, mode: GroupMode) -> bool {
        let Some(slot) = self.children.get_mut(index) else {
            return false;
        };
        let child = std::mem::replace(slot, Filter::Group(FilterGroup::new(mode)));
        if let Filter::Group(group) = slot {
            group.children.push(child);
        }
        true
    }

    pub fn test(&self, card: &Card) -> bool {
        self.mode.test(self.children.iter().map(|c| c.test(card)))
    }
}

impl PartialEq for FilterGroup {
    /// Same mode and the same children as a multiset.
    fn eq(&self, other: &Self) -> bool {
        if self.mode != other.mode || self.children.len() != other.children.len() {
            return false;
        }
        let mut used = vec![false; other.children.len()];
        self.children.iter().all(|child| {
            let found = other
                .children
                .iter()
                .enumerate()
                .position(|(i, candidate)| !used[i] && candidate == child);
            match found {
                Some(i) => {
                    used[i] = true;
                    true
                }
                None => false,
            }
        })
    }
}

impl FromIterator<Filter> for FilterGroup {
    /// Collect into an AND group.
    fn from_iter<I: IntoIterator<Item = Filter>>(iter: I) -> Self {
        Self {
            children: iter.into_iter().collect(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardId;
    use crate::filter::leaf::{LeafFilter, NumberFilter};
    use crate::filter::{Comparison, FilterAttribute};

    fn all() -> Filter {
        Filter::Leaf(LeafFilter::Binary(true))
    }

    fn none() -> Filter {
        Filter::Leaf(LeafFilter::Binary(false))
    }

    #[test]
    fn test_empty_groups() {
        let card = Card::new(CardId::new("1"), "Test");
        assert!(FilterGroup::new(GroupMode::And).test(&card));
        assert!(!FilterGroup::new(GroupMode::Or).test(&card));
        assert!(FilterGroup::new(GroupMode::Nor).test(&card));
    }

    #[test]
    fn test_modes() {
        let card = Card::new(CardId::new("1"), "Test");
        let mixed = |mode| FilterGroup::new(mode).with_child(all()).with_child(none());
        assert!(!mixed(GroupMode::And).test(&card));
        assert!(mixed(GroupMode::Or).test(&card));
        assert!(!mixed(GroupMode::Nor).test(&card));
    }

    #[test]
    fn test_mode_keywords() {
        assert_eq!("and".parse::<GroupMode>().unwrap(), GroupMode::And);
        assert_eq!("NoR".parse::<GroupMode>().unwrap(), GroupMode::Nor);
        assert!(matches!(
            "XOR".parse::<GroupMode>(),
            Err(ParseError::UnknownMode(_))
        ));
    }

    #[test]
    fn test_equality_ignores_order_and_comment() {
        let a = FilterGroup::new(GroupMode::Or)
            .with_child(all())
            .with_child(none())
            .with_comment("first");
        let b = FilterGroup::new(GroupMode::Or).with_child(none()).with_child(all());
        assert_eq!(a, b);

        let mut c = b.clone();
        c.mode = GroupMode::And;
        assert_ne!(a, c);
    }

    #[test]
    fn test_equality_counts_duplicates() {
        let a = FilterGroup::new(GroupMode::And)
            .with_child(all())
            .with_child(all())
            .with_child(none());
        let b = FilterGroup::new(GroupMode::And)
            .with_child(all())
            .with_child(none())
            .with_child(none());
        assert_ne!(a, b);
    }

    #[test]
    fn test_insert_clamps() {
        let mut group = FilterGroup::new(GroupMode::And).with_child(all());
        group.insert(10, none());
        group.insert(0, FilterAttribute::Name.default_leaf());
        let kinds: Vec<_> = group.children().iter().map(Filter::kind).collect();
        assert_eq!(kinds, vec!["n", "*", "0"]);
    }

    #[test]
    fn test_detach_and_promote() {
        let leaf = LeafFilter::Number(NumberFilter::new().with(Comparison::Ge, 2.0));
        let mut group = FilterGroup::new(GroupMode::And).with_child(leaf.clone());
        assert!(!group.promote(1, GroupMode::Or));
        assert!(group.promote(0, GroupMode::Or));

        let inner = group.children()[0].as_group().unwrap();
        assert_eq!(inner.mode, GroupMode::Or);
        assert_eq!(inner.children(), &[Filter::Leaf(leaf)]);

        assert!(group.detach(3).is_none());
        assert!(group.detach(0).is_some());
        assert!(group.is_empty());
    }
}
