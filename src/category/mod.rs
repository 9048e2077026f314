//! Categories: a filter plus manual overrides.
//!
//! A category decides membership with its filter, except that whitelisted
//! cards are always members and blacklisted cards never are. The two
//! lists are disjoint. Every state change notifies the registered
//! listeners with before/after snapshots.
//!
//! ## Key Types
//!
//! - `CategorySpec`: Name, color, filter, whitelist, blacklist, listeners
//! - `CategoryEvent`: Snapshot pair delivered to listeners
//! - `Rgb`: Display color

mod codec;
mod color;
mod event;

pub use color::Rgb;
pub use event::{CategoryEvent, ListenerId};

use std::fmt;
use std::rc::Rc;

use im::OrdSet;

use crate::cards::{Card, CardId};
use crate::filter::Filter;

use event::Listener;

/// A named, colored card category.
///
/// Listeners hold `Rc`s, so a category stays on the thread that built it.
/// `Clone` (and [`copy`](Self::copy)) yields an independent category with
/// no listeners.
///
/// ## Usage
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// use card_filter::cards::{Card, CardId};
/// use card_filter::{CategorySpec, Filter};
///
/// let mut burn = CategorySpec::new("Burn").with_filter(Filter::none());
/// let events = Rc::new(Cell::new(0));
/// let counter = Rc::clone(&events);
/// burn.add_listener(move |_| counter.set(counter.get() + 1));
///
/// let bolt = Card::new(CardId::new("lea-161"), "Lightning Bolt");
/// assert!(burn.include(&bolt));
/// assert!(burn.includes(&bolt));
/// assert!(!burn.include(&bolt));
/// assert_eq!(events.get(), 1);
/// ```
pub struct CategorySpec {
    name: String,
    color: Rgb,
    filter: Filter,
    whitelist: OrdSet<CardId>,
    blacklist: OrdSet<CardId>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u32,
}

impl CategorySpec {
    /// A category that matches every card.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: Rgb::BLACK,
            filter: Filter::all(),
            whitelist: OrdSet::new(),
            blacklist: OrdSet::new(),
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn color(&self) -> Rgb {
        self.color
    }

    #[must_use]
    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    #[must_use]
    pub fn whitelist(&self) -> &OrdSet<CardId> {
        &self.whitelist
    }

    #[must_use]
    pub fn blacklist(&self) -> &OrdSet<CardId> {
        &self.blacklist
    }

    /// An independent copy without listeners.
    #[must_use]
    pub fn copy(&self) -> Self {
        Self {
            name: self.name.clone(),
            color: self.color,
            filter: self.filter.clone(),
            whitelist: self.whitelist.clone(),
            blacklist: self.blacklist.clone(),
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    // === Membership ===

    /// Whether `card` belongs to the category.
    ///
    /// The blacklist wins over both the whitelist and the filter.
    #[must_use]
    pub fn includes(&self, card: &Card) -> bool {
        !self.blacklist.contains(&card.id)
            && (self.whitelist.contains(&card.id) || self.filter.test(card))
    }

    /// Members of the category among `cards`.
    pub fn matching<'a, I>(&'a self, cards: I) -> impl Iterator<Item = &'a Card> + 'a
    where
        I: IntoIterator<Item = &'a Card>,
        I::IntoIter: 'a,
    {
        cards.into_iter().filter(move |card| self.includes(card))
    }

    /// Make `card` a member.
    ///
    /// The card is whitelisted only if the filter does not already match
    /// it, and is always lifted from the blacklist. Returns whether
    /// anything changed.
    pub fn include(&mut self, card: &Card) -> bool {
        let id = &card.id;
        let whitelist = !self.filter.test(card) && !self.whitelist.contains(id);
        let lift = self.blacklist.contains(id);
        if !whitelist && !lift {
            return false;
        }

        let before = self.copy();
        if whitelist {
            self.whitelist.insert(id.clone());
        }
        self.blacklist.remove(id);
        self.changed(before);
        true
    }

    /// Remove `card` from the category.
    ///
    /// The card is blacklisted only if the filter matches it, and is
    /// always lifted from the whitelist. Returns whether anything changed.
    pub fn exclude(&mut self, card: &Card) -> bool {
        let id = &card.id;
        let blacklist = self.filter.test(card) && !self.blacklist.contains(id);
        let lift = self.whitelist.contains(id);
        if !blacklist && !lift {
            return false;
        }

        let before = self.copy();
        if blacklist {
            self.blacklist.insert(id.clone());
        }
        self.whitelist.remove(id);
        self.changed(before);
        true
    }

    // === Setters ===

    /// Rename; returns `false` (and notifies nobody) if the name is unchanged.
    pub fn set_name(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if name == self.name {
            return false;
        }
        let before = self.copy();
        self.name = name;
        self.changed(before);
        true
    }

    pub fn set_color(&mut self, color: Rgb) -> bool {
        if color == self.color {
            return false;
        }
        let before = self.copy();
        self.color = color;
        self.changed(before);
        true
    }

    /// Replace the filter if it differs structurally from the current one.
    pub fn set_filter(&mut self, filter: Filter) -> bool {
        if filter == self.filter {
            return false;
        }
        let before = self.copy();
        self.filter = filter;
        self.changed(before);
        true
    }

    // === Listeners ===

    pub fn add_listener<F>(&mut self, listener: F) -> ListenerId
    where
        F: Fn(&CategoryEvent) + 'static,
    {
        let id = ListenerId::new(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Rc::new(listener)));
        id
    }

    /// Returns whether `id` was registered.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let count = self.listeners.len();
        self.listeners.retain(|(registered, _)| *registered != id);
        self.listeners.len() != count
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Notify a snapshot of the listener list about one change.
    fn changed(&self, before: CategorySpec) {
        tracing::debug!(
            "Category {:?} changed, notifying {} listeners",
            self.name,
            self.listeners.len()
        );
        if self.listeners.is_empty() {
            return;
        }

        let event = CategoryEvent {
            before,
            after: self.copy(),
        };
        let listeners: Vec<Listener> = self.listeners.iter().map(|(_, l)| Rc::clone(l)).collect();
        for listener in listeners {
            listener(&event);
        }
    }
}

impl Default for CategorySpec {
    fn default() -> Self {
        Self::new("")
    }
}

impl Clone for CategorySpec {
    fn clone(&self) -> Self {
        self.copy()
    }
}

impl PartialEq for CategorySpec {
    /// Listeners do not take part in equality.
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.color == other.color
            && self.filter == other.filter
            && self.whitelist == other.whitelist
            && self.blacklist == other.blacklist
    }
}

impl fmt::Debug for CategorySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CategorySpec")
            .field("name", &self.name)
            .field("color", &self.color)
            .field("filter", &self.filter)
            .field("whitelist", &self.whitelist)
            .field("blacklist", &self.blacklist)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
