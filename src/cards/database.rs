//! Card lookup.
//!
//! The filter engine never owns card data. Decoders that read card
//! identifiers (category whitelists and blacklists) resolve them through
//! a [`CardLookup`], which the host application implements over whatever
//! inventory it keeps. `CardDatabase` is the in-memory implementation.

use rustc_hash::FxHashMap;

use super::card::{Card, CardId};
use crate::error::UnknownCardError;

/// Resolves stable card identifiers to cards.
pub trait CardLookup {
    /// Find a card by identifier.
    fn lookup(&self, id: &CardId) -> Option<&Card>;

    /// Find a card, failing with [`UnknownCardError`] if it is missing.
    fn resolve(&self, id: &CardId) -> Result<&Card, UnknownCardError> {
        self.lookup(id).ok_or_else(|| UnknownCardError(id.clone()))
    }
}

impl<L: CardLookup + ?Sized> CardLookup for &L {
    fn lookup(&self, id: &CardId) -> Option<&Card> {
        (**self).lookup(id)
    }
}

/// In-memory card inventory keyed by identifier.
///
/// ## Example
///
/// ```
/// use card_filter::cards::{Card, CardDatabase, CardId, CardLookup};
///
/// let mut db = CardDatabase::new();
/// db.insert(Card::new(CardId::new("lea-161"), "Lightning Bolt"));
///
/// let found = db.lookup(&CardId::new("lea-161")).unwrap();
/// assert_eq!(found.name(), "Lightning Bolt");
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardDatabase {
    cards: FxHashMap<CardId, Card>,
}

impl CardDatabase {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a card, returning the record it replaced.
    ///
    /// Updates re-insert cards under the same identifier.
    pub fn insert(&mut self, card: Card) -> Option<Card> {
        self.cards.insert(card.id.clone(), card)
    }

    pub fn remove(&mut self, id: &CardId) -> Option<Card> {
        self.cards.remove(id)
    }

    #[must_use]
    pub fn get(&self, id: &CardId) -> Option<&Card> {
        self.cards.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &CardId) -> bool {
        self.cards.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.values()
    }

    /// Find cards matching a predicate.
    pub fn find<F>(&self, predicate: F) -> impl Iterator<Item = &Card>
    where
        F: Fn(&Card) -> bool,
    {
        self.cards.values().filter(move |c| predicate(c))
    }
}

impl CardLookup for CardDatabase {
    fn lookup(&self, id: &CardId) -> Option<&Card> {
        self.cards.get(id)
    }
}

impl FromIterator<Card> for CardDatabase {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        let mut db = CardDatabase::new();
        for card in iter {
            db.insert(card);
        }
        db
    }
}
