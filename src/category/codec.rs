//! Persisted forms of a category.
//!
//! Binary layout: name, color (`r`, `g`, `b` bytes), whitelist (`u32`
//! count then card ids), blacklist (same), then the filter in its own
//! binary form. The tree form is a JSON object with `name`, `color`
//! (`#rrggbb`), `filter`, `whitelist` and `blacklist`.
//!
//! Decoding resolves every card id through a [`CardLookup`], so a saved
//! category cannot reference cards the inventory no longer has.

use std::io::Write;

use im::OrdSet;
use serde_json::{json, Map, Value};

use super::{CategorySpec, Rgb};
use crate::cards::{CardId, CardLookup};
use crate::error::{DecodeError, EncodeError};
use crate::filter::codec::binary::{get, put, read_filter, write_filter};
use crate::filter::Filter;

impl CategorySpec {
    // === Binary form ===

    pub fn to_binary(&self) -> Result<Vec<u8>, EncodeError> {
        let mut bytes = Vec::new();
        self.write_binary(&mut bytes)?;
        Ok(bytes)
    }

    pub fn write_binary<W: Write>(&self, w: &mut W) -> Result<(), EncodeError> {
        put(w, &self.name)?;
        put(w, &self.color)?;
        write_ids(w, &self.whitelist)?;
        write_ids(w, &self.blacklist)?;
        write_filter(w, &self.filter)
    }

    /// Decode a category that must span all of `bytes`.
    pub fn from_binary<L: CardLookup>(bytes: &[u8], cards: &L) -> Result<Self, DecodeError> {
        let mut rest = bytes;
        let spec = Self::read_binary(&mut rest, cards)?;
        if !rest.is_empty() {
            return Err(DecodeError::TrailingBytes(rest.len()));
        }
        Ok(spec)
    }

    /// Decode one category from the front of `r`, advancing it past the category.
    pub fn read_binary<L: CardLookup>(r: &mut &[u8], cards: &L) -> Result<Self, DecodeError> {
        let name: String = get(r)?;
        let color: Rgb = get(r)?;
        let whitelist = read_ids(r, cards)?;
        let blacklist = read_ids(r, cards)?;
        let filter = read_filter(r)?;
        let spec = assemble(name, color, filter, whitelist, blacklist)?;
        tracing::debug!("Decoded category {:?} from binary", spec.name);
        Ok(spec)
    }

    // === Tree form ===

    #[must_use]
    pub fn to_tree(&self) -> Value {
        json!({
            "name": self.name,
            "color": self.color.to_string(),
            "filter": self.filter.to_tree(),
            "whitelist": id_list(&self.whitelist),
            "blacklist": id_list(&self.blacklist),
        })
    }

    pub fn from_tree<L: CardLookup>(tree: &Value, cards: &L) -> Result<Self, DecodeError> {
        let object = tree
            .as_object()
            .ok_or_else(|| DecodeError::mismatch("category", "an object"))?;

        let name = field(object, "name")?
            .as_str()
            .ok_or_else(|| DecodeError::mismatch("name", "a string"))?
            .to_string();
        let hex = field(object, "color")?
            .as_str()
            .ok_or_else(|| DecodeError::mismatch("color", "a string"))?;
        let color =
            Rgb::from_hex(hex).ok_or_else(|| DecodeError::Invalid(format!("invalid color {hex:?}")))?;
        let filter = Filter::from_tree(field(object, "filter")?)?;
        let whitelist = tree_ids(object, "whitelist", cards)?;
        let blacklist = tree_ids(object, "blacklist", cards)?;

        let spec = assemble(name, color, filter, whitelist, blacklist)?;
        tracing::debug!("Decoded category {:?} from tree", spec.name);
        Ok(spec)
    }
}

fn assemble(
    name: String,
    color: Rgb,
    filter: Filter,
    whitelist: OrdSet<CardId>,
    blacklist: OrdSet<CardId>,
) -> Result<CategorySpec, DecodeError> {
    if let Some(id) = whitelist.iter().find(|id| blacklist.contains(*id)) {
        return Err(DecodeError::Invalid(format!(
            "{id} is both whitelisted and blacklisted"
        )));
    }
    let mut spec = CategorySpec::new(name).with_color(color).with_filter(filter);
    spec.whitelist = whitelist;
    spec.blacklist = blacklist;
    Ok(spec)
}

fn write_ids<W: Write>(w: &mut W, ids: &OrdSet<CardId>) -> Result<(), EncodeError> {
    put(w, &(ids.len() as u32))?;
    for id in ids {
        put(w, id.as_str())?;
    }
    Ok(())
}

fn read_ids<L: CardLookup>(r: &mut &[u8], cards: &L) -> Result<OrdSet<CardId>, DecodeError> {
    let count: u32 = get(r)?;
    let mut ids = OrdSet::new();
    for _ in 0..count {
        let id = CardId::new(get::<String>(r)?);
        ids.insert(cards.resolve(&id)?.id.clone());
    }
    Ok(ids)
}

fn id_list(ids: &OrdSet<CardId>) -> Vec<&str> {
    ids.iter().map(CardId::as_str).collect()
}

fn field<'v>(object: &'v Map<String, Value>, name: &str) -> Result<&'v Value, DecodeError> {
    object
        .get(name)
        .ok_or_else(|| DecodeError::MissingField(name.to_string()))
}

fn tree_ids<L: CardLookup>(
    object: &Map<String, Value>,
    name: &str,
    cards: &L,
) -> Result<OrdSet<CardId>, DecodeError> {
    let items = field(object, name)?
        .as_array()
        .ok_or_else(|| DecodeError::mismatch(name, "an array of card ids"))?;
    let mut ids = OrdSet::new();
    for item in items {
        let id = item
            .as_str()
            .ok_or_else(|| DecodeError::mismatch(name, "an array of card ids"))?;
        ids.insert(cards.resolve(&CardId::new(id))?.id.clone());
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, CardDatabase};
    use crate::filter::{FilterAttribute, LeafFilter, TextFilter};

    fn database() -> CardDatabase {
        ["a", "b", "c"]
            .into_iter()
            .map(|id| Card::new(CardId::new(id), id))
            .collect()
    }

    fn sample(db: &CardDatabase) -> CategorySpec {
        let name = LeafFilter::Text(TextFilter::for_attribute(FilterAttribute::Name).with_text("a"));
        let mut spec = CategorySpec::new("Sample")
            .with_color(Rgb::new(10, 20, 30))
            .with_filter(name.into());
        spec.include(db.lookup(&CardId::new("b")).unwrap());
        spec.exclude(db.lookup(&CardId::new("a")).unwrap());
        spec
    }

    #[test]
    fn test_binary_round_trip() {
        let db = database();
        let spec = sample(&db);
        let bytes = spec.to_binary().unwrap();
        assert_eq!(CategorySpec::from_binary(&bytes, &db).unwrap(), spec);
    }

    #[test]
    fn test_binary_layout_prefix() {
        let spec = CategorySpec::new("X").with_color(Rgb::new(1, 2, 3));
        let bytes = spec.to_binary().unwrap();
        assert_eq!(&bytes[..8], &1u64.to_le_bytes());
        assert_eq!(bytes[8], b'X');
        assert_eq!(&bytes[9..12], &[1, 2, 3]);
        // empty whitelist and blacklist
        assert_eq!(&bytes[12..20], &[0; 8]);
    }

    #[test]
    fn test_forged_length_is_an_error() {
        let db = database();
        let bytes = [&u64::MAX.to_le_bytes()[..], b"x"].concat();
        assert!(matches!(
            CategorySpec::from_binary(&bytes, &db),
            Err(DecodeError::Binary(_))
        ));

        let mut bytes = Vec::new();
        put(&mut bytes, "X").unwrap();
        put(&mut bytes, &Rgb::new(0, 0, 0)).unwrap();
        put(&mut bytes, &u32::MAX).unwrap();
        assert!(CategorySpec::from_binary(&bytes, &db).is_err());
    }

    #[test]
    fn test_read_binary_advances() {
        let db = database();
        let spec = sample(&db);
        let mut bytes = spec.to_binary().unwrap();
        bytes.extend_from_slice(b"tail");
        let mut rest = bytes.as_slice();
        assert_eq!(CategorySpec::read_binary(&mut rest, &db).unwrap(), spec);
        assert_eq!(rest, b"tail");
    }

    #[test]
    fn test_tree_round_trip() {
        let db = database();
        let spec = sample(&db);
        let tree = spec.to_tree();
        assert_eq!(tree["color"], "#0a141e");
        assert_eq!(tree["whitelist"], json!(["b"]));
        assert_eq!(tree["blacklist"], json!(["a"]));
        assert_eq!(CategorySpec::from_tree(&tree, &db).unwrap(), spec);
    }

    #[test]
    fn test_unknown_card() {
        let db = database();
        let mut tree = sample(&db).to_tree();
        tree["whitelist"] = json!(["zzz"]);
        match CategorySpec::from_tree(&tree, &db) {
            Err(DecodeError::UnknownCard(err)) => assert_eq!(err.0, CardId::new("zzz")),
            other => panic!("Expected unknown card, got {:?}", other),
        }

        let bytes = sample(&db).to_binary().unwrap();
        let empty = CardDatabase::new();
        assert!(matches!(
            CategorySpec::from_binary(&bytes, &empty),
            Err(DecodeError::UnknownCard(_))
        ));
    }

    #[test]
    fn test_overlapping_lists_rejected() {
        let db = database();
        let mut tree = CategorySpec::new("X").to_tree();
        tree["whitelist"] = json!(["a"]);
        tree["blacklist"] = json!(["a"]);
        assert!(matches!(
            CategorySpec::from_tree(&tree, &db),
            Err(DecodeError::Invalid(_))
        ));
    }

    #[test]
    fn test_tree_missing_field() {
        let db = database();
        let tree = json!({ "name": "X", "color": "#000000" });
        match CategorySpec::from_tree(&tree, &db) {
            Err(DecodeError::MissingField(name)) => assert_eq!(name, "filter"),
            other => panic!("Expected missing field, got {:?}", other),
        }
    }
}
