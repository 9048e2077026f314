//! Fixed-layout binary form.
//!
//! Values are written one at a time with bincode's fixed-width,
//! little-endian encoding. A filter starts with its discriminator string:
//! the attribute code for a leaf, `GROUP` for a group. A leaf continues
//! with its schema fields in table order; a group with its mode keyword,
//! comment, child count (`u32`) and children.
//!
//! Decoding reads from a byte slice. Every length prefix is checked
//! against the bytes left in the slice, and groups nest at most
//! [`MAX_DEPTH`] levels.

use std::collections::BTreeSet;
use std::io::Write;

use bincode::Options;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::cards::{ColorSet, ManaCost};
use crate::error::{DecodeError, EncodeError};
use crate::filter::attribute::FilterAttribute;
use crate::filter::comparison::Comparison;
use crate::filter::group::{FilterGroup, GroupMode};
use crate::filter::leaf::LeafFilter;
use crate::filter::schema::{FieldKind, FieldValue};
use crate::filter::{Filter, GROUP_TAG, MAX_DEPTH};

fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
        .allow_trailing_bytes()
}

pub(crate) fn put<W: Write, T: Serialize + ?Sized>(w: &mut W, value: &T) -> Result<(), EncodeError> {
    options().serialize_into(w, value).map_err(EncodeError)
}

/// Decode one value from the front of `r` and advance past it.
pub(crate) fn get<T: DeserializeOwned>(r: &mut &[u8]) -> Result<T, DecodeError> {
    let limit = r.len() as u64;
    Ok(options().with_limit(limit).deserialize_from(r)?)
}

pub(crate) fn write_filter<W: Write>(w: &mut W, filter: &Filter) -> Result<(), EncodeError> {
    match filter {
        Filter::Group(group) => {
            put(w, GROUP_TAG)?;
            put(w, group.mode.keyword())?;
            put(w, &group.comment)?;
            put(w, &(group.len() as u32))?;
            for child in group.children() {
                write_filter(w, child)?;
            }
        }
        Filter::Leaf(leaf) => {
            put(w, leaf.attribute().code())?;
            for value in leaf.to_fields() {
                write_field(w, &value)?;
            }
        }
    }
    Ok(())
}

fn write_field<W: Write>(w: &mut W, value: &FieldValue) -> Result<(), EncodeError> {
    match value {
        FieldValue::Containment(contain) => put(w, contain.code()),
        FieldValue::Comparison(operation) => put(w, &operation.wire()),
        FieldValue::Bool(flag) => put(w, flag),
        FieldValue::Number(number) => put(w, number),
        FieldValue::Text(text) => put(w, text),
        FieldValue::Values(values) => put(w, values),
        FieldValue::ManaCost(cost) => put(w, &cost.to_string()),
        FieldValue::Colors(colors) => put(w, &colors.to_string()),
    }
}

pub(crate) fn read_filter(r: &mut &[u8]) -> Result<Filter, DecodeError> {
    read_node(r, 0)
}

fn read_node(r: &mut &[u8], depth: usize) -> Result<Filter, DecodeError> {
    let tag: String = get(r)?;
    if tag == GROUP_TAG {
        if depth >= MAX_DEPTH {
            return Err(DecodeError::TooDeep(MAX_DEPTH));
        }
        return read_group(r, depth + 1).map(Filter::Group);
    }

    let attribute =
        FilterAttribute::from_code(&tag).ok_or(DecodeError::UnknownDiscriminator(tag))?;
    let values = attribute
        .shape()
        .fields()
        .iter()
        .map(|spec| read_field(r, spec.kind))
        .collect::<Result<Vec<_>, _>>()?;
    LeafFilter::from_fields(attribute, values).map(Filter::Leaf)
}

fn read_group(r: &mut &[u8], depth: usize) -> Result<FilterGroup, DecodeError> {
    let keyword: String = get(r)?;
    let mode = keyword
        .parse::<GroupMode>()
        .map_err(|_| DecodeError::Invalid(format!("unknown group mode {keyword:?}")))?;
    let mut group = FilterGroup::new(mode).with_comment(get::<String>(r)?);

    let count: u32 = get(r)?;
    for index in 0..count as usize {
        let child = read_node(r, depth).map_err(|source| DecodeError::Child {
            index,
            source: Box::new(source),
        })?;
        group.push(child);
    }
    Ok(group)
}

fn read_field(r: &mut &[u8], kind: FieldKind) -> Result<FieldValue, DecodeError> {
    Ok(match kind {
        FieldKind::Containment => FieldValue::Containment(get::<String>(r)?.parse()?),
        FieldKind::Comparison => FieldValue::Comparison(Comparison::from_wire(get(r)?)?),
        FieldKind::Bool => FieldValue::Bool(get(r)?),
        FieldKind::Number => FieldValue::Number(get(r)?),
        FieldKind::Text => FieldValue::Text(get(r)?),
        FieldKind::Values => FieldValue::Values(get::<BTreeSet<String>>(r)?),
        FieldKind::ManaCost => FieldValue::ManaCost(get::<String>(r)?.parse::<ManaCost>()?),
        FieldKind::Colors => {
            let symbols: String = get(r)?;
            let colors = ColorSet::parse(&symbols)
                .ok_or_else(|| DecodeError::Invalid(format!("invalid colors {symbols:?}")))?;
            FieldValue::Colors(colors)
        }
    })
}
