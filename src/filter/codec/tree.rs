//! Structured JSON tree form.
//!
//! ```json
//! {"type": "GROUP", "fields": {"mode": "AND", "comment": "", "children": [
//!     {"type": "cmc", "fields": {"operation": "<=", "operand": 2.0}}
//! ]}}
//! ```
//!
//! Leaf fields are keyed by their schema names. A NaN operand is written
//! as `null` and `null` reads back as NaN. Infinite operands are written
//! as the strings `"inf"` and `"-inf"`.

use serde_json::{json, Map, Value};

use crate::cards::{ColorSet, ManaCost};
use crate::error::DecodeError;
use crate::filter::attribute::FilterAttribute;
use crate::filter::comparison::Comparison;
use crate::filter::containment::Containment;
use crate::filter::group::{FilterGroup, GroupMode};
use crate::filter::leaf::LeafFilter;
use crate::filter::schema::{FieldKind, FieldSpec, FieldValue};
use crate::filter::{Filter, GROUP_TAG, MAX_DEPTH};

const INFINITY: &str = "inf";
const NEG_INFINITY: &str = "-inf";

pub(crate) fn encode(filter: &Filter) -> Value {
    match filter {
        Filter::Group(group) => json!({
            "type": GROUP_TAG,
            "fields": {
                "mode": group.mode.keyword(),
                "comment": group.comment,
                "children": group.children().iter().map(encode).collect::<Vec<_>>(),
            }
        }),
        Filter::Leaf(leaf) => {
            let specs = leaf.attribute().shape().fields();
            let fields: Map<String, Value> = specs
                .iter()
                .zip(leaf.to_fields())
                .map(|(spec, value)| (spec.name.to_string(), encode_field(value)))
                .collect();
            json!({
                "type": leaf.attribute().code(),
                "fields": fields,
            })
        }
    }
}

fn encode_field(value: FieldValue) -> Value {
    match value {
        FieldValue::Containment(contain) => Value::from(contain.code()),
        FieldValue::Comparison(operation) => Value::from(operation.symbol()),
        FieldValue::Bool(flag) => Value::from(flag),
        FieldValue::Number(number) if number.is_nan() => Value::Null,
        FieldValue::Number(number) if number == f64::INFINITY => Value::from(INFINITY),
        FieldValue::Number(number) if number == f64::NEG_INFINITY => Value::from(NEG_INFINITY),
        FieldValue::Number(number) => Value::from(number),
        FieldValue::Text(text) => Value::from(text),
        FieldValue::Values(values) => Value::from(values.into_iter().collect::<Vec<_>>()),
        FieldValue::ManaCost(cost) => Value::from(cost.to_string()),
        FieldValue::Colors(colors) => Value::from(colors.to_string()),
    }
}

pub(crate) fn decode(value: &Value) -> Result<Filter, DecodeError> {
    decode_node(value, 0)
}

fn decode_node(value: &Value, depth: usize) -> Result<Filter, DecodeError> {
    let object = value
        .as_object()
        .ok_or_else(|| DecodeError::mismatch("filter", "an object"))?;
    let tag = object
        .get("type")
        .ok_or_else(|| DecodeError::MissingField("type".into()))?
        .as_str()
        .ok_or_else(|| DecodeError::mismatch("type", "a string"))?;
    let fields = object
        .get("fields")
        .ok_or_else(|| DecodeError::MissingField("fields".into()))?
        .as_object()
        .ok_or_else(|| DecodeError::mismatch("fields", "an object"))?;

    if tag == GROUP_TAG {
        if depth >= MAX_DEPTH {
            return Err(DecodeError::TooDeep(MAX_DEPTH));
        }
        return decode_group(fields, depth + 1).map(Filter::Group);
    }

    let attribute = FilterAttribute::from_code(tag)
        .ok_or_else(|| DecodeError::UnknownDiscriminator(tag.to_string()))?;
    let values = attribute
        .shape()
        .fields()
        .iter()
        .map(|spec| decode_field(fields, spec))
        .collect::<Result<Vec<_>, _>>()?;
    LeafFilter::from_fields(attribute, values).map(Filter::Leaf)
}

fn decode_group(fields: &Map<String, Value>, depth: usize) -> Result<FilterGroup, DecodeError> {
    let mode = string(fields, "mode")?;
    let mode = mode
        .parse::<GroupMode>()
        .map_err(|_| DecodeError::Invalid(format!("unknown group mode {mode:?}")))?;
    let comment = match fields.get("comment") {
        None | Some(Value::Null) => String::new(),
        Some(_) => string(fields, "comment")?.to_string(),
    };
    let children = fields
        .get("children")
        .ok_or_else(|| DecodeError::MissingField("children".into()))?
        .as_array()
        .ok_or_else(|| DecodeError::mismatch("children", "an array"))?;

    let mut group = FilterGroup::new(mode).with_comment(comment);
    for (index, child) in children.iter().enumerate() {
        let child = decode_node(child, depth).map_err(|source| DecodeError::Child {
            index,
            source: Box::new(source),
        })?;
        group.push(child);
    }
    Ok(group)
}

fn string<'v>(fields: &'v Map<String, Value>, name: &str) -> Result<&'v str, DecodeError> {
    fields
        .get(name)
        .ok_or_else(|| DecodeError::MissingField(name.to_string()))?
        .as_str()
        .ok_or_else(|| DecodeError::mismatch(name, FieldKind::Text.describe()))
}

fn decode_field(fields: &Map<String, Value>, spec: &FieldSpec) -> Result<FieldValue, DecodeError> {
    let value = fields
        .get(spec.name)
        .ok_or_else(|| DecodeError::MissingField(spec.name.to_string()))?;
    let mismatch = || DecodeError::mismatch(spec.name, spec.kind.describe());
    let text = || value.as_str().ok_or_else(mismatch);

    Ok(match spec.kind {
        FieldKind::Containment => FieldValue::Containment(text()?.parse::<Containment>()?),
        FieldKind::Comparison => FieldValue::Comparison(text()?.parse::<Comparison>()?),
        FieldKind::Bool => FieldValue::Bool(value.as_bool().ok_or_else(mismatch)?),
        FieldKind::Number => FieldValue::Number(match value {
            Value::Null => f64::NAN,
            Value::String(s) if s == INFINITY => f64::INFINITY,
            Value::String(s) if s == NEG_INFINITY => f64::NEG_INFINITY,
            _ => value.as_f64().ok_or_else(mismatch)?,
        }),
        FieldKind::Text => FieldValue::Text(text()?.to_string()),
        FieldKind::Values => {
            let items = value.as_array().ok_or_else(mismatch)?;
            let values = items
                .iter()
                .map(|item| item.as_str().map(str::to_string).ok_or_else(mismatch))
                .collect::<Result<_, _>>()?;
            FieldValue::Values(values)
        }
        FieldKind::ManaCost => FieldValue::ManaCost(text()?.parse::<ManaCost>()?),
        FieldKind::Colors => FieldValue::Colors(ColorSet::parse(text()?).ok_or_else(mismatch)?),
    })
}
