//! Codec tests.
//!
//! Every filter must survive each persisted form unchanged:
//! - Text form (`to_text` / `from_text`)
//! - Binary form (`to_binary` / `from_binary`)
//! - Tree form (`to_tree` / `from_tree`)
//!
//! Plus the error cases each decoder reports.

use proptest::prelude::*;
use serde_json::json;

use card_filter::cards::{ColorSet, ManaCost};
use card_filter::filter::{
    ColorFilter, LegalityFilter, ManaCostFilter, NumberFilter, OptionsFilter, TextFilter,
    TypeLineFilter, VariableNumberFilter,
};
use card_filter::{
    Comparison, Containment, DecodeError, Filter, FilterAttribute, FilterGroup, GroupMode,
    LeafFilter, ParseError, MAX_DEPTH,
};

// === Strategies ===

fn containment() -> impl Strategy<Value = Containment> {
    prop::sample::select(Containment::ALL.to_vec())
}

fn comparison() -> impl Strategy<Value = Comparison> {
    prop::sample::select(Comparison::ALL.to_vec())
}

fn mode() -> impl Strategy<Value = GroupMode> {
    prop::sample::select(GroupMode::ALL.to_vec())
}

/// Small quarters plus arbitrary, extreme and non-finite values.
fn operand() -> impl Strategy<Value = f64> {
    prop_oneof![
        3 => (-40i32..40).prop_map(|n| f64::from(n) / 4.0),
        2 => any::<f64>(),
        1 => prop::sample::select(vec![
            f64::INFINITY,
            f64::NEG_INFINITY,
            f64::MAX,
            f64::MIN,
            f64::MIN_POSITIVE,
            f64::NAN,
        ]),
    ]
}

/// Text including every character the text form escapes.
fn text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ,:{}*\"/«»\\\\]{0,12}"
}

fn values() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(text(), 0..4)
}

fn attribute_of(shape: fn(FilterAttribute) -> bool) -> impl Strategy<Value = FilterAttribute> {
    let attributes: Vec<_> = FilterAttribute::ALL.into_iter().filter(|a| shape(*a)).collect();
    prop::sample::select(attributes)
}

fn leaf() -> impl Strategy<Value = LeafFilter> {
    prop_oneof![
        (
            attribute_of(|a| TextFilter::new(a).is_some()),
            containment(),
            text(),
            any::<bool>()
        )
            .prop_map(|(attribute, contain, text, regex)| {
                LeafFilter::Text(
                    TextFilter::new(attribute)
                        .unwrap()
                        .with_containment(contain)
                        .with_text(text)
                        .with_regex(regex),
                )
            }),
        (
            attribute_of(|a| OptionsFilter::new(a).is_some()),
            containment(),
            values()
        )
            .prop_map(|(attribute, contain, values)| {
                let leaf = OptionsFilter::new(attribute).unwrap().with_containment(contain);
                LeafFilter::Options(values.into_iter().fold(leaf, |leaf, v| leaf.with_selected(v)))
            }),
        (containment(), values(), any::<bool>()).prop_map(|(contain, values, restricted)| {
            let leaf = LegalityFilter::new()
                .with_containment(contain)
                .with_restricted(restricted);
            LeafFilter::Legality(values.into_iter().fold(leaf, |leaf, v| leaf.with_format(v)))
        }),
        (comparison(), operand())
            .prop_map(|(op, operand)| LeafFilter::Number(NumberFilter::new().with(op, operand))),
        (
            attribute_of(|a| VariableNumberFilter::new(a).is_some()),
            any::<bool>(),
            comparison(),
            operand()
        )
            .prop_map(|(attribute, varies, op, operand)| {
                LeafFilter::VariableNumber(
                    VariableNumberFilter::new(attribute)
                        .unwrap()
                        .with_varies(varies)
                        .with(op, operand),
                )
            }),
        (
            containment(),
            prop::sample::select(vec!["", "{R}", "{2}{W}{W}", "{X}{U/B}", "{G/P}{C}"])
        )
            .prop_map(|(contain, cost)| {
                LeafFilter::ManaCost(
                    ManaCostFilter::new()
                        .with_containment(contain)
                        .with_cost(cost.parse::<ManaCost>().unwrap()),
                )
            }),
        (
            attribute_of(|a| ColorFilter::new(a).is_some()),
            containment(),
            "[WUBRG]{0,5}",
            any::<bool>()
        )
            .prop_map(|(attribute, contain, symbols, multicolored)| {
                LeafFilter::Color(
                    ColorFilter::new(attribute)
                        .unwrap()
                        .with_containment(contain)
                        .with_colors(ColorSet::parse(&symbols).unwrap())
                        .with_multicolored(multicolored),
                )
            }),
        (containment(), text()).prop_map(|(contain, line)| {
            LeafFilter::TypeLine(TypeLineFilter::new().with_containment(contain).with_line(line))
        }),
        any::<bool>().prop_map(LeafFilter::Binary),
    ]
}

fn filter() -> impl Strategy<Value = Filter> {
    leaf().prop_map(Filter::Leaf).prop_recursive(3, 24, 4, |inner| {
        (mode(), text(), prop::collection::vec(inner, 0..4)).prop_map(|(mode, comment, children)| {
            let mut group = FilterGroup::new(mode).with_comment(comment);
            for child in children {
                group.push(child);
            }
            Filter::Group(group)
        })
    })
}

// === Round trips ===

proptest! {
    #[test]
    fn prop_text_round_trip(filter in filter()) {
        let text = filter.to_text();
        let back = Filter::from_text(&text).unwrap();
        prop_assert_eq!(&back, &filter, "text: {}", text);
    }

    #[test]
    fn prop_binary_round_trip(filter in filter()) {
        let bytes = filter.to_binary().unwrap();
        prop_assert_eq!(Filter::from_binary(&bytes).unwrap(), filter);
    }

    #[test]
    fn prop_tree_round_trip(filter in filter()) {
        let tree = filter.to_tree();
        prop_assert_eq!(Filter::from_tree(&tree).unwrap(), filter);
    }

    #[test]
    fn prop_codecs_agree(filter in filter()) {
        let via_text = Filter::from_text(&filter.to_text()).unwrap();
        let via_binary = Filter::from_binary(&via_text.to_binary().unwrap()).unwrap();
        let via_tree = Filter::from_tree(&via_binary.to_tree()).unwrap();
        prop_assert_eq!(via_tree, filter);
    }

    #[test]
    fn prop_truncated_binary_fails(filter in filter(), cut in 1usize..16) {
        let bytes = filter.to_binary().unwrap();
        let keep = bytes.len().saturating_sub(cut);
        prop_assert!(Filter::from_binary(&bytes[..keep]).is_err());
    }
}

/// Comments survive every form even though equality ignores them.
#[test]
fn test_group_comment_preserved() {
    let filter: Filter = FilterGroup::new(GroupMode::Or)
        .with_comment("cheap «burn» \"spells\"")
        .with_child(Filter::all())
        .into();

    let comment = |f: &Filter| f.as_group().unwrap().comment.clone();
    let expected = comment(&filter);
    assert_eq!(comment(&Filter::from_text(&filter.to_text()).unwrap()), expected);
    assert_eq!(comment(&Filter::from_binary(&filter.to_binary().unwrap()).unwrap()), expected);
    assert_eq!(comment(&Filter::from_tree(&filter.to_tree()).unwrap()), expected);
}

#[test]
fn test_nan_operand() {
    let filter: Filter = LeafFilter::Number(NumberFilter::new().with(Comparison::Eq, f64::NAN)).into();
    let tree = filter.to_tree();
    assert!(tree["fields"]["operand"].is_null());
    assert_eq!(Filter::from_tree(&tree).unwrap(), filter);
    assert_eq!(Filter::from_binary(&filter.to_binary().unwrap()).unwrap(), filter);
}

#[test]
fn test_infinite_operand() {
    for operand in [f64::INFINITY, f64::NEG_INFINITY] {
        let filter: Filter = LeafFilter::Number(NumberFilter::new().with(Comparison::Lt, operand)).into();
        let tree = filter.to_tree();
        assert_ne!(tree["fields"]["operand"], serde_json::Value::Null);
        assert_eq!(Filter::from_tree(&tree).unwrap(), filter);
        assert_eq!(Filter::from_text(&filter.to_text()).unwrap(), filter);
        assert_eq!(Filter::from_binary(&filter.to_binary().unwrap()).unwrap(), filter);
    }
}

/// Nesting past the limit is an error in every form, never a crash.
#[test]
fn test_deep_nesting_rejected() {
    let depth = MAX_DEPTH * 4;
    let text = "«AND ".repeat(depth) + &"»".repeat(depth);
    assert!(Filter::from_text(&text).is_err());
    assert!(Filter::from_text(&("«AND ".repeat(100_000) + &"»".repeat(100_000))).is_err());

    let mut filter = Filter::all();
    for _ in 0..depth {
        filter = FilterGroup::new(GroupMode::And).with_child(filter).into();
    }
    assert!(Filter::from_binary(&filter.to_binary().unwrap()).is_err());
    assert!(Filter::from_tree(&filter.to_tree()).is_err());
}

#[test]
fn test_forged_binary_length() {
    let bytes = [&u64::MAX.to_le_bytes()[..], b"x"].concat();
    assert!(matches!(Filter::from_binary(&bytes), Err(DecodeError::Binary(_))));
}

// === Text errors ===

#[test]
fn test_text_errors() {
    assert_eq!(Filter::from_text(""), Err(ParseError::Empty));
    assert_eq!(Filter::from_text("«AND»»"), Err(ParseError::Unbalanced { offset: 7 }));
    assert!(matches!(
        Filter::from_text("«AND «cmc:=1»"),
        Err(ParseError::Unbalanced { .. })
    ));
    assert_eq!(
        Filter::from_text("«zz:\"x\"»"),
        Err(ParseError::UnknownAttribute("zz".into()))
    );
    assert_eq!(Filter::from_text("«XOR»"), Err(ParseError::UnknownMode("XOR".into())));
    assert!(matches!(
        Filter::from_text("«n:sometimes\"x\"»"),
        Err(ParseError::Containment(_))
    ));
    assert!(matches!(
        Filter::from_text("«cmc:~3»"),
        Err(ParseError::Comparison(_))
    ));
    assert!(matches!(
        Filter::from_text("«cmc:=three»"),
        Err(ParseError::MalformedBody { .. })
    ));
    assert!(matches!(
        Filter::from_text("«AND «n:\"x\"» «cmc:=one»»"),
        Err(ParseError::Child { index: 1, .. })
    ));
}

// === Binary and tree errors ===

#[test]
fn test_binary_unknown_discriminator() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&4u64.to_le_bytes());
    bytes.extend_from_slice(b"nope");
    assert!(matches!(
        Filter::from_binary(&bytes),
        Err(DecodeError::UnknownDiscriminator(tag)) if tag == "nope"
    ));
}

#[test]
fn test_tree_errors() {
    assert!(matches!(
        Filter::from_tree(&json!({ "type": "zz", "fields": {} })),
        Err(DecodeError::UnknownDiscriminator(_))
    ));
    assert!(matches!(
        Filter::from_tree(&json!({ "type": "cmc", "fields": { "operation": "=" } })),
        Err(DecodeError::MissingField(field)) if field == "operand"
    ));
    assert!(matches!(
        Filter::from_tree(&json!({ "type": "cmc", "fields": { "operation": "=", "operand": "one" } })),
        Err(DecodeError::TypeMismatch { .. })
    ));
    assert!(matches!(
        Filter::from_tree(&json!({
            "type": "GROUP",
            "fields": { "mode": "AND", "children": [{ "type": "??", "fields": {} }] }
        })),
        Err(DecodeError::Child { index: 0, .. })
    ));
}

#[test]
fn test_tree_shape() {
    let filter: Filter = "«AND \"note\" «x:anyof{\"Alpha\"}» «cmc:>=3»»".parse().unwrap();
    assert_eq!(
        filter.to_tree(),
        json!({
            "type": "GROUP",
            "fields": {
                "mode": "AND",
                "comment": "note",
                "children": [
                    { "type": "x", "fields": { "contains": "anyof", "selected": ["Alpha"] } },
                    { "type": "cmc", "fields": { "operation": ">=", "operand": 3.0 } }
                ]
            }
        })
    );
}
