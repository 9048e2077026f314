//! Free-text leaf: name, rules text, flavor text, artist, collector number.

use once_cell::sync::OnceCell;
use regex::Regex;

use crate::cards::Card;
use crate::error::DecodeError;
use crate::filter::attribute::{AttributeValue, FilterAttribute, LeafShape};
use crate::filter::containment::Containment;
use crate::filter::schema::{field, FieldKind, FieldReader, FieldSpec, FieldValue, LeafSchema};

/// Matches card text against a search string or a regular expression.
///
/// In plain mode the search string is split into quoted phrases and bare
/// words. Each token matches case-insensitively on word boundaries, and
/// `*` inside a token matches any run of word characters. The containment
/// then relates the tokens found on the card to all tokens, except
/// `Exactly`/`NotExactly`, which compare the whole value ignoring case.
///
/// In regex mode the containment is ignored and the card matches if the
/// expression is found anywhere in the value.
#[derive(Clone, Debug)]
pub struct TextFilter {
    attribute: FilterAttribute,
    pub contain: Containment,
    text: String,
    regex: bool,
    matcher: OnceCell<Matcher>,
}

#[derive(Clone, Debug)]
enum Matcher {
    /// `None` when the expression does not compile.
    Regex(Option<Regex>),
    /// One compiled pattern per token, `None` where compiling failed.
    Tokens(Vec<Option<Regex>>),
}

impl TextFilter {
    /// Create a text leaf for a text attribute.
    ///
    /// Returns `None` if `attribute` is not filtered by text.
    #[must_use]
    pub fn new(attribute: FilterAttribute) -> Option<Self> {
        (attribute.shape() == LeafShape::Text).then(|| Self::for_attribute(attribute))
    }

    pub(crate) fn for_attribute(attribute: FilterAttribute) -> Self {
        Self {
            attribute,
            contain: Containment::default(),
            text: String::new(),
            regex: false,
            matcher: OnceCell::new(),
        }
    }

    /// Set the search string (builder pattern).
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    /// Switch to regex mode (builder pattern).
    #[must_use]
    pub fn with_regex(mut self, regex: bool) -> Self {
        self.set_regex(regex);
        self
    }

    #[must_use]
    pub fn with_containment(mut self, contain: Containment) -> Self {
        self.contain = contain;
        self
    }

    #[must_use]
    pub fn attribute(&self) -> FilterAttribute {
        self.attribute
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn is_regex(&self) -> bool {
        self.regex
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.matcher = OnceCell::new();
    }

    pub fn set_regex(&mut self, regex: bool) {
        self.regex = regex;
        self.matcher = OnceCell::new();
    }

    pub fn test(&self, card: &Card) -> bool {
        let AttributeValue::Text(values) = self.attribute.value(card) else {
            return false;
        };

        match self.matcher.get_or_init(|| self.compile()) {
            Matcher::Regex(None) => false,
            Matcher::Regex(Some(re)) => values.iter().any(|v| re.is_match(v)),
            Matcher::Tokens(patterns) => match self.contain {
                Containment::Exactly => self.exact_match(&values),
                Containment::NotExactly => !self.exact_match(&values),
                contain => values.iter().any(|value| {
                    let found = patterns
                        .iter()
                        .enumerate()
                        .filter(|(_, p)| p.as_ref().is_some_and(|re| re.is_match(value)));
                    contain.test(found.map(|(i, _)| i), 0..patterns.len())
                }),
            },
        }
    }

    fn exact_match(&self, values: &[&str]) -> bool {
        values
            .iter()
            .any(|v| v.to_lowercase() == self.text.to_lowercase())
    }

    fn compile(&self) -> Matcher {
        if self.regex {
            let pattern = format!("(?is){}", self.text);
            let compiled = Regex::new(&pattern)
                .map_err(|e| tracing::warn!("Text filter regex {:?} does not compile: {}", self.text, e))
                .ok();
            return Matcher::Regex(compiled);
        }

        let patterns = tokenize(&self.text)
            .iter()
            .map(|token| {
                Regex::new(&token_pattern(token))
                    .map_err(|e| tracing::warn!("Text filter token {:?} does not compile: {}", token, e))
                    .ok()
            })
            .collect();
        Matcher::Tokens(patterns)
    }
}

impl PartialEq for TextFilter {
    fn eq(&self, other: &Self) -> bool {
        self.attribute == other.attribute
            && self.contain == other.contain
            && self.text == other.text
            && self.regex == other.regex
    }
}

/// Split a search string into quoted phrases and bare words.
fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else if c == '"' {
            chars.next();
            let phrase: String = chars.by_ref().take_while(|c| *c != '"').collect();
            if !phrase.trim().is_empty() {
                tokens.push(phrase.trim().to_string());
            }
        } else {
            let mut word = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() {
                    break;
                }
                word.push(c);
                chars.next();
            }
            tokens.push(word);
        }
    }

    tokens
}

/// Case-insensitive whole-word pattern for one token.
fn token_pattern(token: &str) -> String {
    let is_word = |c: char| c.is_alphanumeric() || c == '_' || c == '*';
    let body = token
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\w*");

    let mut pattern = String::from("(?i)");
    if token.starts_with(is_word) {
        pattern.push_str(r"\b");
    }
    pattern.push_str(&body);
    if token.ends_with(is_word) {
        pattern.push_str(r"\b");
    }
    pattern
}

impl LeafSchema for TextFilter {
    const FIELDS: &'static [FieldSpec] = &[
        field("contains", FieldKind::Containment),
        field("regex", FieldKind::Bool),
        field("text", FieldKind::Text),
    ];

    fn to_fields(&self) -> Vec<FieldValue> {
        vec![
            FieldValue::Containment(self.contain),
            FieldValue::Bool(self.regex),
            FieldValue::Text(self.text.clone()),
        ]
    }

    fn from_fields(attribute: FilterAttribute, fields: &mut FieldReader) -> Result<Self, DecodeError> {
        let contain = fields.containment()?;
        let regex = fields.boolean()?;
        let text = fields.text()?;
        Ok(Self::for_attribute(attribute)
            .with_containment(contain)
            .with_regex(regex)
            .with_text(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardFace, CardId};

    fn card(name: &str, text: &str) -> Card {
        Card::new(CardId::new("1"), name).with_rules_text(text)
    }

    fn rules(search: &str, contain: Containment) -> TextFilter {
        TextFilter::for_attribute(FilterAttribute::RulesText)
            .with_text(search)
            .with_containment(contain)
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize(r#"draw "a card" discard"#),
            vec!["draw", "a card", "discard"]
        );
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn test_token_pattern_escapes_and_wildcards() {
        assert_eq!(token_pattern("bolt"), r"(?i)\bbolt\b");
        assert_eq!(token_pattern("goblin*"), r"(?i)\bgoblin\w*\b");
        assert_eq!(token_pattern("+1/+1"), r"(?i)\+1/\+1\b");
    }

    #[test]
    fn test_any_and_all_of_words() {
        let c = card("Divination", "Draw two cards.");
        assert!(rules("draw discard", Containment::AnyOf).test(&c));
        assert!(!rules("draw discard", Containment::AllOf).test(&c));
        assert!(rules("draw cards", Containment::AllOf).test(&c));
        assert!(rules("draw discard", Containment::NotAllOf).test(&c));
        assert!(!rules("scry discard", Containment::NotAllOf).test(&c));
        assert!(rules("scry discard", Containment::NoneOf).test(&c));
    }

    #[test]
    fn test_tokens_match_within_one_face() {
        let fire_ice = Card::with_faces(
            CardId::new("2"),
            [CardFace::new("Fire"), CardFace::new("Ice")],
        )
        .unwrap();
        let name = |search: &str, contain| {
            TextFilter::for_attribute(FilterAttribute::Name)
                .with_text(search)
                .with_containment(contain)
        };
        assert!(!name("fire ice", Containment::AllOf).test(&fire_ice));
        assert!(name("fire", Containment::AllOf).test(&fire_ice));
        assert!(name("fire ice", Containment::AnyOf).test(&fire_ice));
        assert!(name("fire ice", Containment::NotAllOf).test(&fire_ice));
        assert!(!name("fire ice", Containment::NoneOf).test(&fire_ice));
    }

    #[test]
    fn test_whole_words_only() {
        let c = card("Test", "Drawback");
        assert!(!rules("draw", Containment::AnyOf).test(&c));
        assert!(rules("draw*", Containment::AnyOf).test(&c));
    }

    #[test]
    fn test_quoted_phrase() {
        let c = card("Test", "Target creature gets +3/+0 until end of turn.");
        assert!(rules(r#""end of turn""#, Containment::AnyOf).test(&c));
        assert!(!rules(r#""end of combat""#, Containment::AnyOf).test(&c));
    }

    #[test]
    fn test_exactly_ignores_case() {
        let name = TextFilter::for_attribute(FilterAttribute::Name)
            .with_text("lightning bolt")
            .with_containment(Containment::Exactly);
        assert!(name.test(&card("Lightning Bolt", "")));
        assert!(!name.test(&card("Lightning Bolt Jr", "")));

        let mut not_name = name.clone();
        not_name.contain = Containment::NotExactly;
        assert!(!not_name.test(&card("Lightning Bolt", "")));
    }

    #[test]
    fn test_regex_mode() {
        let re = rules(r"deals? \d+ damage", Containment::NoneOf).with_regex(true);
        assert!(re.test(&card("Shock", "Shock deals 2 damage to any target.")));
        assert!(!re.test(&card("Opt", "Scry 1.")));
    }

    #[test]
    fn test_invalid_regex_never_matches() {
        let re = rules("(unclosed", Containment::AnyOf).with_regex(true);
        assert!(!re.test(&card("Test", "(unclosed")));
    }

    #[test]
    fn test_empty_search_matches_everything() {
        assert!(rules("", Containment::AnyOf).test(&card("Test", "anything")));
    }

    #[test]
    fn test_changing_text_recompiles() {
        let c = card("Test", "Flying");
        let mut filter = rules("trample", Containment::AnyOf);
        assert!(!filter.test(&c));
        filter.set_text("flying");
        assert!(filter.test(&c));
    }

    #[test]
    fn test_new_rejects_non_text_attribute() {
        assert!(TextFilter::new(FilterAttribute::ManaValue).is_none());
        assert!(TextFilter::new(FilterAttribute::Artist).is_some());
    }
}
