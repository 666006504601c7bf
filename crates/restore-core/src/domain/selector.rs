//! LabelSelector - Kubernetes label selector
//!
//! InMemoryCluster ではこの型でオブジェクトを絞り込みます。
//! equality-based（`=`, `==`, `!=`）と set-based（`in`, `notin`, `key`, `!key`）
//! の両方を kubectl と同じ文法で受け付けます。

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// One term of a selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    Equals { key: String, value: String },
    NotEquals { key: String, value: String },
    In { key: String, values: BTreeSet<String> },
    NotIn { key: String, values: BTreeSet<String> },
    Exists { key: String },
    NotExists { key: String },
}

impl Requirement {
    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        match self {
            Requirement::Equals { key, value } => labels.get(key) == Some(value),
            Requirement::NotEquals { key, value } => labels.get(key) != Some(value),
            Requirement::In { key, values } => labels.get(key).is_some_and(|v| values.contains(v)),
            Requirement::NotIn { key, values } => !labels.get(key).is_some_and(|v| values.contains(v)),
            Requirement::Exists { key } => labels.contains_key(key),
            Requirement::NotExists { key } => !labels.contains_key(key),
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |values: &BTreeSet<String>| values.iter().cloned().collect::<Vec<_>>().join(",");
        match self {
            Requirement::Equals { key, value } => write!(f, "{key}={value}"),
            Requirement::NotEquals { key, value } => write!(f, "{key}!={value}"),
            Requirement::In { key, values } => write!(f, "{key} in ({})", join(values)),
            Requirement::NotIn { key, values } => write!(f, "{key} notin ({})", join(values)),
            Requirement::Exists { key } => write!(f, "{key}"),
            Requirement::NotExists { key } => write!(f, "!{key}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("selector term '{0}' has an invalid operator")]
    InvalidOperator(String),

    #[error("selector term '{0}' has an empty key")]
    EmptyKey(String),

    #[error("selector term '{0}' has an unbalanced or empty value set")]
    InvalidValueSet(String),
}

/// Parsed selector. All requirements must hold (logical AND).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSelector {
    requirements: Vec<Requirement>,
}

impl LabelSelector {
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let mut requirements = Vec::new();
        for term in split_terms(input)? {
            requirements.push(parse_term(term)?);
        }
        Ok(Self { requirements })
    }

    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    /// An empty selector matches everything.
    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        self.requirements.iter().all(|r| r.matches(labels))
    }
}

impl FromStr for LabelSelector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for LabelSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, requirement) in self.requirements.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{requirement}")?;
        }
        Ok(())
    }
}

/// Splits on commas outside `( ... )`.
fn split_terms(input: &str) -> Result<Vec<&str>, SelectorError> {
    let mut terms = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in input.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| SelectorError::InvalidValueSet(input[start..=i].trim().to_string()))?;
            }
            ',' if depth == 0 => {
                terms.push(input[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(SelectorError::InvalidValueSet(input[start..].trim().to_string()));
    }
    terms.push(input[start..].trim());
    Ok(terms.into_iter().filter(|t| !t.is_empty()).collect())
}

fn parse_term(term: &str) -> Result<Requirement, SelectorError> {
    // `!=` を先に見る（`=` で切ると key に `!` が残る）
    if let Some((k, v)) = term.split_once("!=") {
        let key = parse_key(k, term)?;
        return Ok(Requirement::NotEquals { key, value: v.trim().to_string() });
    }
    if let Some((k, v)) = term.split_once("==").or_else(|| term.split_once('=')) {
        let key = parse_key(k, term)?;
        return Ok(Requirement::Equals { key, value: v.trim().to_string() });
    }
    if let Some(open) = term.find('(') {
        let mut words = term[..open].split_whitespace();
        let (key, op) = match (words.next(), words.next(), words.next()) {
            (Some(key), Some(op), None) => (key, op),
            _ => return Err(SelectorError::InvalidOperator(term.to_string())),
        };
        let key = parse_key(key, term)?;
        let values = parse_value_set(&term[open..], term)?;
        return match op {
            "in" => Ok(Requirement::In { key, values }),
            "notin" => Ok(Requirement::NotIn { key, values }),
            _ => Err(SelectorError::InvalidOperator(term.to_string())),
        };
    }
    if let Some(key) = term.strip_prefix('!') {
        return Ok(Requirement::NotExists { key: parse_bare_key(key, term)? });
    }
    Ok(Requirement::Exists { key: parse_bare_key(term, term)? })
}

fn parse_key(key: &str, term: &str) -> Result<String, SelectorError> {
    let key = key.trim();
    if key.is_empty() {
        return Err(SelectorError::EmptyKey(term.to_string()));
    }
    Ok(key.to_string())
}

/// A bare key may not contain whitespace (`STATUS DEPLOYED` is a typo, not a key).
fn parse_bare_key(key: &str, term: &str) -> Result<String, SelectorError> {
    let key = parse_key(key, term)?;
    if key.contains(char::is_whitespace) {
        return Err(SelectorError::InvalidOperator(term.to_string()));
    }
    Ok(key)
}

fn parse_value_set(set: &str, term: &str) -> Result<BTreeSet<String>, SelectorError> {
    let inner = set
        .trim()
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| SelectorError::InvalidValueSet(term.to_string()))?;
    let values: BTreeSet<String> = inner
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect();
    if values.is_empty() {
        return Err(SelectorError::InvalidValueSet(term.to_string()));
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn labels(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn parses_default_tiller_label() {
        let selector = LabelSelector::parse("OWNER=TILLER,STATUS=DEPLOYED").unwrap();
        assert_eq!(selector.requirements().len(), 2);
        assert_eq!(selector.to_string(), "OWNER=TILLER,STATUS=DEPLOYED");
    }

    #[rstest]
    #[case::all_equal("OWNER=TILLER,STATUS=DEPLOYED", true)]
    #[case::double_equals("STATUS==DEPLOYED", true)]
    #[case::value_differs("STATUS=SUPERSEDED", false)]
    #[case::missing_key("NAME=myapp", false)]
    #[case::not_equals("STATUS!=FAILED", true)]
    #[case::not_equals_hit("STATUS!=DEPLOYED", false)]
    #[case::empty("", true)]
    #[case::in_set("OWNER=TILLER,STATUS in (DEPLOYED,FAILED)", true)]
    #[case::in_set_miss("STATUS in (FAILED, SUPERSEDED)", false)]
    #[case::notin_set("STATUS notin (FAILED)", true)]
    #[case::notin_set_hit("STATUS notin (DEPLOYED)", false)]
    #[case::notin_missing_key("NAME notin (myapp)", true)]
    #[case::exists("OWNER", true)]
    #[case::exists_miss("NAME", false)]
    #[case::not_exists("!NAME", true)]
    #[case::not_exists_hit("!OWNER", false)]
    fn matches_labels(#[case] selector: &str, #[case] expected: bool) {
        let selector = LabelSelector::parse(selector).unwrap();
        let labels = labels(&[("OWNER", "TILLER"), ("STATUS", "DEPLOYED")]);
        assert_eq!(selector.matches(&labels), expected);
    }

    #[test]
    fn set_based_terms_keep_their_commas() {
        let selector = LabelSelector::parse("OWNER=TILLER,STATUS in (DEPLOYED,FAILED)").unwrap();
        assert_eq!(selector.requirements().len(), 2);
        assert_eq!(selector.to_string(), "OWNER=TILLER,STATUS in (DEPLOYED,FAILED)");
    }

    #[rstest]
    #[case::unknown_operator("STATUS within (DEPLOYED)")]
    #[case::spaced_bare_key("STATUS DEPLOYED")]
    fn rejects_invalid_operator(#[case] input: &str) {
        let err = LabelSelector::parse(input).unwrap_err();
        assert_eq!(err, SelectorError::InvalidOperator(input.to_string()));
    }

    #[rstest]
    #[case::unclosed("STATUS in (DEPLOYED")]
    #[case::stray_close("STATUS in DEPLOYED)")]
    #[case::empty_set("STATUS in ()")]
    fn rejects_bad_value_set(#[case] input: &str) {
        let err = LabelSelector::parse(input).unwrap_err();
        assert!(matches!(err, SelectorError::InvalidValueSet(_)), "{err:?}");
    }

    #[test]
    fn rejects_empty_key() {
        let err = LabelSelector::parse("=TILLER").unwrap_err();
        assert!(matches!(err, SelectorError::EmptyKey(_)));
    }
}
