use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

use crate::rules::{DEFAULT_RULES, Rule};

/// Capitalization style of a matched span. Precedence when classifying:
/// uppercase > titlecase > capitalized > lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseStyle {
    Lowercase,
    Capitalized,
    Titlecase,
    Uppercase,
}

pub fn detect_case_style(text: &str) -> CaseStyle {
    if text == text.to_uppercase() && text != text.to_lowercase() {
        return CaseStyle::Uppercase;
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() > 1
        && words
            .iter()
            .all(|w| w.chars().next().is_some_and(|c| !c.is_lowercase()))
    {
        return CaseStyle::Titlecase;
    }

    let mut chars = text.chars();
    if let Some(first) = chars.next() {
        let rest = chars.as_str();
        if !first.is_lowercase() && rest == rest.to_lowercase() {
            return CaseStyle::Capitalized;
        }
    }

    CaseStyle::Lowercase
}

pub fn apply_case_style(text: &str, style: CaseStyle) -> String {
    match style {
        CaseStyle::Uppercase => text.to_uppercase(),
        CaseStyle::Titlecase => text
            .split_whitespace()
            .map(capitalize_word)
            .collect::<Vec<_>>()
            .join(" "),
        CaseStyle::Capitalized => capitalize_word(text),
        CaseStyle::Lowercase => text.to_lowercase(),
    }
}

fn capitalize_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

const EM_DASH: char = '\u{2014}';
// Em-dash UTF-8 bytes decoded as Windows-1252.
const MOJIBAKE_EM_DASH: &str = "â€”";

static HYPHEN_SPACING: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+-\s+").unwrap());
static MULTI_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").unwrap());
// Article agreement for replacements that swap a consonant-initial word for a
// vowel-initial one ("a cutting-edge" -> "an advanced"). Restricted to a/e/i
// so "a user" and "a one-off" stay untouched.
static ARTICLE_BEFORE_VOWEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([Aa]) ([aeiAEI])").unwrap());

/// Rewrites `text` through the built-in rule table.
pub fn apply_replacements(text: &str) -> String {
    apply_rules(text, &DEFAULT_RULES)
}

/// Rewrites `text` through `rules` in order: em-dash fix first, then one
/// left-to-right pass per rule, then normalization. Deterministic and total;
/// unmatched text passes through unchanged.
pub fn apply_rules(text: &str, rules: &[Rule]) -> String {
    let mut result = text.replace(MOJIBAKE_EM_DASH, " - ").replace(EM_DASH, " - ");

    for rule in rules {
        if let Cow::Owned(replaced) = rule.rewrite(&result) {
            result = replaced;
        }
    }

    let result = HYPHEN_SPACING.replace_all(&result, " - ");
    let result = MULTI_SPACE.replace_all(&result, " ");
    ARTICLE_BEFORE_VOWEL
        .replace_all(&result, "${1}n ${2}")
        .into_owned()
}
