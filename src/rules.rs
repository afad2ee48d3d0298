use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::borrow::Cow;

use crate::text::{CaseStyle, apply_case_style, detect_case_style};

/// One entry in the ordered replacement table: a case-insensitive,
/// word-bounded pattern and a pure transform applied to each match.
pub struct Rule {
    pattern: Regex,
    replace: Box<dyn Fn(&str) -> String + Send + Sync>,
}

impl Rule {
    fn new(pattern: &str, replace: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("rule pattern must compile"),
            replace: Box::new(replace),
        }
    }

    /// Single left-to-right pass over `text`; replacement output is not
    /// re-scanned by this rule.
    pub fn rewrite<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.pattern
            .replace_all(text, |caps: &Captures| (self.replace)(&caps[0]))
    }
}

// Surface inflection -> literal replacement, per lemma. A form missing from
// its table falls back to the base replacement.
const UNDERSCORE_FORMS: &[(&str, &str)] = &[
    ("underscores", "highlights"),
    ("underscored", "highlighted"),
    ("underscoring", "highlighting"),
];

const FACILITATE_FORMS: &[(&str, &str)] = &[
    ("facilitate", "enable"),
    ("facilitates", "enables"),
    ("facilitated", "enabled"),
    ("facilitating", "enabling"),
];

const BOLSTER_FORMS: &[(&str, &str)] = &[
    ("bolster", "support"),
    ("bolsters", "supports"),
    ("bolstered", "supported"),
    ("bolstering", "supporting"),
];

const STREAMLINE_FORMS: &[(&str, &str)] = &[
    ("streamline", "simplify"),
    ("streamlines", "simplifies"),
    ("streamlined", "simplified"),
    ("streamlining", "simplifying"),
];

const REVOLUTIONIZE_FORMS: &[(&str, &str)] = &[
    ("revolutionize", "transform"),
    ("revolutionizes", "transforms"),
    ("revolutionized", "transformed"),
    ("revolutionizing", "transforming"),
];

const HARNESS_FORMS: &[(&str, &str)] = &[
    ("harness", "use"),
    ("harnesses", "uses"),
    ("harnessed", "used"),
    ("harnessing", "using"),
];

const ILLUMINATE_FORMS: &[(&str, &str)] = &[
    ("illuminate", "explain"),
    ("illuminates", "explains"),
    ("illuminated", "explained"),
    ("illuminating", "explaining"),
];

fn fixed(pattern: &str, replacement: &'static str) -> Rule {
    Rule::new(pattern, move |m| {
        apply_case_style(replacement, detect_case_style(m))
    })
}

fn inflected(
    pattern: &str,
    forms: &'static [(&'static str, &'static str)],
    base: &'static str,
) -> Rule {
    Rule::new(pattern, move |m| {
        let lower = m.to_lowercase();
        let replacement = forms
            .iter()
            .find(|(form, _)| *form == lower)
            .map(|(_, to)| *to)
            .unwrap_or(base);
        apply_case_style(replacement, detect_case_style(m))
    })
}

/// The built-in table, in application order. Multi-word phrases come before
/// their single-word prefixes ("delve into" before "delve") and the order is
/// part of the contract.
pub fn default_rules() -> Vec<Rule> {
    vec![
        fixed(r"(?i)\bdelve\s+into\b", "explore"),
        fixed(r"(?i)\bdelve\b", "dive deep"),
        // Special case: sentence-leading matches swap to a different phrase
        // entirely, not just a different casing.
        Rule::new(r"(?i)\bat\s+its\s+core\b", |m| {
            let style = detect_case_style(m);
            match style {
                CaseStyle::Capitalized | CaseStyle::Titlecase => {
                    apply_case_style("fundamentally", style)
                }
                _ => apply_case_style("as its backbone", style),
            }
        }),
        fixed(r"(?i)\bto\s+put\s+it\s+simply\b", "in simpler terms"),
        fixed(r"(?i)\bthat\s+being\s+said\b", "however"),
        fixed(r"(?i)\ba\s+key\s+takeaway\s+is\b", "one important lesson is"),
        fixed(r"(?i)\bfrom\s+a\s+broader\s+perspective\b", "on a larger scale"),
        fixed(r"(?i)\bgenerally\s+speaking\b", "in most cases"),
        fixed(r"(?i)\bbroadly\s+speaking\b", "in a general sense"),
        fixed(r"(?i)\bseamless\s+integration\b", "smooth compatibility"),
        // "underscore" itself is absent from its table and resolves through
        // the fallback.
        inflected(r"(?i)\b(?:underscore[sd]?|underscoring)\b", UNDERSCORE_FORMS, "highlights"),
        inflected(r"(?i)\b(?:facilitate[sd]?|facilitating)\b", FACILITATE_FORMS, "enable"),
        inflected(r"(?i)\b(?:bolster[sd]?|bolstering)\b", BOLSTER_FORMS, "support"),
        inflected(r"(?i)\b(?:streamline[sd]?|streamlining)\b", STREAMLINE_FORMS, "simplify"),
        inflected(
            r"(?i)\b(?:revolutionize[sd]?|revolutionizing)\b",
            REVOLUTIONIZE_FORMS,
            "transform",
        ),
        inflected(
            r"(?i)\b(?:harness(?:es)?|harnessed|harnessing)\b",
            HARNESS_FORMS,
            "use",
        ),
        inflected(r"(?i)\b(?:illuminate[sd]?|illuminating)\b", ILLUMINATE_FORMS, "explain"),
        fixed(r"(?i)\btypically\b", "usually"),
        fixed(r"(?i)\btends\s+to\b", "is often"),
        fixed(r"(?i)\bcutting-edge\b", "advanced"),
        fixed(r"(?i)\bgame-changing\b", "significant"),
        fixed(r"(?i)\btransformative\b", "impactful"),
        fixed(r"(?i)\brealm\b", "area"),
    ]
}

pub static DEFAULT_RULES: Lazy<Vec<Rule>> = Lazy::new(default_rules);

/// A user-defined rule from the config file. The phrase is matched literally
/// (interior whitespace flexibly), and the replacement is inserted verbatim:
/// these entries exist to fix casing and spelling, so no case re-rendering.
pub fn custom_rule(phrase: &str, replacement: &str) -> Rule {
    let mut pattern = String::from("(?i)");
    if phrase.starts_with(|c: char| c.is_alphanumeric()) {
        pattern.push_str(r"\b");
    }
    let words: Vec<String> = phrase.split_whitespace().map(|w| regex::escape(w)).collect();
    pattern.push_str(&words.join(r"\s+"));
    if phrase.ends_with(|c: char| c.is_alphanumeric()) {
        pattern.push_str(r"\b");
    }

    let replacement = replacement.to_string();
    Rule::new(&pattern, move |_| replacement.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_rule_is_case_insensitive_and_verbatim() {
        let rule = custom_rule("chat gpt", "ChatGPT");
        assert_eq!(rule.rewrite("I use Chat GPT daily"), "I use ChatGPT daily");
        assert_eq!(rule.rewrite("chat   gpt"), "ChatGPT");
    }

    #[test]
    fn custom_rule_respects_word_boundaries() {
        let rule = custom_rule("cat", "feline");
        assert_eq!(rule.rewrite("the cat concatenates"), "the feline concatenates");
    }

    #[test]
    fn custom_rule_with_non_word_edges() {
        let rule = custom_rule(".file", "dotfile");
        assert_eq!(rule.rewrite("edit the .file now"), "edit the dotfile now");
    }

    #[test]
    fn rule_does_not_rescan_its_own_output() {
        let rule = custom_rule("aa", "aaa");
        assert_eq!(rule.rewrite("aa aa"), "aaa aaa");
    }
}
