use std::error::Error;

use html5ever::driver::ParseOpts;
use html5ever::serialize::{SerializeOpts, TraversalScope};
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::{QualName, local_name, namespace_url, ns, parse_fragment, serialize};
use log::debug;
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};

use crate::rules::Rule;
use crate::text::apply_rules;

const ALLOWED_TAGS: &[&str] = &[
    "b", "strong", "i", "em", "u", "a", "span", "br", "p", "div", "ul", "ol", "li", "h1", "h2",
    "h3", "h4", "h5", "h6",
];
const ALLOWED_ATTRS: &[&str] = &["href", "target", "rel"];

// Phrase rewriting inside code or preformatted blocks would corrupt their
// content; the walker never descends into these.
const VERBATIM_TAGS: &[&str] = &["code", "pre"];

/// Strips markup down to the allow-list, keeping the text of removed tags.
pub fn sanitize(html: &str) -> String {
    ammonia::Builder::default()
        .tags(ALLOWED_TAGS.iter().copied().collect())
        .generic_attributes(ALLOWED_ATTRS.iter().copied().collect())
        // rel is allow-listed as an ordinary attribute, so the automatic
        // rel rewrite must be off.
        .link_rel(None)
        .clean(html)
        .to_string()
}

/// Rewrites the text content of an HTML fragment, keeping structure intact:
/// sanitize, parse, walk, serialize.
pub fn replace_in_html(html: &str, rules: &[Rule]) -> Result<String, Box<dyn Error>> {
    let sanitized = sanitize(html);
    let dom = parse_fragment_dom(&sanitized);

    let root = dom.document.children.borrow().first().cloned();
    let root = match root {
        Some(root) => root,
        None => return Ok(sanitized),
    };

    replace_in_tree(&root, rules);
    serialize_children(&root)
}

/// Depth-first rewrite of every eligible text leaf. Element and text nodes
/// keep their identity and order; only text content changes. Subtrees under
/// verbatim tags are not visited at all.
pub fn replace_in_tree(handle: &Handle, rules: &[Rule]) {
    match &handle.data {
        NodeData::Text { contents } => {
            let original = contents.borrow().to_string();
            let replaced = apply_rules(&original, rules);
            if replaced != original {
                debug!("text node: {original:?} -> {replaced:?}");
                *contents.borrow_mut() = StrTendril::from(replaced.as_str());
            }
        }
        NodeData::Element { name, .. } => {
            if VERBATIM_TAGS.contains(&name.local.as_ref()) {
                return;
            }
            for child in handle.children.borrow().iter() {
                replace_in_tree(child, rules);
            }
        }
        NodeData::Document => {
            for child in handle.children.borrow().iter() {
                replace_in_tree(child, rules);
            }
        }
        _ => {}
    }
}

/// Reduces markup to its text content in document order.
pub fn strip_tags(html: &str) -> String {
    let dom = parse_fragment_dom(html);
    let mut out = String::new();
    collect_text(&dom.document, &mut out);
    out
}

fn collect_text(handle: &Handle, out: &mut String) {
    if let NodeData::Text { contents } = &handle.data {
        out.push_str(&contents.borrow());
    }
    for child in handle.children.borrow().iter() {
        collect_text(child, out);
    }
}

fn parse_fragment_dom(html: &str) -> RcDom {
    parse_fragment(
        RcDom::default(),
        ParseOpts::default(),
        QualName::new(None, ns!(html), local_name!("div")),
        vec![],
    )
    .one(html)
}

fn serialize_children(handle: &Handle) -> Result<String, Box<dyn Error>> {
    let mut out = Vec::new();
    serialize(
        &mut out,
        &SerializableHandle::from(handle.clone()),
        SerializeOpts {
            traversal_scope: TraversalScope::ChildrenOnly(None),
            ..SerializeOpts::default()
        },
    )?;
    Ok(String::from_utf8(out)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::DEFAULT_RULES;

    fn rewrite_fragment(html: &str) -> String {
        let dom = parse_fragment_dom(html);
        let root = dom.document.children.borrow().first().cloned().unwrap();
        replace_in_tree(&root, &DEFAULT_RULES);
        serialize_children(&root).unwrap()
    }

    #[test]
    fn rewrites_text_leaves_and_keeps_structure() {
        assert_eq!(
            rewrite_fragment("<div><ul><li>That being said, go on</li><li>fine</li></ul></div>"),
            "<div><ul><li>However, go on</li><li>fine</li></ul></div>"
        );
    }

    #[test]
    fn rewrites_across_inline_elements_per_leaf() {
        assert_eq!(
            rewrite_fragment("<p>That being said, it <b>typically</b> works</p>"),
            "<p>However, it <b>usually</b> works</p>"
        );
    }

    #[test]
    fn skips_code_blocks() {
        assert_eq!(
            rewrite_fragment("<p>delve into the topic</p><code>delve into</code>"),
            "<p>explore the topic</p><code>delve into</code>"
        );
    }

    #[test]
    fn skips_pre_blocks_and_their_descendants() {
        assert_eq!(
            rewrite_fragment("<pre><span>delve into</span></pre><p>delve into</p>"),
            "<pre><span>delve into</span></pre><p>explore</p>"
        );
    }

    #[test]
    fn leaves_clean_fragments_untouched() {
        assert_eq!(rewrite_fragment("<p>plain text</p>"), "<p>plain text</p>");
    }

    #[test]
    fn sanitize_strips_scripts_and_disallowed_attributes() {
        assert_eq!(
            sanitize("<p onclick=\"x()\">typically</p><script>alert(1)</script>"),
            "<p>typically</p>"
        );
    }

    #[test]
    fn sanitize_keeps_content_of_disallowed_tags() {
        assert_eq!(sanitize("<table><tr><td>kept</td></tr></table>"), "kept");
    }

    #[test]
    fn sanitize_keeps_link_attributes() {
        let html = "<a href=\"https://example.com/\" target=\"_blank\" rel=\"noopener\">x</a>";
        assert_eq!(sanitize(html), html);
    }

    #[test]
    fn replace_in_html_sanitizes_then_rewrites() {
        let out = replace_in_html(
            "<p>That being said, it <b>typically</b> works</p><script>delve into</script>",
            &DEFAULT_RULES,
        )
        .unwrap();
        assert_eq!(out, "<p>However, it <b>usually</b> works</p>");
    }

    #[test]
    fn strip_tags_concatenates_in_document_order() {
        assert_eq!(strip_tags("<p>one <b>two</b> three</p>"), "one two three");
        assert_eq!(strip_tags("<p>one</p><p>two</p>"), "onetwo");
    }
}
