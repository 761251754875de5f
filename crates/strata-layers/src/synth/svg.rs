//! SVG roots exported as markup.

use strata_css::{format_color, parse_color};
use strata_dom::NodeId;

use crate::context::StyleContext;
use crate::layer::{LayerKind, LayerNode, MetaLayer, SourceRef};

/// An `Svg` layer for an outermost `<svg>` element.
///
/// The computed `fill` (when it is a color) is written onto the root tag so
/// shapes that inherit it keep their color outside the page. Elements without
/// captured markup or a usable rect produce nothing.
pub fn svg_to_layer(ctx: &dyn StyleContext, node: NodeId) -> Option<MetaLayer> {
    let element = ctx.dom().as_element(node)?;
    let markup = element.markup.as_deref().filter(|m| !m.trim().is_empty())?;
    let rect = ctx.bounding_rect(node, None).filter(|r| !r.is_degenerate())?;

    let style = ctx.computed_style(node, None);
    let svg = match style.get("fill").and_then(parse_color) {
        Some(fill) => inject_fill(markup, &format_color(&fill)),
        None => markup.to_string(),
    };

    let mut meta = MetaLayer::new(LayerNode::new(LayerKind::Svg { svg }, &rect).named("svg"))
        .with_source(SourceRef::node(node));
    meta.z_index = style.z_index().unwrap_or(0);
    Some(meta)
}

/// Set `fill` on the first `<svg` start tag, replacing an existing value.
/// Markup without an `<svg` tag is returned unchanged.
#[must_use]
pub fn inject_fill(markup: &str, fill: &str) -> String {
    let Some(start) = markup.find("<svg") else {
        return markup.to_string();
    };
    let Some(tag_len) = start_tag_len(&markup[start..]) else {
        return markup.to_string();
    };
    let end = start + tag_len;
    let tag = &markup[start..end];

    if let Some((value_start, value_end)) = attribute_value_span(tag, "fill") {
        return format!(
            "{}{fill}{}",
            &markup[..start + value_start],
            &markup[start + value_end..]
        );
    }

    let insert_at = start + "<svg".len();
    format!(
        "{} fill=\"{fill}\"{}",
        &markup[..insert_at],
        &markup[insert_at..]
    )
}

/// Length of the start tag at the head of `s`, up to and including `>`,
/// skipping `>` inside quoted attribute values.
fn start_tag_len(s: &str) -> Option<usize> {
    let mut quote = None;
    for (i, c) in s.char_indices() {
        match (quote, c) {
            (None, '"' | '\'') => quote = Some(c),
            (Some(q), _) if q == c => quote = None,
            (None, '>') => return Some(i + 1),
            _ => {}
        }
    }
    None
}

/// Byte span of a quoted attribute's value inside a start tag.
///
/// Walks the tag attribute by attribute, so text inside another attribute's
/// quoted value never matches.
fn attribute_value_span(tag: &str, name: &str) -> Option<(usize, usize)> {
    let bytes = tag.as_bytes();
    let is_name_end = |b: u8| b.is_ascii_whitespace() || matches!(b, b'=' | b'>' | b'/');
    let skip_space = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        i
    };

    // Past `<tagname`.
    let mut i = 1;
    while i < bytes.len() && !is_name_end(bytes[i]) {
        i += 1;
    }

    loop {
        i = skip_space(i);
        match bytes.get(i) {
            None | Some(b'>') => return None,
            Some(b'/') => {
                i += 1;
                continue;
            }
            Some(_) => {}
        }

        let name_start = i;
        while i < bytes.len() && !is_name_end(bytes[i]) {
            i += 1;
        }
        let attr = &tag[name_start..i];

        i = skip_space(i);
        if bytes.get(i) != Some(&b'=') {
            continue;
        }
        i = skip_space(i + 1);

        let matches = attr.eq_ignore_ascii_case(name);
        if let Some(&quote @ (b'"' | b'\'')) = bytes.get(i) {
            let start = i + 1;
            let len = tag[start..].find(char::from(quote))?;
            if matches {
                return Some((start, start + len));
            }
            i = start + len + 1;
        } else if matches {
            // Unquoted: the inserted attribute comes first and shadows it.
            return None;
        } else {
            while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                i += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inject_fill_inserts_attribute() {
        let out = inject_fill(r#"<svg viewBox="0 0 1 1"><path/></svg>"#, "rgb(255, 0, 0)");
        assert_eq!(
            out,
            r#"<svg fill="rgb(255, 0, 0)" viewBox="0 0 1 1"><path/></svg>"#
        );
    }

    #[test]
    fn test_inject_fill_replaces_existing_value() {
        let out = inject_fill(r#"<svg fill="none" width="2"><g fill="blue"/></svg>"#, "red");
        assert_eq!(out, r#"<svg fill="red" width="2"><g fill="blue"/></svg>"#);
    }

    #[test]
    fn test_inject_fill_ignores_fill_rule() {
        let out = inject_fill(r#"<svg fill-rule="evenodd"></svg>"#, "red");
        assert_eq!(out, r#"<svg fill="red" fill-rule="evenodd"></svg>"#);
    }

    #[test]
    fn test_inject_fill_skips_quoted_values() {
        let out = inject_fill(r#"<svg data-x="a fill='b'" fill="none"></svg>"#, "red");
        assert_eq!(out, r#"<svg data-x="a fill='b'" fill="red"></svg>"#);

        let out = inject_fill(r#"<svg data-x="a fill='b'"></svg>"#, "red");
        assert_eq!(out, r#"<svg fill="red" data-x="a fill='b'"></svg>"#);
    }

    #[test]
    fn test_inject_fill_without_svg_tag() {
        assert_eq!(inject_fill("<div></div>", "red"), "<div></div>");
    }
}
