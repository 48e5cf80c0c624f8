//! HTML-to-XML character normalization.
//!
//! The tokenizer is an XML reader, so HTML-isms are rewritten before it sees
//! the input: named HTML entities become Unicode, bare `&` becomes `&amp;`,
//! and a `<` that cannot start a tag becomes `&lt;`. The five XML entities
//! and numeric references pass through for the tokenizer to resolve.

use std::sync::LazyLock;

use regex::Regex;

/// A complete character reference at the start of the input.
static REFERENCE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^&(?:[a-zA-Z][a-zA-Z0-9]*|#[0-9]+|#[xX][0-9a-fA-F]+);")
        .expect("invalid reference regex")
});

/// Rewrite HTML character data into something an XML reader accepts.
pub(crate) fn normalize_markup(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(pos) = rest.find(['&', '<']) {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];

        if rest.starts_with('<') {
            if starts_markup(&rest[1..]) {
                out.push('<');
            } else {
                out.push_str("&lt;");
            }
            rest = &rest[1..];
            continue;
        }

        match REFERENCE_PATTERN.find(rest) {
            Some(m) => {
                let reference = m.as_str();
                let name = &reference[1..reference.len() - 1];
                out.push_str(entity_to_unicode(name).unwrap_or(reference));
                rest = &rest[m.end()..];
            }
            None => {
                out.push_str("&amp;");
                rest = &rest[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Whether the text after a `<` opens a tag, end tag, comment or declaration.
fn starts_markup(after: &str) -> bool {
    after
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'))
}

/// Resolve an XML entity or numeric reference name (without `&` and `;`).
///
/// Unknown names are returned as the original reference text.
pub(crate) fn decode_entity(entity: &str) -> String {
    match entity {
        "lt" => "<".to_owned(),
        "gt" => ">".to_owned(),
        "amp" => "&".to_owned(),
        "apos" => "'".to_owned(),
        "quot" => "\"".to_owned(),
        s if s.starts_with('#') => {
            let code = if s.starts_with("#x") || s.starts_with("#X") {
                u32::from_str_radix(&s[2..], 16).ok()
            } else {
                s[1..].parse::<u32>().ok()
            };
            code.and_then(char::from_u32)
                .map_or_else(|| format!("&{entity};"), |c| c.to_string())
        }
        _ => format!("&{entity};"),
    }
}

/// Map a named HTML entity to Unicode.
///
/// Returns `None` for the XML entities, which the tokenizer resolves itself,
/// and for names outside the table.
fn entity_to_unicode(name: &str) -> Option<&'static str> {
    Some(match name {
        // Spacing and invisible characters
        "nbsp" => "\u{00a0}",
        "ensp" => "\u{2002}",
        "emsp" => "\u{2003}",
        "thinsp" => "\u{2009}",
        "zwnj" => "\u{200c}",
        "zwj" => "\u{200d}",
        "shy" => "\u{00ad}",

        // Punctuation
        "mdash" => "\u{2014}",
        "ndash" => "\u{2013}",
        "hellip" => "\u{2026}",
        "bull" => "\u{2022}",
        "middot" => "\u{00b7}",
        "ldquo" => "\u{201c}",
        "rdquo" => "\u{201d}",
        "bdquo" => "\u{201e}",
        "lsquo" => "\u{2018}",
        "rsquo" => "\u{2019}",
        "sbquo" => "\u{201a}",
        "laquo" => "\u{00ab}",
        "raquo" => "\u{00bb}",
        "iexcl" => "\u{00a1}",
        "iquest" => "\u{00bf}",
        "para" => "\u{00b6}",
        "sect" => "\u{00a7}",
        "dagger" => "\u{2020}",
        "Dagger" => "\u{2021}",

        // Symbols
        "copy" => "\u{00a9}",
        "reg" => "\u{00ae}",
        "trade" => "\u{2122}",
        "deg" => "\u{00b0}",
        "micro" => "\u{00b5}",
        "euro" => "\u{20ac}",
        "pound" => "\u{00a3}",
        "yen" => "\u{00a5}",
        "cent" => "\u{00a2}",

        // Arrows
        "larr" => "\u{2190}",
        "uarr" => "\u{2191}",
        "rarr" => "\u{2192}",
        "darr" => "\u{2193}",
        "harr" => "\u{2194}",

        // Math
        "times" => "\u{00d7}",
        "divide" => "\u{00f7}",
        "plusmn" => "\u{00b1}",
        "minus" => "\u{2212}",
        "le" => "\u{2264}",
        "ge" => "\u{2265}",
        "ne" => "\u{2260}",
        "frac14" => "\u{00bc}",
        "frac12" => "\u{00bd}",
        "frac34" => "\u{00be}",
        "sup1" => "\u{00b9}",
        "sup2" => "\u{00b2}",
        "sup3" => "\u{00b3}",

        // Latin letters
        "agrave" => "\u{00e0}",
        "aacute" => "\u{00e1}",
        "auml" => "\u{00e4}",
        "ccedil" => "\u{00e7}",
        "egrave" => "\u{00e8}",
        "eacute" => "\u{00e9}",
        "ouml" => "\u{00f6}",
        "uuml" => "\u{00fc}",
        "Auml" => "\u{00c4}",
        "Ouml" => "\u{00d6}",
        "Uuml" => "\u{00dc}",
        "szlig" => "\u{00df}",
        "ntilde" => "\u{00f1}",

        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_entities_become_unicode() {
        assert_eq!(normalize_markup("a&nbsp;b&mdash;c"), "a\u{00a0}b\u{2014}c");
    }

    #[test]
    fn test_xml_entities_preserved() {
        assert_eq!(
            normalize_markup("&amp;&lt;&gt;&quot;&apos;"),
            "&amp;&lt;&gt;&quot;&apos;"
        );
    }

    #[test]
    fn test_numeric_references_preserved() {
        assert_eq!(normalize_markup("&#39;&#x27;"), "&#39;&#x27;");
    }

    #[test]
    fn test_bare_ampersand_escaped() {
        assert_eq!(normalize_markup("Tom & Jerry"), "Tom &amp; Jerry");
        assert_eq!(normalize_markup("a&b"), "a&amp;b");
    }

    #[test]
    fn test_unknown_entity_kept() {
        assert_eq!(normalize_markup("&bogus;"), "&bogus;");
    }

    #[test]
    fn test_stray_angle_bracket_escaped() {
        assert_eq!(normalize_markup("<p>1 < 2</p>"), "<p>1 &lt; 2</p>");
        assert_eq!(normalize_markup("x <"), "x &lt;");
        assert_eq!(normalize_markup("<!-- c --></p>"), "<!-- c --></p>");
    }

    #[test]
    fn test_decode_entity() {
        assert_eq!(decode_entity("lt"), "<");
        assert_eq!(decode_entity("quot"), "\"");
        assert_eq!(decode_entity("#39"), "'");
        assert_eq!(decode_entity("#x27"), "'");
        assert_eq!(decode_entity("#xZZ"), "&#xZZ;");
        assert_eq!(decode_entity("bogus"), "&bogus;");
    }
}
