//! Printable-ASCII sanitization of attribute values.
//!
//! Spreadsheet exports from legacy encodings carry stray control and
//! non-ASCII characters the directory rejects. Text values keep only
//! codepoints 32 through 126; sequences and maps are walked
//! recursively with their structure unchanged; integer and boolean
//! values pass through untouched.

use std::collections::BTreeMap;

use simroll_directory::{AttrValue, Attributes};

/// Strip characters outside the printable-ASCII range, preserving the
/// relative order of kept characters.
pub fn sanitize_text(text: &str) -> String {
    text.chars()
        .filter(|c| ('\u{20}'..='\u{7e}').contains(c))
        .collect()
}

/// Sanitize one attribute value recursively.
pub fn sanitize_value(value: AttrValue) -> AttrValue {
    match value {
        AttrValue::Text(s) => AttrValue::Text(sanitize_text(&s)),
        AttrValue::Seq(items) => AttrValue::Seq(items.into_iter().map(sanitize_value).collect()),
        AttrValue::Map(map) => AttrValue::Map(
            map.into_iter()
                .map(|(key, value)| (sanitize_text(&key), sanitize_value(value)))
                .collect::<BTreeMap<_, _>>(),
        ),
        other @ (AttrValue::Int(_) | AttrValue::Bool(_)) => other,
    }
}

/// Sanitize every attribute of an entry, names included.
pub fn sanitize_attributes(attributes: Attributes) -> Attributes {
    attributes
        .into_iter_pairs()
        .map(|(name, value)| (sanitize_text(&name), sanitize_value(value)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_outside_printable_range_preserving_order() {
        assert_eq!(sanitize_text("Jos\u{e9} P\u{e9}rez"), "Jos Prez");
        assert_eq!(sanitize_text("tab\there\u{7f}"), "tabhere");
        assert_eq!(sanitize_text("plain ascii!"), "plain ascii!");
    }

    #[test]
    fn test_boundary_codepoints() {
        // 32 and 126 are kept, 31 and 127 are not.
        assert_eq!(sanitize_text("\u{1f} ~\u{7f}"), " ~");
    }

    #[test]
    fn test_recurses_through_sequences_and_maps() {
        let mut map = BTreeMap::new();
        map.insert(
            "k\u{e9}y".to_string(),
            AttrValue::Seq(vec![
                AttrValue::Text("caf\u{e9}".to_string()),
                AttrValue::Int(42),
            ]),
        );
        let sanitized = sanitize_value(AttrValue::Map(map));

        let AttrValue::Map(map) = sanitized else {
            panic!("structure changed");
        };
        assert_eq!(
            map.get("ky"),
            Some(&AttrValue::Seq(vec![
                AttrValue::Text("caf".to_string()),
                AttrValue::Int(42),
            ]))
        );
    }

    #[test]
    fn test_scalars_pass_through() {
        assert_eq!(sanitize_value(AttrValue::Int(-7)), AttrValue::Int(-7));
        assert_eq!(sanitize_value(AttrValue::Bool(true)), AttrValue::Bool(true));
    }

    #[test]
    fn test_attributes_sanitized_wholesale() {
        let attrs = Attributes::new()
            .with("cn", "Ren\u{e9}e")
            .with("uidNumber", 5001i64);
        let sanitized = sanitize_attributes(attrs);

        assert_eq!(sanitized.get_text("cn"), Some("Rene"));
        assert_eq!(sanitized.get("uidNumber"), Some(&AttrValue::Int(5001)));
    }
}
