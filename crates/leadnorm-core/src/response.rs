use crate::canonical::Canonicalizer;
use crate::domain::FieldMap;
use crate::error::ParseError;
use serde_json::Value;

/// Turns generation output into canonical field values. Values that are not
/// non-empty strings are dropped; every kept value goes through the
/// canonicalizer.
pub fn parse_response(text: &str, canon: &Canonicalizer) -> Result<FieldMap, ParseError> {
    let payload = extract_payload(text);
    let parsed: Value =
        serde_json::from_str(payload).map_err(|err| ParseError::InvalidJson(err.to_string()))?;
    let Value::Object(object) = parsed else {
        return Err(ParseError::NotAnObject);
    };

    let mut normalized = FieldMap::new();
    for (field, value) in object {
        let Value::String(raw) = value else {
            continue;
        };
        if raw.trim().is_empty() {
            continue;
        }
        let canonical = canon.canonicalize(&field, &raw);
        normalized.insert(field, canonical);
    }
    Ok(normalized)
}

pub fn extract_payload(text: &str) -> &str {
    if let Some(block) = fenced_block(text) {
        return block;
    }
    if let Some(object) = object_span(text) {
        return object;
    }
    text
}

fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let after_fence = &text[start + 3..];
    let end = after_fence.find("```")?;
    let block = &after_fence[..end];
    Some(skip_info_string(block).trim())
}

// Drops a language tag such as `json` or `jsonc` right after the opening
// fence. The tag ends at the first whitespace.
fn skip_info_string(block: &str) -> &str {
    let head = block.trim_start_matches([' ', '\t']);
    let tag_len = head.find(char::is_whitespace).unwrap_or(head.len());
    let tag = &head[..tag_len];
    let is_tag = !tag.is_empty()
        && tag
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '+' | '.'));
    if is_tag {
        &head[tag_len..]
    } else {
        block
    }
}

// First balanced top-level object, skipping braces inside string literals.
fn object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }

    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::{extract_payload, parse_response};
    use crate::canonical::Canonicalizer;
    use crate::error::ParseError;

    fn canon() -> Canonicalizer {
        Canonicalizer::builtin().unwrap()
    }

    #[test]
    fn fenced_block_is_unwrapped() {
        let text = "```json\n{\"nombres\": \"juan perez\"}\n```";
        let parsed = parse_response(text, &canon()).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed.get("nombres").map(String::as_str), Some("Juan Perez"));
    }

    #[test]
    fn untagged_fence_is_unwrapped() {
        assert_eq!(extract_payload("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
    }

    #[test]
    fn longer_fence_tags_are_dropped_whole() {
        assert_eq!(extract_payload("```json5\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(extract_payload("```JSONC {\"a\": 1}```"), "{\"a\": 1}");
        let parsed =
            parse_response("```jsonc\n{\"ciudad\": \"cali\"}\n```", &canon()).unwrap();
        assert_eq!(parsed.get("ciudad").map(String::as_str), Some("Cali"));
    }

    #[test]
    fn object_is_found_inside_prose() {
        let text = "Claro, aqui tienes:\n{\"ciudad\": \"bogota\"}\nEspero que sirva.";
        let parsed = parse_response(text, &canon()).unwrap();
        assert_eq!(parsed.get("ciudad").map(String::as_str), Some("Bogota D.C."));
    }

    #[test]
    fn object_span_ignores_braces_in_strings() {
        let text = "ok {\"empresa\": \"la {tienda}\"} y {\"otro\": 1}";
        assert_eq!(extract_payload(text), "{\"empresa\": \"la {tienda}\"}");
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let err = parse_response("no hay cambios", &canon()).unwrap_err();
        assert!(matches!(err, ParseError::InvalidJson(_)));
    }

    #[test]
    fn arrays_are_rejected() {
        let err = parse_response("[\"juan\"]", &canon()).unwrap_err();
        assert_eq!(err, ParseError::NotAnObject);
    }

    #[test]
    fn non_string_and_blank_values_are_dropped() {
        let text = r#"{"nombres": "  ", "edad": 30, "apellidos": null, "empresa": "sena"}"#;
        let parsed = parse_response(text, &canon()).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed.get("empresa").map(String::as_str), Some("SENA"));
    }

    #[test]
    fn empty_object_means_no_changes() {
        let parsed = parse_response("{}", &canon()).unwrap();
        assert!(parsed.is_empty());
    }
}
