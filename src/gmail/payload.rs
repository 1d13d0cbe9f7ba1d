//! Gmail `format=full` payload tree: header flattening and body extraction.
//!
//! The provider returns a naturally recursive MIME structure — each node
//! carries a mime type, an optional inline body, and an ordered list of
//! child parts. Leaves hold URL-safe base64 content; internal nodes hold
//! children. Depth is bounded by realistic MIME nesting.

use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;

/// One node of the payload tree.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub headers: Vec<Header>,
    #[serde(default)]
    pub body: PayloadBody,
    #[serde(default)]
    pub parts: Vec<Payload>,
}

/// A single `name`/`value` header pair.
#[derive(Debug, Clone, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

/// Inline body of a payload node, URL-safe base64 encoded.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PayloadBody {
    #[serde(default)]
    pub data: String,
}

/// Flatten the root node's header list into a map.
///
/// Only the top level is flattened; part-level headers are ignored.
/// Later duplicate names overwrite earlier ones.
pub fn extract_headers(payload: &Payload) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    for header in &payload.headers {
        headers.insert(header.name.clone(), header.value.clone());
    }
    headers
}

/// Extract a best-effort text body from the payload tree.
///
/// Depth-first, favoring a direct, shallow body over deeply nested
/// alternatives: the root's own inline body wins if it decodes; otherwise
/// children are scanned in order for the first `text/plain` or `text/html`
/// part with decodable inline data, recursing into a child's own parts
/// before moving to the next sibling. Returns an empty string when no
/// decodable text exists anywhere in the tree.
pub fn extract_body(payload: &Payload) -> String {
    if !payload.body.data.is_empty() {
        if let Ok(decoded) = decode_base64_url(&payload.body.data) {
            return String::from_utf8_lossy(&decoded).into_owned();
        }
    }

    for part in &payload.parts {
        if part.mime_type == "text/plain" || part.mime_type == "text/html" {
            if !part.body.data.is_empty() {
                if let Ok(decoded) = decode_base64_url(&part.body.data) {
                    return String::from_utf8_lossy(&decoded).into_owned();
                }
            }
        }

        if !part.parts.is_empty() {
            let nested = extract_body(&Payload {
                parts: part.parts.clone(),
                ..Default::default()
            });
            if !nested.is_empty() {
                return nested;
            }
        }
    }

    String::new()
}

/// Decode URL-safe base64 as the provider emits it: `-`/`_` are remapped
/// to the standard alphabet and missing `=` padding is restored before
/// standard decoding.
pub fn decode_base64_url(data: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let mut data = data.replace('-', "+").replace('_', "/");
    while data.len() % 4 != 0 {
        data.push('=');
    }

    STANDARD.decode(&data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    fn leaf(mime_type: &str, text: &str) -> Payload {
        Payload {
            mime_type: mime_type.into(),
            body: PayloadBody {
                data: URL_SAFE_NO_PAD.encode(text),
            },
            ..Default::default()
        }
    }

    #[test]
    fn decodes_all_padding_lengths() {
        // 0 through 3 missing `=` characters.
        for text in ["abcd", "abcde", "abcdef", "a"] {
            let encoded = URL_SAFE_NO_PAD.encode(text);
            assert!(!encoded.contains('='));
            assert_eq!(decode_base64_url(&encoded).unwrap(), text.as_bytes());
        }
    }

    #[test]
    fn round_trips_url_safe_alphabet_bytes() {
        // Bytes chosen so the encoding contains both `-` and `_`.
        let bytes = [0xfb_u8, 0xef, 0xff, 0xfe, 0x3f];
        let encoded = URL_SAFE_NO_PAD.encode(bytes);
        assert!(encoded.contains('-') || encoded.contains('_'));
        assert_eq!(decode_base64_url(&encoded).unwrap(), bytes);
    }

    #[test]
    fn rejects_malformed_data() {
        assert!(decode_base64_url("!!!not base64!!!").is_err());
    }

    #[test]
    fn headers_last_duplicate_wins() {
        let payload = Payload {
            headers: vec![
                Header {
                    name: "Received".into(),
                    value: "first hop".into(),
                },
                Header {
                    name: "Subject".into(),
                    value: "Hello".into(),
                },
                Header {
                    name: "Received".into(),
                    value: "second hop".into(),
                },
            ],
            ..Default::default()
        };
        let map = extract_headers(&payload);
        assert_eq!(map.len(), 2);
        assert_eq!(map["Received"], "second hop");
        assert_eq!(map["Subject"], "Hello");
    }

    #[test]
    fn part_level_headers_are_ignored() {
        let mut child = leaf("text/plain", "body");
        child.headers.push(Header {
            name: "Content-Type".into(),
            value: "text/plain".into(),
        });
        let payload = Payload {
            parts: vec![child],
            ..Default::default()
        };
        assert!(extract_headers(&payload).is_empty());
    }

    #[test]
    fn root_inline_body_wins() {
        let mut payload = leaf("text/plain", "direct body");
        payload.parts.push(leaf("text/plain", "child body"));
        assert_eq!(extract_body(&payload), "direct body");
    }

    #[test]
    fn first_text_child_wins_in_order() {
        let payload = Payload {
            mime_type: "multipart/alternative".into(),
            parts: vec![leaf("text/html", "<p>html</p>"), leaf("text/plain", "plain")],
            ..Default::default()
        };
        assert_eq!(extract_body(&payload), "<p>html</p>");
    }

    #[test]
    fn skips_non_text_parts() {
        let payload = Payload {
            parts: vec![
                leaf("application/pdf", "%PDF"),
                leaf("text/plain", "the text"),
            ],
            ..Default::default()
        };
        assert_eq!(extract_body(&payload), "the text");
    }

    #[test]
    fn recurses_into_nested_multipart() {
        let nested = Payload {
            mime_type: "multipart/alternative".into(),
            parts: vec![leaf("text/plain", "nested text")],
            ..Default::default()
        };
        let payload = Payload {
            mime_type: "multipart/mixed".into(),
            parts: vec![nested],
            ..Default::default()
        };
        assert_eq!(extract_body(&payload), "nested text");
    }

    #[test]
    fn undecodable_node_falls_through_to_sibling() {
        let broken = Payload {
            mime_type: "text/plain".into(),
            body: PayloadBody {
                data: "!!!".into(),
            },
            ..Default::default()
        };
        let payload = Payload {
            parts: vec![broken, leaf("text/html", "fallback")],
            ..Default::default()
        };
        assert_eq!(extract_body(&payload), "fallback");
    }

    #[test]
    fn empty_tree_yields_empty_string() {
        assert_eq!(extract_body(&Payload::default()), "");
    }
}
