// src/fetch/decode.rs
// =============================================================================
// Best-effort conversion of raw page bytes into text.
//
// Pages do not always tell the truth about their encoding, so we guess in the
// order a browser would:
// 1. byte-order mark
// 2. charset= in the Content-Type header
// 3. <meta charset> or http-equiv declaration near the top of the document
// 4. valid UTF-8
// 5. windows-1252 (never fails, every byte maps to something)
//
// encoding_rs does the actual decoding. Malformed sequences become U+FFFD
// instead of errors.
// =============================================================================

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8, WINDOWS_1252, X_USER_DEFINED};

// How far into the document we look for a <meta> charset declaration
const META_SNIFF_LEN: usize = 1024;

/// Decodes `bytes` into a String using the best encoding guess.
///
/// An empty string means there was nothing to decode.
pub fn decode(bytes: &[u8], content_type: Option<&str>) -> String {
    let encoding = guess_encoding(bytes, content_type);

    // decode() still honours a BOM if there is one, overriding our guess
    let (text, _actual, _had_errors) = encoding.decode(bytes);
    text.into_owned()
}

fn guess_encoding(bytes: &[u8], content_type: Option<&str>) -> &'static Encoding {
    if let Some((bom_encoding, _)) = Encoding::for_bom(bytes) {
        return bom_encoding;
    }

    if let Some(encoding) = content_type.and_then(|ct| charset_param(&ct.to_ascii_lowercase())) {
        return encoding;
    }

    if let Some(encoding) = sniff_meta_charset(bytes) {
        return encoding;
    }

    if std::str::from_utf8(bytes).is_ok() {
        UTF_8
    } else {
        WINDOWS_1252
    }
}

// Looks for charset=... in an already lowercased string
fn charset_param(text: &str) -> Option<&'static Encoding> {
    let start = text.find("charset=")? + "charset=".len();
    let value = text[start..].trim_start_matches(['"', '\'', ' ']);
    let end = value
        .find(|c: char| matches!(c, '"' | '\'' | ';' | ' ' | '/' | '>'))
        .unwrap_or(value.len());

    Encoding::for_label(value[..end].as_bytes())
}

fn sniff_meta_charset(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(META_SNIFF_LEN)];
    let head = String::from_utf8_lossy(head).to_ascii_lowercase();

    let mut rest = head.as_str();
    while let Some(pos) = rest.find("<meta") {
        rest = &rest[pos + "<meta".len()..];
        let tag_end = rest.find('>').unwrap_or(rest.len());
        if let Some(encoding) = charset_param(&rest[..tag_end]) {
            return Some(meta_override(encoding));
        }
    }

    None
}

// A document we could read as ASCII can't really be UTF-16, so a UTF-16
// declaration in <meta> means UTF-8 (same rule browsers apply)
fn meta_override(encoding: &'static Encoding) -> &'static Encoding {
    if encoding == UTF_16LE || encoding == UTF_16BE {
        UTF_8
    } else if encoding == X_USER_DEFINED {
        WINDOWS_1252
    } else {
        encoding
    }
}
