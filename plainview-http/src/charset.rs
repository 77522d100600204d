//! Response body decoding.
//!
//! The encoding is picked the way a browser would, first match wins:
//! byte order mark, `charset` parameter of `Content-Type`, `<meta>`
//! declaration in the first 1024 bytes, then statistical detection.

use std::sync::LazyLock;

use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use regex::bytes::Regex;

const META_PRESCAN_LEN: usize = 1024;

// Matches both `<meta charset="x">` and the `http-equiv` form whose
// `content` carries `text/html; charset=x`.
static META_CHARSET: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r#"(?i-u)<meta\b[^>]*?charset\s*=\s*["']?\s*([a-z0-9_:.\-]+)"#).ok()
});

#[derive(Debug, Clone)]
pub struct Decoded {
    pub text: String,
    pub encoding: &'static Encoding,
    /// Malformed sequences were replaced with U+FFFD.
    pub had_errors: bool,
}

/// Decode `bytes` to text. `tld` (e.g. `"ru"`) sharpens statistical
/// detection when nothing in the response declares an encoding.
pub fn decode(bytes: &[u8], content_type: Option<&str>, tld: Option<&str>) -> Decoded {
    let declared = detect(bytes, content_type, tld);
    // `decode` re-checks the BOM and reports the encoding actually used.
    let (text, encoding, had_errors) = declared.decode(bytes);
    Decoded {
        text: text.into_owned(),
        encoding,
        had_errors,
    }
}

pub fn detect(bytes: &[u8], content_type: Option<&str>, tld: Option<&str>) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding;
    }

    if let Some(encoding) = content_type
        .and_then(charset_param)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
    {
        return encoding;
    }

    if let Some(encoding) = sniff_meta(bytes) {
        return encoding;
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(tld.map(str::as_bytes), true)
}

/// `charset` parameter of a `Content-Type` value, unquoted.
pub fn charset_param(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches(|c| c == '"' || c == '\''))
            .filter(|label| !label.is_empty())
    })
}

fn sniff_meta(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(META_PRESCAN_LEN)];
    let caps = META_CHARSET.as_ref()?.captures(head)?;
    let label = caps.get(1)?.as_bytes();
    // A document that got this far was read as ASCII-compatible bytes, so a
    // UTF-16 declaration cannot be true; map it the way browsers do.
    Encoding::for_label(label).map(Encoding::output_encoding)
}
