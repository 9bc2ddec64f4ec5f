//! Content-Disposition parsing and filename sanitization.
//!
//! The archive name decides which extractor runs, so the header is parsed
//! as a parameter list rather than searched for a substring.

use std::path::{Component, Path};

use super::error::DownloadError;

/// Parses a Content-Disposition header value and returns the filename.
///
/// Handles:
/// - `attachment; filename="image.zip"` (quoted, `\"` escapes honored)
/// - `attachment; filename=image.zip` (token)
/// - `attachment; filename*=UTF-8''image%20v2.zip` (RFC 5987, preferred when valid)
///
/// Parameter names are matched case-insensitively and `;` inside quoted
/// strings does not split parameters.
///
/// # Errors
///
/// Returns [`DownloadError::MalformedContentDisposition`] when the value has
/// an unterminated quoted string, no filename parameter, or an empty one.
pub fn parse_content_disposition(header: &str) -> Result<String, DownloadError> {
    let malformed = |reason| DownloadError::malformed_content_disposition(header, reason);

    let segments = split_segments(header).ok_or_else(|| malformed("unterminated quoted string"))?;

    // The first segment is the disposition type (attachment, inline, ...).
    let params: Vec<(String, &str)> = segments
        .into_iter()
        .skip(1)
        .filter_map(|segment| {
            let (name, value) = segment.split_once('=')?;
            Some((name.trim().to_ascii_lowercase(), value.trim()))
        })
        .collect();

    let find = |wanted: &str| {
        params
            .iter()
            .find(|(name, _)| name == wanted)
            .map(|(_, value)| *value)
    };

    if let Some(extended) = find("filename*").and_then(decode_ext_value) {
        if !extended.is_empty() {
            return Ok(extended);
        }
    }

    let value = find("filename").ok_or_else(|| malformed("no filename parameter"))?;
    let filename = unquote(value).ok_or_else(|| malformed("unterminated quoted string"))?;
    if filename.is_empty() {
        return Err(malformed("empty filename"));
    }
    Ok(filename)
}

/// Splits on `;` outside of quoted strings. `None` on an unterminated quote.
fn split_segments(header: &str) -> Option<Vec<&str>> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut escaped = false;

    for (idx, ch) in header.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => {
                segments.push(&header[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }

    if in_quotes {
        return None;
    }
    segments.push(&header[start..]);
    Some(segments)
}

/// Removes surrounding quotes and resolves backslash escapes.
fn unquote(value: &str) -> Option<String> {
    let Some(inner) = value.strip_prefix('"') else {
        return Some(value.to_string());
    };
    let inner = inner.strip_suffix('"')?;

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            out.push(chars.next()?);
        } else {
            out.push(ch);
        }
    }
    Some(out)
}

/// Decodes an RFC 5987 `charset'language'value` string.
fn decode_ext_value(value: &str) -> Option<String> {
    let mut parts = value.splitn(3, '\'');
    let charset = parts.next()?;
    let _language = parts.next()?;
    let encoded = parts.next()?;

    if charset.eq_ignore_ascii_case("utf-8") {
        urlencoding::decode(encoded).ok().map(|decoded| decoded.into_owned())
    } else if charset.eq_ignore_ascii_case("iso-8859-1") {
        let bytes = urlencoding::decode_binary(encoded.as_bytes());
        Some(bytes.iter().map(|&b| char::from(b)).collect())
    } else {
        None
    }
}

/// Sanitizes a filename into a single safe path segment.
///
/// Replaces characters that are invalid on common filesystems
/// (`/ \ : * ? " < > |` and control characters) and rewrites `.`/`..`
/// so the result can never leave the directory it is joined onto.
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.is_empty() {
        return "_".to_string();
    }

    if is_safe_filename_segment(&sanitized) {
        sanitized
    } else {
        sanitized
            .chars()
            .map(|c| if c == '.' { '_' } else { c })
            .collect()
    }
}

fn is_safe_filename_segment(name: &str) -> bool {
    !Path::new(name).components().any(|component| {
        matches!(
            component,
            Component::CurDir | Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    })
}
