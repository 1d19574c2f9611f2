//! Recover JSON from free-form model output
//!
//! Models wrap JSON in markdown fences, surround it with commentary, or emit
//! almost-JSON with raw line breaks and single quotes. [`sanitize_response`]
//! tries progressively more invasive strategies and stops at the first one
//! that parses.

use crate::error::ExtractorError;
use serde_json::Value;
use tracing::{debug, warn};

/// Characters of the raw response kept in an `UnparsableResponse` error
const SNIPPET_CHARS: usize = 500;

/// Parse a model response into a JSON value
///
/// Strategies, in order: the whole trimmed response, the body of a fenced
/// code block, the span from the first `{` to the last `}`, and finally that
/// span with control characters escaped inside strings and then with single
/// quotes turned into double quotes.
pub fn sanitize_response(raw: &str) -> Result<Value, ExtractorError> {
    let trimmed = raw.trim();

    let mut last_error = match serde_json::from_str(trimmed) {
        Ok(value) => return Ok(value),
        Err(e) => e.to_string(),
    };

    if let Some(body) = strip_code_fence(trimmed) {
        match serde_json::from_str(body) {
            Ok(value) => {
                debug!("Parsed JSON from fenced code block");
                return Ok(value);
            }
            Err(e) => last_error = e.to_string(),
        }
    }

    if let Some(span) = outer_object_span(trimmed) {
        match serde_json::from_str(span) {
            Ok(value) => {
                debug!("Parsed JSON from embedded object span");
                return Ok(value);
            }
            Err(e) => last_error = e.to_string(),
        }

        let escaped = escape_controls_in_strings(span);
        match serde_json::from_str(&escaped) {
            Ok(value) => {
                warn!("Repaired raw control characters in model JSON");
                return Ok(value);
            }
            Err(e) => last_error = e.to_string(),
        }

        let requoted = escape_controls_in_strings(&span.replace('\'', "\""));
        match serde_json::from_str(&requoted) {
            Ok(value) => {
                warn!("Repaired single-quoted model JSON");
                return Ok(value);
            }
            Err(e) => last_error = e.to_string(),
        }
    }

    Err(ExtractorError::UnparsableResponse {
        snippet: raw.chars().take(SNIPPET_CHARS).collect(),
        source_error: last_error,
    })
}

/// Body of a response wrapped in a markdown code fence
///
/// Accepts ```` ```json ```` or a bare ```` ``` ```` opener; the closing fence
/// is optional so truncated output still gets a chance.
fn strip_code_fence(text: &str) -> Option<&str> {
    let rest = text.strip_prefix("```")?;
    // Skip the language tag on the opening line
    let body = match rest.find('\n') {
        Some(newline) if rest[..newline].trim().chars().all(|c| c.is_ascii_alphanumeric()) => {
            &rest[newline + 1..]
        }
        _ => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
    };
    let body = body.trim_end();
    Some(body.strip_suffix("```").unwrap_or(body).trim())
}

/// The span from the first `{` to the last `}`, if well ordered
fn outer_object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

/// Escape raw newlines, carriage returns and tabs inside string literals
fn escape_controls_in_strings(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    let mut in_string = false;
    let mut escaped = false;

    for c in text.chars() {
        if in_string {
            match c {
                _ if escaped => {
                    escaped = false;
                    out.push(c);
                }
                '\\' => {
                    escaped = true;
                    out.push(c);
                }
                '"' => {
                    in_string = false;
                    out.push(c);
                }
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                _ => out.push(c),
            }
        } else {
            if c == '"' {
                in_string = true;
            }
            out.push(c);
        }
    }

    out
}
