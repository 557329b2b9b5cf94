//! Decoding place lists out of generated text
//!
//! Generated text is free-form: the JSON array may be wrapped in markdown code
//! fences or surrounded by prose. Everything here returns a typed list or
//! `MalformedResponse`, never a raw parse error.

use crate::constants::discovery::PLACE_COUNT;
use crate::discovery::PlaceSummary;
use crate::error::{Error, Result};
use serde_json::Value;

/// Remove markdown code fences at the edges of a payload
///
/// Handles "```json" and bare "```" openers, with or without a trailing
/// newline, and a lone closing fence. Fences inside the payload are left
/// alone.
pub fn strip_fences(text: &str) -> &str {
    let mut body = text.trim();

    if let Some(rest) = body.strip_prefix("```") {
        // Skip an info string such as "json" up to the end of the fence line
        body = match rest.find('\n') {
            Some(nl) if rest[..nl].trim().chars().all(|c| c.is_ascii_alphanumeric()) => {
                &rest[nl + 1..]
            }
            _ => rest.strip_prefix("json").unwrap_or(rest),
        };
    }

    if let Some(rest) = body.trim_end().strip_suffix("```") {
        body = rest;
    }

    body.trim()
}

/// First fenced block inside surrounding prose
fn fenced_block(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let after_open = open + 3;
    let close = after_open + text[after_open..].find("```")?;
    Some(strip_fences(&text[open..close + 3]))
}

/// Parse the payload as JSON, stripping fences only when needed
///
/// Text that already parses is never altered.
fn parse_payload(text: &str) -> Result<Value> {
    let trimmed = text.trim();
    if let Ok(value) = serde_json::from_str(trimmed) {
        return Ok(value);
    }

    let stripped = strip_fences(trimmed);
    let first_error = match serde_json::from_str(stripped) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    fenced_block(trimmed)
        .and_then(|block| serde_json::from_str(block).ok())
        .ok_or_else(|| {
            Error::MalformedResponse(format!("Generated text is not JSON: {}", first_error))
        })
}

/// Decode generated text into exactly [`PLACE_COUNT`] place summaries
///
/// Longer lists keep their first entries; shorter lists are rejected so a
/// caller never renders a partial set.
pub fn decode_places(text: &str) -> Result<Vec<PlaceSummary>> {
    let value = parse_payload(text)?;

    let Value::Array(items) = value else {
        return Err(Error::MalformedResponse(
            "Generated JSON is not an array".to_string(),
        ));
    };

    if items.len() < PLACE_COUNT {
        return Err(Error::MalformedResponse(format!(
            "Expected {} places, got {}",
            PLACE_COUNT,
            items.len()
        )));
    }

    items
        .into_iter()
        .take(PLACE_COUNT)
        .map(|item| {
            serde_json::from_value::<PlaceSummary>(item)
                .map_err(|e| Error::MalformedResponse(format!("Invalid place entry: {}", e)))
        })
        .map(|place| {
            let place = place?;
            if place.name.trim().is_empty() {
                return Err(Error::MalformedResponse("Place without a name".to_string()));
            }
            Ok(place)
        })
        .collect()
}
