use tracing::warn;

use crate::scanner::Finding;

/// Parse raw model output into findings, tolerating everything a model
/// can realistically emit: code fences, prose around the JSON, and
/// mildly malformed arrays. Any failure yields an empty list; this
/// function never errors and never panics.
pub fn parse_findings(raw: &str) -> Vec<Finding> {
    let stripped = strip_code_fences(raw);
    let array = match extract_json_array(stripped) {
        Some(array) => array,
        None => {
            if !stripped.trim().is_empty() {
                warn!("model response contained no JSON array; treating as zero findings");
            }
            return Vec::new();
        }
    };

    match decode_findings(array) {
        Ok(findings) => findings,
        Err(err) => {
            warn!(error = %err, "failed to decode findings from model response");
            Vec::new()
        }
    }
}

fn decode_findings(array: &str) -> Result<Vec<Finding>, String> {
    match serde_json::from_str::<Vec<Finding>>(array) {
        Ok(findings) => Ok(findings),
        // json5 copes with trailing commas, unquoted keys and single
        // quotes, which chat models produce often enough to matter.
        Err(strict_err) => json5::from_str::<Vec<Finding>>(array)
            .map_err(|lenient_err| format!("{strict_err}; json5 fallback: {lenient_err}")),
    }
}

/// Remove leading/trailing triple-backtick fence markers, including a
/// language tag on the opening fence.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```") {
        // Drop the tag line ("json", "html", …) if one follows the fence.
        text = match rest.split_once('\n') {
            Some((_tag, body)) => body,
            None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
        };
    }
    if let Some(rest) = text.trim_end().strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

/// Locate the first complete bracketed JSON array in free text.
///
/// Depth-tracking scan rather than a greedy regex: brackets inside
/// string literals (and escaped quotes inside those strings) must not
/// open or close the array.
pub fn extract_json_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escape {
                escape = false;
            } else if ch == '\\' {
                escape = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    let end = start + offset + ch.len_utf8();
                    return Some(&text[start..end]);
                }
            }
            _ => {}
        }
    }
    None
}
