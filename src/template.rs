use std::collections::HashMap;
use std::path::Path;

use crate::error::{Error, Result};

/// Known issue-title template variable names for validation.
const KNOWN_VARIABLES: &[&str] = &["reviewer", "reviewee"];

/// Resolve the review template body from its configured source.
///
/// Exactly one of `file` / `text` must be supplied; supplying both or
/// neither is a configuration error.
pub fn resolve_review_template(file: Option<&str>, text: Option<&str>) -> Result<String> {
    match (file, text) {
        (Some(_), Some(_)) => Err(Error::ConfigValidation(
            "both template_file and template_text supplied, expected exactly one".to_string(),
        )),
        (None, None) => Err(Error::ConfigValidation(
            "no review template configured, supply template_file or template_text".to_string(),
        )),
        (Some(path), None) => Ok(std::fs::read_to_string(Path::new(path))?),
        (None, Some(text)) => Ok(text.to_string()),
    }
}

/// Render an issue title by substituting `{{variable}}` placeholders.
/// Errors on unknown variables (strict mode).
pub fn render_title(template: &str, reviewer: &str, reviewee: &str) -> Result<String> {
    let vars: HashMap<&str, &str> =
        HashMap::from([("reviewer", reviewer), ("reviewee", reviewee)]);

    let mut result = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '{' && chars.peek() == Some(&'{') {
            chars.next(); // consume second {
            let mut var_name = String::new();
            let mut found_close = false;

            while let Some(c2) = chars.next() {
                if c2 == '}' && chars.peek() == Some(&'}') {
                    chars.next(); // consume second }
                    found_close = true;
                    break;
                }
                var_name.push(c2);
            }

            if !found_close {
                return Err(Error::Template(format!(
                    "unclosed template variable: {{{{{var_name}"
                )));
            }

            let var_name = var_name.trim();
            if !KNOWN_VARIABLES.contains(&var_name) {
                return Err(Error::Template(format!(
                    "unknown template variable: {var_name}"
                )));
            }

            match vars.get(var_name) {
                Some(value) => result.push_str(value),
                None => {
                    return Err(Error::Template(format!(
                        "missing value for template variable: {var_name}"
                    )));
                }
            }
        } else {
            result.push(c);
        }
    }

    Ok(result)
}
