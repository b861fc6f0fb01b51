//! Download URL construction from a version string and a URL template.
//!
//! Templates use `{name}` placeholders. Recognised names are `version` (as
//! given), `dash_version` (`7-2-1-78900`), `underscore_version`
//! (`7_2_1_78900`) and `clean_version` (`72178900`). At least one must appear.

use crate::error::{Result, UpdateError};

const PLACEHOLDERS: [&str; 4] = [
    "version",
    "dash_version",
    "underscore_version",
    "clean_version",
];

fn spelling(name: &str, version: &str) -> Option<String> {
    match name {
        "version" => Some(version.to_string()),
        "dash_version" => Some(version.replace('.', "-")),
        "underscore_version" => Some(version.replace('.', "_")),
        "clean_version" => Some(version.replace('.', "")),
        _ => None,
    }
}

/// Rejects an empty version or one containing whitespace.
pub fn check_version(version: &str) -> Result<()> {
    if version.trim().is_empty() {
        return Err(UpdateError::Configuration(
            "version must not be empty".to_string(),
        ));
    }
    if version.chars().any(char::is_whitespace) {
        return Err(UpdateError::Configuration(format!(
            "version must not contain whitespace: {version:?}"
        )));
    }
    Ok(())
}

/// Build the download URL for `version` from `template`.
///
/// Fails with `Configuration` when no template is configured, the template
/// has no recognised placeholder or an unknown one, or the result is not an
/// absolute http(s) URL.
pub fn render_url(template: Option<&str>, version: &str) -> Result<String> {
    check_version(version)?;
    let template = template
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| UpdateError::Configuration("no URL template configured".to_string()))?;

    let mut out = String::with_capacity(template.len() + version.len());
    let mut rest = template;
    let mut substituted = 0usize;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = after.find('}').ok_or_else(|| {
            UpdateError::Configuration(format!("unterminated placeholder in URL template {template}"))
        })?;
        let name = &after[..close];
        let value = spelling(name, version).ok_or_else(|| {
            UpdateError::Configuration(format!(
                "unknown placeholder {{{name}}} in URL template (expected one of: {})",
                PLACEHOLDERS.join(", ")
            ))
        })?;
        out.push_str(&value);
        substituted += 1;
        rest = &after[close + 1..];
    }
    out.push_str(rest);

    if substituted == 0 {
        return Err(UpdateError::Configuration(format!(
            "URL template has no version placeholder: {template}"
        )));
    }

    match url::Url::parse(&out) {
        Ok(u) if u.scheme() == "http" || u.scheme() == "https" => Ok(out),
        Ok(u) => Err(UpdateError::Configuration(format!(
            "URL template must be http(s), got scheme {}: {out}",
            u.scheme()
        ))),
        Err(e) => Err(UpdateError::Configuration(format!(
            "URL template does not produce a valid URL ({e}): {out}"
        ))),
    }
}
