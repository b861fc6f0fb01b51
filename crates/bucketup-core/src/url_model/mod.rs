//! File name derivation for downloaded installers.
//!
//! The kept artifact is named after the last path segment of its download URL,
//! sanitized so it is a valid file name on both Windows and Linux.

mod path;
mod sanitize;

pub use path::filename_from_url_path;
pub use sanitize::sanitize_file_name;

/// File name when the URL path yields nothing usable.
const DEFAULT_FILENAME: &str = "installer.bin";

/// Derives a safe local file name for the artifact downloaded from `url`.
///
/// - `artifact_file_name("https://example.com/app_Setup.exe")` → `"app_Setup.exe"`
/// - `artifact_file_name("https://example.com/")` → `"installer.bin"`
pub fn artifact_file_name(url: &str) -> String {
    let sanitized = filename_from_url_path(url)
        .map(|raw| sanitize_file_name(&raw))
        .unwrap_or_default();
    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        DEFAULT_FILENAME.to_string()
    } else {
        sanitized
    }
}
