use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Firestorm beta installer on the upstream preview server.
pub const DEFAULT_URL_TEMPLATE: &str = "https://downloads.firestormviewer.org/preview/windows/Phoenix-Firestorm-Betax64_AVX2-{dash_version}_Setup.exe";

/// JSON Pointers (RFC 6901) to the three manifest fields the updater rewrites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldPointers {
    pub version: String,
    pub url: String,
    pub hash: String,
}

impl Default for FieldPointers {
    fn default() -> Self {
        Self {
            version: "/version".to_string(),
            url: "/architecture/64bit/url".to_string(),
            hash: "/architecture/64bit/hash".to_string(),
        }
    }
}

/// Updater configuration loaded from `~/.config/bucketup/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdaterConfig {
    /// Package name, used in the report and suggested commit message.
    pub package: String,
    /// Manifest file, relative paths resolve against the working directory.
    pub manifest_path: PathBuf,
    /// Download URL with a `{version}`-style placeholder. Missing = cannot update.
    #[serde(default)]
    pub url_template: Option<String>,
    /// Scratch directory for the download (None = `<system temp>/bucketup`).
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,
    /// Where the version/url/hash fields live in the manifest.
    #[serde(default)]
    pub fields: FieldPointers,
    /// Optional connect timeout in seconds (None = libcurl default).
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            package: "firestorm-beta".to_string(),
            manifest_path: PathBuf::from("bucket").join("firestorm-beta.json"),
            url_template: Some(DEFAULT_URL_TEMPLATE.to_string()),
            temp_dir: None,
            fields: FieldPointers::default(),
            connect_timeout_secs: None,
        }
    }
}

impl UpdaterConfig {
    /// Directory the installer is downloaded into.
    pub fn scratch_dir(&self) -> PathBuf {
        self.temp_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("bucketup"))
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("bucketup")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<UpdaterConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = UpdaterConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

/// Load configuration from an explicit file.
pub fn load_from(path: &Path) -> Result<UpdaterConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let cfg: UpdaterConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = UpdaterConfig::default();
        assert_eq!(cfg.package, "firestorm-beta");
        assert_eq!(
            cfg.manifest_path,
            PathBuf::from("bucket").join("firestorm-beta.json")
        );
        assert_eq!(cfg.url_template.as_deref(), Some(DEFAULT_URL_TEMPLATE));
        assert_eq!(cfg.fields.version, "/version");
        assert!(cfg.temp_dir.is_none());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = UpdaterConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: UpdaterConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.package, cfg.package);
        assert_eq!(parsed.manifest_path, cfg.manifest_path);
        assert_eq!(parsed.url_template, cfg.url_template);
        assert_eq!(parsed.fields, cfg.fields);
    }

    #[test]
    fn config_toml_minimal_uses_defaults() {
        let toml = r#"
            package = "app"
            manifest_path = "bucket/app.json"
        "#;
        let cfg: UpdaterConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.package, "app");
        assert!(cfg.url_template.is_none());
        assert_eq!(cfg.fields, FieldPointers::default());
        assert!(cfg.connect_timeout_secs.is_none());
    }

    #[test]
    fn config_toml_custom_fields() {
        let toml = r#"
            package = "tool"
            manifest_path = "bucket/tool.json"
            url_template = "https://example.com/tool-{version}.zip"
            temp_dir = "/var/tmp/scratch"
            connect_timeout_secs = 20

            [fields]
            version = "/version"
            url = "/url"
            hash = "/hash"
        "#;
        let cfg: UpdaterConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.fields.url, "/url");
        assert_eq!(cfg.fields.hash, "/hash");
        assert_eq!(cfg.scratch_dir(), PathBuf::from("/var/tmp/scratch"));
        assert_eq!(cfg.connect_timeout_secs, Some(20));
    }

    #[test]
    fn scratch_dir_defaults_under_system_temp() {
        let cfg = UpdaterConfig::default();
        assert_eq!(cfg.scratch_dir(), std::env::temp_dir().join("bucketup"));
    }

    #[test]
    fn load_from_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_from(&dir.path().join("nope.toml")).unwrap_err();
        assert!(format!("{:#}", err).contains("nope.toml"));
    }
}
