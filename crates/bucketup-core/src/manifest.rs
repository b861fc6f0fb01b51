//! Scoop manifest document: load, field replacement, atomic write-back.
//!
//! Fields are addressed by JSON Pointer. Key order of the original document is
//! kept (`serde_json` `preserve_order`), output reuses the file's indent unit
//! with non-ASCII characters written verbatim, and the original line ending
//! and trailing newline convention are reproduced.

use crate::error::{Result, UpdateError};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    doc: Value,
    indent: String,
    crlf: bool,
    trailing_newline: bool,
}

const DEFAULT_INDENT: &str = "  ";

/// Leading whitespace of the first indented line, i.e. one nesting level.
fn detect_indent(raw: &str) -> String {
    raw.lines()
        .skip(1)
        .map(|line| {
            let body = line.trim_start_matches([' ', '\t']);
            &line[..line.len() - body.len()]
        })
        .find(|ws| !ws.is_empty())
        .unwrap_or(DEFAULT_INDENT)
        .to_string()
}

/// Split `/a/b~1c` into parent pointer `/a` and unescaped key `b/c`.
fn split_pointer(pointer: &str) -> Option<(&str, String)> {
    if !pointer.starts_with('/') {
        return None;
    }
    let idx = pointer.rfind('/')?;
    let key = pointer[idx + 1..].replace("~1", "/").replace("~0", "~");
    if key.is_empty() {
        return None;
    }
    Some((&pointer[..idx], key))
}

impl Manifest {
    /// Read and parse the manifest at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(UpdateError::manifest(path, "manifest not found"));
            }
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                return Err(UpdateError::manifest(path, "manifest is not valid UTF-8"));
            }
            Err(e) => return Err(UpdateError::io("reading manifest", path, e)),
        };
        Self::parse(path, &raw)
    }

    /// Parse manifest text that was read from `path`.
    pub fn parse(path: &Path, raw: &str) -> Result<Self> {
        let doc: Value = serde_json::from_str(raw)
            .map_err(|e| UpdateError::manifest(path, format!("invalid JSON: {e}")))?;
        if !doc.is_object() {
            return Err(UpdateError::manifest(path, "top level is not a JSON object"));
        }
        Ok(Self {
            path: path.to_path_buf(),
            doc,
            indent: detect_indent(raw),
            crlf: raw.contains("\r\n"),
            trailing_newline: raw.ends_with('\n'),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// String value at `pointer`, if present and a string.
    pub fn get_str(&self, pointer: &str) -> Option<&str> {
        self.doc.pointer(pointer).and_then(Value::as_str)
    }

    /// Check that `pointer` names a key whose parent object exists.
    pub fn check_field(&self, pointer: &str) -> Result<()> {
        let (parent, _) = split_pointer(pointer).ok_or_else(|| {
            UpdateError::Configuration(format!("invalid field pointer {pointer:?}"))
        })?;
        match self.doc.pointer(parent) {
            Some(Value::Object(_)) => Ok(()),
            Some(_) => Err(UpdateError::manifest(
                &self.path,
                format!("{parent} is not an object, cannot set {pointer}"),
            )),
            None => Err(UpdateError::manifest(
                &self.path,
                format!("missing {parent}, cannot set {pointer}"),
            )),
        }
    }

    /// Insert or replace the string at `pointer`; other keys keep their position.
    pub fn set_field(&mut self, pointer: &str, value: &str) -> Result<()> {
        self.check_field(pointer)?;
        let (parent, key) = split_pointer(pointer).ok_or_else(|| {
            UpdateError::Configuration(format!("invalid field pointer {pointer:?}"))
        })?;
        match self.doc.pointer_mut(parent) {
            Some(Value::Object(map)) => {
                map.insert(key, Value::String(value.to_string()));
                Ok(())
            }
            _ => Err(UpdateError::manifest(
                &self.path,
                format!("missing {parent}, cannot set {pointer}"),
            )),
        }
    }

    /// Serialized document in the original file's conventions.
    pub fn to_json_string(&self) -> Result<String> {
        let mut buf = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(
            &mut buf,
            PrettyFormatter::with_indent(self.indent.as_bytes()),
        );
        self.doc
            .serialize(&mut ser)
            .map_err(|e| UpdateError::manifest(&self.path, format!("serialize: {e}")))?;
        let mut out = String::from_utf8(buf)
            .map_err(|e| UpdateError::manifest(&self.path, format!("serialize: {e}")))?;
        if self.trailing_newline {
            out.push('\n');
        }
        if self.crlf {
            out = out.replace('\n', "\r\n");
        }
        Ok(out)
    }

    /// Write the document back over its source path.
    ///
    /// Goes through a temp file in the same directory and a rename, so a failed
    /// write never leaves a truncated manifest behind.
    pub fn save(&self) -> Result<()> {
        let text = self.to_json_string()?;
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::Builder::new()
            .prefix(".bucketup-")
            .suffix(".json.tmp")
            .tempfile_in(dir)
            .map_err(|e| UpdateError::io("creating temp manifest in", dir, e))?;
        tmp.write_all(text.as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| UpdateError::io("writing temp manifest", tmp.path(), e))?;
        tmp.persist(&self.path)
            .map_err(|e| UpdateError::io("replacing manifest", &self.path, e.error))?;
        tracing::debug!(path = %self.path.display(), "manifest written");
        Ok(())
    }
}
