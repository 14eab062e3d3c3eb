//! Thin boundary over `keyvalues-parser`: decodes Valve's text key-value
//! format (ACF manifests, `config.vdf`, `registry.vdf`) into an owned tree so
//! the rest of the crate never deals with parser lifetimes.

use indexmap::IndexMap;
use keyvalues_parser::{Value, Vdf};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VdfError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },
}

/// One node of a decoded VDF document. Duplicate keys keep the last value.
#[derive(Debug, Clone, PartialEq)]
pub enum VdfNode {
    Str(String),
    Obj(IndexMap<String, VdfNode>),
}

impl VdfNode {
    /// Looks up a `/`-separated path, matching each segment case-insensitively.
    pub fn get(&self, path: &str) -> Option<&VdfNode> {
        let mut current = self;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            match current {
                VdfNode::Obj(map) => {
                    current = map
                        .iter()
                        .find(|(key, _)| key.eq_ignore_ascii_case(segment))
                        .map(|(_, node)| node)?;
                }
                VdfNode::Str(_) => return None,
            }
        }
        Some(current)
    }

    pub fn get_str(&self) -> Option<&str> {
        match self {
            VdfNode::Str(s) => Some(s),
            VdfNode::Obj(_) => None,
        }
    }

    /// Collects the array-style keys `name` / `name_1` / `name_2` …, ordered
    /// by their numeric suffix (`name` itself counts as 0).
    pub fn as_array(&self, name: &str) -> Vec<String> {
        let VdfNode::Obj(map) = self else {
            return Vec::new();
        };
        let mut entries: Vec<(u64, String)> = Vec::new();
        for (key, node) in map {
            let Some(value) = node.get_str() else { continue };
            let lower = key.to_ascii_lowercase();
            let base = name.to_ascii_lowercase();
            if lower == base {
                entries.push((0, value.to_string()));
            } else if let Some(suffix) = lower.strip_prefix(&format!("{base}_")) {
                if let Ok(index) = suffix.parse::<u64>() {
                    entries.push((index, value.to_string()));
                }
            }
        }
        entries.sort_by_key(|(index, _)| *index);
        entries.into_iter().map(|(_, value)| value).collect()
    }
}

/// Parses VDF text into a single-entry object keyed by the document's root
/// key (`AppState`, `InstallConfigStore`, `Registry`, …).
pub fn parse(text: &str, origin: &str) -> Result<VdfNode, VdfError> {
    let document = Vdf::parse(text).map_err(|e| VdfError::Parse {
        path: origin.to_string(),
        message: e.to_string(),
    })?;
    let mut root = IndexMap::new();
    root.insert(document.key.to_string(), convert(&document.value));
    Ok(VdfNode::Obj(root))
}

pub fn load_file(path: &Path) -> Result<VdfNode, VdfError> {
    let text = fs::read_to_string(path).map_err(|source| VdfError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse(&text, &path.display().to_string())
}

fn convert(value: &Value<'_>) -> VdfNode {
    match value {
        Value::Str(s) => VdfNode::Str(s.to_string()),
        Value::Obj(obj) => {
            let mut map = IndexMap::new();
            for (key, values) in obj.iter() {
                if let Some(last) = values.last() {
                    map.insert(key.to_string(), convert(last));
                }
            }
            VdfNode::Obj(map)
        }
    }
}
