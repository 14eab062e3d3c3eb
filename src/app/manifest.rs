//! Decoded `appmanifest_*.acf` files and dotted-path field access.

use crate::app::models::FieldValue;
use crate::app::vdf::{self, VdfError, VdfNode};
use globset::{Glob, GlobMatcher};
use std::fs;
use std::path::{Path, PathBuf};

/// Naming pattern of per-application manifest files.
pub const MANIFEST_PATTERN: &str = "appmanifest_*.acf";

/// Keys whose values are numeric in the manifest format.
const INTEGER_FIELDS: [&str; 8] = [
    "appid",
    "stateflags",
    "sizeondisk",
    "buildid",
    "lastupdated",
    "universe",
    "bytestodownload",
    "bytesdownloaded",
];

/// The `AppState` object of one manifest file.
#[derive(Debug, Clone)]
pub struct Manifest {
    app_state: VdfNode,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self, VdfError> {
        let document = vdf::load_file(path)?;
        Self::from_document(document, &path.display().to_string())
    }

    pub fn parse(text: &str, origin: &str) -> Result<Self, VdfError> {
        let document = vdf::parse(text, origin)?;
        Self::from_document(document, origin)
    }

    fn from_document(document: VdfNode, origin: &str) -> Result<Self, VdfError> {
        match document.get("AppState") {
            Some(app_state @ VdfNode::Obj(_)) => Ok(Self {
                app_state: app_state.clone(),
            }),
            _ => Err(VdfError::Parse {
                path: origin.to_string(),
                message: "missing `AppState` section".to_string(),
            }),
        }
    }

    /// Resolves a dotted field name (`UserConfig.Name`) case-insensitively.
    ///
    /// Returns [`FieldValue::Absent`] when the path is missing or names a
    /// sub-record instead of a scalar. Leaves named by [`INTEGER_FIELDS`]
    /// coerce to numbers and `installed` to a boolean, the way the original
    /// SteamCodec accessors did.
    pub fn get(&self, field: &str) -> FieldValue {
        let path = field.replace('.', "/");
        let Some(node) = self.app_state.get(&path) else {
            return FieldValue::Absent;
        };
        let Some(value) = node.get_str() else {
            return FieldValue::Absent;
        };
        let leaf = field
            .rsplit('.')
            .next()
            .unwrap_or(field)
            .to_ascii_lowercase();
        if leaf == "installed" {
            return FieldValue::Bool(value == "1");
        }
        if INTEGER_FIELDS.contains(&leaf.as_str()) {
            if let Ok(n) = value.parse::<u64>() {
                return FieldValue::UInt(n);
            }
        }
        FieldValue::Str(value.to_string())
    }
}

pub fn manifest_matcher() -> GlobMatcher {
    Glob::new(MANIFEST_PATTERN)
        .expect("manifest pattern is a valid glob")
        .compile_matcher()
}

/// Manifest files directly inside `dir`, in lexical order. Unreadable
/// directories log a diagnostic and yield nothing.
pub fn manifest_files(dir: &str) -> Vec<PathBuf> {
    let matcher = manifest_matcher();
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            log::warn!("{dir}: {err}");
            return Vec::new();
        }
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .is_some_and(|name| matcher.is_match(Path::new(name)))
        })
        .collect();
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACF: &str = r#"
"AppState"
{
    "appid"        "440"
    "Universe"     "1"
    "name"         "Team Fortress 2"
    "StateFlags"   "4"
    "installdir"   "Team Fortress 2"
    "LastUpdated"  "1556120776"
    "SizeOnDisk"   "26303562838"
    "buildid"      "3796712"
    "UserConfig"
    {
        "name"           "Team Fortress 2"
        "Installed"      "1"
        "appinstalldir"  "/games/steam/steamapps/common/Team Fortress 2"
    }
}
"#;

    #[test]
    fn known_numeric_fields_coerce() {
        let manifest = Manifest::parse(ACF, "test").unwrap();
        assert_eq!(manifest.get("AppID"), FieldValue::UInt(440));
        assert_eq!(manifest.get("SizeOnDisk"), FieldValue::UInt(26303562838));
        assert_eq!(manifest.get("BuildId"), FieldValue::UInt(3796712));
    }

    #[test]
    fn dotted_lookup_reaches_user_config() {
        let manifest = Manifest::parse(ACF, "test").unwrap();
        assert_eq!(
            manifest.get("UserConfig.Name"),
            FieldValue::Str("Team Fortress 2".to_string())
        );
        assert_eq!(manifest.get("UserConfig.Installed"), FieldValue::Bool(true));
        assert_eq!(
            manifest.get("UserConfig.AppInstallDir"),
            FieldValue::Str("/games/steam/steamapps/common/Team Fortress 2".to_string())
        );
    }

    #[test]
    fn lookup_ignores_case() {
        let manifest = Manifest::parse(ACF, "test").unwrap();
        assert_eq!(
            manifest.get("installdir"),
            FieldValue::Str("Team Fortress 2".to_string())
        );
        assert_eq!(
            manifest.get("InstallDir"),
            FieldValue::Str("Team Fortress 2".to_string())
        );
    }

    #[test]
    fn missing_and_non_scalar_fields_are_absent() {
        let manifest = Manifest::parse(ACF, "test").unwrap();
        assert_eq!(manifest.get("NoSuchField"), FieldValue::Absent);
        assert_eq!(manifest.get("UserConfig"), FieldValue::Absent);
        assert_eq!(manifest.get("UserConfig.Missing"), FieldValue::Absent);
    }

    #[test]
    fn document_without_app_state_is_rejected() {
        assert!(Manifest::parse("\"Other\" { \"k\" \"v\" }", "test").is_err());
    }

    #[test]
    fn matcher_accepts_only_manifest_names() {
        let matcher = manifest_matcher();
        assert!(matcher.is_match("appmanifest_440.acf"));
        assert!(!matcher.is_match("appmanifest_440.acf.tmp"));
        assert!(!matcher.is_match("config.vdf"));
    }
}
