//! Library-root discovery: explicit input, platform lookup, and
//! `config.vdf` library-folder expansion.

use crate::app::manifest;
use crate::app::vdf::{self, VdfError};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Linux
        }
    }
}

/// Normalizes a path string: backslashes become forward slashes (Windows
/// only), separator runs collapse to one, a trailing separator is stripped.
pub fn normalize_path(path: &str, platform: Platform) -> String {
    let path = if platform == Platform::Windows {
        path.replace('\\', "/")
    } else {
        path.to_string()
    };
    let mut out = String::with_capacity(path.len());
    let mut prev_sep = false;
    for c in path.chars() {
        if c == '/' {
            if prev_sep {
                continue;
            }
            prev_sep = true;
        } else {
            prev_sep = false;
        }
        out.push(c);
    }
    if out.ends_with('/') {
        out.pop();
    }
    out
}

/// Ordered discovery result. Roots are intentionally not deduplicated.
#[derive(Debug, Default)]
pub struct Resolution {
    pub roots: Vec<String>,
    pub scan_dirs: Vec<String>,
}

/// Expands explicit/detected roots into the list of directories to scan.
///
/// Each root that exists contributes `<root>/steamapps`; its
/// `config/config.vdf` may declare further library folders, which are
/// appended unchecked to the working list (their own configs are not read —
/// discovery is single-level). A current directory that already holds
/// manifest files is scanned too.
pub fn resolve(explicit_roots: &[String], explicit_apps: &[String], platform: Platform) -> Resolution {
    let mut working: Vec<String> = explicit_roots.to_vec();
    if working.is_empty() {
        match detect_root(platform) {
            Some(root) => working.push(root),
            None => log::warn!("could not auto-detect a Steam installation"),
        }
    }
    let original_count = working.len();

    let mut roots = Vec::new();
    let mut scan_dirs: Vec<String> = explicit_apps.to_vec();
    let mut index = 0;
    while index < working.len() {
        let candidate = working[index].clone();
        let declared_by_config = index >= original_count;
        index += 1;

        if !Path::new(&candidate).is_dir() {
            log::warn!("steam path {candidate} doesn't exist");
            continue;
        }
        let root = normalize_path(&candidate, platform);
        roots.push(root.clone());
        scan_dirs.push(format!("{root}/steamapps"));

        if declared_by_config {
            continue;
        }
        match library_folders(&root) {
            Ok(folders) => {
                for folder in folders {
                    working.push(folder.clone());
                    let folder = normalize_path(&folder, platform);
                    if Path::new(&folder).is_dir() {
                        roots.push(folder.clone());
                        scan_dirs.push(format!("{folder}/steamapps"));
                    }
                }
            }
            Err(err) => log::warn!("{err}"),
        }
    }

    if !manifest::manifest_files(".").is_empty() {
        scan_dirs.push(".".to_string());
    }

    Resolution { roots, scan_dirs }
}

/// Additional library folders declared in `<root>/config/config.vdf`.
fn library_folders(root: &str) -> Result<Vec<String>, VdfError> {
    let config = vdf::load_file(Path::new(&format!("{root}/config/config.vdf")))?;
    Ok(config
        .get("InstallConfigStore/Software/Valve/Steam")
        .map(|steam| steam.as_array("BaseInstallFolder"))
        .unwrap_or_default())
}

/// Platform-default Steam root. Lookup failures degrade to a warning (and on
/// Linux to the conventional user directory), never an abort.
pub fn detect_root(platform: Platform) -> Option<String> {
    match platform {
        Platform::Windows => {
            windows_install_path().map(|path| normalize_path(&path, platform))
        }
        Platform::MacOs => {
            let home = home_dir()?;
            Some(format!("{home}/Library/Application Support/Steam"))
        }
        Platform::Linux => {
            let home = home_dir()?;
            let install = linux_registry_value(&home, "Registry/HKLM/SOFTWARE/Valve/Steam/InstallPath")
                .unwrap_or_else(|| format!("{home}/.local/share/Steam"));
            Some(normalize_path(&install, platform))
        }
    }
}

fn home_dir() -> Option<String> {
    match dirs::home_dir() {
        Some(home) => Some(home.to_string_lossy().into_owned()),
        None => {
            log::warn!("could not determine the home directory");
            None
        }
    }
}

/// Reads a value from the `~/.steam/registry.vdf` pseudo-registry.
fn linux_registry_value(home: &str, path: &str) -> Option<String> {
    let file = format!("{home}/.steam/registry.vdf");
    match vdf::load_file(Path::new(&file)) {
        Ok(registry) => registry
            .get(path)
            .and_then(|node| node.get_str())
            .map(str::to_string),
        Err(err) => {
            log::warn!("{err}");
            None
        }
    }
}

#[cfg(windows)]
fn windows_install_path() -> Option<String> {
    use winreg::enums::{HKEY_LOCAL_MACHINE, KEY_READ};
    use winreg::RegKey;

    let key_path = if cfg!(target_arch = "x86_64") {
        r"SOFTWARE\Wow6432Node\Valve\Steam"
    } else {
        r"SOFTWARE\Valve\Steam"
    };
    let key = match RegKey::predef(HKEY_LOCAL_MACHINE).open_subkey_with_flags(key_path, KEY_READ) {
        Ok(key) => key,
        Err(err) => {
            log::warn!(r"HKLM\{key_path}: {err}");
            return None;
        }
    };
    match key.get_value::<String, _>("InstallPath") {
        Ok(path) => Some(path),
        Err(err) => {
            log::warn!(r"HKLM\{key_path}\InstallPath: {err}");
            None
        }
    }
}

#[cfg(not(windows))]
fn windows_install_path() -> Option<String> {
    None
}
