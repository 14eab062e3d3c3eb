//! Scans steamapps directories and builds report rows for the selected mode.

use crate::app::manifest::{self, Manifest};
use crate::app::models::{
    compare_first_column, Column, FieldValue, Report, ReportKind, Row, TableSpec,
};
use crate::app::paths::{normalize_path, Platform};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Builds the full report across `scan_dirs`, directory by directory.
///
/// Each directory's rows are sorted on the first column before being
/// appended, so the overall order is scan-dir order with per-directory
/// sorting. Unreferenced-mode rows instead keep `common/` enumeration order.
pub fn aggregate(scan_dirs: &[String], kind: &ReportKind, platform: Platform) -> Report {
    let mut report = Report {
        header: kind.header(),
        rows: Vec::new(),
    };
    for dir in scan_dirs {
        if !Path::new(dir).is_dir() {
            log::warn!("{dir} doesn't exist!");
            continue;
        }
        match kind {
            ReportKind::Table(spec) => {
                let mut rows = table_rows(dir, spec, platform);
                rows.sort_by(compare_first_column);
                report.rows.extend(rows);
            }
            ReportKind::Unreferenced => report.rows.extend(unreferenced_rows(dir, platform)),
        }
    }
    report
}

/// One row per manifest passing the spec's filter; a manifest that fails to
/// parse is logged and skipped without affecting its siblings.
fn table_rows(dir: &str, spec: &TableSpec, platform: Platform) -> Vec<Row> {
    let mut rows = Vec::new();
    for file in manifest::manifest_files(dir) {
        let manifest = match Manifest::load(&file) {
            Ok(manifest) => manifest,
            Err(err) => {
                log::warn!("{err}");
                continue;
            }
        };
        if let Some(filter) = spec.filter {
            if !filter(&manifest) {
                continue;
            }
        }
        let row = spec
            .columns
            .iter()
            .map(|column| match column {
                Column::Field(name) => manifest.get(name),
                Column::NormalizedField(name) => match manifest.get(name) {
                    FieldValue::Str(s) => FieldValue::Str(normalize_path(&s, platform)),
                    other => other,
                },
                Column::ScanDir => FieldValue::Str(dir.to_string()),
            })
            .collect();
        rows.push(row);
    }
    rows
}

/// Subdirectories of `<dir>/common/` that no manifest's InstallDir claims.
/// Membership is compared case-insensitively.
fn unreferenced_rows(dir: &str, platform: Platform) -> Vec<Row> {
    let mut referenced: HashSet<String> = HashSet::new();
    for file in manifest::manifest_files(dir) {
        let manifest = match Manifest::load(&file) {
            Ok(manifest) => manifest,
            Err(err) => {
                log::warn!("{err}");
                continue;
            }
        };
        match manifest.get("InstallDir") {
            FieldValue::Str(name) => {
                referenced.insert(normalize_path(&name, platform).to_lowercase());
            }
            _ => log::warn!(
                "{}: invalid manifest, missing `installdir` key",
                file.display()
            ),
        }
    }

    let common = format!("{dir}/common");
    let entries = match fs::read_dir(&common) {
        Ok(entries) => entries,
        Err(err) => {
            log::debug!("{common}: {err}");
            return Vec::new();
        }
    };
    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();
    names.sort();
    names
        .into_iter()
        .filter(|name| !referenced.contains(&name.to_lowercase()))
        .map(|name| {
            let path = format!("{common}/{name}");
            vec![FieldValue::Str(name), FieldValue::Str(path)]
        })
        .collect()
}
