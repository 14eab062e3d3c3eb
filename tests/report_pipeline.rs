//! End-to-end aggregation tests over temporary steamapps trees.

use acf_manager::app::aggregator::aggregate;
use acf_manager::app::cli::{ListMode, OutputFormat};
use acf_manager::app::formatter::render;
use acf_manager::app::models::{FieldValue, ReportKind};
use acf_manager::app::paths::Platform;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_manifest(dir: &Path, app_id: u64, name: &str, install_dir: &str, installed: bool) {
    let installed = if installed { "1" } else { "0" };
    let text = format!(
        "\"AppState\"\n{{\n\t\"appid\"\t\"{app_id}\"\n\t\"StateFlags\"\t\"4\"\n\t\"installdir\"\t\"{install_dir}\"\n\t\"SizeOnDisk\"\t\"1024\"\n\t\"buildid\"\t\"77\"\n\t\"UserConfig\"\n\t{{\n\t\t\"name\"\t\"{name}\"\n\t\t\"Installed\"\t\"{installed}\"\n\t\t\"appinstalldir\"\t\"/library//steamapps/common/{install_dir}/\"\n\t}}\n}}\n"
    );
    fs::write(dir.join(format!("appmanifest_{app_id}.acf")), text).unwrap();
}

fn steamapps() -> (TempDir, String) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().to_string_lossy().into_owned();
    (dir, path)
}

#[test]
fn downloaded_mode_lists_every_manifest_sorted_by_app_id() {
    let (dir, path) = steamapps();
    write_manifest(dir.path(), 10, "Ten", "ten", true);
    write_manifest(dir.path(), 2, "Two", "two", false);
    write_manifest(dir.path(), 1, "One", "one", true);

    let report = aggregate(
        &[path.clone()],
        &ReportKind::list(ListMode::Downloaded),
        Platform::Linux,
    );

    assert_eq!(
        report.header,
        vec!["AppID", "UserConfig.Name", "InstallDir", "AppDir"]
    );
    let ids: Vec<&FieldValue> = report.rows.iter().map(|r| &r[0]).collect();
    assert_eq!(
        ids,
        vec![
            &FieldValue::UInt(1),
            &FieldValue::UInt(2),
            &FieldValue::UInt(10)
        ]
    );
    assert_eq!(report.rows[0][3], FieldValue::Str(path));
}

#[test]
fn installed_mode_filters_and_normalizes() {
    let (dir, path) = steamapps();
    write_manifest(dir.path(), 1, "One", "one", true);
    write_manifest(dir.path(), 2, "Two", "two", false);

    let report = aggregate(
        &[path],
        &ReportKind::list(ListMode::Installed),
        Platform::Linux,
    );

    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.rows[0][0], FieldValue::UInt(1));
    // Doubled separators collapse and the trailing slash goes away.
    assert_eq!(
        report.rows[0][3],
        FieldValue::Str("/library/steamapps/common/one".to_string())
    );
}

#[test]
fn export_mode_resolves_dotted_fields_and_tolerates_missing_ones() {
    let (dir, path) = steamapps();
    write_manifest(dir.path(), 440, "TF2", "tf2", true);

    let fields = vec![
        "AppID".to_string(),
        "UserConfig.Name".to_string(),
        "NoSuchField".to_string(),
    ];
    let report = aggregate(&[path], &ReportKind::export(fields), Platform::Linux);

    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.rows[0][0], FieldValue::UInt(440));
    assert_eq!(report.rows[0][1], FieldValue::Str("TF2".to_string()));
    assert_eq!(report.rows[0][2], FieldValue::Absent);
}

#[test]
fn unparsable_manifests_are_skipped_not_fatal() {
    let (dir, path) = steamapps();
    write_manifest(dir.path(), 1, "One", "one", true);
    fs::write(dir.path().join("appmanifest_9.acf"), "not a manifest {").unwrap();

    let report = aggregate(
        &[path],
        &ReportKind::list(ListMode::Downloaded),
        Platform::Linux,
    );

    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.rows[0][0], FieldValue::UInt(1));
}

#[test]
fn missing_scan_directories_are_skipped() {
    let (dir, path) = steamapps();
    write_manifest(dir.path(), 1, "One", "one", true);

    let report = aggregate(
        &["/nowhere/steamapps".to_string(), path],
        &ReportKind::list(ListMode::Downloaded),
        Platform::Linux,
    );

    assert_eq!(report.rows.len(), 1);
}

#[test]
fn unreferenced_mode_reports_unclaimed_common_dirs() {
    let (dir, path) = steamapps();
    write_manifest(dir.path(), 1, "A", "A", true);
    write_manifest(dir.path(), 2, "B", "B", true);
    for name in ["A", "B", "C"] {
        fs::create_dir_all(dir.path().join("common").join(name)).unwrap();
    }

    let report = aggregate(
        &[path.clone()],
        &ReportKind::list(ListMode::Unreferenced),
        Platform::Linux,
    );

    assert_eq!(report.header, vec!["InstallDir", "AppPath"]);
    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.rows[0][0], FieldValue::Str("C".to_string()));
    assert_eq!(
        report.rows[0][1],
        FieldValue::Str(format!("{path}/common/C"))
    );
}

#[test]
fn unreferenced_membership_ignores_case() {
    let (dir, path) = steamapps();
    write_manifest(dir.path(), 1, "A", "alpha", true);
    for name in ["Alpha", "Beta"] {
        fs::create_dir_all(dir.path().join("common").join(name)).unwrap();
    }

    let report = aggregate(
        &[path],
        &ReportKind::list(ListMode::Unreferenced),
        Platform::Linux,
    );

    // "Alpha" is claimed by the manifest's "alpha" despite the case difference.
    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.rows[0][0], FieldValue::Str("Beta".to_string()));
}

#[test]
fn rows_append_in_scan_dir_order() {
    let (first_dir, first) = steamapps();
    let (second_dir, second) = steamapps();
    write_manifest(first_dir.path(), 20, "Twenty", "twenty", true);
    write_manifest(second_dir.path(), 5, "Five", "five", true);

    let report = aggregate(
        &[first, second],
        &ReportKind::list(ListMode::Downloaded),
        Platform::Linux,
    );

    // Sorting is per directory; the second directory's rows follow the first's.
    let ids: Vec<&FieldValue> = report.rows.iter().map(|r| &r[0]).collect();
    assert_eq!(ids, vec![&FieldValue::UInt(20), &FieldValue::UInt(5)]);
}

#[test]
fn full_pipeline_renders_csv_for_a_scanned_library() {
    let (dir, path) = steamapps();
    write_manifest(dir.path(), 440, "Team Fortress 2", "tf2", true);

    let report = aggregate(
        &[path.clone()],
        &ReportKind::list(ListMode::Downloaded),
        Platform::Linux,
    );
    let text = render(OutputFormat::Csv, &report).unwrap();

    assert_eq!(
        text,
        format!("AppID,UserConfig.Name,InstallDir,AppDir\n440,Team Fortress 2,tf2,{path}\n")
    );
}
