use crate::app::cli::ListMode;
use crate::app::manifest::Manifest;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// One scalar cell of a report row.
///
/// Missing manifest fields stay [`FieldValue::Absent`] so a row is never
/// rejected for an incomplete manifest; the serializers decide how absence
/// looks (empty CSV cell, JSON/YAML null).
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Absent,
    Str(String),
    UInt(u64),
    Bool(bool),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Absent => Ok(()),
            FieldValue::Str(s) => f.write_str(s),
            FieldValue::UInt(n) => write!(f, "{n}"),
            FieldValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Absent => serializer.serialize_none(),
            FieldValue::Str(s) => serializer.serialize_str(s),
            FieldValue::UInt(n) => serializer.serialize_u64(*n),
            FieldValue::Bool(b) => serializer.serialize_bool(*b),
        }
    }
}

pub type Row = Vec<FieldValue>;
pub type Header = Vec<String>;

/// Ordered header plus rows aligned to it positionally.
#[derive(Debug, Clone)]
pub struct Report {
    pub header: Header,
    pub rows: Vec<Row>,
}

/// Ascending order on the first column: numeric when both sides are numeric,
/// case-sensitive lexical otherwise (uppercase sorts before lowercase).
pub fn compare_first_column(a: &Row, b: &Row) -> Ordering {
    match (a.first(), b.first()) {
        (Some(FieldValue::UInt(x)), Some(FieldValue::UInt(y))) => x.cmp(y),
        (x, y) => {
            let x = x.map(ToString::to_string).unwrap_or_default();
            let y = y.map(ToString::to_string).unwrap_or_default();
            x.cmp(&y)
        }
    }
}

/// How one column of a table report gets its value.
#[derive(Debug, Clone)]
pub enum Column {
    /// Dotted-path lookup against the manifest.
    Field(String),
    /// Same lookup, with the string result path-normalized.
    NormalizedField(String),
    /// The scan directory the manifest was found in.
    ScanDir,
}

/// Header + per-column accessors + optional per-manifest predicate. The
/// export and list/downloaded/installed reports are all instances of this.
#[derive(Debug, Clone)]
pub struct TableSpec {
    pub header: Header,
    pub columns: Vec<Column>,
    pub filter: Option<fn(&Manifest) -> bool>,
}

#[derive(Debug, Clone)]
pub enum ReportKind {
    Table(TableSpec),
    /// `common/` subdirectories no manifest's InstallDir references.
    Unreferenced,
}

fn is_installed(manifest: &Manifest) -> bool {
    matches!(
        manifest.get("UserConfig.Installed"),
        FieldValue::Bool(true)
    )
}

impl ReportKind {
    pub fn export(fields: Vec<String>) -> Self {
        let columns = fields.iter().cloned().map(Column::Field).collect();
        ReportKind::Table(TableSpec {
            header: fields,
            columns,
            filter: None,
        })
    }

    pub fn list(mode: ListMode) -> Self {
        match mode {
            ListMode::Downloaded => ReportKind::Table(TableSpec {
                header: vec![
                    "AppID".into(),
                    "UserConfig.Name".into(),
                    "InstallDir".into(),
                    "AppDir".into(),
                ],
                columns: vec![
                    Column::Field("AppID".into()),
                    Column::Field("UserConfig.Name".into()),
                    Column::Field("InstallDir".into()),
                    Column::ScanDir,
                ],
                filter: None,
            }),
            ListMode::Installed => ReportKind::Table(TableSpec {
                header: vec![
                    "AppID".into(),
                    "UserConfig.Name".into(),
                    "InstallDir".into(),
                    "UserConfig.AppInstallDir".into(),
                ],
                columns: vec![
                    Column::Field("AppID".into()),
                    Column::Field("UserConfig.Name".into()),
                    Column::Field("InstallDir".into()),
                    Column::NormalizedField("UserConfig.AppInstallDir".into()),
                ],
                filter: Some(is_installed),
            }),
            ListMode::Unreferenced => ReportKind::Unreferenced,
        }
    }

    pub fn header(&self) -> Header {
        match self {
            ReportKind::Table(spec) => spec.header.clone(),
            ReportKind::Unreferenced => vec!["InstallDir".into(), "AppPath".into()],
        }
    }
}
