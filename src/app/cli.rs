use clap::{Parser, ValueEnum};

/// Fields exported when `-f/--fields` is not given.
pub const DEFAULT_FIELDS: [&str; 8] = [
    "AppID",
    "StateFlags",
    "InstallDir",
    "SizeOnDisk",
    "BuildId",
    "UserConfig.Name",
    "UserConfig.Installed",
    "UserConfig.AppInstallDir",
];

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Export and list Steam application manifests"
)]
pub struct Cli {
    /// Paths to Steam directories
    #[arg(short, long = "paths", value_name = "DIRS", value_delimiter = ',')]
    pub paths: Vec<String>,

    /// Paths to steamapps directories
    #[arg(short, long = "apps", value_name = "DIRS", value_delimiter = ',')]
    pub apps: Vec<String>,

    /// Action to execute
    #[arg(short, long = "execute", value_enum, default_value_t = Action::Export)]
    pub execute: Action,

    /// Fields to export (dotted names address nested keys)
    #[arg(short, long = "fields", value_name = "NAMES", value_delimiter = ',')]
    pub fields: Option<Vec<String>>,

    /// Mode for `list`
    #[arg(short, long = "mode", value_enum, default_value_t = ListMode::Downloaded)]
    pub mode: ListMode,

    /// Output format
    #[arg(short, long = "output", value_enum, default_value_t = OutputFormat::Csv)]
    pub output: OutputFormat,

    /// File where to save output
    #[arg(short, long = "save", value_name = "FILE")]
    pub save: Option<String>,
}

impl Cli {
    /// Export-mode field list, falling back to [`DEFAULT_FIELDS`].
    pub fn fields(&self) -> Vec<String> {
        match &self.fields {
            Some(fields) => fields.clone(),
            None => DEFAULT_FIELDS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Export,
    List,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListMode {
    Downloaded,
    Installed,
    Unreferenced,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Yml,
    Json,
    Xml,
    Vdf,
}

impl OutputFormat {
    /// Tag used both as CLI value and as the auto-appended file extension.
    pub fn tag(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Yml => "yml",
            OutputFormat::Json => "json",
            OutputFormat::Xml => "xml",
            OutputFormat::Vdf => "vdf",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_surface() {
        let cli = Cli::parse_from(["acf-manager"]);
        assert_eq!(cli.execute, Action::Export);
        assert_eq!(cli.mode, ListMode::Downloaded);
        assert_eq!(cli.output, OutputFormat::Csv);
        assert!(cli.paths.is_empty());
        assert!(cli.save.is_none());
        assert_eq!(cli.fields().len(), 8);
        assert_eq!(cli.fields()[0], "AppID");
    }

    #[test]
    fn comma_separated_lists_split() {
        let cli = Cli::parse_from(["acf-manager", "-p", "/a,/b", "-f", "AppID,BuildId"]);
        assert_eq!(cli.paths, vec!["/a".to_string(), "/b".to_string()]);
        assert_eq!(cli.fields(), vec!["AppID".to_string(), "BuildId".to_string()]);
    }

    #[test]
    fn selector_values_parse() {
        let cli = Cli::parse_from(["acf-manager", "-e", "list", "-m", "unreferenced", "-o", "vdf"]);
        assert_eq!(cli.execute, Action::List);
        assert_eq!(cli.mode, ListMode::Unreferenced);
        assert_eq!(cli.output, OutputFormat::Vdf);
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert!(Cli::try_parse_from(["acf-manager", "-m", "bogus"]).is_err());
    }
}
