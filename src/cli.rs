//! CLI argument definitions.

use std::path::PathBuf;

use clap::Parser;

use crate::config::DEFAULT_CONFIG_FILE;

/// Top-level CLI parser for `jira-export`.
#[derive(Debug, Parser)]
#[command(
    name = "jira-export",
    version,
    about = "Export the issues matching a Jira query to an Excel file"
)]
pub struct Cli {
    /// Path of the `.xlsx` file to write. An existing file is replaced.
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Properties file with `jira.url`, `jira.user`, `jira.password` and `jira.query`.
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Log debug output to stderr.
    #[arg(long)]
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::Parser;

    #[test]
    fn parses_output_path() {
        let cli = Cli::parse_from(["jira-export", "out.xlsx"]);
        assert_eq!(cli.output.to_str(), Some("out.xlsx"));
        assert_eq!(cli.config.to_str(), Some("jiraexport.properties"));
        assert!(!cli.debug);
    }

    #[test]
    fn accepts_config_override() {
        let cli = Cli::parse_from(["jira-export", "--config", "other.properties", "out.xlsx"]);
        assert_eq!(cli.config.to_str(), Some("other.properties"));
    }

    #[test]
    fn rejects_missing_output() {
        let err = Cli::try_parse_from(["jira-export"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn rejects_extra_positional() {
        let err = Cli::try_parse_from(["jira-export", "a.xlsx", "b.xlsx"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
