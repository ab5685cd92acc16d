//! Command line interface.

use clap::Parser;

/// Command line arguments.
///
/// Only `-v`/`--version` is recognized; anything else is accepted and the
/// service starts normally.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "rest-api-template",
    about = "REST API service",
    disable_version_flag = true
)]
pub struct Cli {
    /// Print name, version, commit and build date, then exit
    #[arg(short = 'v', long = "version")]
    pub version: bool,

    #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
    pub rest: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_version_flag() {
        let cli = Cli::try_parse_from(["rest-api-template", "--version"]).unwrap();
        assert!(cli.version);
    }

    #[test]
    fn test_short_version_flag() {
        let cli = Cli::try_parse_from(["rest-api-template", "-v"]).unwrap();
        assert!(cli.version);
    }

    #[test]
    fn test_no_arguments_starts_service() {
        let cli = Cli::try_parse_from(["rest-api-template"]).unwrap();
        assert!(!cli.version);
        assert!(cli.rest.is_empty());
    }

    #[test]
    fn test_other_arguments_start_service() {
        let cli = Cli::try_parse_from(["rest-api-template", "serve", "--version"]).unwrap();
        assert!(!cli.version);
        assert_eq!(cli.rest, vec!["serve", "--version"]);
    }
}
