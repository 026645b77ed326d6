//! Command-line interface definitions.

use clap::{ColorChoice, Parser};
use std::net::IpAddr;
use std::path::PathBuf;

/// Live viewer for a single markdown file
#[derive(Parser, Debug, Clone, Default)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Markdown file to view [default: docs.md in the current directory]
    #[arg(value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    pub file: Option<PathBuf>,

    /// Control colored output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,

    /// Optional config file (TOML with [serve] and [markdown] sections)
    #[arg(short = 'C', long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Preferred HTTP port; the next free port is used when it is taken
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
    #[arg(short, long)]
    pub interface: Option<IpAddr>,

    /// Preferred port for the live-reload socket [default: after the HTTP port]
    #[arg(long)]
    pub ws_port: Option<u16>,

    /// Collapse changes arriving within this many milliseconds into one reload
    #[arg(short, long, value_name = "MS")]
    pub debounce: Option<u64>,

    /// Directory served for static assets [default: the executable's directory]
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub assets: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_args() {
        let cli = Cli::try_parse_from(["mdview"]).unwrap();
        assert!(cli.file.is_none());
        assert!(!cli.verbose);
        assert_eq!(cli.color, ColorChoice::Auto);
    }

    #[test]
    fn test_positional_file_and_flags() {
        let cli = Cli::try_parse_from([
            "mdview", "notes.md", "--port", "9000", "-i", "0.0.0.0", "--debounce", "150", "-v",
        ])
        .unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("notes.md")));
        assert_eq!(cli.port, Some(9000));
        assert_eq!(cli.interface, Some("0.0.0.0".parse().unwrap()));
        assert_eq!(cli.debounce, Some(150));
        assert!(cli.verbose);
    }

    #[test]
    fn test_rejects_second_positional() {
        assert!(Cli::try_parse_from(["mdview", "a.md", "b.md"]).is_err());
    }
}
