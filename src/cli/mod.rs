//! CLI module for genre-server
//!
//! Provides command-line interface parsing for the genre-server binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod init;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// genre-server - authenticated genre CRUD backend
///
/// Serves registration, login, logout and genre endpoints over HTTP+JSON.
#[derive(Parser, Debug)]
#[command(
    name = "genre-server",
    author = "Dirmacs <build@dirmacs.com>",
    version,
    about = "genre-server - authenticated genre CRUD backend",
    long_about = "Token-authenticated CRUD backend for genres.\n\n\
                  Run without arguments to start the server, or use 'init' to scaffold a new project.",
    after_help = "EXAMPLES:\n    \
                  genre-server init                 # Scaffold genres.toml and .env.example\n    \
                  genre-server                      # Start the server (requires genres.toml)\n    \
                  genre-server --config my.toml     # Use a custom config file\n    \
                  genre-server config --validate    # Check configuration\n    \
                  genre-server prune                # Drop expired blacklist entries"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "genres.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new project with configuration files
    ///
    /// Creates genres.toml, .env.example (with a freshly generated secret)
    /// and the data/ directory.
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite existing files without prompting
        #[arg(short, long)]
        force: bool,

        /// Host address for the server
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port for the server
        #[arg(long, default_value = "3000")]
        port: u16,
    },

    /// Show configuration information
    Config {
        /// Show the full configuration
        #[arg(short = 'f', long)]
        full: bool,

        /// Validate the configuration file
        #[arg(long)]
        validate: bool,
    },

    /// Remove blacklist entries whose tokens have expired
    Prune,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["genre-server"]).expect("should parse");

        assert!(cli.command.is_none());
        assert_eq!(cli.config, PathBuf::from("genres.toml"));
        assert!(!cli.verbose);
    }

    #[test]
    fn test_global_config_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["genre-server", "prune", "--config", "other.toml"])
            .expect("should parse");

        assert!(matches!(cli.command, Some(Commands::Prune)));
        assert_eq!(cli.config, PathBuf::from("other.toml"));
    }

    #[test]
    fn test_init_defaults() {
        let cli = Cli::try_parse_from(["genre-server", "init"]).expect("should parse");

        match cli.command {
            Some(Commands::Init {
                path,
                force,
                host,
                port,
            }) => {
                assert_eq!(path, PathBuf::from("."));
                assert!(!force);
                assert_eq!(host, "127.0.0.1");
                assert_eq!(port, 3000);
            }
            other => panic!("expected init, got {:?}", other),
        }
    }
}
