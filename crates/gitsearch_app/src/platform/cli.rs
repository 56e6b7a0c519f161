use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "gitsearch",
    version,
    about = "Look up GitHub users, browse their repositories and keep a search history"
)]
pub struct Cli {
    /// Settings file (default: <config dir>/gitsearch/settings.ron)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level regardless of the configured level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Look up one user and print the profile with its repositories
    Search {
        username: String,
        /// Number of repository pages to load
        #[arg(short, long, default_value_t = 1, conflicts_with = "all")]
        pages: u32,
        /// Load every repository page
        #[arg(short, long)]
        all: bool,
    },
    /// Print the search history, most recent first
    History {
        /// Show at most this many entries
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Print the effective settings
    Config,
    /// Read commands from stdin (default)
    Interactive,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_interactive() {
        let cli = Cli::try_parse_from(["gitsearch"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn search_accepts_page_count() {
        let cli = Cli::try_parse_from(["gitsearch", "search", "octocat", "--pages", "3"]).unwrap();
        match cli.command {
            Some(Command::Search {
                username,
                pages,
                all,
            }) => {
                assert_eq!(username, "octocat");
                assert_eq!(pages, 3);
                assert!(!all);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn pages_and_all_conflict() {
        assert!(
            Cli::try_parse_from(["gitsearch", "search", "octocat", "--pages", "2", "--all"])
                .is_err()
        );
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["gitsearch", "history", "-n", "5", "--verbose"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Some(Command::History { limit: Some(5) })));
    }
}
