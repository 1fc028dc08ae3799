pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "wikwok")]
#[command(about = "An endless feed of random Wikipedia articles", long_about = None)]
pub struct Cli {
    /// Path to the database file
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Path to the config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the TUI (default)
    Tui,
    /// Fetch and print one batch of random articles
    Random {
        /// Number of articles to request
        #[arg(short, long)]
        count: Option<usize>,

        /// Language code, e.g. "es" (defaults to the selected language)
        #[arg(short, long)]
        lang: Option<String>,
    },
    /// List liked articles
    Liked,
    /// List available languages
    Languages,
    /// Select the feed language
    Lang {
        /// Language code, e.g. "de"
        code: String,
    },
    /// Remove an article from the liked list
    Unlike {
        /// Article id as shown by `wikwok liked`
        id: i64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_tui() {
        let cli = Cli::try_parse_from(["wikwok"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.db.is_none());
    }

    #[test]
    fn test_random_with_options() {
        let cli = Cli::try_parse_from(["wikwok", "random", "--count", "5", "--lang", "fr"]).unwrap();
        match cli.command {
            Some(Commands::Random { count, lang }) => {
                assert_eq!(count, Some(5));
                assert_eq!(lang.as_deref(), Some("fr"));
            }
            _ => panic!("expected random"),
        }
    }

    #[test]
    fn test_global_paths_after_subcommand() {
        let cli = Cli::try_parse_from(["wikwok", "liked", "--db", "/tmp/w.db"]).unwrap();
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/w.db")));
    }
}
