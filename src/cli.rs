// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// The crawler has a single job, so there are no subcommands: everything
// interesting lives in config.json, and the flags here only say where to
// find it and how chatty to be.
// =============================================================================

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "weibo-user-crawler",
    version = "0.1.0",
    about = "Crawl public Weibo user profiles into a CSV dataset",
    long_about = "weibo-user-crawler reads seed uids from config.json, fetches each user's profile, \
                  follows fans until the requested number of users is reached, and appends one \
                  CSV row per user."
)]
pub struct Cli {
    /// Path to the JSON config file
    ///
    /// Example: weibo-user-crawler --config ./config.json
    #[arg(long, short, default_value = "config.json")]
    pub config: PathBuf,

    /// Write the dataset here instead of the config's output_path
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Show debug logs (RUST_LOG still wins when set)
    #[arg(long, short)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["weibo-user-crawler"]);
        assert_eq!(cli.config, PathBuf::from("config.json"));
        assert!(cli.output.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::parse_from([
            "weibo-user-crawler",
            "--config",
            "conf/weibo.json",
            "-o",
            "out.csv",
            "-v",
        ]);
        assert_eq!(cli.config, PathBuf::from("conf/weibo.json"));
        assert_eq!(cli.output, Some(PathBuf::from("out.csv")));
        assert!(cli.verbose);
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does #[arg(long, short)] do?
//    - long: creates a --config style flag from the field name
//    - short: creates a -c style flag from the first letter
//
// 2. Why PathBuf instead of String?
//    - PathBuf is the owned type for file system paths
//    - It handles platform differences (/ vs \) for us
//
// 3. Why Option<PathBuf> for --output?
//    - None means "flag not given", so the config file decides
// -----------------------------------------------------------------------------
