use clap::{Args, Parser, Subcommand};
use filekit_common::{AppConfig, ConfigLocation};
use filekit_core::{ResultReporter, TreeComparator};
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "filekit")]
#[command(author = "Filekit Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Directory tree comparison by structure, names, and modification times", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two directories recursively by structure, file names, and modification times
    DeepCompare(DeepCompareArgs),

    /// Show the configuration file location and effective settings
    Config {
        /// Write a default configuration file if none exists yet
        #[arg(long)]
        init: bool,

        /// Use the configuration file next to the executable
        #[arg(long)]
        portable: bool,
    },
}

#[derive(Args, Debug)]
struct DeepCompareArgs {
    /// First directory
    dir1: PathBuf,

    /// Second directory
    dir2: PathBuf,

    /// Show detailed comparison results
    #[arg(short, long)]
    verbose: bool,

    /// Output results as JSON
    #[arg(long)]
    json: bool,

    /// Sort reported paths
    #[arg(short, long)]
    sort: bool,

    /// Compare sibling subdirectories in parallel
    #[arg(short, long)]
    parallel: bool,

    /// Disable ANSI colors in output
    #[arg(long)]
    no_color: bool,
}

/// Settings for one deep-compare run after merging flags over the config file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CompareOptions {
    verbose: bool,
    json: bool,
    sort: bool,
    parallel: bool,
    color: bool,
}

impl CompareOptions {
    fn resolve(args: &DeepCompareArgs, config: &AppConfig, is_terminal: bool) -> Self {
        Self {
            verbose: args.verbose || config.verbose,
            json: args.json,
            sort: args.sort || config.sort_results,
            parallel: args.parallel || config.parallel,
            color: is_terminal && !args.json && !args.no_color && !config.no_color,
        }
    }
}

fn main() {
    // Logs go to stderr so the report owns stdout
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn"))
        )
        .init();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::DeepCompare(args) => run_deep_compare(args),
        Commands::Config { init, portable } => run_config(init, portable),
    };

    if let Err(e) = outcome {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run_deep_compare(args: DeepCompareArgs) -> anyhow::Result<()> {
    let config = match ConfigLocation::discover(false).and_then(ConfigLocation::load) {
        Ok(loaded) => {
            debug!("Loaded config from {} (exists: {})", loaded.path().display(), loaded.exists);
            loaded.config
        }
        Err(e) => {
            warn!("Ignoring unreadable config: {}", e);
            AppConfig::default()
        }
    };

    let options = CompareOptions::resolve(&args, &config, std::io::stdout().is_terminal());
    debug!("Options: {:?}", options);

    let comparator = TreeComparator::local()
        .with_parallel(options.parallel)
        .with_sorted_output(options.sort);
    let result = comparator.compare(&args.dir1, &args.dir2)?;

    let reporter = ResultReporter::new().with_color(options.color);
    if options.json {
        println!("{}", reporter.format_json(&result)?);
    } else {
        print!("{}", reporter.format(&result, options.verbose));
    }

    Ok(())
}

fn run_config(init: bool, portable: bool) -> anyhow::Result<()> {
    let mut loaded = ConfigLocation::discover(portable)?.load()?;
    if init {
        loaded.persist_if_missing()?;
    }

    let state = if loaded.exists { "" } else { " (not created, using defaults)" };
    println!("Config file: {}{}", loaded.path().display(), state);
    if loaded.location.is_portable() {
        println!("Mode: portable");
    }
    print!("{}", toml::to_string_pretty(&loaded.config)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_deep_compare(args: &[&str]) -> DeepCompareArgs {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::DeepCompare(args) => args,
            _ => panic!("expected deep-compare"),
        }
    }

    #[test]
    fn test_parse_deep_compare_positional() {
        let args = parse_deep_compare(&["filekit", "deep-compare", "left", "right"]);
        assert_eq!(args.dir1, PathBuf::from("left"));
        assert_eq!(args.dir2, PathBuf::from("right"));
        assert!(!args.verbose);
        assert!(!args.json);
    }

    #[test]
    fn test_parse_deep_compare_flags() {
        let args = parse_deep_compare(&[
            "filekit", "deep-compare", "-v", "--sort", "--parallel", "--no-color", "a", "b",
        ]);
        assert!(args.verbose);
        assert!(args.sort);
        assert!(args.parallel);
        assert!(args.no_color);
    }

    #[test]
    fn test_deep_compare_requires_two_directories() {
        assert!(Cli::try_parse_from(["filekit", "deep-compare", "only-one"]).is_err());
        assert!(Cli::try_parse_from(["filekit", "deep-compare", "a", "b", "c"]).is_err());
    }

    #[test]
    fn test_options_flags_override_config() {
        let args = parse_deep_compare(&["filekit", "deep-compare", "--sort", "a", "b"]);
        let config = AppConfig {
            verbose: true,
            parallel: true,
            ..AppConfig::default()
        };

        let options = CompareOptions::resolve(&args, &config, false);
        assert!(options.verbose);
        assert!(options.sort);
        assert!(options.parallel);
        assert!(!options.color);
    }

    #[test]
    fn test_options_color_rules() {
        let args = parse_deep_compare(&["filekit", "deep-compare", "a", "b"]);
        let config = AppConfig::default();
        assert!(CompareOptions::resolve(&args, &config, true).color);

        let muted = AppConfig {
            no_color: true,
            ..AppConfig::default()
        };
        assert!(!CompareOptions::resolve(&args, &muted, true).color);

        let json = parse_deep_compare(&["filekit", "deep-compare", "--json", "a", "b"]);
        assert!(!CompareOptions::resolve(&json, &config, true).color);
    }

    #[test]
    fn test_parse_config_subcommand() {
        let cli = Cli::try_parse_from(["filekit", "config", "--init"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config {
                init: true,
                portable: false
            }
        ));
    }
}
