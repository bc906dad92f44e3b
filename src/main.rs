use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use mvnscope::analysis::{conflict_groups, search_paths};
use mvnscope::config::AnalysisConfig;
use mvnscope::export::{export, status_label, ExportData, ExportFormat};
use mvnscope::parser::{parse_checked, parse_file, MavenNode};

/// Config file picked up from the working directory when `--config` is absent.
const DEFAULT_CONFIG_FILE: &str = "mvnscope.toml";

#[derive(Parser, Debug)]
#[command(name = "mvnscope")]
#[command(version)]
#[command(about = "Maven dependency tree analyzer: version conflicts, weights and a terminal tree browser", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze `mvn dependency:tree` output and print a report
    Analyze {
        /// File with the tree output ("-" or omitted reads stdin)
        input: Option<PathBuf>,

        /// Output format: tree, json, csv or markdown
        #[arg(short, long, default_value = "tree")]
        format: ExportFormat,

        /// Browse the tree interactively instead of printing a report
        #[arg(long)]
        tui: bool,

        /// Analysis settings (TOML); defaults to ./mvnscope.toml if present
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of conflict groups to report
        #[arg(long)]
        top: Option<usize>,

        /// Share in percent below which entries are merged into "Other"
        #[arg(long)]
        threshold: Option<f64>,
    },
    /// List artifacts that appear with more than one version
    Conflicts {
        /// File with the tree output ("-" or omitted reads stdin)
        input: Option<PathBuf>,

        /// Analysis settings (TOML); defaults to ./mvnscope.toml if present
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of conflict groups to list
        #[arg(long)]
        top: Option<usize>,
    },
    /// Find nodes whose groupId, artifactId or version contains TERM
    Search {
        /// Case-insensitive search term
        term: String,

        /// File with the tree output ("-" or omitted reads stdin)
        input: Option<PathBuf>,
    },
    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Analyze {
            input,
            format,
            tui,
            config,
            top,
            threshold,
        }) => {
            let config = load_config(config.as_deref(), top, threshold)?;
            let forest = load_forest(input.as_deref())?;
            if tui {
                return mvnscope::ui::run(forest).context("Terminal UI failed");
            }

            tracing::info!(%format, "writing report");
            let data = ExportData::new(&forest, &config);
            let mut stdout = io::stdout().lock();
            export(format, &data, &mut stdout).context("Failed to write report")
        }
        Some(Commands::Conflicts { input, config, top }) => {
            let config = load_config(config.as_deref(), top, None)?;
            let forest = load_forest(input.as_deref())?;
            print_conflicts(&forest, config.top_conflicts);
            Ok(())
        }
        Some(Commands::Search { term, input }) => {
            let forest = load_forest(input.as_deref())?;
            print_search(&forest, &term);
            Ok(())
        }
        Some(Commands::Version) => {
            println!("mvnscope v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        None => {
            println!("mvnscope - Maven Dependency Tree Analyzer");
            println!("Run 'mvn dependency:tree -Dverbose | mvnscope analyze' to analyze a tree");
            println!("Run 'mvnscope --help' for more information");
            Ok(())
        }
    }
}

/// Reads the tree from a file, or from stdin for `-` or no path.
fn load_forest(input: Option<&Path>) -> Result<Vec<MavenNode>> {
    match input {
        Some(path) if path != Path::new("-") => parse_file(path)
            .with_context(|| format!("Could not load dependency tree from {}", path.display())),
        _ => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read standard input")?;
            parse_checked(&text).context("Could not load dependency tree from standard input")
        }
    }
}

/// Resolves settings: file first, then command-line overrides.
fn load_config(
    path: Option<&Path>,
    top: Option<usize>,
    threshold: Option<f64>,
) -> Result<AnalysisConfig> {
    let default_path = Path::new(DEFAULT_CONFIG_FILE);
    let mut config = match path {
        Some(path) => AnalysisConfig::load(path)
            .with_context(|| format!("Could not load config from {}", path.display()))?,
        None if default_path.is_file() => AnalysisConfig::load(default_path)
            .with_context(|| format!("Could not load config from {}", DEFAULT_CONFIG_FILE))?,
        None => AnalysisConfig::default(),
    };

    if let Some(top) = top {
        config.top_conflicts = top;
    }
    if let Some(threshold) = threshold {
        config.other_threshold_percent = threshold;
    }
    config.validate()?;
    Ok(config)
}

fn print_conflicts(forest: &[MavenNode], limit: usize) {
    let groups = conflict_groups(forest);
    if groups.is_empty() {
        println!("No version conflicts found.");
        return;
    }

    for group in groups.iter().take(limit) {
        println!("{}", group.description());
        for node in &group.omitted {
            println!("  omitted {} ({})", node.version, node.id);
        }
    }
    if limit > 0 {
        println!();
    }
    if groups.len() > limit {
        println!("Showing the top {} of {}", limit, groups.len());
    }
    println!("{} artifact(s) with several versions", groups.len());
}

fn print_search(forest: &[MavenNode], term: &str) {
    let paths = search_paths(forest, term);
    for path in &paths {
        let Some(hit) = path.last() else {
            continue;
        };
        let chain = path
            .iter()
            .map(|node| node.gav())
            .collect::<Vec<_>>()
            .join(" > ");
        match status_label(hit) {
            "active" => println!("{}", chain),
            status => println!("{} [{}]", chain, status),
        }
    }
    println!("{} match(es) for '{}'", paths.len(), term);
}
