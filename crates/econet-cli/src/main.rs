mod serve;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use econet_core::{BuildSummary, Config, FoodWeb, Pipeline, Roster, SubjectFilter};

use serve::ServeConfig;

#[derive(Parser)]
#[command(name = "econet")]
#[command(about = "Predator/prey food webs for a park species roster", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to ./econet.toml, then the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct BuildArgs {
    /// Roster CSV (overrides config)
    #[arg(short, long)]
    roster: Option<PathBuf>,

    /// Species to expand; repeat for several. Defaults to the whole roster
    #[arg(short, long = "subject")]
    subjects: Vec<String>,

    /// Also look up what eats each subject
    #[arg(long)]
    predators: bool,

    /// Skip common-name and category lookups
    #[arg(long)]
    no_metadata: bool,

    /// Accept `eats` records whatever their subject
    #[arg(long)]
    legacy_filter: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the food web and write it as JSON
    Build {
        #[command(flatten)]
        args: BuildArgs,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Build the food web and explore it in the browser
    Serve {
        #[command(flatten)]
        args: BuildArgs,

        /// Port to listen on
        #[arg(short, long, default_value_t = 3333)]
        port: u16,

        /// Don't open the browser
        #[arg(long)]
        no_open: bool,
    },
    /// Print the canonical roster
    Roster {
        /// Roster CSV (overrides config)
        #[arg(short, long)]
        roster: Option<PathBuf>,
    },
    /// Print the default configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Config => {
            print!("{}", Config::default_config_string());
        }
        Commands::Roster { roster } => {
            let mut config = load_config(cli.config.as_ref())?;
            if let Some(path) = roster {
                config.roster.path = path;
            }
            let roster = Roster::load(&config.roster)
                .wrap_err_with(|| format!("loading {}", config.roster.path.display()))?;
            for species in roster.iter() {
                println!("{species}");
            }
        }
        Commands::Build { args, output, pretty } => {
            let config = configure(cli.config.as_ref(), args)?;
            let (graph, summary) = build(&config).await?;
            report(&summary);

            let json = if pretty {
                serde_json::to_string_pretty(&graph)?
            } else {
                serde_json::to_string(&graph)?
            };
            match output {
                Some(path) => {
                    std::fs::write(&path, json)
                        .wrap_err_with(|| format!("writing {}", path.display()))?;
                    eprintln!(
                        "Wrote {} species, {} edges to {}",
                        graph.node_count(),
                        graph.edge_count(),
                        path.display()
                    );
                }
                None => println!("{json}"),
            }
        }
        Commands::Serve { args, port, no_open } => {
            let config = configure(cli.config.as_ref(), args)?;
            let title = config
                .roster
                .path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Food Web")
                .to_string();
            let (graph, summary) = build(&config).await?;
            report(&summary);

            serve::start_server(
                graph,
                ServeConfig {
                    port,
                    open_browser: !no_open,
                    title,
                },
            )
            .await?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "econet=debug,econet_core=debug" } else { "econet=info,econet_core=info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::from_file(path)
            .wrap_err_with(|| format!("loading config {}", path.display()))?,
        None => Config::load()?,
    };
    Ok(config)
}

/// Layer command-line flags over the loaded config.
fn configure(path: Option<&PathBuf>, args: BuildArgs) -> Result<Config> {
    let mut config = load_config(path)?;
    if let Some(roster) = args.roster {
        config.roster.path = roster;
    }
    if !args.subjects.is_empty() {
        config.graph.subjects = args.subjects;
    }
    if args.predators {
        config.graph.include_predators = true;
    }
    if args.no_metadata {
        config.metadata.enabled = false;
    }
    if args.legacy_filter {
        config.interactions.subject_filter = SubjectFilter::Legacy;
    }
    Ok(config)
}

async fn build(config: &Config) -> Result<(FoodWeb, BuildSummary)> {
    let pipeline = Pipeline::from_config(config)?;

    let bar = ProgressBar::new(pipeline.subject_count() as u64);
    bar.set_style(
        ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );

    let result = pipeline
        .run_with_progress(|index, _total, subject| {
            bar.set_position(index as u64);
            bar.set_message(subject.to_string());
        })
        .await;

    bar.finish_and_clear();
    Ok(result)
}

fn report(summary: &BuildSummary) {
    eprintln!("Expanded {} subjects", summary.subjects_processed);
    if !summary.subjects_not_in_roster.is_empty() {
        eprintln!(
            "  Not in roster: {}",
            summary.subjects_not_in_roster.join(", ")
        );
    }
    if !summary.lookups_unavailable.is_empty() {
        eprintln!(
            "  Lookups unavailable: {}",
            summary.lookups_unavailable.join(", ")
        );
    }
    if summary.relations_outside_roster > 0 {
        eprintln!(
            "  Relations outside roster dropped: {}",
            summary.relations_outside_roster
        );
    }
}
