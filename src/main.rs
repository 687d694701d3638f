use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scenemetrics::cli::CommandContext;
use scenemetrics::cli::commands::analyze::AnalyzeOptions;

#[derive(Parser)]
#[command(name = "scenemetrics")]
#[command(
    version,
    about = "Scene metrics collector and CSV exporter for game scene files"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, short, global = true, help = "Use this config file instead of the layered lookup")]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Args)]
struct SceneArgs {
    #[arg(help = "Scene files or directories (default: scan --root)")]
    scenes: Vec<PathBuf>,
    #[arg(long, help = "Directory scanned when no scenes are given")]
    root: Option<PathBuf>,
    #[arg(long, short, help = "Write the CSV report to this file")]
    output: Option<PathBuf>,
    #[arg(long, conflicts_with = "output", help = "Write the CSV report to stdout")]
    stdout: bool,
    #[arg(long = "no-export", conflicts_with_all = ["output", "stdout"], help = "Analyze without writing a report")]
    no_export: bool,
    #[arg(long, help = "Report file name prefix")]
    prefix: Option<String>,
}

impl SceneArgs {
    fn into_options(self, only: Vec<String>, disable: Vec<String>) -> AnalyzeOptions {
        AnalyzeOptions {
            scenes: self.scenes,
            root: self.root,
            output: self.output,
            stdout: self.stdout,
            no_export: self.no_export,
            prefix: self.prefix,
            only,
            disable,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize SceneMetrics in the current directory
    Init {
        #[arg(long, short, help = "Overwrite existing initialization")]
        force: bool,
    },

    /// Collect metrics for every scene and export them as CSV
    Analyze {
        #[command(flatten)]
        scenes: SceneArgs,
        #[arg(long, value_delimiter = ',', help = "Run only these analyzers (comma separated)")]
        only: Vec<String>,
        #[arg(long, value_delimiter = ',', help = "Skip these analyzers (comma separated)")]
        disable: Vec<String>,
    },

    /// Export only the attachment type census
    Components {
        #[command(flatten)]
        scenes: SceneArgs,
    },

    /// List analyzer toggles and their effective state
    Toggles {
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json"
        )]
        format: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(short = 'g', long, help = "Show global config file only")]
        global: bool,
        #[arg(
            short = 'f',
            long,
            default_value = "toml",
            help = "Output format: toml, json"
        )]
        format: String,
    },
    /// Show configuration file paths
    Path,
    /// Initialize configuration
    Init {
        #[arg(long, short, help = "Initialize global config")]
        global: bool,
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mSceneMetrics encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Call default hook for backtrace (if RUST_BACKTRACE=1)
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    // Logs go to stderr so `--stdout` reports stay parseable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    use scenemetrics::cli::commands::{analyze, config, init, toggles};

    match cli.command {
        Commands::Init { force } => {
            init::run(force)?;
        }
        Commands::Analyze {
            scenes,
            only,
            disable,
        } => {
            let ctx = CommandContext::load(cli.config.as_deref())?;
            analyze::run(ctx, scenes.into_options(only, disable))?;
        }
        Commands::Components { scenes } => {
            let ctx = CommandContext::load(cli.config.as_deref())?;
            analyze::run_components(ctx, scenes.into_options(Vec::new(), Vec::new()))?;
        }
        Commands::Toggles { format } => {
            let ctx = CommandContext::load(cli.config.as_deref())?;
            toggles::run(&ctx.config, &format)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { global, format } => {
                let ctx = CommandContext::load(cli.config.as_deref())?;
                config::show(&ctx.config, global, &format)?;
            }
            ConfigAction::Path => {
                config::path()?;
            }
            ConfigAction::Init { global, force } => {
                if global {
                    config::init_global(force)?;
                } else {
                    config::init_project(force)?;
                }
            }
        },
    }

    Ok(())
}
