use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use guideweave::cli::commands::{
    generate::GenerateOptions, detect::DetectOptions, refresh::RefreshOptions,
};

#[derive(Parser)]
#[command(name = "guideweave")]
#[command(
    version,
    about = "Technology detection and guideline composition for codebases"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long)]
    verbose: bool,

    #[arg(long, short)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize guideweave in the current directory
    Init {
        #[arg(long, short, help = "Overwrite existing initialization")]
        force: bool,
    },

    /// Generate the full guideline document
    Generate {
        #[arg(long, short, help = "Project root to scan (default: current dir)")]
        path: Option<PathBuf>,
        #[arg(long, short, help = "Output file (default: from config)")]
        output: Option<PathBuf>,
        #[arg(long, help = "Print to stdout instead of writing a file")]
        stdout: bool,
    },

    /// Regenerate one section of an existing document
    Refresh {
        #[arg(help = "Section name: Stack, Commands, Workflow, Guidelines")]
        section: String,
        #[arg(long, short, help = "Project root to scan (default: current dir)")]
        path: Option<PathBuf>,
        #[arg(long, short, help = "Document file (default: from config)")]
        file: Option<PathBuf>,
    },

    /// Show detection results without writing a document
    Detect {
        #[arg(long, short, help = "Project root to scan (default: current dir)")]
        path: Option<PathBuf>,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json"
        )]
        format: String,
    },

    /// Manage technology modules
    Modules {
        #[command(subcommand)]
        action: ModulesAction,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ModulesAction {
    /// List known modules and their enabled state
    List,
    /// Enable a module
    Enable {
        #[arg(help = "Module id, e.g. react")]
        id: String,
    },
    /// Disable a module
    Disable {
        #[arg(help = "Module id, e.g. tailwind")]
        id: String,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
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
    /// Edit configuration file with $EDITOR
    Edit {
        #[arg(long, short, help = "Edit global config")]
        global: bool,
    },
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
        // Extract panic message
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mguideweave encountered an unexpected error:\x1b[0m");
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
    // Install panic handler first
    setup_panic_handler();

    // Run the actual CLI
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

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Init { force } => {
            guideweave::cli::commands::init::run(force)?;
        }
        Commands::Generate {
            path,
            output,
            stdout,
        } => {
            let rt = Runtime::new()?;
            rt.block_on(guideweave::cli::commands::generate::run(GenerateOptions {
                path,
                output,
                stdout,
                verbose: cli.verbose,
            }))?;
        }
        Commands::Refresh {
            section,
            path,
            file,
        } => {
            let rt = Runtime::new()?;
            rt.block_on(guideweave::cli::commands::refresh::run(RefreshOptions {
                section,
                path,
                file,
                verbose: cli.verbose,
            }))?;
        }
        Commands::Detect { path, format } => {
            let rt = Runtime::new()?;
            rt.block_on(guideweave::cli::commands::detect::run(DetectOptions {
                path,
                format,
            }))?;
        }
        Commands::Modules { action } => match action {
            ModulesAction::List => {
                guideweave::cli::commands::modules::list()?;
            }
            ModulesAction::Enable { id } => {
                guideweave::cli::commands::modules::set_enabled(&id, true)?;
            }
            ModulesAction::Disable { id } => {
                guideweave::cli::commands::modules::set_enabled(&id, false)?;
            }
        },
        Commands::Config { action } => match action {
            ConfigAction::Show { format } => {
                guideweave::cli::commands::config::show(&format)?;
            }
            ConfigAction::Path => {
                guideweave::cli::commands::config::path()?;
            }
            ConfigAction::Edit { global } => {
                guideweave::cli::commands::config::edit(global)?;
            }
            ConfigAction::Init { global, force } => {
                if global {
                    guideweave::cli::commands::config::init_global(force)?;
                } else {
                    guideweave::cli::commands::config::init_project()?;
                }
            }
        },
    }

    Ok(())
}
