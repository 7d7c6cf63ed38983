use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gherkify::GherkifyError;
use gherkify::cli::Output;
use gherkify::cli::commands::generate::GenerateOptions;
use gherkify::constants::report::DEFAULT_FILE_NAME;

#[derive(Parser)]
#[command(name = "gherkify")]
#[command(
    version,
    about = "Markdown reports with yUML diagrams for Gherkin feature files"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, short, global = true, help = "Config file (default: global + .gherkify.toml)")]
    config: Option<PathBuf>,

    #[arg(long, short, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the Markdown report
    Generate {
        #[arg(required = true, help = "Feature files or glob patterns")]
        files: Vec<String>,
        #[arg(long, short, help = "Directory the report is written to")]
        output_dir: Option<PathBuf>,
        #[arg(long, short, default_value = DEFAULT_FILE_NAME, help = "Report file name")]
        file: PathBuf,
        #[arg(long, short, help = "Directory of cached diagram images")]
        image_path: Option<PathBuf>,
        #[arg(long, help = "Fetch missing diagram images")]
        fetch: bool,
        #[arg(long, help = "Append the raw feature files")]
        add_features: bool,
        #[arg(long, help = "Put the feature narrative on the use-case diagram")]
        show_notes: bool,
        #[arg(long, help = "Log descriptions and print them under each image")]
        debug: bool,
        #[arg(long, help = "Print the report instead of writing it")]
        stdout: bool,
    },

    /// Print diagram descriptions with their identities
    Diagrams {
        #[arg(required = true, help = "Feature files or glob patterns")]
        files: Vec<String>,
        #[arg(long, help = "Put the feature narrative on the use-case diagram")]
        show_notes: bool,
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
    /// Write a default configuration file
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
        eprintln!("\x1b[31mgherkify encountered an unexpected error:\x1b[0m");
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

        // Backtrace when RUST_BACKTRACE=1
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            Output::new().error(&format!("{}", e));
            let code = e
                .downcast_ref::<GherkifyError>()
                .map(|e| e.category().exit_code())
                .unwrap_or(1);
            ExitCode::from(code)
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
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = cli.config.as_deref();

    match cli.command {
        Commands::Generate {
            files,
            output_dir,
            file,
            image_path,
            fetch,
            add_features,
            show_notes,
            debug,
            stdout,
        } => {
            gherkify::cli::commands::generate::run(
                config,
                GenerateOptions {
                    inputs: files,
                    output_dir,
                    file,
                    image_path,
                    fetch,
                    add_features,
                    show_notes,
                    debug,
                    stdout,
                    quiet: cli.quiet,
                },
            )?;
        }
        Commands::Diagrams { files, show_notes } => {
            gherkify::cli::commands::diagrams::run(config, &files, show_notes)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { format } => {
                gherkify::cli::commands::config::show(config, &format)?;
            }
            ConfigAction::Path => {
                gherkify::cli::commands::config::path()?;
            }
            ConfigAction::Init { global, force } => {
                gherkify::cli::commands::config::init(global, force)?;
            }
        },
    }

    Ok(())
}
