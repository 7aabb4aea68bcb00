//! Devcontainer Wizard - Main entry point
//!
//! Parses the command line, installs logging and the Ctrl+C handler, and
//! maps failures to exit codes: 130 for a user abort, 1 for everything else.

use std::path::Path;

use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use devcontainer_wizard::app::{self, App, CreateOptions, Flow};
use devcontainer_wizard::cli::{Cli, Commands};
use devcontainer_wizard::console::restore_terminal;
use devcontainer_wizard::error::{WizardError, EXIT_FAILURE, GOODBYE};
use devcontainer_wizard::launcher;
use devcontainer_wizard::theme::Symbols;

/// Initialize tracing. `RUST_LOG` overrides the default `warn` level.
fn init_logger() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn validate(path: &Path) -> anyhow::Result<()> {
    info!("Validating answers file: {:?}", path);
    app::validate_file(path)?;
    println!("{} Answers file is valid: {}", Symbols::CHECK, path.display());
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Profiles) => {
            app::print_profiles();
            Ok(())
        }
        Some(Commands::Validate { config }) => validate(&config),
        Some(Commands::Prebuilt { list: true, .. }) => {
            app::print_prebuilt_list();
            Ok(())
        }
        Some(Commands::Prebuilt { name, list: false }) => {
            let app = App::new()?;
            if app.run_prebuilt(name.as_deref())? == Flow::Back {
                app.run_menu()?;
            }
            Ok(())
        }
        Some(Commands::Create {
            name,
            config,
            save_config,
            dry_run,
            no_start,
        }) => App::new()?.run_create(&CreateOptions {
            name,
            config,
            save_config,
            dry_run,
            no_start,
        }),
        None => {
            debug!("No command specified, opening the main menu");
            App::new()?.run_menu()
        }
    }
}

/// Main application entry point
fn main() {
    init_logger();
    debug!("Devcontainer wizard starting up");

    if let Err(e) = launcher::install_interrupt_handler() {
        warn!("Failed to install Ctrl+C handler: {:#}", e);
    }

    let cli = Cli::parse_args();
    if let Err(e) = run(cli) {
        restore_terminal();
        match e.downcast_ref::<WizardError>() {
            Some(wizard_error) if wizard_error.is_cancelled() => {
                println!("{}", GOODBYE);
                std::process::exit(wizard_error.exit_code());
            }
            _ => {
                error!("{:#}", e);
                eprintln!("{} {:#}", Symbols::CIRCLE, e);
                std::process::exit(EXIT_FAILURE);
            }
        }
    }
}
