//! Application module
//!
//! Sequences the top-level flows: the main menu, the custom wizard, the
//! pre-built picker and the non-interactive commands. Each interactive phase
//! opens its own [`TuiConsole`] and drops it before anything prints to the
//! normal screen, so output and the spinner never land on the alternate
//! screen.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::artifacts::{self, WrittenArtifacts};
use crate::console::{Console, TuiConsole};
use crate::launcher::{self, OpenIn};
use crate::logic::compile;
use crate::prebuilt;
use crate::profiles;
use crate::prompt::{ask, Choice, PromptResult, Select};
use crate::theme::Symbols;
use crate::wizard::{Wizard, WizardState};

/// Options of the `create` command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateOptions {
    pub name: Option<String>,
    pub config: Option<PathBuf>,
    pub save_config: Option<PathBuf>,
    pub dry_run: bool,
    pub no_start: bool,
}

/// Main menu entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Custom,
    Prebuilt,
}

/// Whether a sub-flow finished or asked to go back to the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Done,
    Back,
}

pub fn menu_prompt() -> Select<MenuChoice> {
    Select::new(
        "You can select a pre-built container or create your own",
        vec![
            Choice::new("Create a custom container", MenuChoice::Custom),
            Choice::new("Use a pre-built container", MenuChoice::Prebuilt),
        ],
    )
}

/// Run `f` against a fresh terminal console. The console is dropped, and the
/// terminal restored, before this returns.
fn with_console<T, E>(f: impl FnOnce(&mut dyn Console) -> std::result::Result<T, E>) -> Result<T>
where
    E: Into<anyhow::Error>,
{
    let mut console = TuiConsole::new()?;
    let result = f(&mut console);
    drop(console);
    result.map_err(Into::into)
}

/// Top-level application.
pub struct App {
    cwd: PathBuf,
}

impl App {
    pub fn new() -> Result<Self> {
        let cwd = env::current_dir().context("Failed to determine the working directory")?;
        Ok(Self::with_cwd(cwd))
    }

    pub fn with_cwd(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into() }
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Main menu loop. Back from the pre-built picker returns here.
    pub fn run_menu(&self) -> Result<()> {
        loop {
            let choice = with_console(|c| ask(c, menu_prompt()))?;
            match choice {
                PromptResult::Value(MenuChoice::Custom) => {
                    return self.run_create(&CreateOptions::default());
                }
                PromptResult::Value(MenuChoice::Prebuilt) => {
                    if self.run_prebuilt(None)? == Flow::Done {
                        return Ok(());
                    }
                }
                // The menu has no Back.
                PromptResult::Back => {}
            }
        }
    }

    // ========================================================================
    // Custom container
    // ========================================================================

    /// Answers to start the wizard from.
    pub fn initial_state(&self, options: &CreateOptions) -> Result<WizardState> {
        let Some(path) = &options.config else {
            return Ok(WizardState::new());
        };
        info!("Loading saved answers from {:?}", path);
        let state = WizardState::load_from_file(path)?;
        state
            .validate()
            .with_context(|| format!("Saved answers in {:?} are invalid", path))?;
        Ok(state)
    }

    /// Run the wizard on `console`.
    pub fn collect_answers(
        &self,
        console: &mut dyn Console,
        options: &CreateOptions,
    ) -> Result<WizardState> {
        let initial = self.initial_state(options)?;
        let wizard = Wizard::new(&self.cwd).with_preset_name(options.name.clone());
        Ok(wizard.run(console, initial)?)
    }

    /// Save, compile and write (or print) the artifacts.
    ///
    /// Returns the written files, or `None` for a dry run.
    pub fn generate(
        &self,
        state: &WizardState,
        options: &CreateOptions,
    ) -> Result<Option<WrittenArtifacts>> {
        if let Some(path) = &options.save_config {
            state.save_to_file(path)?;
            println!("{} Answers saved to {}", Symbols::CHECK, path.display());
        }

        let plan = compile(state).context("Failed to compile the devcontainer")?;
        if options.dry_run {
            print!("{}", artifacts::render_dry_run(&plan)?);
            return Ok(None);
        }

        let save_path = state.save_path.clone().unwrap_or_else(|| self.cwd.clone());
        let written = artifacts::write_artifacts(&plan, &save_path)?;
        println!(
            "{} Dockerfile generated at: {}",
            Symbols::CHECK,
            written.dockerfile.display()
        );
        println!(
            "{} devcontainer.json generated at: {}",
            Symbols::CHECK,
            written.manifest.display()
        );
        println!();
        for line in artifacts::summary_lines(state, &plan, &written.directory) {
            println!("{}", line);
        }
        println!();
        Ok(Some(written))
    }

    pub fn run_create(&self, options: &CreateOptions) -> Result<()> {
        let state = with_console(|c| self.collect_answers(c, options))?;
        debug!("Wizard answers: {:?}", state);

        if let Some(written) = self.generate(&state, options)? {
            self.launch(&written.manifest, options.no_start)?;
        }
        Ok(())
    }

    // ========================================================================
    // Pre-built container
    // ========================================================================

    pub fn run_prebuilt(&self, name: Option<&str>) -> Result<Flow> {
        let id = match name {
            Some(name) => match prebuilt::find(name) {
                Some(entry) => entry.id,
                None => {
                    eprintln!("{} Unknown prebuilt name: {:?}", Symbols::CIRCLE, name);
                    eprintln!();
                    return Ok(Flow::Back);
                }
            },
            None => match with_console(|c| ask(c, prebuilt::select_prompt()))? {
                PromptResult::Value(id) => id,
                PromptResult::Back => return Ok(Flow::Back),
            },
        };

        println!("{} Fetching pre-built containers...", Symbols::BULLET);
        let checkout = prebuilt::cache_checkout()?;
        prebuilt::ensure_repo(&checkout)?;

        println!(
            "{} Copying selected devcontainer to current directory...",
            Symbols::BULLET
        );
        let config = prebuilt::copy_prebuilt(&checkout, id, &self.cwd)?;
        println!("{} Selected devcontainer copied successfully!", Symbols::CHECK);

        self.launch(&config, false)?;
        Ok(Flow::Done)
    }

    // ========================================================================
    // Start & attach
    // ========================================================================

    fn print_follow_up(config: &Path) {
        println!("{} You can start it later with:", Symbols::DIAMOND);
        println!("{}", launcher::follow_up_command(config));
    }

    /// Offer to build the container, then attach to it.
    pub fn launch(&self, config: &Path, no_start: bool) -> Result<()> {
        if no_start {
            Self::print_follow_up(config);
            return Ok(());
        }

        let start = with_console(|c| ask(c, launcher::start_prompt()))?;
        if start != PromptResult::Value(true) {
            Self::print_follow_up(config);
            return Ok(());
        }

        let container_id = launcher::devcontainer_up(config)?;

        let targets = OpenIn::available();
        match with_console(|c| ask(c, launcher::open_in_prompt(&targets)))? {
            PromptResult::Value(target) => launcher::attach(target, &container_id),
            PromptResult::Back => Ok(()),
        }
    }
}

// ============================================================================
// Non-interactive commands
// ============================================================================

pub fn print_profiles() {
    for entry in profiles::listing() {
        println!("{}", entry);
    }
}

pub fn print_prebuilt_list() {
    for line in prebuilt::list_lines() {
        println!("{}", line);
    }
}

/// Load and validate a saved answers file.
pub fn validate_file(path: &Path) -> Result<WizardState> {
    let state = WizardState::load_from_file(path)?;
    state.validate()?;
    compile(&state).context("Answers do not compile")?;
    Ok(state)
}
