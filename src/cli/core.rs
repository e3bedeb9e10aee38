//! Shell context, dispatch, and CLI error types.

use std::{io, path::PathBuf};

use chrono::NaiveDate;
use strsim::levenshtein;
use thiserror::Error;

use crate::{
    backup::BackupService,
    config::{SettingsContext, SettingsManager},
    core::{
        clock::{Clock, FixedClock, SystemClock},
        errors::FieldServiceError,
    },
    reminder::FileReminderScheduler,
    storage::JsonStorage,
    utils::paths::PathResolver,
};

use super::{
    commands::{all_definitions, CommandDefinition, CommandRegistry},
    output,
};

const TODAY_ENV: &str = "FIELD_SERVICE_TODAY";

/// User-facing CLI error wrapper.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] FieldServiceError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Readline(#[from] rustyline::error::ReadlineError),
}

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Core(#[from] FieldServiceError),
    #[error("exit requested")]
    ExitRequested,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CliMode {
    Interactive,
    Script,
}

pub(crate) enum LoopControl {
    Continue,
    Exit,
}

/// Composition root for the shell: every collaborator is built once here.
pub struct ShellContext {
    pub(crate) running: bool,
    pub(crate) registry: CommandRegistry,
    pub(crate) storage: JsonStorage,
    pub(crate) settings: SettingsContext,
    pub(crate) reminders: FileReminderScheduler,
    pub(crate) backups: BackupService,
    pub(crate) clock: Box<dyn Clock>,
    pub(crate) base_dir: PathBuf,
}

impl ShellContext {
    pub(crate) fn new(mode: CliMode) -> Result<Self, CliError> {
        let base_dir = PathResolver::base_dir();
        let storage = JsonStorage::new(Some(base_dir.clone()))?;
        let settings = SettingsContext::load(SettingsManager::with_base_dir(Some(base_dir.clone())))?;
        let reminders = FileReminderScheduler::new(PathResolver::reminder_file_in(&base_dir));
        let backups = BackupService::new(storage.database_files());
        tracing::debug!(base = %base_dir.display(), ?mode, "shell context ready");
        Ok(Self {
            running: true,
            registry: CommandRegistry::new(all_definitions()),
            storage,
            settings,
            reminders,
            backups,
            clock: clock_from_env(),
            base_dir,
        })
    }

    pub(crate) fn prompt(&self) -> String {
        let name = self.settings.snapshot().name;
        if name.is_empty() {
            "field-service> ".to_string()
        } else {
            format!("field-service ({name})> ")
        }
    }

    pub(crate) fn command_usages(&self) -> Vec<(&'static str, &'static str)> {
        self.registry
            .iter()
            .map(|definition| (definition.name, definition.usage))
            .collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandDefinition> {
        self.registry.get(name)
    }

    pub(crate) fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub(crate) fn dispatch(&mut self, command: &str, raw: &str, args: &[&str]) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.get(command).map(|definition| definition.handler) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!("Unknown command `{}`. Type `help` for a list.", input));

        let mut suggestions: Vec<_> = self
            .registry
            .names()
            .map(|key| (levenshtein(key, &input.to_lowercase()), key))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = suggestions.first() {
            if *distance <= 3 {
                output::info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                output::error(message);
                Ok(())
            }
            CommandError::Core(err) => {
                tracing::debug!(error = %err, "command failed");
                output::error(err);
                Ok(())
            }
        }
    }
}

fn clock_from_env() -> Box<dyn Clock> {
    let fixed = std::env::var(TODAY_ENV)
        .ok()
        .and_then(|value| NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok())
        .and_then(|date| date.and_hms_opt(12, 0, 0));
    match fixed {
        Some(now) => Box::new(FixedClock(now)),
        None => Box::new(SystemClock),
    }
}
