use std::collections::HashMap;

use chrono::NaiveDate;
use uuid::Uuid;

pub mod backup;
pub mod entry;
pub mod month;
pub mod settings;
pub mod system;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::domain::common::{first_of_month, parse_month};

pub(crate) fn all_definitions() -> Vec<CommandDefinition> {
    let mut commands = Vec::new();
    commands.extend(system::definitions());
    commands.extend(entry::definitions());
    commands.extend(month::definitions());
    commands.extend(settings::definitions());
    commands.extend(backup::definitions());
    commands
}

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

#[derive(Clone)]
pub struct CommandDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

impl CommandDefinition {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
        }
    }
}

pub struct CommandRegistry {
    commands: HashMap<&'static str, CommandDefinition>,
    order: Vec<&'static str>,
}

impl CommandRegistry {
    pub fn new(definitions: Vec<CommandDefinition>) -> Self {
        let mut commands = HashMap::new();
        let mut order = Vec::new();
        for definition in definitions {
            order.push(definition.name);
            commands.insert(definition.name, definition);
        }
        Self { commands, order }
    }

    pub fn get(&self, name: &str) -> Option<&CommandDefinition> {
        self.commands.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandDefinition> {
        self.order
            .iter()
            .filter_map(move |name| self.commands.get(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().copied()
    }
}

fn usage_error(usage: &str) -> CommandError {
    CommandError::InvalidArguments(format!("usage: {usage}"))
}

/// Month from `YYYY-MM`, or the current month when absent.
fn month_arg(context: &ShellContext, arg: Option<&&str>) -> Result<NaiveDate, CommandError> {
    match arg {
        Some(raw) => parse_month(raw).ok_or_else(|| {
            CommandError::InvalidArguments(format!("`{raw}` is not a month (expected YYYY-MM)"))
        }),
        None => Ok(first_of_month(context.today())),
    }
}

fn date_arg(raw: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        CommandError::InvalidArguments(format!("`{raw}` is not a date (expected YYYY-MM-DD)"))
    })
}

fn count_arg(raw: &str, what: &str) -> Result<u32, CommandError> {
    raw.trim()
        .parse()
        .map_err(|_| CommandError::InvalidArguments(format!("{what} must be a non-negative number")))
}

/// `clear` or `-` unset an optional number.
fn optional_count_arg(raw: &str, what: &str) -> Result<Option<u32>, CommandError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "clear" | "-" | "none" => Ok(None),
        _ => count_arg(raw, what).map(Some),
    }
}

/// Hours in the longest month; larger monthly goals are rejected.
const MAX_MONTHLY_GOAL: u32 = 744;

/// Monthly hour goal, or `None` for `clear`.
fn goal_arg(raw: &str, what: &str) -> Result<Option<u32>, CommandError> {
    match optional_count_arg(raw, what)? {
        Some(hours) if hours > MAX_MONTHLY_GOAL => Err(CommandError::InvalidArguments(format!(
            "{what} must be at most {MAX_MONTHLY_GOAL} hours"
        ))),
        goal => Ok(goal),
    }
}

fn id_arg(raw: &str) -> Result<Uuid, CommandError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| CommandError::InvalidArguments(format!("`{raw}` is not an entry id")))
}
