use chrono::NaiveTime;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::config::{Design, Settings};
use crate::core::services::SettingsService;
use crate::domain::Role;
use crate::intro::{self, IntroIntent};
use crate::reminder::{next_reminder, sync_reminder};

use super::{date_arg, goal_arg, usage_error, CommandDefinition};

const SETUP_USAGE: &str = "setup <name> <role> [pioneer-since YYYY-MM-DD] [reminder HH:MM|off]";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new("settings", "Show the current settings", "settings", cmd_settings),
        CommandDefinition::new("name", "Set the publisher name", "name <name>", cmd_name),
        CommandDefinition::new(
            "role",
            "Change the publisher role",
            "role <publisher|auxiliary|regular|special|missionary>",
            cmd_role,
        ),
        CommandDefinition::new(
            "role-goal",
            "Override the monthly goal of the role",
            "role-goal <hours|clear>",
            cmd_role_goal,
        ),
        CommandDefinition::new(
            "design",
            "Choose the color scheme",
            "design <system|light|dark>",
            cmd_design,
        ),
        CommandDefinition::new(
            "reminder",
            "Enable or disable the monthly report reminder",
            "reminder <on|off> [HH:MM]",
            cmd_reminder,
        ),
        CommandDefinition::new("setup", "Run the first-time setup", SETUP_USAGE, cmd_setup),
    ]
}

fn cmd_settings(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let settings = context.settings.snapshot();
    output::section("Settings");
    output::field("Name", display_or_dash(&settings.name));
    output::field("Role", settings.role);
    output::field("Role goal", format!("{}:00", settings.effective_role_goal()));
    if let Some(since) = settings.pioneer_since {
        output::field("Pioneer since", since);
    }
    output::field("Design", format!("{:?}", settings.design));
    if settings.reminder.enabled {
        output::field(
            "Reminder",
            next_reminder(context.clock.now(), settings.reminder.time).format("%Y-%m-%d %H:%M"),
        );
    } else {
        output::field("Reminder", "off");
    }
    output::field("Data", context.base_dir.display());
    Ok(())
}

fn display_or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

fn cmd_name(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return Err(usage_error("name <name>"));
    }
    let updated = SettingsService::set_name(&context.settings, &args.join(" "))?;
    output::success(format!("Name set to {}", updated.name));
    Ok(())
}

fn role_arg(raw: &str) -> Result<Role, CommandError> {
    Role::parse(raw).ok_or_else(|| CommandError::InvalidArguments(format!("unknown role `{raw}`")))
}

fn cmd_role(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw = args
        .first()
        .ok_or_else(|| usage_error("role <publisher|auxiliary|regular|special|missionary>"))?;
    let role = role_arg(raw)?;
    let updated = SettingsService::change_role(&context.settings, role, context.today())?;
    output::success(format!("Role set to {}", updated.role));
    if let Some(since) = updated.pioneer_since.filter(|_| updated.role.is_pioneer()) {
        output::info(format!("Pioneering since {since}"));
    }
    Ok(())
}

fn cmd_role_goal(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw = args.first().ok_or_else(|| usage_error("role-goal <hours|clear>"))?;
    let goal = goal_arg(raw, "role goal")?;
    let updated = SettingsService::set_role_goal(&context.settings, goal)?;
    output::success(format!(
        "Monthly role goal is {} hours",
        updated.effective_role_goal()
    ));
    Ok(())
}

fn cmd_design(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw = args.first().ok_or_else(|| usage_error("design <system|light|dark>"))?;
    let design = Design::parse(raw)
        .ok_or_else(|| CommandError::InvalidArguments(format!("unknown design `{raw}`")))?;
    context.settings.update(|settings| settings.design = design)?;
    output::success(format!("Design set to {design:?}"));
    Ok(())
}

fn time_arg(raw: &str) -> Result<NaiveTime, CommandError> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map_err(|_| CommandError::InvalidArguments(format!("`{raw}` is not a time (expected HH:MM)")))
}

fn cmd_reminder(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "reminder <on|off> [HH:MM]";
    let enabled = match args.first().map(|raw| raw.to_ascii_lowercase()) {
        Some(flag) if flag == "on" => true,
        Some(flag) if flag == "off" => false,
        _ => return Err(usage_error(usage)),
    };
    let time = args.get(1).map(|raw| time_arg(raw)).transpose()?;

    let updated = context.settings.update(|settings| {
        settings.reminder.enabled = enabled;
        if let Some(time) = time {
            settings.reminder.time = time;
        }
    })?;
    sync_reminder(&context.reminders, &updated.reminder, context.clock.now());
    if enabled {
        output::success(format!(
            "Reminder set for {}",
            next_reminder(context.clock.now(), updated.reminder.time).format("%Y-%m-%d %H:%M")
        ));
    } else {
        output::success("Reminder disabled");
    }
    Ok(())
}

fn looks_like_date(raw: &str) -> bool {
    raw.len() == 10 && raw.matches('-').count() == 2
}

/// Runs the setup flow non-interactively from the given answers.
fn cmd_setup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() < 2 {
        return Err(usage_error(SETUP_USAGE));
    }
    let role = role_arg(args[1])?;
    let mut intents = vec![
        IntroIntent::Next,
        IntroIntent::SetName(args[0].to_string()),
        IntroIntent::Next,
        IntroIntent::SetRole(role),
        IntroIntent::Next,
    ];

    let (since, reminder_arg) = match args.get(2) {
        Some(raw) if role.has_yearly_goal() && looks_like_date(raw) => (Some(date_arg(raw)?), args.get(3)),
        other => (None, other),
    };
    if role.has_yearly_goal() {
        intents.push(IntroIntent::SetPioneerSince(since));
        intents.push(IntroIntent::Next);
    }
    let reminder = match reminder_arg {
        Some(raw) if !raw.eq_ignore_ascii_case("off") => IntroIntent::SetReminder {
            enabled: true,
            time: Some(time_arg(raw)?),
        },
        _ => IntroIntent::SetReminder {
            enabled: false,
            time: None,
        },
    };
    intents.push(reminder);
    intents.push(IntroIntent::Next);

    let state = intro::run(intents);
    let settings: Settings = state.into_settings().ok_or_else(|| {
        CommandError::InvalidArguments("setup could not be completed; is the name empty?".into())
    })?;
    let design = context.settings.snapshot().design;
    let updated = context.settings.replace(Settings { design, ..settings })?;
    sync_reminder(&context.reminders, &updated.reminder, context.clock.now());
    output::success(format!("Welcome, {}!", updated.name));
    Ok(())
}
