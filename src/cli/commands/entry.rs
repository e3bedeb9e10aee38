use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::domain::{Displayable, Entry, EntryType, Time};
use crate::storage::EntryStore;

use super::{count_arg, date_arg, id_arg, month_arg, usage_error, CommandDefinition};

const LOG_USAGE: &str =
    "log <ministry|assignment|school> <h:mm> [YYYY-MM-DD] [placements] [videos] [return-visits]";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new("log", "Log an activity", LOG_USAGE, cmd_log),
        CommandDefinition::new(
            "entries",
            "List the entries of a month",
            "entries [YYYY-MM]",
            cmd_entries,
        ),
        CommandDefinition::new("delete", "Delete an entry", "delete <id>", cmd_delete),
    ]
}

fn cmd_log(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() < 2 {
        return Err(usage_error(LOG_USAGE));
    }
    let kind = EntryType::parse(args[0])
        .ok_or_else(|| CommandError::InvalidArguments(format!("unknown entry type `{}`", args[0])))?;
    if kind == EntryType::Transfer {
        return Err(CommandError::InvalidArguments(
            "transfers are recorded with `transfer-next` or `transfer-last`".into(),
        ));
    }
    let time: Time = args[1].parse()?;
    if time.is_negative() {
        return Err(CommandError::InvalidArguments("time must not be negative".into()));
    }

    let now = context.clock.now();
    let date = match args.get(2) {
        Some(raw) => date_arg(raw)?,
        None => now.date(),
    };
    let counter = |index: usize, what: &str| match args.get(index) {
        Some(raw) => count_arg(raw, what),
        None => Ok(0),
    };
    let placements = counter(3, "placements")?;
    let videos = counter(4, "video showings")?;
    let return_visits = counter(5, "return visits")?;

    let hours = u32::try_from(time.hours())
        .map_err(|_| CommandError::InvalidArguments("time is too large".into()))?;
    let mut entry = Entry::new(kind, date.and_time(now.time()))
        .with_time(hours, time.minutes() as u32)
        .with_counters(placements, videos, return_visits);
    entry.id = Some(context.storage.save_entry(&entry)?);

    output::success(format!("Logged {}", entry.display_label()));
    Ok(())
}

fn cmd_entries(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let month = month_arg(context, args.first())?;
    let entries = context.storage.all_of_month(month)?;
    output::section(format!("Entries {}", month.format("%Y-%m")));
    if entries.is_empty() {
        output::info("  (none)");
        return Ok(());
    }
    for entry in &entries {
        let id = entry.id.map(|id| id.to_string()).unwrap_or_default();
        let mut line = format!("  {}  {}", id, entry.display_label());
        if entry.placements > 0 || entry.video_showings > 0 || entry.return_visits > 0 {
            line.push_str(&format!(
                "  [P {} / V {} / RV {}]",
                entry.placements, entry.video_showings, entry.return_visits
            ));
        }
        output::info(line);
    }
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw = args.first().ok_or_else(|| usage_error("delete <id>"))?;
    let entry = context.storage.get_entry(id_arg(raw)?)?;
    context.storage.delete_entry(&entry)?;
    output::success(format!("Deleted {}", entry.display_label()));
    Ok(())
}
