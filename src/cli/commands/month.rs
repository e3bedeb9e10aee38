use chrono::NaiveDate;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::core::services::{service_year_progress, MonthLedger, ReportService};
use crate::domain::{Displayable, Entry, MonthlyInformation};
use crate::storage::{EntryStore, MonthlyInfoStore};

use super::{count_arg, goal_arg, id_arg, month_arg, optional_count_arg, usage_error, CommandDefinition};

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "month",
            "Show the summary of a month",
            "month [YYYY-MM]",
            cmd_month,
        ),
        CommandDefinition::new(
            "transfer-next",
            "Carry minutes of a month into the next one",
            "transfer-next <minutes> [YYYY-MM]",
            cmd_transfer_next,
        ),
        CommandDefinition::new(
            "transfer-last",
            "Carry minutes of the previous month into this one",
            "transfer-last <minutes> [YYYY-MM]",
            cmd_transfer_last,
        ),
        CommandDefinition::new(
            "undo-transfer",
            "Delete a transfer entry",
            "undo-transfer <id>",
            cmd_undo_transfer,
        ),
        CommandDefinition::new(
            "studies",
            "Set the bible studies of a month",
            "studies <count|clear> [YYYY-MM]",
            cmd_studies,
        ),
        CommandDefinition::new(
            "goal",
            "Override the hour goal of a month",
            "goal <hours|clear> [YYYY-MM]",
            cmd_goal,
        ),
        CommandDefinition::new(
            "comment",
            "Set the report comment of a month",
            "comment <text> [YYYY-MM]",
            cmd_comment,
        ),
        CommandDefinition::new(
            "report",
            "Print the field service report of a month",
            "report [YYYY-MM]",
            cmd_report,
        ),
        CommandDefinition::new(
            "service-year",
            "Show progress toward the yearly goal",
            "service-year [YYYY-MM]",
            cmd_service_year,
        ),
    ]
}

fn cmd_month(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let month = month_arg(context, args.first())?;
    let ledger = MonthLedger::load(&context.storage, month)?;
    let settings = context.settings.snapshot();
    let goal = ledger.goal(&settings);

    output::section(ReportService::month_title(month, context.today()));
    output::field("Ministry", ledger.ministry_time());
    if settings.role.is_pioneer() || ledger.info.goal.is_some() {
        output::field("Goal", format!("{}:00", goal.monthly_goal));
    }
    output::field("Placements", ledger.placements());
    output::field("Video showings", ledger.video_showings());
    output::field("Return visits", ledger.return_visits());
    output::field("Bible studies", ledger.info.bible_studies.unwrap_or(0));
    if !ledger.info.report_comment.is_empty() {
        output::field("Comment", &ledger.info.report_comment);
    }

    print_transfers("Carried in", &ledger.transferred);
    print_transfers("Carried out", &ledger.outgoing);

    let last = ledger.rest_of_last_month();
    if !last.is_empty() {
        output::info(format!(
            "{} left {last}; `transfer-last {}` carries it here.",
            ledger.previous_month().format("%Y-%m"),
            last.total_minutes()
        ));
    }
    let rest = ledger.rest_of_this_month();
    if !rest.is_empty() {
        output::info(format!(
            "This month has {rest} left over; `transfer-next {}` carries it into {}.",
            rest.total_minutes(),
            ledger.next_month().format("%Y-%m")
        ));
    }
    Ok(())
}

fn print_transfers(label: &str, transfers: &[Entry]) {
    for entry in transfers {
        let id = entry.id.map(|id| id.to_string()).unwrap_or_default();
        output::field(label, format!("{}  {}", entry.display_label(), id));
    }
}

fn minutes_and_month(
    context: &ShellContext,
    args: &[&str],
    usage: &str,
) -> Result<(u32, NaiveDate), CommandError> {
    let raw = args.first().ok_or_else(|| usage_error(usage))?;
    let minutes = count_arg(raw, "minutes")?;
    let month = month_arg(context, args.get(1))?;
    Ok((minutes, month))
}

fn cmd_transfer_next(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (minutes, month) = minutes_and_month(context, args, "transfer-next <minutes> [YYYY-MM]")?;
    let mut ledger = MonthLedger::load(&context.storage, month)?;
    match ledger.transfer_to_next_month(&context.storage, minutes)? {
        Some(entry) => output::success(format!("Transferred {} to the next month", entry.time())),
        None => output::info("Nothing transferred."),
    }
    Ok(())
}

fn cmd_transfer_last(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (minutes, month) = minutes_and_month(context, args, "transfer-last <minutes> [YYYY-MM]")?;
    let mut ledger = MonthLedger::load(&context.storage, month)?;
    match ledger.transfer_from_last_month(&context.storage, minutes)? {
        Some(entry) => output::success(format!("Transferred {} from the last month", entry.time())),
        None => output::info("Nothing transferred."),
    }
    Ok(())
}

fn cmd_undo_transfer(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw = args.first().ok_or_else(|| usage_error("undo-transfer <id>"))?;
    let id = id_arg(raw)?;
    let entry = context.storage.get_entry(id)?;
    let mut ledger = MonthLedger::load(&context.storage, entry.date())?;
    let transfer = ledger.transfer(id).cloned().ok_or_else(|| {
        CommandError::InvalidArguments(format!("{} is not a transfer entry", entry.display_label()))
    })?;
    ledger.undo_transfer(&context.storage, &transfer)?;
    output::success(format!("Removed {}", transfer.display_label()));
    Ok(())
}

fn update_info<F>(context: &ShellContext, month: NaiveDate, change: F) -> Result<MonthlyInformation, CommandError>
where
    F: FnOnce(&mut MonthlyInformation),
{
    let mut info = context.storage.info_of_month(month)?;
    change(&mut info);
    context.storage.save_info(&info)?;
    Ok(info)
}

fn cmd_studies(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw = args
        .first()
        .ok_or_else(|| usage_error("studies <count|clear> [YYYY-MM]"))?;
    let studies = optional_count_arg(raw, "bible studies")?;
    let month = month_arg(context, args.get(1))?;
    update_info(context, month, |info| info.bible_studies = studies)?;
    output::success(match studies {
        Some(count) => format!("Bible studies set to {count}"),
        None => "Bible studies cleared".to_string(),
    });
    Ok(())
}

fn cmd_goal(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw = args
        .first()
        .ok_or_else(|| usage_error("goal <hours|clear> [YYYY-MM]"))?;
    let goal = goal_arg(raw, "goal")?;
    let month = month_arg(context, args.get(1))?;
    update_info(context, month, |info| info.goal = goal)?;
    output::success(match goal {
        Some(hours) => format!("Monthly goal set to {hours} hours"),
        None => "Monthly goal reset to the role goal".to_string(),
    });
    Ok(())
}

fn cmd_comment(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let text = args
        .first()
        .ok_or_else(|| usage_error("comment <text> [YYYY-MM]"))?
        .trim()
        .to_string();
    let month = month_arg(context, args.get(1))?;
    let cleared = text.is_empty();
    update_info(context, month, move |info| info.report_comment = text)?;
    output::success(if cleared { "Comment cleared" } else { "Comment saved" });
    Ok(())
}

fn cmd_report(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let month = month_arg(context, args.first())?;
    let ledger = MonthLedger::load(&context.storage, month)?;
    let settings = context.settings.snapshot();
    let report = ReportService::assemble(
        &settings.name,
        month,
        &ledger.entries,
        ledger.ministry_time(),
        &ledger.info,
        context.today(),
    );
    output::info(report.share_text());
    Ok(())
}

fn cmd_service_year(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let month = month_arg(context, args.first())?;
    let ledger = MonthLedger::load(&context.storage, month)?;
    let settings = context.settings.snapshot();
    let goal = ledger.goal(&settings);

    output::section(format!("Service year {}", goal.service_year.label()));
    output::field("Begins", goal.service_year.begin);
    output::field("Ends", goal.service_year.end);
    if !settings.role.has_yearly_goal() {
        output::info(format!("  No yearly goal for {}.", settings.role));
        return Ok(());
    }
    let done = service_year_progress(&context.storage, &goal, month)?;
    output::field("Pioneering since", goal.pioneering_start);
    output::field("Yearly goal", format!("{}:00", goal.yearly_goal));
    output::field("Done", done);
    output::field("Remaining", goal.yearly_remaining(done));
    Ok(())
}
