use std::path::PathBuf;

use crate::backup::default_backup_name;
use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::output;
use crate::config::Settings;
use crate::reminder::sync_reminder;
use crate::utils::paths::PathResolver;

use super::{usage_error, CommandDefinition};

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "backup",
            "Write entries, monthly data, and settings to a zip archive",
            "backup [path]",
            cmd_backup,
        ),
        CommandDefinition::new(
            "restore",
            "Import a backup archive, replacing current data",
            "restore <path>",
            cmd_restore,
        ),
    ]
}

fn cmd_backup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let destination = match args.first() {
        Some(path) => PathBuf::from(path),
        None => PathResolver::backup_dir_in(&context.base_dir)
            .join(default_backup_name(context.clock.now())),
    };
    let yaml = context.settings.snapshot().to_yaml()?;
    context.backups.create_backup(&destination, &yaml)?;
    output::success(format!("Backup written to {}", destination.display()));
    Ok(())
}

fn cmd_restore(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let source = args
        .first()
        .map(PathBuf::from)
        .ok_or_else(|| usage_error("restore <path>"))?;
    match context.backups.import_backup(&source)? {
        Some(yaml) => {
            let settings = Settings::from_yaml(&yaml)?;
            let updated = context.settings.replace(settings)?;
            sync_reminder(&context.reminders, &updated.reminder, context.clock.now());
            output::success(format!("Restored data and settings from {}", source.display()));
        }
        None => output::success(format!("Restored data from {}", source.display())),
    }
    Ok(())
}
