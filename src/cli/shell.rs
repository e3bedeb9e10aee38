use std::io::{self, BufRead};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Context as ReadlineContext, Editor, Helper,
};

use super::core::{CliError, CliMode, CommandError, LoopControl, ShellContext};
use super::output;

const SCRIPT_ENV: &str = "FIELD_SERVICE_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        output::disable_colors();
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;
    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(CommandHelper::new(context.command_usages())));

    while context.running {
        match editor.readline(&context.prompt()) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    editor.add_history_entry(line.trim()).ok();
                }
                if !execute(context, &line)? {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                output::info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    for line in io::stdin().lock().lines() {
        if !execute(context, &line?)? {
            break;
        }
    }
    Ok(())
}

/// Runs one input line. Returns `false` once the shell should stop.
fn execute(context: &mut ShellContext, line: &str) -> Result<bool, CliError> {
    let outcome = match ParsedLine::parse(line) {
        Ok(Some(parsed)) => {
            let args: Vec<&str> = parsed.args.iter().map(String::as_str).collect();
            context.dispatch(&parsed.command, &parsed.raw, &args)
        }
        Ok(None) => Ok(LoopControl::Continue),
        Err(err) => Err(err),
    };
    match outcome {
        Ok(LoopControl::Continue) => Ok(context.running),
        Ok(LoopControl::Exit) => {
            context.running = false;
            Ok(false)
        }
        Err(err) => {
            context.report_error(err)?;
            Ok(context.running)
        }
    }
}

/// A tokenized command line; `#` starts a comment line.
#[derive(Debug, PartialEq, Eq)]
struct ParsedLine {
    command: String,
    raw: String,
    args: Vec<String>,
}

impl ParsedLine {
    fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        let mut tokens = shell_words::split(line)
            .map_err(|err| CommandError::InvalidArguments(format!("cannot read `{line}`: {err}")))?
            .into_iter();
        Ok(tokens.next().map(|raw| Self {
            command: raw.to_lowercase(),
            raw,
            args: tokens.collect(),
        }))
    }
}

/// Literal values accepted by the first argument of a command.
fn argument_keywords(command: &str) -> &'static [&'static str] {
    match command {
        "log" => &["ministry", "assignment", "school"],
        "role" => &["publisher", "auxiliary", "regular", "special", "missionary"],
        "design" => &["system", "light", "dark"],
        "reminder" => &["on", "off"],
        "goal" | "role-goal" | "studies" => &["clear"],
        _ => &[],
    }
}

struct CommandHelper {
    /// `(name, usage)` sorted by name.
    commands: Vec<(&'static str, &'static str)>,
}

impl CommandHelper {
    fn new(mut commands: Vec<(&'static str, &'static str)>) -> Self {
        commands.sort_by_key(|(name, _)| *name);
        Self { commands }
    }

    /// Completes the command name, or the first argument of a known command.
    fn candidates(&self, prefix: &str) -> (usize, Vec<String>) {
        let start = prefix
            .rfind(char::is_whitespace)
            .map_or(0, |index| index + 1);
        let needle = prefix[start..].to_ascii_lowercase();
        let words: Vec<&str> = prefix[..start].split_whitespace().collect();

        let pool: Vec<&str> = match words.as_slice() {
            [] => self.commands.iter().map(|(name, _)| *name).collect(),
            [command] => argument_keywords(&command.to_ascii_lowercase()).to_vec(),
            _ => Vec::new(),
        };
        let matches = pool
            .into_iter()
            .filter(|word| word.starts_with(&needle))
            .map(str::to_string)
            .collect();
        (start, matches)
    }

    /// Shows the remaining usage once a known command and a space are typed.
    fn usage_hint(&self, line: &str) -> Option<String> {
        let command = line.strip_suffix(' ')?.trim();
        if command.contains(char::is_whitespace) {
            return None;
        }
        let command = command.to_ascii_lowercase();
        self.commands
            .iter()
            .find(|(name, _)| *name == command)
            .and_then(|(name, usage)| usage.strip_prefix(name))
            .map(str::trim_start)
            .filter(|rest| !rest.is_empty())
            .map(str::to_string)
    }
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, matches) = self.candidates(&line[..pos]);
        let pairs = matches
            .into_iter()
            .map(|word| Pair {
                display: word.clone(),
                replacement: word,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &ReadlineContext<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        self.usage_hint(line)
    }
}

impl Highlighter for CommandHelper {}

impl Validator for CommandHelper {}

#[cfg(test)]
mod tests {
    use super::*;

    fn helper() -> CommandHelper {
        CommandHelper::new(vec![
            ("log", "log <ministry|assignment|school> <h:mm>"),
            ("help", "help [command]"),
            ("exit", "exit"),
        ])
    }

    #[test]
    fn parsed_line_keeps_quoted_arguments_together() {
        let parsed = ParsedLine::parse("  Comment \"met an old friend\" 2024-03 ")
            .unwrap()
            .unwrap();
        assert_eq!(parsed.command, "comment");
        assert_eq!(parsed.raw, "Comment");
        assert_eq!(parsed.args, vec!["met an old friend", "2024-03"]);
    }

    #[test]
    fn blank_and_comment_lines_are_skipped() {
        assert_eq!(ParsedLine::parse("   ").unwrap(), None);
        assert_eq!(ParsedLine::parse("# log ministry 1:00").unwrap(), None);
    }

    #[test]
    fn unbalanced_quotes_are_reported() {
        let err = ParsedLine::parse("comment \"unfinished").unwrap_err();
        assert!(matches!(err, CommandError::InvalidArguments(message) if message.contains("cannot read")));
    }

    #[test]
    fn completes_commands_then_first_argument() {
        let helper = helper();
        assert_eq!(helper.candidates("he"), (0, vec!["help".to_string()]));
        assert_eq!(helper.candidates("log m"), (4, vec!["ministry".to_string()]));
        assert_eq!(helper.candidates("LOG s"), (4, vec!["school".to_string()]));
        assert!(helper.candidates("log ministry 1:").1.is_empty());
        assert!(helper.candidates("exit ").1.is_empty());
    }

    #[test]
    fn hint_shows_remaining_usage() {
        let helper = helper();
        assert_eq!(
            helper.usage_hint("log ").as_deref(),
            Some("<ministry|assignment|school> <h:mm>")
        );
        assert_eq!(helper.usage_hint("exit "), None);
        assert_eq!(helper.usage_hint("log"), None);
        assert_eq!(helper.usage_hint("log ministry "), None);
    }
}
