//! Interactive line-oriented front-end.
//!
//! One `TodoController` lives for the whole session, so optimistic state,
//! the filter, and the last error carry over between commands.

use std::io::{BufRead, Write};

use anyhow::Result;
use log::debug;
use todolist_core::{Filter, TodoController, TodoId, Transport};

use crate::render::render;

const HELP: &str = "\
commands:
  add <title>          create a todo
  toggle <id>          flip completed
  rm <id>              delete a todo
  edit <id> <title>    rename a todo
  filter <f>           all | active | completed
  refresh              reload from the server
  list                 show the list again
  help                 this text
  quit                 leave the shell
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Add(String),
    Toggle(TodoId),
    Remove(TodoId),
    Edit(TodoId, String),
    Filter(Filter),
    Refresh,
    List,
    Help,
    Quit,
}

impl ShellCommand {
    /// The existing todo this command acts on, if any.
    pub fn target(&self) -> Option<TodoId> {
        match self {
            ShellCommand::Toggle(id) | ShellCommand::Remove(id) | ShellCommand::Edit(id, _) => Some(*id),
            _ => None,
        }
    }
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<ShellCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let id = |s: &str| s.parse::<TodoId>().map_err(|_| format!("'{s}' is not a todo id"));

    let command = match word {
        "add" | "a" => ShellCommand::Add(rest.to_string()),
        "toggle" | "t" => ShellCommand::Toggle(id(rest)?),
        "rm" | "delete" | "d" => ShellCommand::Remove(id(rest)?),
        "edit" | "e" => {
            let (target, title) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            ShellCommand::Edit(id(target)?, title.trim().to_string())
        }
        "filter" | "f" => ShellCommand::Filter(rest.parse()?),
        "refresh" | "r" => ShellCommand::Refresh,
        "list" | "ls" => ShellCommand::List,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        other => return Err(format!("unknown command '{other}' (try 'help')")),
    };
    Ok(Some(command))
}

/// Read commands from `input` until EOF or `quit`, rendering after each one.
pub fn run<T, R, W>(controller: &mut TodoController, transport: &T, input: R, mut output: W) -> Result<()>
where
    T: Transport,
    R: BufRead,
    W: Write,
{
    let _ = controller.refresh(transport);
    write!(output, "{}", render(controller))?;

    for line in input.lines() {
        let line = line?;
        let command = match parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                writeln!(output, "{message}")?;
                continue;
            }
        };
        debug!("shell command: {command:?}");

        if let Some(id) = command.target() {
            if !controller.todos().iter().any(|todo| todo.id == id) {
                writeln!(output, "no todo with id {id}")?;
                continue;
            }
        }

        // Failures are already recorded on the controller and rendered below.
        let _ = match command {
            ShellCommand::Add(title) => {
                controller.set_draft(title);
                controller.add(transport)
            }
            ShellCommand::Toggle(id) => controller.toggle(transport, id),
            ShellCommand::Remove(id) => controller.delete(transport, id),
            ShellCommand::Edit(id, title) => controller.update_title(transport, id, &title),
            ShellCommand::Filter(filter) => {
                controller.set_filter(filter);
                Ok(())
            }
            ShellCommand::Refresh => controller.refresh(transport),
            ShellCommand::List => Ok(()),
            ShellCommand::Help => {
                write!(output, "{HELP}")?;
                continue;
            }
            ShellCommand::Quit => break,
        };
        write!(output, "{}", render(controller))?;
    }
    output.flush()?;
    Ok(())
}
