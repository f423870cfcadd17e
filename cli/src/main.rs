mod render;
mod shell;
mod transport;

use std::io;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::{debug, info};
use todolist_core::{Filter, TodoClient, TodoController, TodoId, Transport};

use crate::render::render;
use crate::transport::UreqTransport;

/// Terminal front-end for a remote todo list
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base URL of the todo API
    #[arg(long = "base-url", env = "TODO_API_URL", default_value = "http://localhost:3000")]
    base_url: String,

    /// Increase logging verbosity (default: warn, -v: info, -vv: debug, -vvv+: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    verbosity: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(flatten)]
    Action(Action),
    /// Interactive session on stdin
    Shell,
}

/// One-shot commands, each run against a freshly loaded list.
#[derive(Subcommand, Debug)]
enum Action {
    /// Show the list
    List {
        #[arg(short = 'f', long = "filter", default_value = "all")]
        filter: Filter,
    },
    /// Create a todo
    Add {
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
    },
    /// Flip a todo's completed flag
    Toggle { id: TodoId },
    /// Delete a todo
    Delete { id: TodoId },
    /// Rename a todo
    Edit {
        id: TodoId,
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
    },
}

fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .init();
}

fn ensure_known(controller: &TodoController, id: TodoId) -> Result<()> {
    if !controller.todos().iter().any(|todo| todo.id == id) {
        bail!("no todo with id {id}");
    }
    Ok(())
}

fn run_action<T: Transport>(controller: &mut TodoController, transport: &T, action: Action) -> Result<()> {
    let outcome = match action {
        Action::List { filter } => {
            controller.set_filter(filter);
            Ok(())
        }
        Action::Add { title } => {
            controller.set_draft(title.join(" "));
            controller.add(transport)
        }
        Action::Toggle { id } => {
            ensure_known(controller, id)?;
            controller.toggle(transport, id)
        }
        Action::Delete { id } => {
            ensure_known(controller, id)?;
            controller.delete(transport, id)
        }
        Action::Edit { id, title } => {
            ensure_known(controller, id)?;
            controller.update_title(transport, id, &title.join(" "))
        }
    };
    // Failures are recorded on the controller and rendered by the caller.
    if let Err(err) = &outcome {
        debug!("command failed: {err:?}");
    }
    Ok(())
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_logging(args.verbosity);
    debug!("Command-line args: {:?}", args);
    info!("Using todo API at {}", args.base_url);

    let transport = UreqTransport::new();
    let mut controller = TodoController::new(TodoClient::new(&args.base_url));

    let action = match args.command {
        Some(Command::Shell) => {
            let stdin = io::stdin();
            shell::run(&mut controller, &transport, stdin.lock(), io::stdout())
                .context("interactive session failed")?;
            return Ok(ExitCode::SUCCESS);
        }
        Some(Command::Action(action)) => action,
        None => Action::List { filter: Filter::All },
    };

    // Every one-shot command starts from the server's current list.
    if controller.refresh(&transport).is_ok() {
        run_action(&mut controller, &transport, action)?;
    }

    print!("{}", render(&controller));
    Ok(if controller.error().is_some() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
