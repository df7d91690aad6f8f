use clap::{Parser, Subcommand};
use std::io::Write;
use thiserror::Error;

use crate::database::Database;
use crate::service::{self, ServiceError};
use crate::validation::validate_task_input;

#[derive(Parser)]
#[command(name = "taskboard")]
#[command(about = "Task tracking HTTP backend with done markers")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Use development mode (uses separate dev config/database)
    #[arg(long)]
    pub dev: bool,

    /// Database file to use instead of the configured one (":memory:" for a throwaway store)
    #[arg(long, global = true)]
    pub database: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP server (default if no subcommand)
    Serve {
        /// Address to bind, overrides the config file
        #[arg(long)]
        host: Option<String>,
        /// Port to bind, overrides the config file
        #[arg(long)]
        port: Option<u16>,
    },
    /// Quickly add a new task
    AddTask {
        /// Task title
        title: String,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
    },
    /// List tasks with their completion state
    List,
    /// Mark a task as done
    Done {
        /// Task ID
        id: i64,
    },
    /// Clear the done marker of a task
    Undone {
        /// Task ID
        id: i64,
    },
    /// Delete a task and its done marker
    DeleteTask {
        /// Task ID
        id: i64,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    ServiceError(#[from] ServiceError),
    #[error("Failed to write output: {0}")]
    OutputError(#[from] std::io::Error),
}

/// Handle the add-task command
pub fn handle_add_task(
    title: String,
    due: Option<String>,
    db: &Database,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let input = validate_task_input(Some(title.as_str()), due.as_deref()).map_err(ServiceError::from)?;
    let task = db.transaction_blocking(|tx| service::create_task(tx, &input))?;
    writeln!(out, "Task created successfully (ID: {})", task.id)?;
    Ok(())
}

/// Handle the list command
pub fn handle_list(db: &Database, out: &mut impl Write) -> Result<(), CliError> {
    let tasks = db.transaction_blocking(|tx| service::list_tasks(tx))?;
    if tasks.is_empty() {
        writeln!(out, "No tasks")?;
    }
    for task in tasks {
        let mark = if task.done { "x" } else { " " };
        writeln!(out, "[{}] {:>4}  {}", mark, task.id, task.title)?;
    }
    Ok(())
}

/// Handle the done command
pub fn handle_done(id: i64, db: &Database, out: &mut impl Write) -> Result<(), CliError> {
    db.transaction_blocking(|tx| service::mark_done(tx, id))?;
    writeln!(out, "Task {} marked done", id)?;
    Ok(())
}

/// Handle the undone command
pub fn handle_undone(id: i64, db: &Database, out: &mut impl Write) -> Result<(), CliError> {
    db.transaction_blocking(|tx| service::unmark_done(tx, id))?;
    writeln!(out, "Task {} marked not done", id)?;
    Ok(())
}

/// Handle the delete-task command
pub fn handle_delete_task(id: i64, db: &Database, out: &mut impl Write) -> Result<(), CliError> {
    db.transaction_blocking(|tx| service::delete_task(tx, id))?;
    writeln!(out, "Task {} deleted", id)?;
    Ok(())
}
