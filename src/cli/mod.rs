//! Command-line interface for dayplan
//!
//! This module defines the CLI structure using clap derive macros.
//! Each group of subcommands lives in its own submodule.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{self, Config};
use crate::date::DayDate;
use crate::error::Result;
use crate::output::OutputOptions;
use crate::storage::Storage;
use crate::store::{DayStore, StoreOptions};

mod day;
mod init;
mod stats;

/// dayplan - per-day task planner
///
/// Keeps one JSON record per day, carries unfinished tasks into the next
/// day, and reports monthly completion stats.
#[derive(Parser, Debug)]
#[command(name = "dayplan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Data directory (defaults to the platform data dir)
    #[arg(long, global = true, env = config::ROOT_ENV)]
    pub root: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Do not carry unfinished tasks forward on this run
    #[arg(long, global = true)]
    pub no_migrate: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the data directory and a default dayplan.toml
    Init,

    /// Show the tasks of a day
    Show {
        /// Day to show (YYYY-MM-DD)
        date: String,
    },

    /// Add a task to a day
    Add {
        /// Day to add to (YYYY-MM-DD)
        date: String,

        /// Task text
        content: String,

        /// Priority: normal, important, urgent
        #[arg(short, long)]
        priority: Option<String>,
    },

    /// Change fields of a task
    Update {
        /// Day holding the task (YYYY-MM-DD)
        date: String,

        /// Task id
        id: String,

        /// New task text
        #[arg(long)]
        content: Option<String>,

        /// New priority: normal, important, urgent
        #[arg(short, long)]
        priority: Option<String>,

        /// Mark completed (true) or open (false)
        #[arg(long)]
        completed: Option<bool>,
    },

    /// Mark a task completed
    Done {
        /// Day holding the task (YYYY-MM-DD)
        date: String,

        /// Task id
        id: String,
    },

    /// Mark a task open again
    Undone {
        /// Day holding the task (YYYY-MM-DD)
        date: String,

        /// Task id
        id: String,
    },

    /// Delete a task
    Rm {
        /// Day holding the task (YYYY-MM-DD)
        date: String,

        /// Task id
        id: String,
    },

    /// Task totals for a month
    Stats {
        /// Year (e.g. 2024)
        year: i32,

        /// Month (1-12)
        month: u32,
    },

    /// Print the effective configuration
    Config,
}

/// What every command needs: where the data is and how to print
pub(crate) struct Context {
    pub root: PathBuf,
    pub config: Config,
    pub output: OutputOptions,
    pub no_migrate: bool,
}

impl Context {
    pub fn store(&self) -> Result<DayStore> {
        let mut options = StoreOptions::from_config(&self.config)?;
        if self.no_migrate {
            options.migration_enabled = false;
        }
        Ok(DayStore::new(Storage::new(self.root.clone()), options))
    }
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let root = config::resolve_root(self.root);
        let ctx = Context {
            config: Config::load_from_root(&root),
            root,
            output: OutputOptions {
                json: self.json,
                quiet: self.quiet,
            },
            no_migrate: self.no_migrate,
        };

        match self.command {
            Commands::Init => init::run(&ctx),
            Commands::Show { date } => day::run_show(&ctx, &parse_date(&date)?),
            Commands::Add {
                date,
                content,
                priority,
            } => day::run_add(
                &ctx,
                day::AddOptions {
                    date: parse_date(&date)?,
                    content,
                    priority,
                },
            ),
            Commands::Update {
                date,
                id,
                content,
                priority,
                completed,
            } => day::run_update(
                &ctx,
                day::UpdateOptions {
                    date: parse_date(&date)?,
                    id,
                    content,
                    priority,
                    completed,
                },
            ),
            Commands::Done { date, id } => day::run_update(
                &ctx,
                day::UpdateOptions::completed(parse_date(&date)?, id, true),
            ),
            Commands::Undone { date, id } => day::run_update(
                &ctx,
                day::UpdateOptions::completed(parse_date(&date)?, id, false),
            ),
            Commands::Rm { date, id } => day::run_rm(&ctx, &parse_date(&date)?, &id),
            Commands::Stats { year, month } => stats::run_stats(&ctx, year, month),
            Commands::Config => init::run_config(&ctx),
        }
    }
}

fn parse_date(text: &str) -> Result<DayDate> {
    DayDate::parse_required(text)
}
