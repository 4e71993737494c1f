//! dayplan init and config command implementations
//!
//! Creates the data directory and a default `dayplan.toml`.

use std::path::PathBuf;

use crate::cli::Context;
use crate::config::Config;
use crate::error::Result;
use crate::output::{emit_success, HumanReport};
use crate::storage::Storage;

#[derive(serde::Serialize)]
struct InitReport {
    root: PathBuf,
    created: InitCreated,
}

#[derive(serde::Serialize)]
struct InitCreated {
    root: bool,
    config: bool,
}

#[derive(serde::Serialize)]
struct ConfigReport<'a> {
    root: &'a PathBuf,
    config_file: PathBuf,
    config_file_exists: bool,
    config: &'a Config,
}

pub fn run(ctx: &Context) -> Result<()> {
    let storage = Storage::new(ctx.root.clone());

    let created_root = !storage.is_initialized();
    storage.init()?;

    let config_path = storage.config_file();
    let created_config = if config_path.exists() {
        false
    } else {
        Config::default().save(&config_path)?;
        true
    };

    let report = InitReport {
        root: ctx.root.clone(),
        created: InitCreated {
            root: created_root,
            config: created_config,
        },
    };

    let mut human = HumanReport::new("dayplan init complete");
    human.field("Root", ctx.root.display().to_string());
    human.field("Data dir", created_label(created_root));
    human.field("Config", created_label(created_config));
    human.hint("dayplan add <YYYY-MM-DD> \"first task\"");

    emit_success(ctx.output, "init", &report, &human)
}

pub fn run_config(ctx: &Context) -> Result<()> {
    let config_file = Storage::new(ctx.root.clone()).config_file();
    let report = ConfigReport {
        root: &ctx.root,
        config_file_exists: config_file.exists(),
        config_file,
        config: &ctx.config,
    };

    let mut human = HumanReport::new("dayplan config");
    human.field("Root", ctx.root.display().to_string());
    human.field(
        "Config file",
        if report.config_file_exists {
            report.config_file.display().to_string()
        } else {
            "none (defaults)".to_string()
        },
    );
    human.field(
        "Migration",
        on_off(ctx.config.store.migration_enabled && !ctx.no_migrate),
    );
    human.field("Stats cache", on_off(ctx.config.store.stats_cache_enabled));
    human.field(
        "Max content length",
        ctx.config.tasks.max_content_len.to_string(),
    );
    human.field("Default priority", ctx.config.tasks.default_priority.clone());

    emit_success(ctx.output, "config", &report, &human)
}

fn created_label(created: bool) -> &'static str {
    if created {
        "created"
    } else {
        "already present"
    }
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}
