use super::Context;
use crate::output::{table, Output, OutputFormat};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color};
use owo_colors::OwoColorize;
use serde_json::json;

pub fn show_config(ctx: &Context, output: &Output) -> Result<()> {
    let config_file = ctx.path_manager.config_file();
    let store = ctx.store();
    let config = &ctx.config;

    match output.format() {
        OutputFormat::Human => {
            if output.is_quiet() {
                return Ok(());
            }

            println!("\n{}", "Configuration".bright_cyan().bold());
            if !config_file.exists() {
                println!(
                    "{}",
                    format!("No config file at {}; using defaults", config_file.display()).bright_black()
                );
            }

            let mut files = table(&["Location", "Path"]);
            files.add_row(vec![Cell::new("Config File"), Cell::new(config_file.display())]);
            files.add_row(vec![Cell::new("Watchlist Document"), Cell::new(store.path().display())]);
            files.add_row(vec![Cell::new("Log Directory"), Cell::new(ctx.path_manager.log_dir().display())]);
            println!("{}", files);
            println!();

            let mut settings = table(&["Setting", "Value"]);
            settings.add_row(vec![Cell::new("store.user"), Cell::new(&config.store.user)]);
            settings.add_row(vec![Cell::new("images.base_url"), Cell::new(&config.images.base_url)]);
            settings.add_row(vec![Cell::new("images.placeholder"), Cell::new(&config.images.placeholder)]);
            settings.add_row(vec![Cell::new("logging.level"), Cell::new(&config.logging.level)]);
            settings.add_row(vec![
                Cell::new("logging.json"),
                Cell::new(if config.logging.json { "✓" } else { "✗" }).fg(if config.logging.json {
                    Color::Green
                } else {
                    Color::Red
                }),
            ]);
            settings.add_row(vec![
                Cell::new("logging.file"),
                match &config.logging.file {
                    Some(file) => Cell::new(file.display()),
                    None => Cell::new("stderr").add_attribute(Attribute::Dim),
                },
            ]);
            println!("{}", settings);
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&json!({
                "config_file": config_file.display().to_string(),
                "config_file_exists": config_file.exists(),
                "watchlist_document": store.path().display().to_string(),
                "config": serde_json::to_value(config)?,
            }));
        }
    }

    Ok(())
}

pub fn init_config(ctx: &Context, force: bool, output: &Output) -> Result<()> {
    let config_file = ctx.path_manager.config_file();

    if config_file.exists() && !force {
        output.warn(format!(
            "Config file already exists at {} (use --force to overwrite)",
            config_file.display()
        ));
        return Ok(());
    }

    ctx.path_manager
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create directories: {}", e))?;
    ctx.config
        .save_to_file(&config_file)
        .map_err(|e| eyre!("Failed to write config to {}: {}", config_file.display(), e))?;

    output.success(format!("Wrote config to {}", config_file.display()));
    Ok(())
}
