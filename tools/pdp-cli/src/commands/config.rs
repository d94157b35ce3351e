//! Configuration management commands.

use std::fs;

use anyhow::{bail, Context as _, Result};
use pdp_core::config::WidgetConfig;

use super::{ConfigArgs, ConfigCommand};
use crate::context::{Context, CONFIG_NAMES};

/// Run the config command.
pub fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    let config = &ctx.config;
    ctx.output.info("[notification]");
    ctx.output
        .kv("duration_ms", &config.notification.duration_ms.to_string());
    ctx.output.kv("policy", config.notification.policy.as_str());
    ctx.output.kv("message", &config.notification.message);

    ctx.output.info("[currency]");
    ctx.output.kv("code", &config.currency.code);
    ctx.output.kv("locale", &config.currency.locale);

    ctx.output.info("[images]");
    ctx.output
        .kv("main_placeholder", &config.images.main_placeholder);
    ctx.output
        .kv("thumbnail_placeholder", &config.images.thumbnail_placeholder);

    ctx.output.info("[logging]");
    ctx.output.kv("level", &config.logging.level.to_string());

    let product = config.product();
    ctx.output.info("[product]");
    ctx.output.kv("name", &product.name);
    ctx.output.kv("images", &product.image_count().to_string());

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let content = WidgetConfig::default()
        .to_toml_string()
        .context("Failed to serialize default config")?;
    fs::write(&config_path, content)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    ctx.output
        .success(&format!("Created: {}", config_path.display()));

    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    if let Err(e) = ctx.config.validate() {
        if ctx.output.is_json() {
            ctx.output
                .json(&serde_json::json!({ "valid": false, "error": e.to_string() }));
        }
        bail!("Configuration is invalid: {}", e);
    }

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "valid": true }));
    } else {
        ctx.output.success("Configuration is valid");
    }

    Ok(())
}
