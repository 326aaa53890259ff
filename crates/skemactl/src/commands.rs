//! Command handlers for skemactl.

use std::io::Read;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use indicatif::ProgressBar;
use tracing::info;

use skema_common::config::SkemaConfig;
use skema_common::gemini::GeminiClient;
use skema_common::prompts;
use skema_common::robustness::{self, ROBUSTNESS_TEMPERATURES};
use skema_common::state::{GenerationState, RobustnessState};

use crate::display;
use crate::ui;

fn read_requirements(input: &str) -> Result<String> {
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading requirements from stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("reading requirements file {}", input))
    }
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Single generation: one call at a fixed low temperature.
pub async fn generate(
    input: &str,
    temperature: f32,
    explain: Option<&str>,
    json: bool,
) -> Result<()> {
    let config = SkemaConfig::load()?;
    let raw = read_requirements(input)?;
    let requirements = prompts::validate_requirements(&raw)?.to_string();
    let client = GeminiClient::from_config(&config)?;

    let mut state = GenerationState::default();
    state.begin();
    info!(model = client.model(), temperature, "generation started");

    let pb = spinner("designing schema...");
    let result = client.generate_schema(&requirements, temperature).await;
    pb.finish_and_clear();

    match result {
        Ok(response) => state.succeed(response),
        Err(err) => state.fail(err.to_string()),
    }

    match state.response() {
        Some(response) => {
            if json {
                println!("{}", serde_json::to_string_pretty(response)?);
            } else if let Some(target) = explain {
                print!("{}", display::format_explain(response, &requirements, target)?);
            } else {
                print!("{}", display::format_generation(response, &requirements));
            }
            Ok(())
        }
        None => bail!("{}", state.error().unwrap_or("generation did not run")),
    }
}

/// Robustness test: concurrent generation at every sampling temperature,
/// grouped by structural identity.
pub async fn stability(input: &str, json: bool) -> Result<()> {
    let config = SkemaConfig::load()?;
    let raw = read_requirements(input)?;
    let requirements = prompts::validate_requirements(&raw)?.to_string();
    let client = GeminiClient::from_config(&config)?;

    let mut state = RobustnessState::default();
    state.begin();
    let started = chrono::Local::now();
    info!(
        model = client.model(),
        samples = ROBUSTNESS_TEMPERATURES.len(),
        "robustness test started"
    );

    let pb = spinner(&format!(
        "sampling at {} temperatures...",
        ROBUSTNESS_TEMPERATURES.len()
    ));
    let result = robustness::run_robustness_test(&client, &requirements).await;
    pb.finish_and_clear();

    match result {
        Ok(report) => state.succeed(report),
        Err(err) => state.fail(err.to_string()),
    }

    match state.report() {
        Some(report) => {
            if json {
                println!("{}", serde_json::to_string_pretty(report)?);
            } else {
                println!(
                    "{}started {}{}",
                    ui::colors::DIM,
                    started.format("%Y-%m-%d %H:%M:%S"),
                    ui::colors::RESET
                );
                println!("{}", display::separator());
                print!("{}", display::format_stability(report));
            }
            Ok(())
        }
        None => bail!("{}", state.error().unwrap_or("robustness test did not run")),
    }
}

/// Environment and connectivity check.
pub async fn doctor() -> Result<()> {
    let config = SkemaConfig::load()?;
    ui::print_header("skemactl doctor", env!("CARGO_PKG_VERSION"));

    match SkemaConfig::config_path() {
        Some(path) if path.exists() => ui::print_ok(&format!("config: {}", path.display())),
        _ => ui::print_ok("config: built-in defaults"),
    }

    let mut failed = false;
    match config.api_key() {
        Ok(_) => ui::print_ok(&format!("api key: {} is set", config.api_key_env)),
        Err(err) => {
            ui::print_err(&err.to_string());
            failed = true;
        }
    }

    if !failed {
        let client = GeminiClient::from_config(&config)?;
        match client.list_models().await {
            Ok(models) => {
                ui::print_ok(&format!("api: reachable ({} models)", models.len()));
                // Model names come back as "models/<id>".
                let known = models
                    .iter()
                    .any(|m| m.name.ends_with(&config.model) || m.name == config.model);
                if known {
                    ui::print_ok(&format!("model: {} available", config.model));
                } else {
                    ui::print_warn(&format!("model: {} not in the listing", config.model));
                }
            }
            Err(err) => {
                ui::print_err(&format!("api: {}", err));
                failed = true;
            }
        }
    }

    ui::print_footer();
    if failed {
        bail!("doctor found problems");
    }
    Ok(())
}

/// Print the effective configuration.
pub fn config_show() -> Result<()> {
    let config = SkemaConfig::load()?;
    let kw = 12;

    ui::print_header("skemactl config", env!("CARGO_PKG_VERSION"));
    match SkemaConfig::config_path() {
        Some(path) if path.exists() => ui::print_kv("file", &path.display().to_string(), kw),
        Some(path) => ui::print_kv("file", &format!("{} (not present)", path.display()), kw),
        None => ui::print_kv("file", "(no config directory)", kw),
    }
    ui::print_kv("model", &config.model, kw);
    ui::print_kv("base_url", &config.base_url, kw);
    let key_state = if config.api_key().is_ok() { "set" } else { "unset" };
    ui::print_kv(
        "api_key_env",
        &format!("{} ({})", config.api_key_env, key_state),
        kw,
    );
    ui::print_kv("timeout", &format!("{}s", config.timeout_secs), kw);
    ui::print_footer();
    Ok(())
}
