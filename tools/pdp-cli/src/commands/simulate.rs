//! Run an interaction script against the widget.

use std::time::Duration;

use anyhow::{Context as _, Result};
use pdp_core::controller::Controller;
use pdp_core::state::TimerId;
use pdp_core::timer::TokioScheduler;
use pdp_core::view::ProductView;
use serde::Serialize;

use super::script::{apply_step, parse_steps, Step, StepOutcome};
use super::SimulateArgs;
use crate::context::Context;
use crate::output::{flag_badge, format_elapsed};

/// Record of one executed step.
#[derive(Debug, Clone, Serialize)]
pub struct StepRecord {
    pub step: String,
    pub outcome: String,
    /// Hide timers that fired during this step.
    pub fired: Vec<String>,
    /// Clock reading after the step.
    pub at_ms: u64,
}

/// Result of a whole script.
#[derive(Debug, Clone, Serialize)]
pub struct Simulation {
    pub clock: &'static str,
    pub elapsed_ms: u64,
    pub steps: Vec<StepRecord>,
    pub view: ProductView,
}

/// Run the simulate command.
pub async fn run(args: SimulateArgs, ctx: &Context) -> Result<()> {
    let steps = parse_steps(&args.steps).context("Invalid script")?;
    ctx.output.debug(&format!("Parsed {} step(s)", steps.len()));

    let simulation = if args.realtime {
        run_realtime(&steps, ctx).await?
    } else {
        run_virtual(&steps, ctx)?
    };

    if let Some(path) = &args.html {
        let path = ctx.resolve_path(path);
        std::fs::write(&path, product_detail::render_page(&simulation.view))
            .with_context(|| format!("Failed to write {}", path.display()))?;
        ctx.output.debug(&format!("Wrote {}", path.display()));
    }

    if ctx.output.is_json() {
        ctx.output.json(&simulation);
        return Ok(());
    }

    print_simulation(ctx, &simulation);
    Ok(())
}

/// Run the script on a virtual clock.
pub fn run_virtual(steps: &[Step], ctx: &Context) -> Result<Simulation> {
    let mut widget = Controller::mount_virtual(&ctx.config, ctx.logger())
        .context("Failed to mount widget")?;

    let mut records = Vec::with_capacity(steps.len());
    for step in steps {
        let (outcome, fired) = match step {
            Step::Wait(d) => ("waited".to_string(), widget.advance(*d)),
            other => (describe(&apply_step(&mut widget, *other)), Vec::new()),
        };
        records.push(record(*step, outcome, &fired, widget.scheduler().now()));
    }

    Ok(Simulation {
        clock: "virtual",
        elapsed_ms: widget.scheduler().now().as_millis() as u64,
        steps: records,
        view: widget.view(),
    })
}

/// Run the script with real Tokio timers.
pub async fn run_realtime(steps: &[Step], ctx: &Context) -> Result<Simulation> {
    let mut widget = Controller::mount(&ctx.config, TokioScheduler::new(), ctx.logger())
        .context("Failed to mount widget")?;
    let start = tokio::time::Instant::now();

    let mut records = Vec::with_capacity(steps.len());
    for step in steps {
        let (outcome, fired) = match step {
            Step::Wait(d) => ("waited".to_string(), wait_realtime(&mut widget, *d).await),
            other => (describe(&apply_step(&mut widget, *other)), Vec::new()),
        };
        records.push(record(*step, outcome, &fired, start.elapsed()));
    }

    Ok(Simulation {
        clock: "realtime",
        elapsed_ms: start.elapsed().as_millis() as u64,
        steps: records,
        view: widget.view(),
    })
}

/// Sleep for `duration`, delivering timers as they fire.
async fn wait_realtime(widget: &mut Controller<TokioScheduler>, duration: Duration) -> Vec<TimerId> {
    let deadline = tokio::time::Instant::now() + duration;
    let mut fired = Vec::new();
    loop {
        match tokio::time::timeout_at(deadline, widget.run_next_timer()).await {
            Ok(Some(timer)) => fired.push(timer),
            Ok(None) => {
                tokio::time::sleep_until(deadline).await;
                break;
            }
            Err(_) => break,
        }
    }
    fired
}

fn record(step: Step, outcome: String, fired: &[TimerId], at: Duration) -> StepRecord {
    StepRecord {
        step: step.to_string(),
        outcome,
        fired: fired.iter().map(ToString::to_string).collect(),
        at_ms: at.as_millis() as u64,
    }
}

fn describe(outcome: &StepOutcome) -> String {
    match outcome {
        StepOutcome::Applied => "applied".to_string(),
        StepOutcome::Rejected(rejection) => format!("rejected: {}", rejection),
        StepOutcome::ImageSubstituted(true) => "placeholder substituted".to_string(),
        StepOutcome::ImageSubstituted(false) => "ignored, already substituted".to_string(),
        StepOutcome::Unmounted(cancelled) => format!("unmounted, {} timer(s) cancelled", cancelled),
    }
}

fn print_simulation(ctx: &Context, simulation: &Simulation) {
    ctx.output.header(&format!("Simulation ({} clock)", simulation.clock));
    let total = simulation.steps.len();
    for (i, record) in simulation.steps.iter().enumerate() {
        ctx.output.step(
            i + 1,
            total,
            &format!("{:<14} {}", record.step, record.outcome),
        );
        for timer in &record.fired {
            ctx.output.list_item(&format!("{} fired", timer));
        }
    }

    print_view(ctx, &simulation.view);
    ctx.output
        .kv("Clock", &format_elapsed(u128::from(simulation.elapsed_ms)));
}

/// Human summary of a view.
pub fn print_view(ctx: &Context, view: &ProductView) {
    ctx.output.header(&format!("{} - {}", view.brand, view.name));
    ctx.output.kv("Main image", &view.main_image.alt);
    ctx.output.kv("Source", &view.main_image.src);
    ctx.output.kv("Price", &view.price);
    ctx.output.kv("Quantity", &view.quantity.to_string());
    ctx.output.kv(
        "Decrement",
        &flag_badge(view.decrement_enabled, "enabled", "disabled"),
    );
    ctx.output.kv(
        "Cart",
        &view
            .cart_badge
            .map(|count| count.to_string())
            .unwrap_or_else(|| "empty".to_string()),
    );
    ctx.output.kv(
        "Notification",
        &flag_badge(view.notification.visible, "visible", "hidden"),
    );
}
