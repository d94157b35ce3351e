//! Render the static HTML snapshot.

use std::fs;

use anyhow::{Context as _, Result};

use super::script::{parse_steps, Step};
use super::simulate::run_virtual;
use super::RenderArgs;
use crate::context::Context;

/// Run the render command.
pub fn run(args: RenderArgs, ctx: &Context) -> Result<()> {
    let mut steps = parse_steps(&args.steps).context("Invalid --step")?;
    if let Some(index) = args.select {
        steps.insert(0, Step::Select(index));
    }

    let simulation = run_virtual(&steps, ctx)?;
    for record in simulation.steps.iter().filter(|r| r.outcome.starts_with("rejected")) {
        ctx.output
            .warn(&format!("Step {} {}", record.step, record.outcome));
    }

    let content = if ctx.output.is_json() {
        serde_json::to_string_pretty(&simulation.view)?
    } else {
        product_detail::render_page(&simulation.view)
    };

    match args.out {
        Some(path) => {
            let path = ctx.resolve_path(&path);
            fs::write(&path, &content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            ctx.output.success(&format!(
                "Rendered {} ({} bytes) to {}",
                simulation.view.name,
                content.len(),
                path.display()
            ));
        }
        None => print!("{}", content),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::Output;
    use pdp_core::config::WidgetConfig;

    #[test]
    fn test_render_to_file() {
        let dir = std::env::temp_dir().join(format!("pdp-render-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let ctx = Context {
            config: WidgetConfig::default(),
            config_path: None,
            output: Output::new(false, true),
            cwd: dir.clone(),
        };

        let args = RenderArgs {
            out: Some("page.html".to_string()),
            select: Some(1),
            steps: vec!["add".to_string()],
        };
        run(args, &ctx).unwrap();

        let json = fs::read_to_string(dir.join("page.html")).unwrap();
        let view: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(view["thumbnails"][1]["selected"], true);
        assert_eq!(view["cart_badge"], 1);

        fs::remove_dir_all(&dir).unwrap();
    }
}
