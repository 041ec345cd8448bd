//! Get command - show effective settings.

use crate::app;
use crate::OutputFormat;
use prefstore_core::{Config, Settings};

/// Run the get command.
pub fn run(
    config: &Config,
    app_name: &str,
    instance: Option<&str>,
    output: OutputFormat,
) -> anyhow::Result<()> {
    let scope = app::open_scope(config, app_name, instance)?;
    let settings = scope.get()?;
    print!("{}", render(&settings, &output)?);
    Ok(())
}

fn render(settings: &Settings, output: &OutputFormat) -> anyhow::Result<String> {
    match output {
        OutputFormat::Text => {
            if settings.is_empty() {
                return Ok("(no settings)\n".to_string());
            }
            let mut out = String::new();
            for (key, value) in settings {
                out.push_str(&format!("{} = {}\n", key, value));
            }
            Ok(out)
        }
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(settings)?)),
    }
}
