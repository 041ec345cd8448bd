//! Save command - replace stored settings.

use crate::app;
use prefstore_core::{parse_settings, Config};

/// Run the save command.
pub fn run(
    config: &Config,
    app_name: &str,
    content: &str,
    instance: Option<&str>,
) -> anyhow::Result<()> {
    let content = parse_settings(content)?;

    let scope = app::open_scope(config, app_name, instance)?;
    scope.save(content)?;

    println!("Settings saved.");
    Ok(())
}
