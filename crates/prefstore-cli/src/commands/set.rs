//! Set command - merge keys into stored settings.

use crate::app;
use prefstore_core::{parse_settings, Config};

/// Run the set command.
pub fn run(
    config: &Config,
    app_name: &str,
    content: &str,
    instance: Option<&str>,
) -> anyhow::Result<()> {
    let content = parse_settings(content)?;
    let keys = content.len();

    let scope = app::open_scope(config, app_name, instance)?;
    scope.set(content)?;

    println!("Updated {} key(s).", keys);
    Ok(())
}
