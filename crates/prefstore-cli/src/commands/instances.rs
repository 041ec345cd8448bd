//! Instances command - list instances with stored settings.

use crate::app;
use prefstore_core::Config;

/// Run the instances command.
pub fn run(config: &Config, app_name: &str) -> anyhow::Result<()> {
    let settings = app::open(config, app_name)?;
    let ids = settings.instance_ids()?;

    if ids.is_empty() {
        println!("No instances stored for {}.", app_name);
        return Ok(());
    }

    for id in ids {
        println!("{}", id);
    }
    Ok(())
}
