//! Path command - show where a settings file lives.

use crate::app;
use prefstore_core::Config;

/// Run the path command.
pub fn run(config: &Config, app_name: &str) -> anyhow::Result<()> {
    let settings = app::open(config, app_name)?;
    println!("{}", settings.path().display());
    if !settings.exists() {
        eprintln!("(file does not exist yet)");
    }
    Ok(())
}
