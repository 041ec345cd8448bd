//! Delete command - remove a settings file or one instance.

use crate::app;
use prefstore_core::Config;
use std::io::{self, BufRead, Write};

/// Run the delete command.
pub fn run(
    config: &Config,
    app_name: &str,
    instance: Option<&str>,
    skip_confirm: bool,
) -> anyhow::Result<()> {
    let settings = app::open(config, app_name)?;

    if let Some(id) = instance {
        if settings.instance(id)?.delete()? {
            println!("Instance {} removed.", id);
        } else {
            println!("No settings stored for instance {}. Nothing to delete.", id);
        }
        return Ok(());
    }

    if !settings.exists() {
        println!("No settings found for {}. Nothing to delete.", app_name);
        return Ok(());
    }

    if !skip_confirm {
        let prompt = format!(
            "This will delete all settings for {}, including every instance. Are you sure? [y/N] ",
            app_name
        );
        if !confirm(&prompt, io::stdin().lock(), io::stdout())? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    settings.delete()?;
    println!("Settings deleted.");

    Ok(())
}

fn confirm(prompt: &str, mut input: impl BufRead, mut output: impl Write) -> io::Result<bool> {
    write!(output, "{}", prompt)?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}
