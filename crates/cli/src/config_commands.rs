use {anyhow::Result, clap::Subcommand};

use roster_config::{RosterConfig, Severity, ValidationResult, validate};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML, master key redacted.
    Show,
    /// Print the path of the config file in use (or where one would go).
    Path,
    /// Validate the effective configuration and report errors/warnings.
    Check,
}

pub fn handle_config(action: ConfigAction, config: &RosterConfig) -> Result<()> {
    match action {
        ConfigAction::Show => {
            print!("{}", toml::to_string_pretty(&config.redacted())?);
            Ok(())
        },
        ConfigAction::Path => {
            println!("{}", roster_config::find_or_default_config_path().display());
            Ok(())
        },
        ConfigAction::Check => check(config),
    }
}

const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn check(config: &RosterConfig) -> Result<()> {
    let result = validate(config);
    report(&result);

    let errors = result.count(Severity::Error);
    let warnings = result.count(Severity::Warning);
    if errors == 0 && warnings == 0 {
        eprintln!("No issues found.");
    } else {
        eprintln!("{errors} error(s), {warnings} warning(s)");
    }

    if result.has_errors() {
        std::process::exit(1);
    }
    Ok(())
}

/// Print every diagnostic to stderr.
fn report(result: &ValidationResult) {
    for d in &result.diagnostics {
        let color = match d.severity {
            Severity::Error => RED,
            Severity::Warning => YELLOW,
        };
        eprintln!("  {BOLD}{color}{}{RESET} {}: {}", d.severity, d.path, d.message);
    }
}
