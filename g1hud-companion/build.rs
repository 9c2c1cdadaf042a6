//! Build script for g1hud-companion
//!
//! Validates the embedded companion.toml at compile time so a broken
//! default never ships.

use std::fs;
use std::path::Path;

fn main() {
    validate_config();
}

/// Validate companion.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=companion.toml");
    println!("cargo:rerun-if-changed=build.rs");

    let config_path = Path::new("companion.toml");

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read companion.toml                            ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in companion.toml                    ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    };

    let mut errors = Vec::new();
    validate_required_sections(&config, &mut errors);
    validate_values(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: companion.toml is invalid                                ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated: String = if line.chars().count() > 64 {
                line.chars().take(61).chain("...".chars()).collect()
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn validate_required_sections(config: &toml::Value, errors: &mut Vec<String>) {
    for section in ["scheduler", "auto_off", "link", "storage", "feeds"] {
        match config.get(section) {
            Some(toml::Value::Table(_)) => {}
            Some(_) => errors.push(format!("[{}] must be a table", section)),
            None => errors.push(format!("missing [{}] section", section)),
        }
    }
}

fn positive_integer(config: &toml::Value, section: &str, key: &str, errors: &mut Vec<String>) {
    if let Some(value) = config.get(section).and_then(|s| s.get(key)) {
        match value {
            toml::Value::Integer(n) if *n > 0 => {}
            _ => errors.push(format!("[{}] {} must be a positive integer", section, key)),
        }
    }
}

fn one_of(config: &toml::Value, section: &str, key: &str, allowed: &[&str], errors: &mut Vec<String>) {
    if let Some(value) = config.get(section).and_then(|s| s.get(key)) {
        match value.as_str() {
            Some(v) if allowed.contains(&v) => {}
            _ => errors.push(format!("[{}] {} must be one of {:?}", section, key, allowed)),
        }
    }
}

fn validate_values(config: &toml::Value, errors: &mut Vec<String>) {
    positive_integer(config, "scheduler", "tick_ms", errors);
    positive_integer(config, "auto_off", "threshold_ticks", errors);
    positive_integer(config, "calendar", "lookahead_minutes", errors);
    positive_integer(config, "feeds", "refresh_s", errors);
    one_of(config, "clock", "format", &["24h", "12h"], errors);
    one_of(config, "link", "kind", &["console", "bridge"], errors);
}
