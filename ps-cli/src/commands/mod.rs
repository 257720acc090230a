//! CLI command implementations.

pub mod home;
pub mod messages;
pub mod contacts;
pub mod notes;
pub mod calc;
pub mod settings;
pub mod notifications;
pub mod usage;
pub mod status;
pub mod db;

use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};
use console::style;
use dialoguer::Confirm;
use serde::Serialize;

use ps_core::error::{PsError, PsResult};
use ps_services::screens::Alert;

use crate::OutputFormat;

/// A table with the CLI's standard look.
pub fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

/// Pretty-print `value` as JSON.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> PsResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Show an informational alert.
pub fn show_alert(alert: &Alert, format: OutputFormat) -> PsResult<()> {
    match format {
        OutputFormat::Json => print_json(alert),
        OutputFormat::Text => {
            println!("{}", style(&alert.title).bold());
            println!("{}", alert.message);
            Ok(())
        }
    }
}

/// Report a failed screen action. The process still exits cleanly.
pub fn show_failure(alert: &Alert, format: OutputFormat) -> PsResult<()> {
    match format {
        OutputFormat::Json => print_json(&serde_json::json!({ "error": alert })),
        OutputFormat::Text => {
            eprintln!("  {} {}", style(&alert.title).red().bold(), alert.message);
            Ok(())
        }
    }
}

/// Ask before a destructive action unless `assume_yes` is set.
pub fn confirm(prompt: &Alert, assume_yes: bool) -> PsResult<bool> {
    if assume_yes {
        return Ok(true);
    }
    println!("{}", style(&prompt.title).yellow().bold());
    Confirm::new()
        .with_prompt(&prompt.message)
        .default(false)
        .interact()
        .map_err(|e| PsError::Internal(format!("prompt failed: {e}")))
}

/// Truncate a string to at most `max_chars` characters, appending an ellipsis
/// if truncated.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else if max_chars > 3 {
        let head: String = s.chars().take(max_chars - 3).collect();
        format!("{head}...")
    } else {
        s.chars().take(max_chars).collect()
    }
}

/// Mark drawn next to unread rows.
pub fn unread_mark(is_read: bool) -> String {
    if is_read {
        String::new()
    } else {
        style("●").cyan().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
        assert_eq!(truncate("👍👍👍👍👍", 4), "👍...");
        assert_eq!(truncate("abcdef", 2), "ab");
    }

    #[test]
    fn test_confirm_assume_yes_skips_prompt() {
        let prompt = Alert::new("Reset", "Sure?");
        assert!(confirm(&prompt, true).unwrap());
    }
}
