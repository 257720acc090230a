//! Settings commands.

use clap::Subcommand;
use console::style;

use ps_core::error::PsResult;
use ps_services::screens::settings::{ActionOutcome, SettingAction, SettingKind, SettingsScreen};
use ps_services::screens::Alert;
use ps_services::ServiceRegistry;

use crate::OutputFormat;

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Show all settings.
    List,
    /// Change a setting: `theme on`, `sound off`, `userName Sam`.
    Set {
        /// Setting key (userName, theme, notifications, sound).
        key: String,
        /// New value. Toggles accept on/off, true/false, yes/no.
        value: String,
    },
    /// Show storage usage.
    Storage,
    /// Show version information.
    About,
    /// Write the default settings back.
    Reset {
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
}

fn parse_toggle(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "on" | "true" | "yes" | "1" | "dark" => Some(true),
        "off" | "false" | "no" | "0" | "light" => Some(false),
        _ => None,
    }
}

fn kind_label(kind: &SettingKind) -> String {
    match kind {
        SettingKind::Toggle(true) => style("on").green().to_string(),
        SettingKind::Toggle(false) => style("off").dim().to_string(),
        SettingKind::Text(value) => value.clone(),
        SettingKind::Action(_) => style("›").dim().to_string(),
    }
}

pub async fn run(registry: &ServiceRegistry, action: SettingsAction, format: OutputFormat) -> PsResult<()> {
    let mut screen = SettingsScreen::new(registry.store.clone());
    if let Err(alert) = screen.load().await {
        return super::show_failure(&alert, format);
    }

    match action {
        SettingsAction::List => match format {
            OutputFormat::Json => super::print_json(screen.items()),
            OutputFormat::Text => {
                let mut table = super::new_table(vec!["Key", "Setting", "Value"]);
                for item in screen.items() {
                    table.add_row(vec![item.key.to_string(), item.title.to_string(), kind_label(&item.kind)]);
                }
                println!("{table}");
                Ok(())
            }
        },
        SettingsAction::Set { key, value } => {
            let kind = screen.item(&key).map(|i| i.kind.clone());
            let result = match kind {
                Some(SettingKind::Toggle(_)) => match parse_toggle(&value) {
                    Some(on) => screen.set_toggle(&key, on).await,
                    None => Err(Alert::invalid(format!("expected on or off, got \"{value}\""))),
                },
                Some(SettingKind::Text(_)) => screen.save_user_name(&value).await.map(|()| None),
                Some(SettingKind::Action(_)) | None => {
                    Err(Alert::invalid(format!("{key} cannot be set")))
                }
            };
            match result {
                Ok(hint) => {
                    if let OutputFormat::Text = format {
                        let shown = screen.item(&key).map(|i| kind_label(&i.kind)).unwrap_or_default();
                        println!("  {} {key} = {shown}", style("OK").green().bold());
                    }
                    match hint {
                        Some(alert) => super::show_alert(&alert, format),
                        None => Ok(()),
                    }
                }
                Err(alert) => super::show_failure(&alert, format),
            }
        }
        SettingsAction::Storage => outcome(screen.activate(SettingAction::ShowStorage), format),
        SettingsAction::About => outcome(screen.activate(SettingAction::ShowAbout), format),
        SettingsAction::Reset { yes } => {
            let ActionOutcome::Confirm(prompt) = screen.activate(SettingAction::ResetAll) else {
                return Ok(());
            };
            if !super::confirm(&prompt, yes)? {
                println!("Cancelled.");
                return Ok(());
            }
            match screen.reset_all().await {
                Ok(alert) => super::show_alert(&alert, format),
                Err(alert) => super::show_failure(&alert, format),
            }
        }
    }
}

fn outcome(outcome: ActionOutcome, format: OutputFormat) -> PsResult<()> {
    match outcome {
        ActionOutcome::Show(alert) | ActionOutcome::Confirm(alert) => super::show_alert(&alert, format),
        ActionOutcome::PromptUserName(current) => {
            println!("Current name: {current}");
            Ok(())
        }
    }
}
