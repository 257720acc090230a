//! Home screen command.

use chrono::Local;
use console::style;

use ps_core::error::PsResult;
use ps_services::screens::home::{HomeScreen, Launch};
use ps_services::ServiceRegistry;

use crate::OutputFormat;

pub async fn run(registry: &ServiceRegistry, launch: Option<String>, format: OutputFormat) -> PsResult<()> {
    let mut home = HomeScreen::new(registry.store.clone());
    home.load().await;

    if let Some(name) = launch {
        return match home.launch(&name) {
            Ok(Launch::Open(route)) => match format {
                OutputFormat::Json => super::print_json(&serde_json::json!({ "route": route.as_str() })),
                OutputFormat::Text => {
                    println!("Opening {} ({})", style(&name).bold(), style(format!("/{route}")).dim());
                    Ok(())
                }
            },
            Ok(Launch::Alert(alert)) => super::show_alert(&alert, format),
            Err(alert) => super::show_failure(&alert, format),
        };
    }

    let now = Local::now();
    match format {
        OutputFormat::Json => super::print_json(&serde_json::json!({
            "greeting": home.greeting(&now),
            "date": home.date_label(&now),
            "apps": home.apps(),
            "dock": home.dock(),
        })),
        OutputFormat::Text => {
            println!("{}", style(home.greeting(&now)).bold());
            println!("{}", style(home.date_label(&now)).dim());
            println!();

            for row in home.apps().chunks(4) {
                let line: Vec<String> = row
                    .iter()
                    .map(|app| {
                        let label = format!("{:<12}", app.name);
                        if app.route.is_some() {
                            style(label).bold().to_string()
                        } else {
                            style(label).dim().to_string()
                        }
                    })
                    .collect();
                println!("  {}", line.join(" "));
            }
            println!();
            let dock: Vec<&str> = home.dock().iter().map(|a| a.name).collect();
            println!("  {} {}", style("Dock:").dim(), dock.join(" · "));
            Ok(())
        }
    }
}
