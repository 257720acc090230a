//! Status bar command.

use std::time::Duration;

use console::style;
use tracing::info;

use ps_core::error::PsResult;
use ps_services::status::StatusSnapshot;
use ps_services::telemetry::BatteryAlert;
use ps_services::ServiceRegistry;

use crate::OutputFormat;

fn render(snap: &StatusSnapshot, badges: &[ps_services::AppBadge], use_24hr: bool) -> String {
    let mut left = vec![style(snap.clock_label(use_24hr)).bold().to_string()];
    for badge in badges {
        let count = badge.count_label().map(|c| format!(" {c}")).unwrap_or_default();
        left.push(format!("[{}{count}]", badge.icon));
    }

    let t = &snap.telemetry;
    let bars = "▂▄▆█"
        .chars()
        .take(usize::from(t.signal))
        .collect::<String>();
    let wifi = if t.wifi_connected { "wifi" } else { "no wifi" };
    let battery = format!("{} {}%", t.battery_icon().gauge(), t.battery_percent());
    let battery = match t.battery_alert() {
        BatteryAlert::Critical => style(battery).red().to_string(),
        BatteryAlert::Low => style(battery).yellow().to_string(),
        BatteryAlert::Normal => battery,
    };

    format!("{}    {bars} {wifi} {battery}", left.join(" "))
}

pub async fn run(registry: &mut ServiceRegistry, watch: Option<u64>, format: OutputFormat) -> PsResult<()> {
    let use_24hr = registry.config.read().await.display.use_24hr_format;
    let status = registry.register_status_indicator().await;
    status.mount().await?;

    let print = |snap: StatusSnapshot, badges: Vec<ps_services::AppBadge>| -> PsResult<()> {
        match format {
            OutputFormat::Json => super::print_json(&serde_json::json!({
                "status": snap,
                "visibleBadges": badges,
            })),
            OutputFormat::Text => {
                println!("{}", render(&snap, &badges, use_24hr));
                Ok(())
            }
        }
    };

    print(status.snapshot().await, status.visible_badges().await)?;

    if let Some(secs) = watch {
        info!("watching status bar for {secs}s");
        let deadline = tokio::time::sleep(Duration::from_secs(secs));
        tokio::pin!(deadline);
        let mut redraw = tokio::time::interval(Duration::from_secs(1));
        redraw.tick().await;
        let mut last = render(&status.snapshot().await, &status.visible_badges().await, use_24hr);
        loop {
            tokio::select! {
                _ = &mut deadline => break,
                _ = tokio::signal::ctrl_c() => break,
                _ = redraw.tick() => {
                    let snap = status.snapshot().await;
                    let badges = status.visible_badges().await;
                    let line = render(&snap, &badges, use_24hr);
                    if line != last {
                        last = line;
                        print(snap, badges)?;
                    }
                }
            }
        }
    }

    status.dispose().await;
    Ok(())
}
