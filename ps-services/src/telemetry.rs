//! Simulated device telemetry for the status bar.
//!
//! Battery drains slowly toward a floor, cellular signal wanders between one
//! and four bars, and WiFi occasionally drops or reconnects. Randomness is
//! injected so tests can drive a seeded generator.

use rand::Rng;
use serde::Serialize;

/// Battery, signal and WiFi state shown in the status bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DeviceTelemetry {
    /// Battery charge in percent.
    pub battery: f64,
    /// Signal bars, always within `1..=4`.
    pub signal: u8,
    pub wifi_connected: bool,
}

pub const MIN_SIGNAL: u8 = 1;
pub const MAX_SIGNAL: u8 = 4;

impl DeviceTelemetry {
    pub fn new(initial_battery: f64) -> Self {
        Self {
            battery: initial_battery,
            signal: MAX_SIGNAL,
            wifi_connected: true,
        }
    }

    /// Advance one telemetry interval.
    ///
    /// Battery loses `[0, 2)` percent but never drops below `battery_floor`.
    /// With probability 0.3 the signal moves one bar up or down (equal odds).
    /// With probability 0.05 WiFi flips.
    pub fn tick<R: Rng>(&mut self, rng: &mut R, battery_floor: f64) {
        let drain: f64 = rng.gen_range(0.0..2.0);
        self.battery = (self.battery - drain).max(battery_floor);

        if rng.gen::<f64>() > 0.7 {
            let next = if rng.gen::<f64>() > 0.5 {
                self.signal.saturating_add(1)
            } else {
                self.signal.saturating_sub(1)
            };
            self.signal = next.clamp(MIN_SIGNAL, MAX_SIGNAL);
        }

        if rng.gen::<f64>() > 0.95 {
            self.wifi_connected = !self.wifi_connected;
        }
    }

    /// Battery percentage rounded for display.
    pub fn battery_percent(&self) -> u8 {
        self.battery.round().clamp(0.0, 100.0) as u8
    }

    pub fn battery_icon(&self) -> BatteryIcon {
        BatteryIcon::for_level(self.battery)
    }

    pub fn battery_alert(&self) -> BatteryAlert {
        BatteryAlert::for_level(self.battery)
    }
}

/// Battery glyph bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatteryIcon {
    Full,
    ThreeQuarters,
    Half,
    Quarter,
    Empty,
}

impl BatteryIcon {
    pub fn for_level(level: f64) -> Self {
        if level > 75.0 {
            BatteryIcon::Full
        } else if level > 50.0 {
            BatteryIcon::ThreeQuarters
        } else if level > 25.0 {
            BatteryIcon::Half
        } else if level > 10.0 {
            BatteryIcon::Quarter
        } else {
            BatteryIcon::Empty
        }
    }

    /// Five-cell text gauge used by the terminal front-end.
    pub fn gauge(&self) -> &'static str {
        match self {
            BatteryIcon::Full => "[████]",
            BatteryIcon::ThreeQuarters => "[███ ]",
            BatteryIcon::Half => "[██  ]",
            BatteryIcon::Quarter => "[█   ]",
            BatteryIcon::Empty => "[    ]",
        }
    }
}

/// Battery colour class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatteryAlert {
    Normal,
    Low,
    Critical,
}

impl BatteryAlert {
    pub fn for_level(level: f64) -> Self {
        if level <= 20.0 {
            BatteryAlert::Critical
        } else if level <= 30.0 {
            BatteryAlert::Low
        } else {
            BatteryAlert::Normal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_battery_icon_buckets() {
        assert_eq!(BatteryIcon::for_level(76.0), BatteryIcon::Full);
        assert_eq!(BatteryIcon::for_level(75.0), BatteryIcon::ThreeQuarters);
        assert_eq!(BatteryIcon::for_level(50.0), BatteryIcon::Half);
        assert_eq!(BatteryIcon::for_level(25.0), BatteryIcon::Quarter);
        assert_eq!(BatteryIcon::for_level(10.0), BatteryIcon::Empty);
    }

    #[test]
    fn test_battery_alert_thresholds() {
        assert_eq!(BatteryAlert::for_level(20.0), BatteryAlert::Critical);
        assert_eq!(BatteryAlert::for_level(30.0), BatteryAlert::Low);
        assert_eq!(BatteryAlert::for_level(30.5), BatteryAlert::Normal);
    }

    #[test]
    fn test_initial_state() {
        let t = DeviceTelemetry::new(75.0);
        assert_eq!(t.signal, 4);
        assert!(t.wifi_connected);
        assert_eq!(t.battery_icon(), BatteryIcon::ThreeQuarters);
    }

    #[test]
    fn test_many_ticks_respect_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut t = DeviceTelemetry::new(75.0);
        let mut previous = t.battery;
        for _ in 0..500 {
            t.tick(&mut rng, 20.0);
            assert!(t.battery <= previous);
            assert!(t.battery >= 20.0);
            assert!((MIN_SIGNAL..=MAX_SIGNAL).contains(&t.signal));
            previous = t.battery;
        }
        assert_eq!(t.battery, 20.0);
        assert_eq!(t.battery_alert(), BatteryAlert::Critical);
    }

    #[test]
    fn test_signal_and_wifi_eventually_change() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut t = DeviceTelemetry::new(75.0);
        let mut saw_lower_signal = false;
        let mut saw_wifi_off = false;
        for _ in 0..1_000 {
            t.tick(&mut rng, 20.0);
            saw_lower_signal |= t.signal < MAX_SIGNAL;
            saw_wifi_off |= !t.wifi_connected;
        }
        assert!(saw_lower_signal);
        assert!(saw_wifi_off);
    }
}
