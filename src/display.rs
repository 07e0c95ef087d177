//! Text rendering of registry contents.
//!
//! The registry keeps systems in first-seen order; this is where filtering
//! (deleted systems) happens. Functions return strings so callers decide
//! where output goes.

use crate::models::{GardenSystem, Reading};
use std::fmt::Write as _;

/// Systems worth showing, in registry order.
pub fn visible_systems(systems: &[GardenSystem], include_deleted: bool) -> Vec<&GardenSystem> {
    systems
        .iter()
        .filter(|s| include_deleted || !s.is_deleted())
        .collect()
}

/// Status badge for the latest reading.
pub fn reading_badge(reading: Option<&Reading>) -> &'static str {
    match reading {
        Some(r) if r.error => "!",
        Some(_) => "✓",
        None => "○",
    }
}

pub fn format_temperature(value: Option<f32>) -> String {
    value
        .map(|t| format!("{:.1}°C", t))
        .unwrap_or_else(|| "-".to_string())
}

pub fn format_humidity(value: Option<f32>) -> String {
    value
        .map(|h| format!("{:.0}%", h))
        .unwrap_or_else(|| "-".to_string())
}

fn connection_mode(system: &GardenSystem) -> &'static str {
    if system.announcement.is_emulator {
        "emulator"
    } else if system.announcement.is_mesh {
        "mesh"
    } else {
        "direct"
    }
}

/// One line per system.
pub fn render_systems(systems: &[GardenSystem], include_deleted: bool) -> String {
    let visible = visible_systems(systems, include_deleted);
    if visible.is_empty() {
        return "No garden systems found.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "  {:<12}  {:<20}  {:<8}  {:>8}  {:>8}  {:<20}",
        "ID", "NAME", "MODE", "TEMP", "HUMIDITY", "LAST READING"
    );

    for system in visible {
        let reading = system.last_reading.as_ref();
        let measured = reading.filter(|r| !r.error);
        let last_seen = reading
            .map(|r| r.created_at.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "never".to_string());
        let name = if system.is_deleted() {
            format!("{} (deleted)", system.display_name())
        } else {
            system.display_name().to_string()
        };

        let _ = writeln!(
            out,
            "{} {:<12}  {:<20}  {:<8}  {:>8}  {:>8}  {:<20}",
            reading_badge(reading),
            system.id,
            name,
            connection_mode(system),
            format_temperature(measured.and_then(|r| r.temperature)),
            format_humidity(measured.and_then(|r| r.humidity)),
            last_seen
        );
    }

    out
}

/// Full view of one system: announcement and reading history.
pub fn render_system_detail(system: &GardenSystem) -> String {
    let announcement = &system.announcement;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "\n{} {} ({})",
        reading_badge(system.last_reading.as_ref()),
        system.display_name(),
        system.id
    );
    if let Some(deleted_at) = system.deleted_at {
        let _ = writeln!(out, "Deleted: {}", deleted_at.to_rfc3339());
    }
    let _ = writeln!(out, "Mode: {}", connection_mode(system));
    if announcement.is_mesh && announcement.channel > 0 {
        let _ = writeln!(out, "Channel: {}", announcement.channel);
    }
    let _ = writeln!(
        out,
        "Firmware: core {} / sdk {}",
        or_dash(&announcement.core_version),
        or_dash(&announcement.sdk_version)
    );
    let _ = writeln!(
        out,
        "Restart reason: {}",
        or_dash(&announcement.restart_reason)
    );

    match announcement.filesystem_usage_percent() {
        Some(percent) => {
            let _ = writeln!(
                out,
                "Filesystem: {} / {} bytes ({:.1}%)",
                announcement.filesystem_used_size, announcement.filesystem_total_size, percent
            );
        },
        None => {
            let _ = writeln!(out, "Filesystem: -");
        },
    }

    if announcement.sensors.is_empty() {
        let _ = writeln!(out, "Sensors: none");
    } else {
        let _ = writeln!(out, "Sensors: {}", announcement.sensors.join(", "));
    }

    if system.readings.is_empty() {
        let _ = writeln!(out, "\nNo readings recorded.");
    } else {
        let _ = writeln!(out, "\nReadings ({}):", system.readings.len());
        for reading in &system.readings {
            let _ = writeln!(out, "  {}", render_reading(reading));
        }
    }

    out
}

pub fn render_reading(reading: &Reading) -> String {
    let time = reading.created_at.format("%Y-%m-%d %H:%M:%S");
    if reading.error {
        format!("{} {} sensor error", reading_badge(Some(reading)), time)
    } else {
        format!(
            "{} {} {} {}",
            reading_badge(Some(reading)),
            time,
            format_temperature(reading.temperature),
            format_humidity(reading.humidity)
        )
    }
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}
