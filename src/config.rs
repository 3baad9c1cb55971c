//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the weather-config.toml
//! file. It replaces build-time switches with one runtime structure: unit systems,
//! status-bar segments, alert filtering, chart sample count, margins and accent colour.
//!
//! Every section is optional in the file; missing keys take the defaults below, which
//! describe an 800x480 black/white panel behind a bezel with 20/12 px margins.

use crate::alerts::DedupStrategy;
use crate::conditions::CompassPrecision;
use crate::units::{DistanceUnit, HourlyPrecipUnit, PressureUnit, SpeedUnit, TemperatureUnit};
use crate::Margins;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "weather-config.toml";

/// Failure while persisting configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("failed to write configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Application configuration loaded from weather-config.toml
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Panel geometry and colour plane
    pub display: DisplayConfig,
    /// Display unit per quantity
    pub units: UnitsConfig,
    /// Bottom status bar segments
    pub status_bar: StatusBarConfig,
    /// Battery voltage thresholds
    pub battery: BatteryConfig,
    /// Alerts panel filtering
    pub alerts: AlertsConfig,
    /// Outlook chart
    pub chart: ChartConfig,
    /// Current-conditions metric rows
    pub current: CurrentConfig,
    /// Wind indicator
    pub wind: WindConfig,
    /// strftime patterns
    pub format: FormatConfig,
    /// Location header
    pub location: LocationConfig,
    /// GPIO/SPI wiring, only read with the `hardware` feature
    pub hardware: HardwareConfig,
}

/// Colour used for highlights (alert icons, chart curve, warnings).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccentColor {
    /// Black/white panel: highlights are drawn in black
    Black,
    /// Three-colour panel: highlights go to the red plane
    Red,
}

/// Panel geometry configuration
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// E-paper width in pixels
    pub width: u32,
    /// E-paper height in pixels
    pub height: u32,
    /// Rows per hardware page; a full-height value renders in one page
    pub page_height: u32,
    /// Horizontal bezel margin in pixels
    pub margin_x: i32,
    /// Vertical bezel margin in pixels
    pub margin_y: i32,
    /// Highlight colour plane
    pub accent: AccentColor,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 480,
            page_height: 480,
            margin_x: 20,
            margin_y: 12,
            accent: AccentColor::Black,
        }
    }
}

impl DisplayConfig {
    pub fn margins(&self) -> Margins {
        Margins {
            x: self.margin_x,
            y: self.margin_y,
        }
    }

    /// Page height clamped to `1..=height`.
    pub fn effective_page_height(&self) -> u32 {
        self.page_height.clamp(1, self.height.max(1))
    }
}

/// Display unit per quantity
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct UnitsConfig {
    pub temperature: TemperatureUnit,
    pub speed: SpeedUnit,
    pub pressure: PressureUnit,
    pub distance: DistanceUnit,
    pub hourly_precip: HourlyPrecipUnit,
}

impl Default for UnitsConfig {
    fn default() -> Self {
        Self {
            temperature: TemperatureUnit::Celsius,
            speed: SpeedUnit::MilesPerHour,
            pressure: PressureUnit::Hectopascals,
            distance: DistanceUnit::Kilometers,
            hourly_precip: HourlyPrecipUnit::Probability,
        }
    }
}

/// Status bar segments, packed right to left in this order
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct StatusBarConfig {
    pub battery: bool,
    pub signal: bool,
    pub refresh: bool,
    pub status: bool,
    /// Append "NN%" next to the battery icon
    pub battery_percentage: bool,
    /// Append "(x.xxv)" next to the battery icon
    pub battery_voltage: bool,
    /// Append the signal description ("Good", "Weak", ...)
    pub signal_strength: bool,
    /// Append "(-NNdBm)"
    pub signal_rssi: bool,
}

impl Default for StatusBarConfig {
    fn default() -> Self {
        Self {
            battery: true,
            signal: true,
            refresh: true,
            status: true,
            battery_percentage: true,
            battery_voltage: false,
            signal_strength: true,
            signal_rssi: false,
        }
    }
}

/// Battery voltage thresholds in millivolts
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct BatteryConfig {
    /// Voltage treated as 0 %
    pub min_mv: u32,
    /// Voltage treated as 100 %
    pub max_mv: u32,
    /// Below this the battery segment switches to the accent colour
    pub warn_mv: u32,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            min_mv: 3000,
            max_mv: 4200,
            warn_mv: 3500,
        }
    }
}

/// Alerts panel configuration
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct AlertsConfig {
    /// Draw the alerts panel at all
    pub enabled: bool,
    /// How two alerts are recognised as the same event
    pub dedup: DedupStrategy,
    /// Ascending urgency; a later term outranks an earlier one
    pub urgency_terms: Vec<String>,
    /// Alerts whose event contains any of these terms are never shown
    pub ignore_terms: Vec<String>,
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dedup: DedupStrategy::Event,
            urgency_terms: ["outlook", "statement", "advisory", "watch", "warning", "emergency"]
                .iter()
                .map(|term| term.to_string())
                .collect(),
            ignore_terms: Vec::new(),
        }
    }
}

/// Outlook chart configuration
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Number of hourly samples plotted
    pub hourly_samples: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self { hourly_samples: 24 }
    }
}

/// Which optional rows follow sunrise/wind/UV and sunset/humidity/pressure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricsLayout {
    /// Air quality index | visibility
    AirQuality,
    /// Indoor temperature | indoor humidity
    Indoor,
    /// Both rows, air quality first
    Both,
}

/// Current-conditions panel configuration
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct CurrentConfig {
    pub metrics: MetricsLayout,
}

impl Default for CurrentConfig {
    fn default() -> Self {
        Self {
            metrics: MetricsLayout::Both,
        }
    }
}

/// Wind indicator configuration
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct WindConfig {
    /// Draw a direction arrow before the wind speed
    pub arrow: bool,
    /// Number of compass directions the arrow snaps to
    pub precision: CompassPrecision,
}

impl Default for WindConfig {
    fn default() -> Self {
        Self {
            arrow: true,
            precision: CompassPrecision::Cardinal,
        }
    }
}

/// strftime patterns used by the panels
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct FormatConfig {
    /// Sunrise/sunset
    pub time: String,
    /// Chart x-axis labels
    pub hour: String,
    /// Header date
    pub date: String,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            time: "%H:%M".to_string(),
            hour: "%H".to_string(),
            date: "%a, %d %b".to_string(),
        }
    }
}

/// Location shown in the header
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct LocationConfig {
    pub city: String,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            city: "London".to_string(),
        }
    }
}

/// Panel wiring on the host controller
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct HardwareConfig {
    /// Kernel SPI device node
    pub spi_device: String,
    /// GPIO character device
    pub gpio_chip: String,
    /// Data/command line offset
    pub dc_pin: u32,
    /// Reset line offset
    pub rst_pin: u32,
    /// Busy line offset
    pub busy_pin: u32,
    /// Optional panel power switch line offset
    pub pwr_pin: Option<u32>,
}

impl Default for HardwareConfig {
    fn default() -> Self {
        Self {
            spi_device: "/dev/spidev0.0".to_string(),
            gpio_chip: "/dev/gpiochip0".to_string(),
            dc_pin: 25,
            rst_pin: 17,
            busy_pin: 24,
            pwr_pin: None,
        }
    }
}

impl Config {
    /// Load configuration from weather-config.toml
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    info!("Loaded configuration for {}", config.location.city);
                    config
                }
                Err(e) => {
                    warn!("Invalid config file format: {}", e);
                    warn!("Using default configuration");
                    Self::default()
                }
            },
            Err(_) => {
                info!(
                    "No config file at {}, using default configuration",
                    path.as_ref().display()
                );
                Self::default()
            }
        }
    }

    /// Save current configuration to the given path
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(&path, contents)?;
        info!("Configuration saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Save current configuration to weather-config.toml
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to_path(CONFIG_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.display.width, 800);
        assert_eq!(config.display.height, 480);
        assert_eq!(config.display.margins(), Margins { x: 20, y: 12 });
        assert_eq!(config.chart.hourly_samples, 24);
        assert_eq!(config.units.temperature, TemperatureUnit::Celsius);
        assert!(config.alerts.enabled);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.location.city, parsed.location.city);
        assert_eq!(config.units.speed, parsed.units.speed);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let parsed: Config = toml::from_str(
            r#"
[units]
temperature = "fahrenheit"
hourly_precip = "amount"

[display]
accent = "red"
"#,
        )
        .unwrap();
        assert_eq!(parsed.units.temperature, TemperatureUnit::Fahrenheit);
        assert_eq!(parsed.units.hourly_precip, HourlyPrecipUnit::Amount);
        assert_eq!(parsed.units.pressure, PressureUnit::Hectopascals);
        assert_eq!(parsed.display.accent, AccentColor::Red);
        assert_eq!(parsed.display.width, 800);
    }

    #[test]
    fn test_page_height_is_clamped() {
        let mut display = DisplayConfig::default();
        display.page_height = 0;
        assert_eq!(display.effective_page_height(), 1);
        display.page_height = 10_000;
        assert_eq!(display.effective_page_height(), 480);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let config = Config::load_from_path("/nonexistent/path");
        // Should fallback to default
        assert_eq!(config.location.city, "London");
    }

    #[test]
    fn test_save_and_reload() {
        let temp_file = tempfile::NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.location.city = "Reykjavik".to_string();
        config.units.temperature = TemperatureUnit::Fahrenheit;
        config.save_to_path(temp_file.path()).unwrap();

        let loaded = Config::load_from_path(temp_file.path());
        assert_eq!(loaded.location.city, "Reykjavik");
        assert_eq!(loaded.units.temperature, TemperatureUnit::Fahrenheit);
    }

    #[test]
    fn test_malformed_file_falls_back() {
        let temp_file = tempfile::NamedTempFile::new().unwrap();
        fs::write(temp_file.path(), "[display\nwidth = ").unwrap();
        let config = Config::load_from_path(temp_file.path());
        assert_eq!(config.display.width, 800);
    }
}
