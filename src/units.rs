//! # Display Unit Strategies
//!
//! All input records are stored in one canonical unit system:
//!
//! | Quantity      | Canonical unit |
//! |---------------|----------------|
//! | Temperature   | kelvin         |
//! | Speed         | metres/second  |
//! | Pressure      | hectopascals   |
//! | Distance      | metres         |
//! | Precipitation | millimetres    |
//!
//! Conversion happens only at draw time. Each quantity has a small strategy enum
//! implementing [`Quantity`], and the configured strategies are resolved once into
//! a [`DisplayUnits`] value that panels consult. No layout code branches on a unit.

use crate::config::UnitsConfig;
use serde::{Deserialize, Serialize};

/// A conversion strategy from a canonical value to a display value.
pub trait Quantity {
    /// Convert a canonical value into this display unit.
    fn convert(&self, canonical: f32) -> f32;

    /// Unit suffix drawn after the value (without leading space).
    fn unit_label(&self) -> &'static str;

    /// Format the converted value the way the panels show it.
    fn format(&self, canonical: f32) -> String {
        format!("{}", self.convert(canonical).round() as i32)
    }
}

/// Temperature display unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    Kelvin,
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    /// Degree-sign suffix appended to bare numbers (none for kelvin).
    pub fn degree_suffix(&self) -> &'static str {
        match self {
            TemperatureUnit::Kelvin => "",
            _ => "\u{B0}",
        }
    }

    /// Rounded integer value followed by the degree suffix, e.g. `"21°"`.
    pub fn format_degrees(&self, kelvin: f32) -> String {
        format!("{}{}", self.format(kelvin), self.degree_suffix())
    }

    /// Indoor readings keep one decimal except in Fahrenheit.
    pub fn format_indoor(&self, kelvin: f32) -> String {
        match self {
            TemperatureUnit::Fahrenheit => self.format(kelvin),
            _ => format!("{:.1}", (self.convert(kelvin) * 10.0).round() / 10.0),
        }
    }
}

impl Quantity for TemperatureUnit {
    fn convert(&self, kelvin: f32) -> f32 {
        match self {
            TemperatureUnit::Kelvin => kelvin,
            TemperatureUnit::Celsius => kelvin - 273.15,
            TemperatureUnit::Fahrenheit => (kelvin - 273.15) * 1.8 + 32.0,
        }
    }

    fn unit_label(&self) -> &'static str {
        match self {
            TemperatureUnit::Kelvin => "K",
            TemperatureUnit::Celsius => "\u{B0}C",
            TemperatureUnit::Fahrenheit => "\u{B0}F",
        }
    }
}

/// Wind speed display unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedUnit {
    MetersPerSecond,
    FeetPerSecond,
    KilometersPerHour,
    MilesPerHour,
    Knots,
    Beaufort,
}

/// Upper bound (m/s, exclusive) of each Beaufort force 0..=11.
const BEAUFORT_LIMITS: [f32; 12] = [
    0.5, 1.6, 3.4, 5.5, 8.0, 10.8, 13.9, 17.2, 20.8, 24.5, 28.5, 32.7,
];

impl Quantity for SpeedUnit {
    fn convert(&self, mps: f32) -> f32 {
        match self {
            SpeedUnit::MetersPerSecond => mps,
            SpeedUnit::FeetPerSecond => mps * 3.281,
            SpeedUnit::KilometersPerHour => mps * 3.6,
            SpeedUnit::MilesPerHour => mps * 2.237,
            SpeedUnit::Knots => mps * 1.944,
            SpeedUnit::Beaufort => BEAUFORT_LIMITS
                .iter()
                .position(|&limit| mps < limit)
                .unwrap_or(BEAUFORT_LIMITS.len()) as f32,
        }
    }

    fn unit_label(&self) -> &'static str {
        match self {
            SpeedUnit::MetersPerSecond => "m/s",
            SpeedUnit::FeetPerSecond => "ft/s",
            SpeedUnit::KilometersPerHour => "km/h",
            SpeedUnit::MilesPerHour => "mph",
            SpeedUnit::Knots => "kt",
            SpeedUnit::Beaufort => "Bft",
        }
    }
}

/// Barometric pressure display unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PressureUnit {
    Hectopascals,
    Millibars,
    InchesOfMercury,
    MillimetersOfMercury,
}

impl Quantity for PressureUnit {
    fn convert(&self, hpa: f32) -> f32 {
        match self {
            PressureUnit::Hectopascals | PressureUnit::Millibars => hpa,
            PressureUnit::InchesOfMercury => hpa * 0.029_53,
            PressureUnit::MillimetersOfMercury => hpa * 0.750_06,
        }
    }

    fn unit_label(&self) -> &'static str {
        match self {
            PressureUnit::Hectopascals => "hPa",
            PressureUnit::Millibars => "mbar",
            PressureUnit::InchesOfMercury => "inHg",
            PressureUnit::MillimetersOfMercury => "mmHg",
        }
    }

    fn format(&self, hpa: f32) -> String {
        match self {
            PressureUnit::InchesOfMercury => {
                format!("{:.1}", (self.convert(hpa) * 10.0).round() / 10.0)
            }
            _ => format!("{}", self.convert(hpa).round() as i32),
        }
    }
}

/// Visibility display unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    Kilometers,
    Miles,
}

impl DistanceUnit {
    /// Distance at or beyond which visibility is shown as a lower bound.
    fn open_ended_at(&self) -> f32 {
        match self {
            DistanceUnit::Kilometers => 10.0,
            DistanceUnit::Miles => 6.0,
        }
    }
}

impl Quantity for DistanceUnit {
    fn convert(&self, meters: f32) -> f32 {
        match self {
            DistanceUnit::Kilometers => meters / 1000.0,
            DistanceUnit::Miles => meters / 1609.344,
        }
    }

    fn unit_label(&self) -> &'static str {
        match self {
            DistanceUnit::Kilometers => "km",
            DistanceUnit::Miles => "mi",
        }
    }

    fn format(&self, meters: f32) -> String {
        let value = self.convert(meters);
        let text = if value < 1.95 {
            format!("{:.1}", (value * 10.0).round() / 10.0)
        } else {
            format!("{}", value.round() as i32)
        };
        if value >= self.open_ended_at() {
            format!("> {}", text)
        } else {
            text
        }
    }
}

/// What the outlook chart plots beneath the temperature curve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HourlyPrecipUnit {
    /// Probability of precipitation, 0-100 %
    Probability,
    /// Liquid-equivalent rain + snow in millimetres
    Amount,
}

/// Configured strategies, resolved once per pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayUnits {
    pub temperature: TemperatureUnit,
    pub speed: SpeedUnit,
    pub pressure: PressureUnit,
    pub distance: DistanceUnit,
    pub hourly_precip: HourlyPrecipUnit,
}

impl From<&UnitsConfig> for DisplayUnits {
    fn from(config: &UnitsConfig) -> Self {
        Self {
            temperature: config.temperature,
            speed: config.speed,
            pressure: config.pressure,
            distance: config.distance,
            hourly_precip: config.hourly_precip,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperature_conversions() {
        assert!((TemperatureUnit::Celsius.convert(283.15) - 10.0).abs() < 1e-4);
        assert!((TemperatureUnit::Fahrenheit.convert(273.15) - 32.0).abs() < 1e-4);
        assert!((TemperatureUnit::Kelvin.convert(300.0) - 300.0).abs() < 1e-6);
    }

    #[test]
    fn test_degree_suffix_only_for_relative_scales() {
        assert_eq!(TemperatureUnit::Celsius.format_degrees(294.15), "21\u{B0}");
        assert_eq!(TemperatureUnit::Kelvin.format_degrees(294.15), "294");
    }

    #[test]
    fn test_indoor_precision() {
        assert_eq!(TemperatureUnit::Celsius.format_indoor(294.55), "21.4");
        assert_eq!(TemperatureUnit::Fahrenheit.format_indoor(294.55), "71");
    }

    #[test]
    fn test_beaufort_scale() {
        assert_eq!(SpeedUnit::Beaufort.format(0.2), "0");
        assert_eq!(SpeedUnit::Beaufort.format(6.0), "4");
        assert_eq!(SpeedUnit::Beaufort.format(40.0), "12");
    }

    #[test]
    fn test_pressure_formatting() {
        assert_eq!(PressureUnit::Hectopascals.format(1013.2), "1013");
        assert_eq!(PressureUnit::InchesOfMercury.format(1013.25), "29.9");
    }

    #[test]
    fn test_visibility_formatting() {
        assert_eq!(DistanceUnit::Kilometers.format(800.0), "0.8");
        assert_eq!(DistanceUnit::Kilometers.format(4_400.0), "4");
        assert_eq!(DistanceUnit::Kilometers.format(10_000.0), "> 10");
        assert_eq!(DistanceUnit::Miles.format(10_000.0), "> 6");
    }
}
