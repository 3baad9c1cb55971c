//! # Input Records
//!
//! Typed records handed over by the data-fetch collaborator. Everything is stored in
//! canonical units (see [`crate::units`]) and local broken-down time. The renderer only
//! ever borrows these records.
//!
//! Daily and hourly forecasts are fixed-length sequences whose length is validated
//! once, when [`RenderInputs`] is built. A panel can therefore index them freely:
//! a wrong length is a construction-time error, never a fault in the middle of a pass.

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::ops::Index;
use thiserror::Error;

/// Number of cells in the forecast panel.
pub const FORECAST_DAYS: usize = 5;

/// Errors raised while assembling render inputs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("{series} series needs {expected} entries, got {found}")]
    Length {
        series: &'static str,
        expected: usize,
        found: usize,
    },
}

/// Current conditions.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Air temperature, K
    pub temp: f32,
    /// Apparent temperature, K
    pub feels_like: f32,
    /// Relative humidity, %
    pub humidity: u8,
    /// Sea-level pressure, hPa
    pub pressure: f32,
    /// Wind speed, m/s
    pub wind_speed: f32,
    /// Gust speed, m/s
    #[serde(default)]
    pub wind_gust: Option<f32>,
    /// Meteorological wind direction, degrees
    pub wind_deg: u16,
    /// UV index
    pub uvi: f32,
    /// Visibility, m
    pub visibility: f32,
    /// Cloud cover, %
    #[serde(default)]
    pub clouds: u8,
    /// OpenWeatherMap-style condition id
    pub condition_id: u16,
    pub sunrise: NaiveDateTime,
    pub sunset: NaiveDateTime,
}

impl WeatherSnapshot {
    /// Whether `now` falls between sunrise and sunset by time of day.
    ///
    /// Only the clock time is compared so that a snapshot fetched yesterday still
    /// yields the right variant today.
    pub fn is_daytime(&self, now: NaiveDateTime) -> bool {
        let t = now.time().num_seconds_from_midnight();
        let rise = self.sunrise.time().num_seconds_from_midnight();
        let set = self.sunset.time().num_seconds_from_midnight();
        if rise <= set {
            t >= rise && t < set
        } else {
            // polar or cross-midnight daylight window
            t >= rise || t < set
        }
    }
}

/// One forecast day.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DailyWeather {
    /// Daily low, K
    pub temp_min: f32,
    /// Daily high, K
    pub temp_max: f32,
    /// Probability of precipitation, 0..=1
    #[serde(default)]
    pub pop: f32,
    /// Rain total, mm
    #[serde(default)]
    pub rain: f32,
    /// Snow total (liquid equivalent), mm
    #[serde(default)]
    pub snow: f32,
    pub condition_id: u16,
    #[serde(default)]
    pub clouds: u8,
    #[serde(default)]
    pub wind_speed: f32,
    #[serde(default)]
    pub wind_gust: Option<f32>,
}

impl DailyWeather {
    /// Liquid-equivalent precipitation for the day, mm.
    pub fn total_precip_mm(&self) -> f32 {
        self.rain + self.snow
    }
}

/// Exactly [`FORECAST_DAYS`] days starting today.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "Vec<DailyWeather>", into = "Vec<DailyWeather>")]
pub struct DailySeries([DailyWeather; FORECAST_DAYS]);

impl DailySeries {
    pub fn iter(&self) -> std::slice::Iter<'_, DailyWeather> {
        self.0.iter()
    }

    pub fn today(&self) -> &DailyWeather {
        &self.0[0]
    }
}

impl TryFrom<Vec<DailyWeather>> for DailySeries {
    type Error = ModelError;

    fn try_from(days: Vec<DailyWeather>) -> Result<Self, Self::Error> {
        let found = days.len();
        // Only the first five days are drawn; longer upstream lists are accepted.
        let days: [DailyWeather; FORECAST_DAYS] = days
            .into_iter()
            .take(FORECAST_DAYS)
            .collect::<Vec<_>>()
            .try_into()
            .map_err(|_| ModelError::Length {
                series: "daily",
                expected: FORECAST_DAYS,
                found,
            })?;
        Ok(Self(days))
    }
}

impl From<DailySeries> for Vec<DailyWeather> {
    fn from(series: DailySeries) -> Self {
        series.0.into()
    }
}

impl Index<usize> for DailySeries {
    type Output = DailyWeather;

    fn index(&self, index: usize) -> &DailyWeather {
        &self.0[index]
    }
}

/// One forecast hour.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HourlyWeather {
    /// Start of the hour
    pub time: NaiveDateTime,
    /// Temperature, K
    pub temp: f32,
    /// Probability of precipitation, 0..=1
    #[serde(default)]
    pub pop: f32,
    /// Rain in the hour, mm
    #[serde(default)]
    pub rain_1h: f32,
    /// Snow (liquid equivalent) in the hour, mm
    #[serde(default)]
    pub snow_1h: f32,
}

impl HourlyWeather {
    pub fn precip_mm(&self) -> f32 {
        self.rain_1h + self.snow_1h
    }
}

/// Exactly H consecutive hours, H chosen by configuration.
#[derive(Clone, Debug)]
pub struct HourlySeries {
    hours: Vec<HourlyWeather>,
}

impl HourlySeries {
    /// Take the first `samples` hours of an upstream list.
    pub fn take(hours: Vec<HourlyWeather>, samples: usize) -> Result<Self, ModelError> {
        if samples == 0 || hours.len() < samples {
            return Err(ModelError::Length {
                series: "hourly",
                expected: samples.max(1),
                found: hours.len(),
            });
        }
        let mut hours = hours;
        hours.truncate(samples);
        Ok(Self { hours })
    }

    pub fn len(&self) -> usize {
        self.hours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hours.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HourlyWeather> {
        self.hours.iter()
    }
}

impl Index<usize> for HourlySeries {
    type Output = HourlyWeather;

    fn index(&self, index: usize) -> &HourlyWeather {
        &self.hours[index]
    }
}

/// Pollutant concentrations, µg/m³. The air quality index is derived on demand.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AirQualitySample {
    pub co: f32,
    pub no2: f32,
    pub o3: f32,
    pub so2: f32,
    pub pm2_5: f32,
    pub pm10: f32,
}

/// One weather alert as issued upstream.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AlertRecord {
    pub event: String,
    /// First category tag, e.g. "Met" or "Flood"
    #[serde(default)]
    pub category: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub description: String,
}

fn nan() -> f32 {
    f32::NAN
}

/// Indoor sensor reading. Unavailable values are NaN, never zero.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IndoorReading {
    /// Indoor temperature, K
    #[serde(default = "nan")]
    pub temperature: f32,
    /// Indoor relative humidity, %
    #[serde(default = "nan")]
    pub humidity: f32,
}

impl Default for IndoorReading {
    fn default() -> Self {
        Self {
            temperature: f32::NAN,
            humidity: f32::NAN,
        }
    }
}

/// Device health reported in the status bar.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeviceStatus {
    /// Battery voltage, mV
    pub battery_mv: u32,
    /// Wi-Fi RSSI, dBm; 0 means not connected
    pub rssi: i32,
    /// Preformatted last-refresh time
    pub refreshed: String,
    /// Optional warning shown at the left end of the status bar
    #[serde(default)]
    pub status: Option<String>,
}

/// Raw hand-off format from the data-fetch collaborator.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InputRecords {
    /// Current local time
    pub now: NaiveDateTime,
    pub current: WeatherSnapshot,
    pub daily: DailySeries,
    pub hourly: Vec<HourlyWeather>,
    #[serde(default)]
    pub air_quality: AirQualitySample,
    #[serde(default)]
    pub alerts: Vec<AlertRecord>,
    #[serde(default)]
    pub indoor: IndoorReading,
    pub device: DeviceStatus,
}

/// Validated inputs for one render pass.
#[derive(Clone, Debug)]
pub struct RenderInputs {
    pub now: NaiveDateTime,
    pub current: WeatherSnapshot,
    pub daily: DailySeries,
    pub hourly: HourlySeries,
    pub air_quality: AirQualitySample,
    pub alerts: Vec<AlertRecord>,
    pub indoor: IndoorReading,
    pub device: DeviceStatus,
}

impl RenderInputs {
    /// Validate raw records against the configured hourly sample count.
    pub fn from_records(records: InputRecords, hourly_samples: usize) -> Result<Self, ModelError> {
        Ok(Self {
            now: records.now,
            current: records.current,
            daily: records.daily,
            hourly: HourlySeries::take(records.hourly, hourly_samples)?,
            air_quality: records.air_quality,
            alerts: records.alerts,
            indoor: records.indoor,
            device: records.device,
        })
    }
}

/// Screen content selected by the user button.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Weather,
    Cartoon,
    Photo,
}

impl DisplayMode {
    const ALL: [DisplayMode; 3] = [DisplayMode::Weather, DisplayMode::Cartoon, DisplayMode::Photo];

    /// The mode after this one, wrapping around.
    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|&m| m == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

/// Why the device woke up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WakeEvent {
    /// Scheduled refresh
    Timer,
    /// One button press: refresh the current mode
    SingleTap,
    /// Two presses in quick succession: switch mode
    DoubleTap,
    /// Cold boot or reset
    PowerOn,
}

/// State that survives deep sleep. Persisted by the caller between wake cycles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WakeState {
    pub mode: DisplayMode,
    /// Last button interaction, local time
    #[serde(default)]
    pub last_interaction: Option<NaiveDateTime>,
}

impl WakeState {
    /// Apply a wake event, returning the state for this cycle.
    pub fn advance(self, event: WakeEvent, now: NaiveDateTime) -> Self {
        match event {
            WakeEvent::Timer => self,
            WakeEvent::SingleTap => Self {
                last_interaction: Some(now),
                ..self
            },
            WakeEvent::DoubleTap => Self {
                mode: self.mode.next(),
                last_interaction: Some(now),
            },
            WakeEvent::PowerOn => Self::default(),
        }
    }
}
