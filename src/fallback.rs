//! # Synthetic Weather
//!
//! Plausible, deterministic input records for development mode, used when no
//! input file is given. Everything is derived from the requested local time so
//! the same instant always yields the same frame.
//!
//! ## Model Characteristics
//!
//! ### Daylight
//! Day length follows a sine over the year, 12 h ± 4 h, peaking at the June
//! solstice. Sunrise and sunset are placed symmetrically around local noon.
//!
//! ### Temperature
//! A diurnal sine with its minimum at 03:00 and maximum at 15:00, riding on a
//! seasonal mean. Forecast days drift slowly so the chart and strip have shape.
//!
//! ### Precipitation
//! A single shower band in the afternoon, four hours wide, with probability
//! peaking at 60 %. The third forecast day is wet and the fourth has a trace.
//!
//! The records are obviously synthetic: a "Demo Data" status message is shown
//! in the status bar.

use crate::model::{
    AirQualitySample, AlertRecord, DailyWeather, DeviceStatus, HourlyWeather, IndoorReading,
    InputRecords, ModelError, RenderInputs, WeatherSnapshot, FORECAST_DAYS,
};
use chrono::{Datelike, Duration, NaiveDateTime, NaiveTime, Timelike};
use std::f32::consts::TAU;

const KELVIN: f32 = 273.15;

/// Seasonal mean temperature in °C for a day of the year.
fn seasonal_mean(ordinal: u32) -> f32 {
    10.0 + 8.0 * (TAU * (ordinal as f32 - 110.0) / 365.0).sin()
}

/// Day length in hours.
fn day_length(ordinal: u32) -> f32 {
    12.0 + 4.0 * (TAU * (ordinal as f32 - 80.0) / 365.0).sin()
}

/// Temperature in kelvin at a given instant.
fn temperature_at(time: NaiveDateTime) -> f32 {
    let hour = time.hour() as f32 + time.minute() as f32 / 60.0;
    let diurnal = 5.0 * (TAU * (hour - 9.0) / 24.0).sin();
    KELVIN + seasonal_mean(time.ordinal()) + diurnal
}

/// Chance of rain in the afternoon shower band.
fn shower_pop(time: NaiveDateTime) -> f32 {
    match time.hour() {
        15 | 18 => 0.2,
        16 | 17 => 0.6,
        _ => 0.0,
    }
}

fn at_hours(day: NaiveDateTime, hours: f32) -> NaiveDateTime {
    let seconds = (hours * 3600.0).round() as u32;
    let time = NaiveTime::from_num_seconds_from_midnight_opt(seconds.min(86_399), 0)
        .unwrap_or(NaiveTime::MIN);
    day.date().and_time(time)
}

fn snapshot(now: NaiveDateTime) -> WeatherSnapshot {
    let length = day_length(now.ordinal());
    let temp = temperature_at(now);
    WeatherSnapshot {
        temp,
        feels_like: temp - 2.0,
        humidity: 62,
        pressure: 1013.0,
        wind_speed: 4.2,
        wind_gust: Some(7.5),
        wind_deg: 225,
        uvi: 3.4,
        visibility: 10_000.0,
        clouds: 20,
        condition_id: if shower_pop(now) > 0.5 { 500 } else { 801 },
        sunrise: at_hours(now, 12.0 - length / 2.0),
        sunset: at_hours(now, 12.0 + length / 2.0),
    }
}

fn daily(now: NaiveDateTime) -> Vec<DailyWeather> {
    const CONDITIONS: [u16; FORECAST_DAYS] = [801, 802, 501, 803, 800];
    const RAIN_MM: [f32; FORECAST_DAYS] = [0.0, 0.0, 6.4, 0.3, 0.0];
    (0..FORECAST_DAYS)
        .map(|i| {
            let mean = seasonal_mean(now.ordinal() + i as u32) + i as f32 * 0.8 - 1.5;
            DailyWeather {
                temp_min: KELVIN + mean - 5.0,
                temp_max: KELVIN + mean + 5.0,
                pop: if RAIN_MM[i] > 0.0 { 0.7 } else { 0.1 },
                rain: RAIN_MM[i],
                snow: 0.0,
                condition_id: CONDITIONS[i],
                clouds: 40,
                wind_speed: 3.0 + i as f32,
                wind_gust: None,
            }
        })
        .collect()
}

fn hourly(now: NaiveDateTime, samples: usize) -> Vec<HourlyWeather> {
    let start = now.date().and_hms_opt(now.hour(), 0, 0).unwrap_or(now);
    (0..samples)
        .map(|i| {
            let time = start + Duration::hours(i as i64);
            let pop = shower_pop(time);
            HourlyWeather {
                time,
                temp: temperature_at(time),
                pop,
                rain_1h: pop * 1.5,
                snow_1h: 0.0,
            }
        })
        .collect()
}

/// Input records for `now`, as the data-fetch collaborator would hand them over.
pub fn records(now: NaiveDateTime, hourly_samples: usize) -> Result<InputRecords, ModelError> {
    Ok(InputRecords {
        now,
        current: snapshot(now),
        daily: daily(now).try_into()?,
        hourly: hourly(now, hourly_samples),
        air_quality: AirQualitySample {
            co: 230.0,
            no2: 18.0,
            o3: 62.0,
            so2: 2.5,
            pm2_5: 8.2,
            pm10: 14.0,
        },
        alerts: vec![AlertRecord {
            event: "wind advisory".to_string(),
            category: "Met".to_string(),
            start: now,
            end: now + Duration::hours(12),
            sender: "Demo".to_string(),
            description: "Gusts up to 45 mph expected.".to_string(),
        }],
        indoor: IndoorReading {
            temperature: KELVIN + 21.0,
            humidity: 45.0,
        },
        device: DeviceStatus {
            battery_mv: 3950,
            rssi: -63,
            refreshed: now.format("%H:%M").to_string(),
            status: Some("Demo Data".to_string()),
        },
    })
}

/// Validated synthetic inputs for `now`.
pub fn synthetic(now: NaiveDateTime, hourly_samples: usize) -> Result<RenderInputs, ModelError> {
    RenderInputs::from_records(records(now, hourly_samples)?, hourly_samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 21)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_synthetic_inputs_are_valid() {
        let inputs = synthetic(noon(), 24).unwrap();
        assert_eq!(inputs.hourly.len(), 24);
        assert_eq!(inputs.daily.iter().count(), FORECAST_DAYS);
        assert!(inputs.current.sunrise < inputs.current.sunset);
        assert!(inputs.current.is_daytime(noon()));
    }

    #[test]
    fn test_same_instant_same_records() {
        let a = synthetic(noon(), 12).unwrap();
        let b = synthetic(noon(), 12).unwrap();
        assert_eq!(a.current.temp, b.current.temp);
        assert_eq!(a.hourly[5].temp, b.hourly[5].temp);
    }

    #[test]
    fn test_afternoon_warmer_than_night() {
        let inputs = synthetic(noon(), 24).unwrap();
        // hour 3 after noon is 15:00, hour 15 is 03:00
        assert!(inputs.hourly[3].temp > inputs.hourly[15].temp);
    }

    #[test]
    fn test_shower_band_has_precipitation() {
        let inputs = synthetic(noon(), 24).unwrap();
        assert!(inputs.hourly.iter().any(|h| h.pop > 0.0 && h.precip_mm() > 0.0));
        assert!(inputs.hourly.iter().any(|h| h.pop == 0.0));
    }

    #[test]
    fn test_too_few_samples_rejected() {
        assert!(synthetic(noon(), 0).is_err());
    }
}
