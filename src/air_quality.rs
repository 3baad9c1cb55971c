//! # Derived Metrics
//!
//! Values that are computed from raw inputs at draw time rather than stored:
//! the US EPA air quality index, the UV / signal descriptors and the battery
//! state-of-charge estimate.
//!
//! ## Air Quality Index
//! Each pollutant concentration is converted to the unit of its EPA breakpoint
//! table, truncated to the table's precision and interpolated linearly inside its
//! bracket. The index is the worst sub-index across all pollutants. Concentrations
//! above the last bracket produce [`AQI_SCALE_MAX`] + 1, drawn as `"> 500"`.

use crate::model::AirQualitySample;

/// Highest value on the EPA scale.
pub const AQI_SCALE_MAX: u32 = 500;

/// Molar volume of an ideal gas at 25 °C and 1 atm, litres.
const MOLAR_VOLUME: f32 = 24.45;

/// (concentration low, concentration high, index low, index high)
type Breakpoint = (f32, f32, u32, u32);

const PM2_5: [Breakpoint; 6] = [
    (0.0, 9.0, 0, 50),
    (9.1, 35.4, 51, 100),
    (35.5, 55.4, 101, 150),
    (55.5, 125.4, 151, 200),
    (125.5, 225.4, 201, 300),
    (225.5, 325.4, 301, 500),
];

const PM10: [Breakpoint; 6] = [
    (0.0, 54.0, 0, 50),
    (55.0, 154.0, 51, 100),
    (155.0, 254.0, 101, 150),
    (255.0, 354.0, 151, 200),
    (355.0, 424.0, 201, 300),
    (425.0, 604.0, 301, 500),
];

// ppb; the 8-hour table up to 200 ppb, 1-hour brackets above
const O3: [Breakpoint; 7] = [
    (0.0, 54.0, 0, 50),
    (55.0, 70.0, 51, 100),
    (71.0, 85.0, 101, 150),
    (86.0, 105.0, 151, 200),
    (106.0, 404.0, 201, 300),
    (405.0, 504.0, 301, 400),
    (505.0, 604.0, 401, 500),
];

// ppb
const NO2: [Breakpoint; 6] = [
    (0.0, 53.0, 0, 50),
    (54.0, 100.0, 51, 100),
    (101.0, 360.0, 101, 150),
    (361.0, 649.0, 151, 200),
    (650.0, 1249.0, 201, 300),
    (1250.0, 2049.0, 301, 500),
];

// ppb
const SO2: [Breakpoint; 6] = [
    (0.0, 35.0, 0, 50),
    (36.0, 75.0, 51, 100),
    (76.0, 185.0, 101, 150),
    (186.0, 304.0, 151, 200),
    (305.0, 604.0, 201, 300),
    (605.0, 1004.0, 301, 500),
];

// ppm
const CO: [Breakpoint; 6] = [
    (0.0, 4.4, 0, 50),
    (4.5, 9.4, 51, 100),
    (9.5, 12.4, 101, 150),
    (12.5, 15.4, 151, 200),
    (15.5, 30.4, 201, 300),
    (30.5, 50.4, 301, 500),
];

/// µg/m³ → ppb for a gas of the given molar mass (g/mol).
fn to_ppb(ugm3: f32, molar_mass: f32) -> f32 {
    ugm3 * MOLAR_VOLUME / molar_mass
}

fn truncate(value: f32, decimals: i32) -> f32 {
    let factor = 10f32.powi(decimals);
    (value * factor).trunc() / factor
}

/// Sub-index for one pollutant; `None` when the table does not cover the value.
fn sub_index(concentration: f32, table: &[Breakpoint]) -> Option<u32> {
    if !concentration.is_finite() || concentration < 0.0 {
        return Some(0);
    }
    // Values falling in the gap between two brackets belong to the upper one.
    let (c_lo, c_hi, i_lo, i_hi) = *table.iter().find(|(_, c_hi, _, _)| concentration <= *c_hi)?;
    let c = concentration.max(c_lo);
    let index = (i_hi - i_lo) as f32 / (c_hi - c_lo) * (c - c_lo) + i_lo as f32;
    Some(index.round() as u32)
}

/// US EPA air quality index for a sample.
///
/// # Example
/// ```
/// use weather_epd_lib::air_quality::aqi;
/// use weather_epd_lib::model::AirQualitySample;
///
/// let sample = AirQualitySample { pm2_5: 12.0, ..Default::default() };
/// assert_eq!(aqi(&sample), 56);
/// ```
pub fn aqi(sample: &AirQualitySample) -> u32 {
    let readings = [
        (truncate(sample.pm2_5, 1), &PM2_5[..]),
        (sample.pm10.trunc(), &PM10[..]),
        (to_ppb(sample.o3, 48.00).trunc(), &O3[..]),
        (to_ppb(sample.no2, 46.01).trunc(), &NO2[..]),
        (to_ppb(sample.so2, 64.07).trunc(), &SO2[..]),
        (truncate(to_ppb(sample.co, 28.01) / 1000.0, 1), &CO[..]),
    ];
    readings
        .iter()
        .map(|(c, table)| sub_index(*c, table).unwrap_or(AQI_SCALE_MAX + 1))
        .max()
        .unwrap_or(0)
}

/// Display string for an index value.
pub fn aqi_label(index: u32) -> String {
    if index > AQI_SCALE_MAX {
        format!("> {}", AQI_SCALE_MAX)
    } else {
        index.to_string()
    }
}

/// EPA category name for an index value.
pub fn aqi_description(index: u32) -> &'static str {
    match index {
        0..=50 => "Good",
        51..=100 => "Moderate",
        101..=150 => "Unhealthy for Sensitive Groups",
        151..=200 => "Unhealthy",
        201..=300 => "Very Unhealthy",
        _ => "Hazardous",
    }
}

/// WHO UV index category.
pub fn uv_description(uvi: u32) -> &'static str {
    match uvi {
        0..=2 => "Low",
        3..=5 => "Moderate",
        6..=7 => "High",
        8..=10 => "Very High",
        _ => "Extreme",
    }
}

/// Wi-Fi signal quality for an RSSI in dBm (0 = not connected).
pub fn signal_description(rssi: i32) -> &'static str {
    match rssi {
        0 => "No Connection",
        r if r >= -50 => "Excellent",
        r if r >= -60 => "Good",
        r if r >= -70 => "Fair",
        _ => "Weak",
    }
}

/// Lithium-ion state of charge estimated from voltage with a sigmoid discharge curve.
///
/// Returns 0..=100.
pub fn battery_percent(millivolts: u32, min_mv: u32, max_mv: u32) -> u32 {
    if max_mv <= min_mv || millivolts <= min_mv {
        return 0;
    }
    let v = (millivolts - min_mv) as f64 / (max_mv - min_mv) as f64;
    let percent = 105.0 - 105.0 / (1.0 + (1.724 * v).powf(5.5));
    (percent.round() as u32).min(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_air_is_good() {
        let sample = AirQualitySample::default();
        assert_eq!(aqi(&sample), 0);
        assert_eq!(aqi_description(aqi(&sample)), "Good");
    }

    #[test]
    fn test_worst_pollutant_wins() {
        let sample = AirQualitySample {
            pm2_5: 5.0,
            pm10: 200.0,
            ..Default::default()
        };
        // PM10 200 -> 101 + 49/99 * 45 = 123.3
        assert_eq!(aqi(&sample), 123);
    }

    #[test]
    fn test_off_scale_concentration() {
        let sample = AirQualitySample {
            pm2_5: 400.0,
            ..Default::default()
        };
        assert_eq!(aqi(&sample), AQI_SCALE_MAX + 1);
        assert_eq!(aqi_label(aqi(&sample)), "> 500");
        assert_eq!(aqi_description(aqi(&sample)), "Hazardous");
    }

    #[test]
    fn test_gap_between_brackets_rounds_up() {
        // 9.05 truncates to 9.0 and stays in the first bracket
        assert_eq!(sub_index(truncate(9.05, 1), &PM2_5), Some(50));
        assert_eq!(sub_index(54.5, &PM10), Some(51));
    }

    #[test]
    fn test_uv_and_signal_descriptions() {
        assert_eq!(uv_description(0), "Low");
        assert_eq!(uv_description(7), "High");
        assert_eq!(uv_description(12), "Extreme");
        assert_eq!(signal_description(0), "No Connection");
        assert_eq!(signal_description(-45), "Excellent");
        assert_eq!(signal_description(-65), "Fair");
        assert_eq!(signal_description(-85), "Weak");
    }

    #[test]
    fn test_battery_curve_bounds() {
        assert_eq!(battery_percent(2900, 3000, 4200), 0);
        assert_eq!(battery_percent(4200, 3000, 4200), 100);
        assert_eq!(battery_percent(4300, 3000, 4200), 100);
        let mid = battery_percent(3600, 3000, 4200);
        assert!(mid > 20 && mid < 80, "mid-range voltage gave {}", mid);
    }
}
