//! # Icon Selection
//!
//! Rules that turn data into semantic [`IconCode`]s. The resolver in
//! [`crate::icons`] then decides which bitmap actually gets drawn.
//!
//! ## Weather Conditions
//! OpenWeatherMap-style condition ids pick the icon family. Modifiers, applied in
//! this order:
//!
//! 1. cloud cover above [`OVERCAST_CLOUDS`] % drops the sun/moon (generic variant)
//! 2. sustained wind of at least [`WINDY_SPEED`] m/s, or gusts of at least
//!    [`WINDY_GUST`] m/s, select the wind variant where one exists
//! 3. clear skies at or above 35 °C by day become "hot"; clear skies at or below
//!    −10 °C become "snowflake cold"

use crate::icons::IconCode;
use crate::model::{DailyWeather, WeatherSnapshot};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Cloud cover (%) above which the sun or moon is hidden.
pub const OVERCAST_CLOUDS: u8 = 60;

/// Sustained wind (m/s) that selects a wind variant.
pub const WINDY_SPEED: f32 = 10.0;

/// Gust speed (m/s) that selects a wind variant.
pub const WINDY_GUST: f32 = 15.0;

const HOT_KELVIN: f32 = 273.15 + 35.0;
const COLD_KELVIN: f32 = 273.15 - 10.0;

/// Inputs to condition icon selection.
#[derive(Clone, Copy, Debug)]
pub struct Conditions {
    pub id: u16,
    pub daytime: bool,
    pub clouds: u8,
    pub wind_speed: f32,
    pub wind_gust: Option<f32>,
    /// Kelvin
    pub temperature: f32,
}

impl Conditions {
    /// Conditions right now; day or night from the time of day against sunrise/sunset.
    pub fn current(snapshot: &WeatherSnapshot, now: NaiveDateTime) -> Self {
        Self {
            id: snapshot.condition_id,
            daytime: snapshot.is_daytime(now),
            clouds: snapshot.clouds,
            wind_speed: snapshot.wind_speed,
            wind_gust: snapshot.wind_gust,
            temperature: snapshot.temp,
        }
    }

    /// Conditions of a forecast day, always drawn with the day variant.
    pub fn daily(day: &DailyWeather) -> Self {
        Self {
            id: day.condition_id,
            daytime: true,
            clouds: day.clouds,
            wind_speed: day.wind_speed,
            wind_gust: day.wind_gust,
            temperature: if day.temp_max >= HOT_KELVIN {
                day.temp_max
            } else {
                day.temp_min
            },
        }
    }

    fn windy(&self) -> bool {
        self.wind_speed >= WINDY_SPEED || self.wind_gust.is_some_and(|g| g >= WINDY_GUST)
    }

    fn overcast(&self) -> bool {
        self.clouds > OVERCAST_CLOUDS
    }

    /// Pick the day, night or generic variant.
    fn variant(&self, day: IconCode, night: IconCode, generic: IconCode) -> IconCode {
        if self.overcast() {
            generic
        } else if self.daytime {
            day
        } else {
            night
        }
    }

    /// Semantic icon for these conditions.
    pub fn icon(&self) -> IconCode {
        use IconCode::*;
        let windy = self.windy();
        match self.id {
            200..=232 => self.variant(DayThunderstorm, NightAltThunderstorm, Thunderstorm),
            300..=321 => self.variant(DayShowers, NightAltShowers, Showers),
            511 => self.variant(DaySleet, NightAltSleet, Sleet),
            500..=504 if windy => self.variant(DayRainWind, NightAltRainWind, RainWind),
            500..=504 => self.variant(DayRain, NightAltRain, Rain),
            520..=531 => self.variant(DayShowers, NightAltShowers, Showers),
            611..=616 => self.variant(DaySleet, NightAltSleet, Sleet),
            600..=622 if windy => self.variant(DaySnowWind, NightAltSnowWind, SnowWind),
            600..=622 => self.variant(DaySnow, NightAltSnow, Snow),
            701 | 741 => self.variant(DayFog, NightFog, Fog),
            711 => Smoke,
            721 => self.variant(DayHaze, NightFog, Fog),
            731 | 761 => Dust,
            751 => Sandstorm,
            762 => Volcano,
            771 => StrongWind,
            781 => Tornado,
            800 if self.temperature >= HOT_KELVIN && self.daytime => Hot,
            800 if self.temperature <= COLD_KELVIN => SnowflakeCold,
            800 if windy => StrongWind,
            800 => self.variant(DaySunny, NightClear, DaySunny),
            801 if windy => self.variant(DayCloudyGusts, NightAltCloudyGusts, CloudyGusts),
            801 => self.variant(DaySunnyOvercast, NightAltPartlyCloudy, Cloud),
            802 if windy => self.variant(DayCloudyGusts, NightAltCloudyGusts, CloudyGusts),
            802 => self.variant(DayCloudy, NightAltCloudy, Cloudy),
            803 | 804 if windy => CloudyGusts,
            803 | 804 => Cloudy,
            _ => Na,
        }
    }
}

/// Icon for a weather alert, chosen by keywords in its event name.
pub fn alert_icon(event: &str) -> IconCode {
    use IconCode::*;
    const KEYWORDS: &[(&[&str], IconCode)] = &[
        (&["tornado", "funnel"], Tornado),
        (&["hurricane", "typhoon", "cyclone", "tropical"], Hurricane),
        (&["tsunami"], Tsunami),
        (&["earthquake"], Earthquake),
        (&["flood", "surge"], Flood),
        (&["smoke"], Smoke),
        (&["fire", "red flag"], Fire),
        (&["volcan"], Volcano),
        (&["thunder", "lightning"], Thunderstorm),
        (&["blizzard", "snow", "winter"], Snow),
        (&["freez", "frost", "ice storm", "cold", "chill"], SnowflakeCold),
        (&["heat", "hot"], Hot),
        (&["dust", "sand"], Dust),
        (&["fog"], Fog),
        (&["rain"], Rain),
        (&["wind", "gale", "squall"], StrongWind),
    ];
    let event = event.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(words, _)| words.iter().any(|w| event.contains(w)))
        .map(|&(_, icon)| icon)
        .unwrap_or(Warning)
}

/// Battery icon for a charge percentage.
pub fn battery_icon(percent: u32) -> IconCode {
    IconCode::Battery(((percent.min(100) + 10) / 20) as u8)
}

/// Signal icon for an RSSI in dBm (0 = not connected).
pub fn wifi_icon(rssi: i32) -> IconCode {
    match rssi {
        0 => IconCode::WifiX,
        r if r >= -60 => IconCode::Wifi(3),
        r if r >= -70 => IconCode::Wifi(2),
        _ => IconCode::Wifi(1),
    }
}

/// How finely wind direction is quantised.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompassPrecision {
    /// N, E, S, W
    Cardinal,
    /// 8 points
    Intercardinal,
    /// 16 points
    SecondaryIntercardinal,
    /// 32 points
    TertiaryIntercardinal,
    /// Whole degrees
    Degrees,
}

const COMPASS_32: [&str; 32] = [
    "N", "NbE", "NNE", "NEbN", "NE", "NEbE", "ENE", "EbN", "E", "EbS", "ESE", "SEbE", "SE", "SEbS",
    "SSE", "SbE", "S", "SbW", "SSW", "SWbS", "SW", "SWbW", "WSW", "WbS", "W", "WbN", "WNW", "NWbW",
    "NW", "NWbN", "NNW", "NbW",
];

impl CompassPrecision {
    fn points(self) -> u32 {
        match self {
            CompassPrecision::Cardinal => 4,
            CompassPrecision::Intercardinal => 8,
            CompassPrecision::SecondaryIntercardinal => 16,
            CompassPrecision::TertiaryIntercardinal => 32,
            CompassPrecision::Degrees => 360,
        }
    }

    /// Snap a direction in degrees to the nearest point of this precision.
    pub fn snap(self, degrees: u16) -> u16 {
        let points = self.points() as f32;
        let step = 360.0 / points;
        let index = (degrees as f32 / step).round() as u32 % self.points();
        (index as f32 * step).round() as u16
    }

    /// Compass label for a direction, e.g. `"NNE"`; whole degrees render as `"23°"`.
    pub fn label(self, degrees: u16) -> String {
        if self == CompassPrecision::Degrees {
            return format!("{}\u{B0}", degrees % 360);
        }
        let index = (self.snap(degrees) as f32 / 11.25).round() as usize % 32;
        COMPASS_32[index].to_string()
    }
}

/// Arrow icon for a wind direction.
pub fn wind_arrow(degrees: u16, precision: CompassPrecision) -> IconCode {
    IconCode::WindArrow(precision.snap(degrees))
}
