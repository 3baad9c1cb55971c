//! # Icon Resolver
//!
//! Maps a semantic [`IconCode`] and an [`IconSize`] to a 1-bpp [`Bitmap`].
//!
//! ## Asset Table
//! Not every code exists at every size. [`has_asset`] is the static table of what
//! the icon set provides:
//!
//! | Group                          | Sizes               |
//! |--------------------------------|---------------------|
//! | Weather conditions             | 32, 48, 64, 196     |
//! | Alert hazards                  | 32, 48              |
//! | Current-condition metrics      | 48                  |
//! | Battery levels                 | 24                  |
//! | Signal levels                  | 16                  |
//! | Refresh / error                | 32 / 24             |
//! | Error-screen icons             | 196                 |
//! | Wind direction arrows          | 24                  |
//! | Generic "not available"        | 32, 48, 64, 196     |
//!
//! with documented gaps (see [`substitute`]).
//!
//! ## Resolution Order
//! 1. the exact asset
//! 2. a visually related code at the same size
//! 3. the generic [`IconCode::Na`] at the same size
//! 4. a boxed-cross placeholder
//!
//! so [`resolve`] never fails.
//!
//! ## Painting
//! Bitmaps are painted from embedded-graphics primitives on a 100x100 design grid
//! scaled to the requested size. Bits are inverted: `0` is ink, `1` is background,
//! matching the driver's inverted-bitmap primitive.

use embedded_graphics::{
    geometry::Angle,
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{Arc, Circle, Line, PrimitiveStyle, Rectangle, Triangle},
};
use std::convert::Infallible;

/// Semantic icon identifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IconCode {
    // Day conditions
    DaySunny,
    DaySunnyOvercast,
    DayCloudy,
    DayCloudyGusts,
    DayRain,
    DayRainWind,
    DayShowers,
    DaySleet,
    DaySnow,
    DaySnowWind,
    DayThunderstorm,
    DayFog,
    DayHaze,
    // Night conditions
    NightClear,
    NightAltPartlyCloudy,
    NightAltCloudy,
    NightAltCloudyGusts,
    NightAltRain,
    NightAltRainWind,
    NightAltShowers,
    NightAltSleet,
    NightAltSnow,
    NightAltSnowWind,
    NightAltThunderstorm,
    NightFog,
    Stars,
    // Neutral conditions
    Cloud,
    Cloudy,
    CloudyGusts,
    Rain,
    RainWind,
    Showers,
    Sleet,
    Snow,
    SnowWind,
    Thunderstorm,
    Fog,
    Dust,
    Smoke,
    Sandstorm,
    Tornado,
    Hurricane,
    StrongWind,
    Volcano,
    Hot,
    SnowflakeCold,
    Na,
    // Alert hazards
    Flood,
    Fire,
    Earthquake,
    Tsunami,
    /// Generic hazard triangle
    Warning,
    // Current-condition metrics
    Sunrise,
    Sunset,
    Humidity,
    Barometer,
    Visibility,
    AirFilter,
    HouseThermometer,
    HouseHumidity,
    // Status bar
    /// Charge level in bars, 0..=5
    Battery(u8),
    BatteryAlert,
    /// Signal level in bars, 1..=3
    Wifi(u8),
    WifiX,
    Refresh,
    Error,
    // Error screen
    CloudDown,
    Time4,
    /// Arrow pointing downwind for a meteorological direction in degrees
    WindArrow(u16),
}

/// Available bitmap edge lengths.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IconSize {
    S16,
    S24,
    S32,
    S48,
    S64,
    S196,
}

impl IconSize {
    pub const ALL: [IconSize; 6] = [
        IconSize::S16,
        IconSize::S24,
        IconSize::S32,
        IconSize::S48,
        IconSize::S64,
        IconSize::S196,
    ];

    pub fn px(self) -> u32 {
        match self {
            IconSize::S16 => 16,
            IconSize::S24 => 24,
            IconSize::S32 => 32,
            IconSize::S48 => 48,
            IconSize::S64 => 64,
            IconSize::S196 => 196,
        }
    }
}

/// Inverted 1-bpp bitmap: a cleared bit is ink.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Bitmap {
    /// All-background bitmap.
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0xFF; (width.div_ceil(8) * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    fn locate(&self, x: i32, y: i32) -> Option<(usize, u8)> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        let index = y as usize * self.width.div_ceil(8) as usize + x as usize / 8;
        Some((index, 0x80 >> (x % 8)))
    }

    /// Whether the pixel at `(x, y)` is ink.
    pub fn is_ink(&self, x: i32, y: i32) -> bool {
        self.locate(x, y)
            .map(|(index, mask)| self.data[index] & mask == 0)
            .unwrap_or(false)
    }

    /// Number of ink pixels.
    pub fn ink_count(&self) -> usize {
        (0..self.height as i32)
            .flat_map(|y| (0..self.width as i32).map(move |x| (x, y)))
            .filter(|&(x, y)| self.is_ink(x, y))
            .count()
    }
}

impl OriginDimensions for Bitmap {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for Bitmap {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let Some((index, mask)) = self.locate(point.x, point.y) {
                match color {
                    BinaryColor::On => self.data[index] &= !mask,
                    BinaryColor::Off => self.data[index] |= mask,
                }
            }
        }
        Ok(())
    }
}

fn is_weather(code: IconCode) -> bool {
    use IconCode::*;
    matches!(
        code,
        DaySunny
            | DaySunnyOvercast
            | DayCloudy
            | DayCloudyGusts
            | DayRain
            | DayRainWind
            | DayShowers
            | DaySleet
            | DaySnow
            | DaySnowWind
            | DayThunderstorm
            | DayFog
            | DayHaze
            | NightClear
            | NightAltPartlyCloudy
            | NightAltCloudy
            | NightAltCloudyGusts
            | NightAltRain
            | NightAltRainWind
            | NightAltShowers
            | NightAltSleet
            | NightAltSnow
            | NightAltSnowWind
            | NightAltThunderstorm
            | NightFog
            | Stars
            | Cloud
            | Cloudy
            | CloudyGusts
            | Rain
            | RainWind
            | Showers
            | Sleet
            | Snow
            | SnowWind
            | Thunderstorm
            | Fog
            | Dust
            | Smoke
            | Sandstorm
            | Tornado
            | Hurricane
            | StrongWind
            | Volcano
            | Hot
            | SnowflakeCold
    )
}

/// Whether the icon set ships `code` at `size`.
pub fn has_asset(code: IconCode, size: IconSize) -> bool {
    use IconCode::*;
    use IconSize::*;
    match code {
        Stars | DaySunnyOvercast | NightAltPartlyCloudy | DayCloudyGusts | NightAltCloudyGusts
        | Cloud | Volcano => matches!(size, S32 | S48 | S64),
        Hot | SnowflakeCold | Hurricane => size == S196,
        c if is_weather(c) => matches!(size, S32 | S48 | S64 | S196),
        Na => matches!(size, S32 | S48 | S64 | S196),
        Flood | Fire | Earthquake | Tsunami | Warning => matches!(size, S32 | S48),
        Sunrise | Sunset | Humidity | Barometer | Visibility | AirFilter | HouseThermometer
        | HouseHumidity => size == S48,
        Battery(level) => level <= 5 && size == S24,
        BatteryAlert => matches!(size, S24 | S196),
        Wifi(level) => (1..=3).contains(&level) && size == S16,
        WifiX => matches!(size, S16 | S196),
        Refresh => size == S32,
        Error => size == S24,
        CloudDown | Time4 => size == S196,
        WindArrow(_) => size == S24,
        _ => false,
    }
}

/// Documented substitute for a code missing at `size`.
pub fn substitute(code: IconCode, size: IconSize) -> Option<IconCode> {
    use IconCode::*;
    if size == IconSize::S196 {
        match code {
            Stars => Some(NightClear),
            DaySunnyOvercast => Some(DayCloudy),
            NightAltPartlyCloudy => Some(NightAltCloudy),
            DayCloudyGusts | NightAltCloudyGusts => Some(CloudyGusts),
            Cloud => Some(Cloudy),
            Volcano => Some(Na),
            _ => None,
        }
    } else {
        match code {
            Hot => Some(DaySunny),
            SnowflakeCold => Some(Snow),
            Hurricane => Some(StrongWind),
            _ => None,
        }
    }
}

/// Resolve a code and size to a bitmap. Total: never fails.
///
/// # Example
/// ```
/// use weather_epd_lib::icons::{resolve, IconCode, IconSize};
///
/// let bitmap = resolve(IconCode::Hot, IconSize::S64);
/// assert_eq!(bitmap.width(), 64);
/// ```
pub fn resolve(code: IconCode, size: IconSize) -> Bitmap {
    let chosen = if has_asset(code, size) {
        Some(code)
    } else if let Some(sub) = substitute(code, size).filter(|&s| has_asset(s, size)) {
        Some(sub)
    } else if has_asset(IconCode::Na, size) {
        Some(IconCode::Na)
    } else {
        None
    };
    let mut pen = Pen::new(size.px());
    match chosen {
        Some(code) => pen.icon(code),
        None => pen.placeholder(),
    }
    pen.finish()
}

/// Sky element drawn behind or instead of a cloud.
#[derive(Clone, Copy, PartialEq)]
enum Sky {
    Sun,
    Moon,
    Stars,
    Clear,
}

/// What hangs below the cloud or sky.
#[derive(Clone, Copy, PartialEq)]
enum Overlay {
    Plain,
    Rain,
    RainWind,
    Showers,
    Sleet,
    Snow,
    SnowWind,
    Thunder,
    Fog,
    Haze,
    Gusts,
}

/// Composition of the regular weather glyphs.
fn recipe(code: IconCode) -> Option<(Sky, bool, Overlay)> {
    use IconCode::*;
    use Overlay as O;
    let r = match code {
        DaySunny => (Sky::Sun, false, O::Plain),
        DaySunnyOvercast => (Sky::Sun, true, O::Plain),
        DayCloudy => (Sky::Sun, true, O::Plain),
        DayCloudyGusts => (Sky::Sun, true, O::Gusts),
        DayRain => (Sky::Sun, true, O::Rain),
        DayRainWind => (Sky::Sun, true, O::RainWind),
        DayShowers => (Sky::Sun, true, O::Showers),
        DaySleet => (Sky::Sun, true, O::Sleet),
        DaySnow => (Sky::Sun, true, O::Snow),
        DaySnowWind => (Sky::Sun, true, O::SnowWind),
        DayThunderstorm => (Sky::Sun, true, O::Thunder),
        DayFog => (Sky::Sun, false, O::Fog),
        DayHaze => (Sky::Sun, false, O::Haze),
        NightClear => (Sky::Moon, false, O::Plain),
        NightAltPartlyCloudy | NightAltCloudy => (Sky::Moon, true, O::Plain),
        NightAltCloudyGusts => (Sky::Moon, true, O::Gusts),
        NightAltRain => (Sky::Moon, true, O::Rain),
        NightAltRainWind => (Sky::Moon, true, O::RainWind),
        NightAltShowers => (Sky::Moon, true, O::Showers),
        NightAltSleet => (Sky::Moon, true, O::Sleet),
        NightAltSnow => (Sky::Moon, true, O::Snow),
        NightAltSnowWind => (Sky::Moon, true, O::SnowWind),
        NightAltThunderstorm => (Sky::Moon, true, O::Thunder),
        NightFog => (Sky::Moon, false, O::Fog),
        Stars => (Sky::Stars, false, O::Plain),
        Cloud | Cloudy => (Sky::Clear, true, O::Plain),
        CloudyGusts => (Sky::Clear, true, O::Gusts),
        Rain => (Sky::Clear, true, O::Rain),
        RainWind => (Sky::Clear, true, O::RainWind),
        Showers => (Sky::Clear, true, O::Showers),
        Sleet => (Sky::Clear, true, O::Sleet),
        Snow => (Sky::Clear, true, O::Snow),
        SnowWind => (Sky::Clear, true, O::SnowWind),
        Thunderstorm => (Sky::Clear, true, O::Thunder),
        Fog => (Sky::Clear, false, O::Fog),
        _ => return None,
    };
    Some(r)
}

/// Primitive painter on a 100x100 design grid.
struct Pen {
    bmp: Bitmap,
    size: i32,
}

impl Pen {
    fn new(px: u32) -> Self {
        Self {
            bmp: Bitmap::blank(px, px),
            size: px as i32,
        }
    }

    fn finish(self) -> Bitmap {
        self.bmp
    }

    fn p(&self, x: i32, y: i32) -> Point {
        Point::new(x * self.size / 100, y * self.size / 100)
    }

    fn d(&self, v: i32) -> u32 {
        (v * self.size / 100).max(1) as u32
    }

    fn stroke(&self) -> u32 {
        (self.size / 24).max(1) as u32
    }

    fn polar(&self, cx: i32, cy: i32, r: f32, screen_deg: f32) -> Point {
        let rad = screen_deg.to_radians();
        self.p(
            cx + (r * rad.cos()).round() as i32,
            cy + (r * rad.sin()).round() as i32,
        )
    }

    fn ink(&self) -> PrimitiveStyle<BinaryColor> {
        PrimitiveStyle::with_stroke(BinaryColor::On, self.stroke())
    }

    fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        let style = self.ink();
        let _ = Line::new(self.p(x0, y0), self.p(x1, y1))
            .into_styled(style)
            .draw(&mut self.bmp);
    }

    fn line_pts(&mut self, a: Point, b: Point) {
        let style = self.ink();
        let _ = Line::new(a, b).into_styled(style).draw(&mut self.bmp);
    }

    fn circle(&mut self, cx: i32, cy: i32, dia: i32) {
        let style = self.ink();
        let _ = Circle::with_center(self.p(cx, cy), self.d(dia))
            .into_styled(style)
            .draw(&mut self.bmp);
    }

    fn disc(&mut self, cx: i32, cy: i32, dia: i32, color: BinaryColor) {
        let _ = Circle::with_center(self.p(cx, cy), self.d(dia))
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(&mut self.bmp);
    }

    fn arc(&mut self, cx: i32, cy: i32, dia: i32, start: f32, sweep: f32) {
        let style = self.ink();
        let _ = Arc::with_center(
            self.p(cx, cy),
            self.d(dia),
            Angle::from_degrees(start),
            Angle::from_degrees(sweep),
        )
        .into_styled(style)
        .draw(&mut self.bmp);
    }

    fn triangle(&mut self, a: (i32, i32), b: (i32, i32), c: (i32, i32), fill: bool) {
        let style = if fill {
            PrimitiveStyle::with_fill(BinaryColor::On)
        } else {
            self.ink()
        };
        let _ = Triangle::new(self.p(a.0, a.1), self.p(b.0, b.1), self.p(c.0, c.1))
            .into_styled(style)
            .draw(&mut self.bmp);
    }

    fn rect(&mut self, x: i32, y: i32, w: i32, h: i32, fill: bool) {
        let style = if fill {
            PrimitiveStyle::with_fill(BinaryColor::On)
        } else {
            self.ink()
        };
        let _ = Rectangle::new(self.p(x, y), Size::new(self.d(w), self.d(h)))
            .into_styled(style)
            .draw(&mut self.bmp);
    }

    fn dot(&mut self, x: i32, y: i32) {
        let dia = (self.stroke() * 2) as i32 * 100 / self.size.max(1);
        self.disc(x, y, dia.max(1), BinaryColor::On);
    }

    // --- components -------------------------------------------------------

    fn sun(&mut self, cx: i32, cy: i32, r: i32) {
        self.circle(cx, cy, 2 * r);
        for k in 0..8 {
            let deg = k as f32 * 45.0;
            let a = self.polar(cx, cy, r as f32 * 1.35, deg);
            let b = self.polar(cx, cy, r as f32 * 1.75, deg);
            self.line_pts(a, b);
        }
    }

    fn moon(&mut self, cx: i32, cy: i32, r: i32) {
        self.disc(cx, cy, 2 * r, BinaryColor::On);
        self.disc(cx + r * 6 / 10, cy - r * 4 / 10, 2 * r * 9 / 10, BinaryColor::Off);
    }

    fn stars(&mut self) {
        for &(x, y, s) in &[(30, 35, 10), (65, 30, 7), (55, 65, 12), (80, 60, 5)] {
            self.line(x - s, y, x + s, y);
            self.line(x, y - s, x, y + s);
        }
    }

    /// Outlined cloud in a box starting at (x, y), `w` wide; bottom edge at y + 0.6w.
    fn cloud(&mut self, x: i32, y: i32, w: i32) {
        let lobes = [
            (x + w * 55 / 100, y + w * 30 / 100, w * 50 / 100),
            (x + w * 28 / 100, y + w * 42 / 100, w * 36 / 100),
            (x + w * 80 / 100, y + w * 44 / 100, w * 32 / 100),
        ];
        let base = (x + w * 28 / 100, y + w * 42 / 100, w * 52 / 100, w * 18 / 100);
        let stroke = self.stroke() as i32;
        for &(cx, cy, dia) in &lobes {
            self.disc(cx, cy, dia, BinaryColor::On);
        }
        let _ = Rectangle::new(self.p(base.0, base.1), Size::new(self.d(base.2), self.d(base.3)))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut self.bmp);
        // hollow out, leaving a stroke-wide outline
        for &(cx, cy, dia) in &lobes {
            let inner = (self.d(dia) as i32 - 2 * stroke).max(1) as u32;
            let _ = Circle::with_center(self.p(cx, cy), inner)
                .into_styled(PrimitiveStyle::with_fill(BinaryColor::Off))
                .draw(&mut self.bmp);
        }
        let top_left = self.p(base.0, base.1);
        let inner = Size::new(
            self.d(base.2),
            (self.d(base.3) as i32 - stroke).max(1) as u32,
        );
        let _ = Rectangle::new(top_left, inner)
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::Off))
            .draw(&mut self.bmp);
    }

    fn drops(&mut self, y: i32, slant: i32, short: bool) {
        let len = if short { 10 } else { 20 };
        for i in 0..3 {
            let x = 35 + i * 18;
            self.line(x, y, x - slant, y + len);
            if short {
                self.line(x - slant - 2, y + len + 6, x - 2 * slant - 2, y + 2 * len + 6);
            }
        }
    }

    fn flake(&mut self, cx: i32, cy: i32, s: i32) {
        self.line(cx - s, cy, cx + s, cy);
        self.line(cx - s / 2, cy - s, cx + s / 2, cy + s);
        self.line(cx - s / 2, cy + s, cx + s / 2, cy - s);
    }

    fn bolt(&mut self, y: i32) {
        self.triangle((55, y), (38, y + 16), (52, y + 16), true);
        self.triangle((48, y + 12), (64, y + 12), (44, y + 32), true);
    }

    fn wind_lines(&mut self, y: i32, spacing: i32) {
        for i in 0..3 {
            let yy = y + i * spacing;
            let end = 80 - i * 10;
            self.line(10, yy, end, yy);
            self.arc(end, yy - 6, 12, 90.0, -180.0);
        }
    }

    fn overlay(&mut self, overlay: Overlay, y: i32) {
        match overlay {
            Overlay::Plain => {}
            Overlay::Rain => self.drops(y, 6, false),
            Overlay::RainWind => self.drops(y, 14, false),
            Overlay::Showers => self.drops(y, 4, true),
            Overlay::Sleet => {
                self.line(35, y, 31, y + 18);
                self.flake(55, y + 10, 7);
                self.line(72, y, 68, y + 18);
            }
            Overlay::Snow => {
                self.flake(35, y + 8, 7);
                self.flake(55, y + 16, 7);
                self.flake(74, y + 8, 7);
            }
            Overlay::SnowWind => {
                self.flake(30, y + 8, 6);
                self.flake(50, y + 16, 6);
                self.line(62, y + 8, 92, y + 8);
                self.line(62, y + 18, 85, y + 18);
            }
            Overlay::Thunder => self.bolt(y),
            Overlay::Fog => {
                for i in 0..3 {
                    self.line(15, y + i * 9, 85, y + i * 9);
                }
            }
            Overlay::Haze => {
                for i in 0..3 {
                    let x = 15 + (i % 2) * 10;
                    self.line(x, y + i * 9, x + 30, y + i * 9);
                    self.line(x + 40, y + i * 9, x + 65, y + i * 9);
                }
            }
            Overlay::Gusts => self.wind_lines(y + 4, 9),
        }
    }

    fn house(&mut self) {
        self.line(10, 50, 50, 15);
        self.line(50, 15, 90, 50);
        self.rect(20, 48, 60, 42, false);
    }

    fn thermometer(&mut self, cx: i32, top: i32, height: i32) {
        self.rect(cx - 5, top, 10, height, false);
        self.disc(cx, top + height + 4, 16, BinaryColor::On);
        self.line(cx, top + height / 3, cx, top + height);
    }

    fn droplet(&mut self, cx: i32, cy: i32, r: i32) {
        self.circle(cx, cy, 2 * r);
        self.line(cx, cy - r * 22 / 10, cx - r * 9 / 10, cy - r * 4 / 10);
        self.line(cx, cy - r * 22 / 10, cx + r * 9 / 10, cy - r * 4 / 10);
    }

    fn horizon_sun(&mut self, arrow_up: bool) {
        self.line(5, 75, 95, 75);
        self.arc(50, 75, 44, 180.0, 180.0);
        for deg in [200.0f32, 240.0, 300.0, 340.0] {
            let a = self.polar(50, 75, 28.0, deg);
            let b = self.polar(50, 75, 38.0, deg);
            self.line_pts(a, b);
        }
        if arrow_up {
            self.line(50, 10, 50, 40);
            self.triangle((50, 5), (42, 16), (58, 16), true);
        } else {
            self.line(50, 5, 50, 35);
            self.triangle((50, 42), (42, 31), (58, 31), true);
        }
    }

    fn battery(&mut self, bars: u8) {
        self.rect(8, 30, 76, 40, false);
        self.rect(84, 42, 8, 16, true);
        for i in 0..bars.min(5) as i32 {
            self.rect(14 + i * 14, 36, 10, 28, true);
        }
    }

    fn wifi(&mut self, bars: u8) {
        self.dot(50, 82);
        for i in 0..bars.min(3) as i32 {
            let dia = 36 + i * 30;
            self.arc(50, 86, dia, 225.0, 90.0);
        }
    }

    fn wind_arrow(&mut self, from_deg: u16) {
        // points where the wind blows to
        let screen = from_deg as f32 + 90.0;
        let tip = self.polar(50, 50, 40.0, screen);
        let tail = self.polar(50, 50, 40.0, screen + 180.0);
        self.line_pts(tail, tip);
        let left = self.polar(50, 50, 22.0, screen - 25.0);
        let right = self.polar(50, 50, 22.0, screen + 25.0);
        let _ = Triangle::new(tip, left, right)
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut self.bmp);
    }

    fn placeholder(&mut self) {
        self.rect(2, 2, 96, 96, false);
        self.line(2, 2, 98, 98);
        self.line(98, 2, 2, 98);
    }

    // --- icons ------------------------------------------------------------

    fn icon(&mut self, code: IconCode) {
        use IconCode::*;
        if let Some((sky, cloud, overlay)) = recipe(code) {
            if cloud {
                match sky {
                    Sky::Sun => self.sun(30, 28, 13),
                    Sky::Moon => self.moon(30, 26, 16),
                    Sky::Stars | Sky::Clear => {}
                }
                let (y, w) = if overlay == Overlay::Plain { (25, 80) } else { (12, 75) };
                let x = (100 - w) / 2 + if sky == Sky::Clear { 0 } else { 6 };
                self.cloud(x, y, w);
                self.overlay(overlay, y + w * 60 / 100 + 5);
            } else {
                let (cy, r) = if overlay == Overlay::Plain { (50, 22) } else { (38, 18) };
                match sky {
                    Sky::Sun => self.sun(50, cy, r),
                    Sky::Moon => self.moon(50, cy, r + 6),
                    Sky::Stars => self.stars(),
                    Sky::Clear => {}
                }
                self.overlay(overlay, 72);
            }
            return;
        }
        match code {
            Dust | Sandstorm => {
                for row in 0..4 {
                    for col in 0..6 {
                        self.dot(15 + col * 14 + (row % 2) * 7, 20 + row * 12);
                    }
                }
                if code == Sandstorm {
                    self.wind_lines(70, 10);
                }
            }
            Smoke => {
                for i in 0..3 {
                    self.arc(30 + i * 20, 60 - i * 15, 30, 90.0, 180.0);
                }
                self.rect(20, 80, 60, 10, true);
            }
            Tornado => {
                for i in 0..6 {
                    let half = 40 - i * 6;
                    let shift = (i % 2) * 4;
                    self.line(50 - half + shift, 12 + i * 14, 50 + half + shift, 12 + i * 14);
                }
            }
            Hurricane => {
                self.circle(50, 50, 24);
                self.arc(50, 35, 60, 180.0, 180.0);
                self.arc(50, 65, 60, 0.0, 180.0);
            }
            StrongWind => self.wind_lines(30, 18),
            Volcano => {
                self.triangle((15, 90), (40, 40), (60, 40), false);
                self.line(60, 40, 85, 90);
                self.line(15, 90, 85, 90);
                self.circle(45, 25, 14);
                self.circle(60, 15, 10);
            }
            Hot => {
                self.sun(40, 50, 20);
                self.thermometer(82, 20, 50);
            }
            SnowflakeCold => {
                self.flake(50, 50, 40);
                for &(x, y) in &[(20, 50), (80, 50), (35, 20), (65, 80), (35, 80), (65, 20)] {
                    self.circle(x, y, 8);
                }
            }
            Na => {
                self.circle(50, 50, 80);
                self.line(22, 78, 78, 22);
            }
            Flood => {
                self.house();
                for i in 0..2 {
                    for k in 0..4 {
                        self.arc(18 + k * 22, 78 + i * 10, 22, 180.0, 180.0);
                    }
                }
            }
            Fire => {
                self.triangle((50, 8), (22, 88), (78, 88), false);
                self.triangle((50, 45), (38, 88), (62, 88), true);
            }
            Earthquake => {
                let pts = [(5, 60), (25, 60), (35, 30), (45, 85), (55, 20), (65, 70), (75, 60), (95, 60)];
                for pair in pts.windows(2) {
                    self.line(pair[0].0, pair[0].1, pair[1].0, pair[1].1);
                }
            }
            Tsunami => {
                self.arc(55, 60, 80, 180.0, 200.0);
                self.arc(70, 45, 30, 180.0, 180.0);
                self.line(5, 90, 95, 90);
            }
            Sunrise => self.horizon_sun(true),
            Sunset => self.horizon_sun(false),
            Humidity => self.droplet(50, 62, 22),
            Barometer => {
                self.circle(50, 50, 84);
                self.line(50, 50, 72, 28);
                self.dot(50, 50);
                for deg in [135.0f32, 180.0, 225.0, 270.0, 315.0, 0.0, 45.0] {
                    let a = self.polar(50, 50, 34.0, deg);
                    let b = self.polar(50, 50, 40.0, deg);
                    self.line_pts(a, b);
                }
            }
            Visibility => {
                self.arc(50, 78, 90, 215.0, 110.0);
                self.arc(50, 22, 90, 35.0, 110.0);
                self.disc(50, 50, 26, BinaryColor::On);
            }
            AirFilter => {
                for i in 0..3 {
                    let y = 28 + i * 22;
                    self.arc(30, y, 26, 180.0, 180.0);
                    self.arc(56, y, 26, 0.0, 180.0);
                    self.line(69, y, 92, y);
                }
            }
            HouseThermometer => {
                self.house();
                self.thermometer(50, 55, 20);
            }
            HouseHumidity => {
                self.house();
                self.droplet(50, 75, 9);
            }
            Battery(bars) => self.battery(bars),
            BatteryAlert => {
                self.rect(30, 14, 40, 80, false);
                self.rect(42, 6, 16, 8, true);
                self.line(50, 30, 50, 62);
                self.dot(50, 76);
            }
            Wifi(bars) => self.wifi(bars),
            WifiX => {
                self.wifi(3);
                self.line(66, 56, 90, 80);
                self.line(90, 56, 66, 80);
            }
            Refresh => {
                self.arc(50, 50, 64, -60.0, 300.0);
                let tip = self.polar(50, 50, 32.0, -60.0);
                let _ = Triangle::new(
                    tip + Point::new(0, -(self.size / 8)),
                    tip + Point::new(self.size / 8, 0),
                    tip + Point::new(-(self.size / 10), self.size / 10),
                )
                .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
                .draw(&mut self.bmp);
            }
            Error | Warning => {
                self.triangle((50, 6), (6, 92), (94, 92), false);
                self.line(50, 34, 50, 64);
                self.dot(50, 78);
            }
            CloudDown => {
                self.cloud(10, 5, 80);
                self.line(50, 60, 50, 92);
                self.triangle((50, 98), (38, 82), (62, 82), true);
            }
            Time4 => {
                self.circle(50, 50, 86);
                self.line(50, 50, 50, 18);
                let hand = self.polar(50, 50, 26.0, 30.0);
                let centre = self.p(50, 50);
                self.line_pts(centre, hand);
            }
            WindArrow(deg) => self.wind_arrow(deg),
            _ => self.placeholder(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn every_code() -> Vec<IconCode> {
        use IconCode::*;
        let mut codes = vec![
            DaySunny,
            DaySunnyOvercast,
            DayCloudy,
            DayCloudyGusts,
            DayRain,
            DayRainWind,
            DayShowers,
            DaySleet,
            DaySnow,
            DaySnowWind,
            DayThunderstorm,
            DayFog,
            DayHaze,
            NightClear,
            NightAltPartlyCloudy,
            NightAltCloudy,
            NightAltCloudyGusts,
            NightAltRain,
            NightAltRainWind,
            NightAltShowers,
            NightAltSleet,
            NightAltSnow,
            NightAltSnowWind,
            NightAltThunderstorm,
            NightFog,
            Stars,
            Cloud,
            Cloudy,
            CloudyGusts,
            Rain,
            RainWind,
            Showers,
            Sleet,
            Snow,
            SnowWind,
            Thunderstorm,
            Fog,
            Dust,
            Smoke,
            Sandstorm,
            Tornado,
            Hurricane,
            StrongWind,
            Volcano,
            Hot,
            SnowflakeCold,
            Na,
            Flood,
            Fire,
            Earthquake,
            Tsunami,
            Warning,
            Sunrise,
            Sunset,
            Humidity,
            Barometer,
            Visibility,
            AirFilter,
            HouseThermometer,
            HouseHumidity,
            BatteryAlert,
            WifiX,
            Refresh,
            Error,
            CloudDown,
            Time4,
        ];
        codes.extend((0..=5).map(Battery));
        codes.extend((1..=3).map(Wifi));
        codes.extend([0, 90, 180, 270].map(WindArrow));
        codes
    }

    #[test]
    fn test_resolve_is_total() {
        for code in every_code() {
            for size in IconSize::ALL {
                let bitmap = resolve(code, size);
                assert_eq!(bitmap.width(), size.px(), "{:?} at {:?}", code, size);
                assert_eq!(bitmap.height(), size.px());
                assert!(bitmap.ink_count() > 0, "{:?} at {:?} is blank", code, size);
            }
        }
    }

    #[test]
    fn test_precipitation_codes_keep_their_overlay() {
        assert!(matches!(recipe(IconCode::Rain), Some((Sky::Clear, true, Overlay::Rain))));
        assert!(matches!(recipe(IconCode::DayRain), Some((Sky::Sun, true, Overlay::Rain))));
        assert!(matches!(
            recipe(IconCode::NightAltSnowWind),
            Some((Sky::Moon, true, Overlay::SnowWind))
        ));
        assert!(matches!(recipe(IconCode::Fog), Some((Sky::Clear, false, Overlay::Fog))));
        assert!(recipe(IconCode::Sunrise).is_none());
        assert_ne!(
            resolve(IconCode::Snow, IconSize::S64),
            resolve(IconCode::Rain, IconSize::S64)
        );
    }

    #[test]
    fn test_large_variant_falls_back_to_related_code() {
        assert!(!has_asset(IconCode::Stars, IconSize::S196));
        assert_eq!(
            resolve(IconCode::Stars, IconSize::S196),
            resolve(IconCode::NightClear, IconSize::S196)
        );
        assert_eq!(
            resolve(IconCode::DayCloudyGusts, IconSize::S196),
            resolve(IconCode::CloudyGusts, IconSize::S196)
        );
    }

    #[test]
    fn test_small_variant_falls_back_to_related_code() {
        assert_eq!(
            resolve(IconCode::Hurricane, IconSize::S48),
            resolve(IconCode::StrongWind, IconSize::S48)
        );
        assert_eq!(
            resolve(IconCode::Hot, IconSize::S64),
            resolve(IconCode::DaySunny, IconSize::S64)
        );
    }

    #[test]
    fn test_missing_without_substitute_uses_generic() {
        assert!(!has_asset(IconCode::Sunrise, IconSize::S64));
        assert_eq!(
            resolve(IconCode::Sunrise, IconSize::S64),
            resolve(IconCode::Na, IconSize::S64)
        );
    }

    #[test]
    fn test_placeholder_when_generic_missing() {
        let bitmap = resolve(IconCode::Sunrise, IconSize::S16);
        // boxed cross: all four corners inked
        assert!(bitmap.is_ink(0, 0) || bitmap.is_ink(1, 1));
        assert!(bitmap.is_ink(15, 15) || bitmap.is_ink(14, 14));
    }

    #[test]
    fn test_wind_arrow_points_downwind() {
        // northerly wind: arrow head in the lower half
        let bitmap = resolve(IconCode::WindArrow(0), IconSize::S24);
        let lower: usize = (12..24)
            .flat_map(|y| (0..24).map(move |x| (x, y)))
            .filter(|&(x, y)| bitmap.is_ink(x, y))
            .count();
        let upper: usize = (0..12)
            .flat_map(|y| (0..24).map(move |x| (x, y)))
            .filter(|&(x, y)| bitmap.is_ink(x, y))
            .count();
        assert!(lower > upper);
    }
}
