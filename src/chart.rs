//! # Chart Auto-scaler
//!
//! Axis bounds for the hourly outlook chart.
//!
//! The temperature axis always has exactly [`TICK_INTERVALS`] intervals between
//! round bounds that enclose every sample. The precipitation axis is either a fixed
//! 0-100 % scale or a 0-`ceil(max)` mm scale, and disappears entirely when there is
//! nothing to show.

use crate::units::HourlyPrecipUnit;

/// Intervals between the top and bottom gridline.
pub const TICK_INTERVALS: i32 = 5;

/// Initial tick step and the amount it grows by.
pub const STEP_INCREMENT: i32 = 5;

/// Bounds of the temperature axis in display units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TempAxis {
    pub min: i32,
    pub max: i32,
    pub step: i32,
}

impl TempAxis {
    /// Fit round, data-enclosing bounds to a temperature series.
    ///
    /// Non-finite samples are ignored; an empty series fits around zero.
    ///
    /// # Example
    /// ```
    /// use weather_epd_lib::chart::TempAxis;
    ///
    /// let axis = TempAxis::fit(&[3.0, 9.5, 17.2]);
    /// assert_eq!((axis.min, axis.max, axis.step), (0, 25, 5));
    /// ```
    pub fn fit(values: &[f32]) -> Self {
        let finite = values.iter().copied().filter(|v| v.is_finite());
        let (lo, hi) = finite.fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        let (lo, hi) = if lo > hi { (0.0, 0.0) } else { (lo, hi) };

        let floor = (lo - 1.0) as i32;
        let ceil = (hi + 1.0) as i32;
        let bounds = |step: i32| {
            (
                floor - floor.rem_euclid(step),
                ceil + (step - ceil.rem_euclid(step)),
            )
        };

        let mut step = STEP_INCREMENT;
        let (mut min, mut max) = bounds(step);
        while (max - min) / step > TICK_INTERVALS {
            step += STEP_INCREMENT;
            (min, max) = bounds(step);
        }
        while (max - min) / step < TICK_INTERVALS {
            if lo - min as f32 <= max as f32 - hi {
                min -= step;
            } else {
                max += step;
            }
        }
        Self { min, max, step }
    }

    /// Label value of gridline `i`, counted from the top.
    pub fn tick_value(&self, i: i32) -> i32 {
        self.max - i * self.step
    }
}

/// Right-hand precipitation axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrecipAxis {
    /// All-zero series: no axis, labels or fill
    Hidden,
    /// Probability of precipitation, 0-100 %
    Percent,
    /// Liquid-equivalent amount, 0 to the bound in mm
    Millimetres(u32),
}

impl PrecipAxis {
    /// Pick the axis for a series. Probabilities are fractions in `[0, 1]`,
    /// amounts are millimetres.
    pub fn fit(values: &[f32], unit: HourlyPrecipUnit) -> Self {
        let max = values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(0.0f32, f32::max);
        if max <= 0.0 {
            return PrecipAxis::Hidden;
        }
        match unit {
            HourlyPrecipUnit::Probability => PrecipAxis::Percent,
            HourlyPrecipUnit::Amount => PrecipAxis::Millimetres(max.ceil() as u32),
        }
    }

    pub fn is_shown(&self) -> bool {
        !matches!(self, PrecipAxis::Hidden)
    }

    /// Top of the axis in plotted units (percent or mm).
    pub fn bound(&self) -> f32 {
        match self {
            PrecipAxis::Hidden => 0.0,
            PrecipAxis::Percent => 100.0,
            PrecipAxis::Millimetres(mm) => *mm as f32,
        }
    }

    /// Convert a raw sample into plotted units.
    pub fn plotted(&self, value: f32) -> f32 {
        match self {
            PrecipAxis::Percent => value * 100.0,
            _ => value,
        }
    }

    /// Number and unit suffix for gridline `i`, counted from the top.
    pub fn tick_label(&self, i: i32) -> (String, &'static str) {
        match self {
            PrecipAxis::Hidden => (String::new(), ""),
            PrecipAxis::Percent => ((100 - 20 * i).to_string(), "%"),
            PrecipAxis::Millimetres(mm) => {
                let bound = *mm as f32;
                let value = (bound - i as f32 * bound / TICK_INTERVALS as f32) as i32;
                (value.to_string(), " mm")
            }
        }
    }
}
