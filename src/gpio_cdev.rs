//! GPIO character-device lines for the panel control pins.

use embedded_hal::digital::{InputPin as HalInputPin, OutputPin as HalOutputPin};
use linux_embedded_hal::gpio_cdev::{Chip, LineRequestFlags};
use linux_embedded_hal::CdevPin;
use std::fmt::Debug;
use weather_epd_lib::epd7in5::{EpdError, GpioPin, InputPin};

const CONSUMER: &str = "epaper-weather";

fn gpio_error<E: Debug>(e: E) -> EpdError {
    EpdError::Gpio(format!("{:?}", e))
}

fn request(chip: &mut Chip, offset: u32, flags: LineRequestFlags) -> Result<CdevPin, EpdError> {
    let handle = chip
        .get_line(offset)
        .map_err(gpio_error)?
        .request(flags, 0, CONSUMER)
        .map_err(gpio_error)?;
    CdevPin::new(handle).map_err(gpio_error)
}

pub struct CdevOutputPin(CdevPin);

pub struct CdevInputPin(CdevPin);

impl CdevOutputPin {
    pub fn new(chip: &mut Chip, offset: u32) -> Result<Self, EpdError> {
        request(chip, offset, LineRequestFlags::OUTPUT).map(Self)
    }
}

impl CdevInputPin {
    pub fn new(chip: &mut Chip, offset: u32) -> Result<Self, EpdError> {
        request(chip, offset, LineRequestFlags::INPUT).map(Self)
    }
}

impl GpioPin for CdevOutputPin {
    fn set_high(&mut self) -> Result<(), EpdError> {
        self.0.set_high().map_err(gpio_error)
    }

    fn set_low(&mut self) -> Result<(), EpdError> {
        self.0.set_low().map_err(gpio_error)
    }
}

impl InputPin for CdevInputPin {
    fn is_high(&mut self) -> Result<bool, EpdError> {
        self.0.is_high().map_err(gpio_error)
    }
}
