//! Kernel SPI device as the panel bus. Chip select is driven by the kernel.

use embedded_hal::spi::SpiDevice;
use linux_embedded_hal::spidev::{SpiModeFlags, SpidevOptions};
use linux_embedded_hal::SpidevDevice;
use weather_epd_lib::epd7in5::{EpdError, SoftwareSpi};

/// The UC8179 is rated for 10 MHz; stay well below it on long ribbon cables.
const MAX_SPEED_HZ: u32 = 4_000_000;

pub struct SpidevHwSpi {
    dev: SpidevDevice,
}

impl SpidevHwSpi {
    pub fn open(path: &str) -> Result<Self, EpdError> {
        let mut dev =
            SpidevDevice::open(path).map_err(|e| EpdError::Spi(format!("{}: {:?}", path, e)))?;
        let options = SpidevOptions::new()
            .bits_per_word(8)
            .max_speed_hz(MAX_SPEED_HZ)
            .mode(SpiModeFlags::SPI_MODE_0)
            .build();
        dev.configure(&options)
            .map_err(|e| EpdError::Spi(format!("{:?}", e)))?;
        Ok(Self { dev })
    }
}

impl SoftwareSpi for SpidevHwSpi {
    fn write_byte(&mut self, data: u8) -> Result<(), EpdError> {
        self.dev
            .write(&[data])
            .map_err(|e| EpdError::Spi(format!("{:?}", e)))
    }
}
