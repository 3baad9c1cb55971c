//! # EPD 7.5" (800x480) UC8179 Driver
//!
//! Bit-level driver for the 7.5" black/white and black/white/red panels built on
//! the UC8179 controller. The panel is written one horizontal band at a time
//! through the controller's partial window, which is what lets the renderer work
//! with a page buffer much smaller than the full frame.
//!
//! ## Bus Abstraction
//! The driver is generic over three tiny traits ([`SoftwareSpi`], [`GpioPin`],
//! [`InputPin`]) so it runs against linux-embedded-hal on the device and against
//! recording mocks in tests.
//!
//! ## BUSY Polarity
//! On this controller BUSY is driven **low** while the panel is working. Polling
//! gives up after [`BUSY_TIMEOUT_POLLS`] checks and carries on; a stuck panel then
//! shows a stale image rather than hanging the controller awake.

use crate::canvas::PanelInterface;
use crate::framebuffer::DisplayBuffer;
use log::{debug, info, warn};
use std::thread;
use std::time::Duration;
use thiserror::Error;

/// Display dimensions
pub const EPD_WIDTH: u32 = 800;
pub const EPD_HEIGHT: u32 = 480;

/// BUSY poll interval
const BUSY_POLL_MS: u64 = 10;

/// Polls before giving up on BUSY (a three-colour refresh takes roughly 16 s)
pub const BUSY_TIMEOUT_POLLS: u32 = 3000;

#[derive(Error, Debug)]
pub enum EpdError {
    #[error("SPI transfer failed: {0}")]
    Spi(String),
    #[error("GPIO access failed: {0}")]
    Gpio(String),
    #[error("row band {first_row}+{rows} exceeds panel height {height}")]
    Window { first_row: u32, rows: u32, height: u32 },
}

/// Byte-wide SPI writes.
pub trait SoftwareSpi {
    fn write_byte(&mut self, data: u8) -> Result<(), EpdError>;
}

/// Output pin.
pub trait GpioPin {
    fn set_high(&mut self) -> Result<(), EpdError>;
    fn set_low(&mut self) -> Result<(), EpdError>;
}

/// Input pin.
pub trait InputPin {
    fn is_high(&mut self) -> Result<bool, EpdError>;
}

/// An absent optional pin (e.g. no power switch fitted) accepts every write.
impl<P: GpioPin> GpioPin for Option<P> {
    fn set_high(&mut self) -> Result<(), EpdError> {
        match self {
            Some(pin) => pin.set_high(),
            None => Ok(()),
        }
    }

    fn set_low(&mut self) -> Result<(), EpdError> {
        match self {
            Some(pin) => pin.set_low(),
            None => Ok(()),
        }
    }
}

/// Wiring of one panel.
pub struct EpdPins<CS, DC, RST, BUSY, PWR> {
    pub cs: CS,
    pub dc: DC,
    pub rst: RST,
    pub busy: BUSY,
    pub pwr: PWR,
}

/// EPD 7.5" display driver
pub struct Epd7in5<SPI, CS, DC, RST, BUSY, PWR> {
    spi: SPI,
    pins: EpdPins<CS, DC, RST, BUSY, PWR>,
    width: u32,
    height: u32,
    accent_plane: bool,
}

impl<SPI, CS, DC, RST, BUSY, PWR> Epd7in5<SPI, CS, DC, RST, BUSY, PWR>
where
    SPI: SoftwareSpi,
    CS: GpioPin,
    DC: GpioPin,
    RST: GpioPin,
    BUSY: InputPin,
    PWR: GpioPin,
{
    /// Create a driver for an 800x480 panel; `accent_plane` selects the
    /// three-colour (B/W/R) variant.
    pub fn new(spi: SPI, pins: EpdPins<CS, DC, RST, BUSY, PWR>, accent_plane: bool) -> Self {
        Self {
            spi,
            pins,
            width: EPD_WIDTH,
            height: EPD_HEIGHT,
            accent_plane,
        }
    }

    /// Give the bus and pins back.
    pub fn release(self) -> (SPI, EpdPins<CS, DC, RST, BUSY, PWR>) {
        (self.spi, self.pins)
    }

    fn reset(&mut self) -> Result<(), EpdError> {
        debug!("Performing hardware reset");
        self.pins.rst.set_high()?;
        thread::sleep(Duration::from_millis(20));
        self.pins.rst.set_low()?;
        thread::sleep(Duration::from_millis(2));
        self.pins.rst.set_high()?;
        thread::sleep(Duration::from_millis(20));
        Ok(())
    }

    fn send_command(&mut self, command: u8) -> Result<(), EpdError> {
        self.pins.dc.set_low()?; // Command mode
        self.pins.cs.set_low()?;
        self.spi.write_byte(command)?;
        self.pins.cs.set_high()?;
        Ok(())
    }

    fn send_data(&mut self, data: u8) -> Result<(), EpdError> {
        self.pins.dc.set_high()?; // Data mode
        self.pins.cs.set_low()?;
        self.spi.write_byte(data)?;
        self.pins.cs.set_high()?;
        Ok(())
    }

    fn send_all(&mut self, command: u8, data: &[u8]) -> Result<(), EpdError> {
        self.send_command(command)?;
        for &byte in data {
            self.send_data(byte)?;
        }
        Ok(())
    }

    /// Wait while BUSY is low.
    fn read_busy(&mut self) -> Result<(), EpdError> {
        let mut count = 0;
        while !self.pins.busy.is_high()? {
            thread::sleep(Duration::from_millis(BUSY_POLL_MS));
            count += 1;
            if count >= BUSY_TIMEOUT_POLLS {
                warn!(
                    "BUSY pin timeout after {} ms - display may be stuck",
                    BUSY_TIMEOUT_POLLS as u64 * BUSY_POLL_MS
                );
                break;
            }
        }
        debug!("Display ready after {} BUSY checks", count);
        Ok(())
    }

    fn set_partial_window(&mut self, first_row: u32, rows: u32) -> Result<(), EpdError> {
        let x_end = self.width - 1;
        let y_end = first_row + rows - 1;
        self.send_command(0x91)?; // Partial in
        self.send_all(
            0x90,
            &[
                0x00,
                0x00,
                (x_end >> 8) as u8,
                (x_end & 0xF8 | 0x07) as u8,
                (first_row >> 8) as u8,
                (first_row & 0xFF) as u8,
                (y_end >> 8) as u8,
                (y_end & 0xFF) as u8,
                0x01,
            ],
        )
    }
}

impl<SPI, CS, DC, RST, BUSY, PWR> PanelInterface for Epd7in5<SPI, CS, DC, RST, BUSY, PWR>
where
    SPI: SoftwareSpi,
    CS: GpioPin,
    DC: GpioPin,
    RST: GpioPin,
    BUSY: InputPin,
    PWR: GpioPin,
{
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn power_on(&mut self) -> Result<(), EpdError> {
        info!("Initializing EPD ({}x{})", self.width, self.height);
        self.pins.pwr.set_high()?;
        self.reset()?;

        self.send_all(0x01, &[0x07, 0x07, 0x3F, 0x3F])?; // Power setting
        self.send_command(0x04)?; // Power on
        thread::sleep(Duration::from_millis(100));
        self.read_busy()?;

        // Panel setting: KWR mode for three colours, KW otherwise
        let panel_setting = if self.accent_plane { 0x0F } else { 0x1F };
        self.send_all(0x00, &[panel_setting])?;
        self.send_all(
            0x61,
            &[
                (self.width >> 8) as u8,
                (self.width & 0xFF) as u8,
                (self.height >> 8) as u8,
                (self.height & 0xFF) as u8,
            ],
        )?;
        self.send_all(0x15, &[0x00])?; // Dual SPI off
        self.send_all(0x50, &[0x11, 0x07])?; // VCOM and data interval
        self.send_all(0x60, &[0x22])?; // TCON
        debug!("EPD initialization completed");
        Ok(())
    }

    fn clear(&mut self) -> Result<(), EpdError> {
        let bytes = (self.width.div_ceil(8) * self.height) as usize;
        self.send_command(0x10)?;
        for _ in 0..bytes {
            self.send_data(0xFF)?;
        }
        self.send_command(0x13)?;
        let blank = if self.accent_plane { 0x00 } else { 0xFF };
        for _ in 0..bytes {
            self.send_data(blank)?;
        }
        Ok(())
    }

    fn write_rows(&mut self, first_row: u32, rows: &DisplayBuffer) -> Result<(), EpdError> {
        if first_row + rows.height() > self.height || rows.height() == 0 {
            return Err(EpdError::Window {
                first_row,
                rows: rows.height(),
                height: self.height,
            });
        }
        let (black, accent) = rows.ink_counts();
        debug!(
            "Writing rows {}..{}: {} black pixels, {} accent pixels",
            first_row,
            first_row + rows.height(),
            black,
            accent
        );
        self.set_partial_window(first_row, rows.height())?;
        if self.accent_plane {
            self.send_all(0x10, rows.black_buffer())?;
            self.send_all(0x13, rows.accent_buffer())?;
        } else {
            // Old/new data for the KW waveform: new data is ink-high
            self.send_all(0x10, rows.black_buffer())?;
            self.send_command(0x13)?;
            for &byte in rows.black_buffer() {
                self.send_data(!byte)?;
            }
        }
        self.send_command(0x92) // Partial out
    }

    fn refresh(&mut self) -> Result<(), EpdError> {
        info!("Refreshing display");
        self.send_command(0x12)?;
        thread::sleep(Duration::from_millis(100));
        self.read_busy()
    }

    fn hibernate(&mut self) -> Result<(), EpdError> {
        debug!("Putting display into deep sleep");
        self.send_command(0x02)?; // Power off
        self.read_busy()?;
        self.send_all(0x07, &[0xA5]) // Deep sleep, check code
    }

    fn power_off(&mut self) -> Result<(), EpdError> {
        self.pins.pwr.set_low()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum Wire {
        Cmd(u8),
        Data(u8),
    }

    #[derive(Default)]
    struct Bus {
        dc_high: bool,
        log: Vec<Wire>,
        pwr: Vec<bool>,
    }

    struct MockSpi(Rc<RefCell<Bus>>);
    struct DcPin(Rc<RefCell<Bus>>);
    struct PwrPin(Rc<RefCell<Bus>>);
    struct NoopPin;
    struct IdleBusy;

    impl SoftwareSpi for MockSpi {
        fn write_byte(&mut self, data: u8) -> Result<(), EpdError> {
            let mut bus = self.0.borrow_mut();
            let wire = if bus.dc_high {
                Wire::Data(data)
            } else {
                Wire::Cmd(data)
            };
            bus.log.push(wire);
            Ok(())
        }
    }

    impl GpioPin for DcPin {
        fn set_high(&mut self) -> Result<(), EpdError> {
            self.0.borrow_mut().dc_high = true;
            Ok(())
        }
        fn set_low(&mut self) -> Result<(), EpdError> {
            self.0.borrow_mut().dc_high = false;
            Ok(())
        }
    }

    impl GpioPin for PwrPin {
        fn set_high(&mut self) -> Result<(), EpdError> {
            self.0.borrow_mut().pwr.push(true);
            Ok(())
        }
        fn set_low(&mut self) -> Result<(), EpdError> {
            self.0.borrow_mut().pwr.push(false);
            Ok(())
        }
    }

    impl GpioPin for NoopPin {
        fn set_high(&mut self) -> Result<(), EpdError> {
            Ok(())
        }
        fn set_low(&mut self) -> Result<(), EpdError> {
            Ok(())
        }
    }

    impl InputPin for IdleBusy {
        fn is_high(&mut self) -> Result<bool, EpdError> {
            Ok(true)
        }
    }

    type MockEpd = Epd7in5<MockSpi, NoopPin, DcPin, NoopPin, IdleBusy, Option<PwrPin>>;

    fn mock_epd(accent_plane: bool, pwr: bool) -> (MockEpd, Rc<RefCell<Bus>>) {
        let bus = Rc::new(RefCell::new(Bus::default()));
        let pins = EpdPins {
            cs: NoopPin,
            dc: DcPin(bus.clone()),
            rst: NoopPin,
            busy: IdleBusy,
            pwr: pwr.then(|| PwrPin(bus.clone())),
        };
        (Epd7in5::new(MockSpi(bus.clone()), pins, accent_plane), bus)
    }

    #[test]
    fn test_init_selects_panel_mode() {
        let (mut epd, bus) = mock_epd(true, false);
        epd.power_on().unwrap();
        let bus = bus.borrow();
        let log = &bus.log;
        let at = log.iter().position(|w| *w == Wire::Cmd(0x00)).unwrap();
        assert_eq!(log[at + 1], Wire::Data(0x0F));
        let res = log.iter().position(|w| *w == Wire::Cmd(0x61)).unwrap();
        assert_eq!(
            log[res + 1..res + 5],
            [Wire::Data(0x03), Wire::Data(0x20), Wire::Data(0x01), Wire::Data(0xE0)]
        );
    }

    #[test]
    fn test_write_rows_uses_partial_window() {
        let (mut epd, bus) = mock_epd(true, false);
        let rows = DisplayBuffer::new(EPD_WIDTH, 16);
        epd.write_rows(256, &rows).unwrap();
        let bus = bus.borrow();
        let log = &bus.log;
        assert_eq!(log[0], Wire::Cmd(0x91));
        assert_eq!(log[1], Wire::Cmd(0x90));
        // vertical start 256, end 271
        assert_eq!(log[6..10], [Wire::Data(0x01), Wire::Data(0x00), Wire::Data(0x01), Wire::Data(0x0F)]);
        assert_eq!(log.last(), Some(&Wire::Cmd(0x92)));
        let data = log.iter().filter(|w| matches!(w, Wire::Data(_))).count();
        assert_eq!(data, 9 + 2 * 100 * 16);
    }

    #[test]
    fn test_write_rows_rejects_overflowing_band() {
        let (mut epd, bus) = mock_epd(true, false);
        let rows = DisplayBuffer::new(EPD_WIDTH, 32);
        assert!(matches!(
            epd.write_rows(460, &rows),
            Err(EpdError::Window { .. })
        ));
        assert!(bus.borrow().log.is_empty());
    }

    #[test]
    fn test_power_pin_follows_lifecycle() {
        let (mut epd, bus) = mock_epd(false, true);
        epd.power_on().unwrap();
        epd.hibernate().unwrap();
        epd.power_off().unwrap();
        assert_eq!(bus.borrow().pwr, vec![true, false]);
        let bus = bus.borrow();
        let log = &bus.log;
        assert_eq!(log[log.len() - 2..], [Wire::Cmd(0x07), Wire::Data(0xA5)]);
    }
}
