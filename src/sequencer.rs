//! # Page Sequencer
//!
//! Drives one render cycle through the paged refresh protocol:
//!
//! ```text
//! acquire (init, clear) -> full window -> [ panels -> flip page ]* -> release (hibernate, power off)
//! ```
//!
//! The bracketed part repeats while the driver reports pages pending. Panels are
//! stateless, so redrawing the whole frame for every page yields the same
//! pixels each time; the driver keeps only the rows of the current page.
//!
//! A cycle never fails. Whatever the panels or the driver run into, the
//! sequencer reaches release and hands the driver back.

use crate::config::Config;
use crate::driver::DisplayDriver;
use crate::model::{DisplayMode, RenderInputs, WakeEvent, WakeState};
use crate::panels::{self, ErrorKind, PanelContext};
use crate::target::RenderTarget;
use log::{debug, info};

/// Result of a wake cycle.
pub struct WakeOutcome<D> {
    pub driver: D,
    /// State to persist until the next wake-up
    pub state: WakeState,
    /// Whether a weather frame was drawn
    pub rendered: bool,
}

pub struct PageSequencer<'a> {
    config: &'a Config,
}

impl<'a> PageSequencer<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    fn acquire<D: DisplayDriver>(&self, driver: D) -> RenderTarget<D> {
        let display = &self.config.display;
        RenderTarget::acquire(driver, display.margins(), display.width, display.height)
    }

    /// Redraw the frame once per page until none remain, then release.
    fn run_pages<D, F>(&self, mut target: RenderTarget<D>, mut draw: F) -> D
    where
        D: DisplayDriver,
        F: FnMut(&mut RenderTarget<D>),
    {
        target.begin_pass();
        let mut pages = 0u32;
        loop {
            pages += 1;
            debug!("Drawing page {}", pages);
            draw(&mut target);
            if !target.flip_page() {
                break;
            }
        }
        info!("Frame complete after {} page(s)", pages);
        target.release()
    }

    /// Render the weather frame and hand the driver back powered down.
    pub fn render<D: DisplayDriver>(&self, driver: D, inputs: &RenderInputs) -> D {
        let ctx = PanelContext::new(self.config);
        let target = self.acquire(driver);
        self.run_pages(target, |target| {
            panels::current::draw(target, inputs, &ctx);
            panels::outlook::draw(target, inputs, &ctx);
            panels::forecast::draw(target, inputs, &ctx);
            panels::header::draw(target, inputs, &ctx);
            panels::alerts::draw(target, inputs, &ctx);
            panels::status_bar::draw(target, inputs, &ctx);
        })
    }

    /// Render the error screen instead of the weather frame.
    pub fn render_error<D: DisplayDriver>(
        &self,
        driver: D,
        kind: ErrorKind,
        message: &str,
        detail: Option<&str>,
    ) -> D {
        info!("Rendering error screen: {:?} {:?}", kind, message);
        let ctx = PanelContext::new(self.config);
        let target = self.acquire(driver);
        self.run_pages(target, |target| {
            panels::error_screen::draw(target, kind, message, detail, &ctx);
        })
    }

    /// Entry point for one wake-up: apply the event, render if the mode shows weather.
    ///
    /// Image modes are drawn by another collaborator; the driver is returned
    /// untouched and `rendered` is false.
    pub fn wake_cycle<D: DisplayDriver>(
        &self,
        driver: D,
        state: WakeState,
        event: WakeEvent,
        inputs: &RenderInputs,
    ) -> WakeOutcome<D> {
        let state = state.advance(event, inputs.now);
        debug!("Woke on {:?}, mode now {:?}", event, state.mode);
        if state.mode != DisplayMode::Weather {
            info!("Display mode {:?} has no weather frame", state.mode);
            return WakeOutcome {
                driver,
                state,
                rendered: false,
            };
        }
        WakeOutcome {
            driver: self.render(driver, inputs),
            state,
            rendered: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{MemoryPanel, PagedCanvas};
    use crate::panels::fixtures;
    use crate::testing::{Call, RecordingDriver};

    #[test]
    fn test_panels_redrawn_for_every_pending_page() {
        let config = Config::default();
        let inputs = fixtures::inputs(12);
        let driver = PageSequencer::new(&config)
            .render(RecordingDriver::with_pages(&[true, true, false]), &inputs);

        assert_eq!(driver.count(&Call::NextPage), 3);
        assert_eq!(driver.count(&Call::PowerOff), 1);
        assert_eq!(driver.count(&Call::Hibernate), 1);
        // the city is drawn once per pass by the header panel
        let city = driver
            .texts()
            .iter()
            .filter(|t| **t == config.location.city)
            .count();
        assert_eq!(city, 3);
        assert_eq!(driver.calls.first(), Some(&Call::Init));
        assert_eq!(driver.calls.last(), Some(&Call::PowerOff));
    }

    #[test]
    fn test_panel_order_within_a_pass() {
        let config = Config::default();
        let inputs = fixtures::inputs(12);
        let driver = PageSequencer::new(&config).render(RecordingDriver::new(), &inputs);
        let texts = driver.texts();

        let feels_like = texts.iter().position(|t| t.starts_with("Feels Like"));
        let city = texts.iter().position(|t| *t == config.location.city);
        let refreshed = texts.iter().position(|t| *t == inputs.device.refreshed);
        assert!(feels_like.is_some() && city.is_some() && refreshed.is_some());
        assert!(feels_like < city);
        assert!(city < refreshed);
    }

    #[test]
    fn test_every_page_identical_on_paged_canvas() {
        let config = Config::default();
        let inputs = fixtures::inputs(12);
        let sequencer = PageSequencer::new(&config);

        let canvas = |page_height| PagedCanvas::new(MemoryPanel::new(800, 480), page_height, true);

        let single = sequencer.render(canvas(480), &inputs);
        let paged = sequencer.render(canvas(96), &inputs);
        assert_eq!(paged.page_count(), 5);
        let (single, paged) = (single.into_panel(), paged.into_panel());
        assert_eq!(single.frame().black_buffer(), paged.frame().black_buffer());
        assert_eq!(single.refreshes(), 1);
        assert_eq!(paged.refreshes(), 1);
        assert!(!paged.is_powered());
    }

    #[test]
    fn test_error_screen_cycle() {
        let config = Config::default();
        let driver = PageSequencer::new(&config).render_error(
            RecordingDriver::new(),
            ErrorKind::Wifi,
            "WiFi Connection",
            Some("Failed"),
        );
        assert_eq!(driver.texts(), vec!["WiFi Connection", "Failed"]);
        assert_eq!(driver.count(&Call::PowerOff), 1);
    }

    #[test]
    fn test_wake_cycle_modes() {
        let config = Config::default();
        let inputs = fixtures::inputs(12);
        let sequencer = PageSequencer::new(&config);

        let outcome = sequencer.wake_cycle(
            RecordingDriver::new(),
            WakeState::default(),
            WakeEvent::Timer,
            &inputs,
        );
        assert!(outcome.rendered);
        assert_eq!(outcome.driver.count(&Call::PowerOff), 1);

        let outcome = sequencer.wake_cycle(
            RecordingDriver::new(),
            outcome.state,
            WakeEvent::DoubleTap,
            &inputs,
        );
        assert!(!outcome.rendered);
        assert_eq!(outcome.state.mode, DisplayMode::Cartoon);
        assert_eq!(outcome.state.last_interaction, Some(inputs.now));
        assert!(outcome.driver.calls.is_empty());

        let outcome = sequencer.wake_cycle(
            RecordingDriver::new(),
            outcome.state,
            WakeEvent::PowerOn,
            &inputs,
        );
        assert!(outcome.rendered);
        assert_eq!(outcome.state, WakeState::default());
    }
}
