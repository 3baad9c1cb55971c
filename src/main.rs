//! # E-Paper Weather Application Entry Point
//!
//! Runs one wake cycle: load configuration, input records and the persisted
//! wake state, render the frame through the page sequencer, then either drive
//! the panel (production mode, `hardware` feature) or dump a preview of the
//! frame (development mode: `--stdout` ASCII or `--pbm` image).
//!
//! Input records are the JSON hand-off of the data-fetch collaborator. Without
//! `--input` a synthetic data set is rendered instead.


#[cfg(feature = "hardware")]
mod gpio_cdev;
#[cfg(feature = "hardware")]
mod hw_spi_spidev;

use anyhow::Context;
use chrono::{Local, NaiveDateTime};
use clap::{Parser, ValueEnum};
use log::{error, info, warn};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use weather_epd_lib::canvas::{MemoryPanel, PagedCanvas};
use weather_epd_lib::config::{AccentColor, Config, CONFIG_FILE};
use weather_epd_lib::driver::DisplayDriver;
use weather_epd_lib::model::{InputRecords, WakeEvent, WakeState};
use weather_epd_lib::panels::ErrorKind;
use weather_epd_lib::{fallback, preview, PageSequencer, RenderInputs};

/// Render the weather frame for a 7.5" e-paper panel.
#[derive(Parser, Debug)]
#[command(name = "epaper-weather", version, about)]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Input records as JSON; synthetic data when omitted
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Local time for synthetic data, e.g. 2024-03-14T12:00:00
    #[arg(long, value_parser = parse_local_time)]
    now: Option<NaiveDateTime>,

    /// Print an ASCII preview of the frame
    #[arg(long)]
    stdout: bool,

    /// Characters per line of the ASCII preview
    #[arg(long, default_value_t = 100)]
    columns: u32,

    /// Write the frame as a PBM image
    #[arg(long)]
    pbm: Option<PathBuf>,

    /// Show an error screen instead of the weather
    #[arg(long, value_enum)]
    error: Option<ErrorArg>,

    /// Error screen message, defaults to a text for the error kind
    #[arg(long, requires = "error")]
    message: Option<String>,

    /// Second error screen line
    #[arg(long, requires = "error")]
    detail: Option<String>,

    /// Wake state file, read before and written after the cycle
    #[arg(long)]
    state: Option<PathBuf>,

    /// What woke the device
    #[arg(long, value_enum, default_value_t = WakeArg::Timer)]
    wake: WakeArg,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ErrorArg {
    LowBattery,
    Wifi,
    TimeSync,
    Api,
}

impl From<ErrorArg> for ErrorKind {
    fn from(arg: ErrorArg) -> Self {
        match arg {
            ErrorArg::LowBattery => ErrorKind::LowBattery,
            ErrorArg::Wifi => ErrorKind::Wifi,
            ErrorArg::TimeSync => ErrorKind::TimeSync,
            ErrorArg::Api => ErrorKind::Api,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum WakeArg {
    Timer,
    Single,
    Double,
    PowerOn,
}

impl From<WakeArg> for WakeEvent {
    fn from(arg: WakeArg) -> Self {
        match arg {
            WakeArg::Timer => WakeEvent::Timer,
            WakeArg::Single => WakeEvent::SingleTap,
            WakeArg::Double => WakeEvent::DoubleTap,
            WakeArg::PowerOn => WakeEvent::PowerOn,
        }
    }
}

fn parse_local_time(value: &str) -> Result<NaiveDateTime, String> {
    value
        .parse::<NaiveDateTime>()
        .map_err(|e| format!("expected YYYY-MM-DDTHH:MM:SS ({})", e))
}

/// What this cycle puts on the panel.
enum Job {
    Weather(Box<RenderInputs>),
    Error {
        kind: ErrorKind,
        message: String,
        detail: Option<String>,
    },
}

impl Job {
    fn error(kind: ErrorKind, detail: Option<String>) -> Self {
        Job::Error {
            kind,
            message: kind.default_message().to_string(),
            detail,
        }
    }
}

/// Read input records from `path`, or synthesise them for `now`.
fn load_inputs(
    path: Option<&Path>,
    now: NaiveDateTime,
    hourly_samples: usize,
) -> anyhow::Result<RenderInputs> {
    let records = match path {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str::<InputRecords>(&contents)
                .with_context(|| format!("failed to parse {}", path.display()))?
        }
        None => {
            info!("No input file given, rendering synthetic data for {}", now);
            fallback::records(now, hourly_samples)?
        }
    };
    Ok(RenderInputs::from_records(records, hourly_samples)?)
}

/// Persisted wake state; a missing or unreadable file starts from the default.
fn load_state(path: Option<&Path>) -> WakeState {
    let Some(path) = path else {
        return WakeState::default();
    };
    match fs::read_to_string(path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
            warn!("Invalid wake state in {}: {}", path.display(), e);
            WakeState::default()
        }),
        Err(_) => {
            info!("No wake state at {}, starting fresh", path.display());
            WakeState::default()
        }
    }
}

fn save_state(path: &Path, state: &WakeState) -> anyhow::Result<()> {
    let contents = serde_json::to_string_pretty(state)?;
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

/// Decide what to draw. A load failure is returned next to the error screen
/// job so the caller can report it after the panel has been updated.
fn plan(cli: &Cli, config: &Config, now: NaiveDateTime) -> (Job, Option<anyhow::Error>) {
    if let Some(kind) = cli.error {
        let kind = ErrorKind::from(kind);
        let job = Job::Error {
            kind,
            message: cli
                .message
                .clone()
                .unwrap_or_else(|| kind.default_message().to_string()),
            detail: cli.detail.clone(),
        };
        return (job, None);
    }

    match load_inputs(cli.input.as_deref(), now, config.chart.hourly_samples) {
        Ok(inputs) if inputs.device.battery_mv < config.battery.min_mv => {
            warn!(
                "Battery at {} mV is below {} mV",
                inputs.device.battery_mv, config.battery.min_mv
            );
            (Job::error(ErrorKind::LowBattery, None), None)
        }
        Ok(inputs) => (Job::Weather(Box::new(inputs)), None),
        Err(e) => {
            error!("Could not load input records: {:#}", e);
            let detail = cli
                .input
                .as_deref()
                .and_then(Path::file_name)
                .map(|name| name.to_string_lossy().into_owned());
            (Job::error(ErrorKind::Api, detail), Some(e))
        }
    }
}

/// Run one cycle against any driver.
fn run_cycle<D: DisplayDriver>(
    config: &Config,
    driver: D,
    job: &Job,
    state: WakeState,
    event: WakeEvent,
) -> (D, WakeState) {
    let sequencer = PageSequencer::new(config);
    match job {
        Job::Weather(inputs) => {
            let outcome = sequencer.wake_cycle(driver, state, event, inputs);
            if !outcome.rendered {
                info!("Panel left as is for {:?} mode", outcome.state.mode);
            }
            (outcome.driver, outcome.state)
        }
        Job::Error {
            kind,
            message,
            detail,
        } => (
            sequencer.render_error(driver, *kind, message, detail.as_deref()),
            state,
        ),
    }
}

/// Render into memory and return the composed frame.
fn render_preview(
    config: &Config,
    job: &Job,
    state: WakeState,
    event: WakeEvent,
) -> (MemoryPanel, WakeState) {
    let display = &config.display;
    let canvas = PagedCanvas::new(
        MemoryPanel::new(display.width, display.height),
        display.effective_page_height(),
        display.accent == AccentColor::Red,
    );
    let (canvas, state) = run_cycle(config, canvas, job, state, event);
    (canvas.into_panel(), state)
}

fn emit_preview(cli: &Cli, panel: &MemoryPanel, ascii: bool) -> anyhow::Result<()> {
    if ascii {
        print!("{}", preview::ascii(panel.frame(), cli.columns));
    }
    if let Some(path) = &cli.pbm {
        let file = fs::File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        let mut out = BufWriter::new(file);
        preview::write_pbm(panel.frame(), &mut out)?;
        out.flush()?;
        info!("Frame written to {}", path.display());
    }
    Ok(())
}

#[cfg(feature = "hardware")]
fn display(
    cli: &Cli,
    config: &Config,
    job: &Job,
    state: WakeState,
    event: WakeEvent,
) -> anyhow::Result<WakeState> {
    use crate::gpio_cdev::{CdevInputPin, CdevOutputPin};
    use crate::hw_spi_spidev::SpidevHwSpi;
    use linux_embedded_hal::gpio_cdev::Chip;
    use weather_epd_lib::epd7in5::{Epd7in5, EpdPins};

    if cli.stdout || cli.pbm.is_some() {
        let (panel, state) = render_preview(config, job, state, event);
        emit_preview(cli, &panel, cli.stdout)?;
        return Ok(state);
    }

    let hw = &config.hardware;
    info!(
        "Opening panel on {} (DC {}, RST {}, BUSY {})",
        hw.spi_device, hw.dc_pin, hw.rst_pin, hw.busy_pin
    );
    let mut chip =
        Chip::new(&hw.gpio_chip).with_context(|| format!("failed to open {}", hw.gpio_chip))?;
    let pins = EpdPins {
        // Chip select belongs to the kernel SPI driver
        cs: None::<CdevOutputPin>,
        dc: CdevOutputPin::new(&mut chip, hw.dc_pin)?,
        rst: CdevOutputPin::new(&mut chip, hw.rst_pin)?,
        busy: CdevInputPin::new(&mut chip, hw.busy_pin)?,
        pwr: hw
            .pwr_pin
            .map(|pin| CdevOutputPin::new(&mut chip, pin))
            .transpose()?,
    };
    let spi = SpidevHwSpi::open(&hw.spi_device)?;

    let accent = config.display.accent == AccentColor::Red;
    let canvas = PagedCanvas::new(
        Epd7in5::new(spi, pins, accent),
        config.display.effective_page_height(),
        accent,
    );
    let (canvas, state) = run_cycle(config, canvas, job, state, event);
    if canvas.has_fault() {
        anyhow::bail!("panel fault during refresh, see log for details");
    }
    Ok(state)
}

#[cfg(not(feature = "hardware"))]
fn display(
    cli: &Cli,
    config: &Config,
    job: &Job,
    state: WakeState,
    event: WakeEvent,
) -> anyhow::Result<WakeState> {
    let ascii = cli.stdout || cli.pbm.is_none();
    if !cli.stdout && cli.pbm.is_none() {
        warn!("Built without the hardware feature, showing an ASCII preview instead");
    }
    let (panel, state) = render_preview(config, job, state, event);
    emit_preview(cli, &panel, ascii)?;
    Ok(state)
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = Config::load_from_path(&cli.config);
    let now = cli.now.unwrap_or_else(|| Local::now().naive_local());
    let state = load_state(cli.state.as_deref());

    let (job, failure) = plan(cli, &config, now);
    let state = display(cli, &config, &job, state, cli.wake.into())?;

    if let Some(path) = &cli.state {
        save_state(path, &state)?;
    }
    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    run(&cli)
}
