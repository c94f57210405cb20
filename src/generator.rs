//! Event generator
//!
//! Produces one [`Event`] per tick on a dedicated thread and renders it
//! through the tier selected by the current verbosity level.
//!
//! ```text
//!   console ──► ControlHandle ◄── tick: snapshot ─► event ─► tier ─► sink
//!                                   │
//!                                   └─ wait(interval) on shutdown channel
//! ```
//!
//! Each tick snapshots the control state once and uses that snapshot for both
//! the render decision and the wait that follows it. Pausing suppresses the
//! event but never shortens the wait.

use crate::config::{GeneratorConfig, OutputFormat, validate_range};
use crate::control::{ControlHandle, ControlState};
use crate::error::GeneratorError;
use crate::event::Event;
use crate::tier::{TierKind, TierSet};
use chrono::Local;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, bounded};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::Write;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Outcome of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// `None` while paused
    pub event: Option<Event>,
    /// Tier that rendered the event, `None` when paused or level out of range
    pub tier: Option<TierKind>,
    /// How long the loop waits before the next tick
    pub wait: Duration,
}

pub struct EventGenerator<W> {
    control: ControlHandle,
    rng: StdRng,
    tiers: TierSet,
    format: OutputFormat,
    sink: W,
}

impl<W: Write> EventGenerator<W> {
    /// Seeds from `config.seed`, or from OS entropy when unset.
    pub fn new(config: &GeneratorConfig, sink: W) -> Result<Self, GeneratorError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(config, rng, sink)
    }

    pub fn with_rng(
        config: &GeneratorConfig,
        rng: StdRng,
        sink: W,
    ) -> Result<Self, GeneratorError> {
        config.validate()?;

        let initial = Duration::from_millis(config.min_interval_ms);
        let mut generator = Self {
            control: ControlHandle::new(ControlState::new(initial, config.verbosity_level)),
            rng,
            tiers: TierSet::new(),
            format: config.format,
            sink,
        };
        generator.set_interval(config.min_interval_ms, config.max_interval_ms)?;
        Ok(generator)
    }

    /// Handle for mutating the control state from another thread.
    pub fn control(&self) -> ControlHandle {
        self.control.clone()
    }

    /// Pick an interval in `[min_ms, max_ms]` as `draw mod (max - min + 1) + min`.
    pub fn set_interval(&mut self, min_ms: u64, max_ms: u64) -> Result<Duration, GeneratorError> {
        validate_range(min_ms, max_ms)?;

        let span = max_ms - min_ms + 1;
        let draw = u64::from(self.rng.random::<u32>());
        let interval = Duration::from_millis(draw % span + min_ms);

        self.control.set_interval(interval);
        Ok(interval)
    }

    pub fn faster(&self) -> Option<Duration> {
        self.control.faster()
    }

    pub fn slower(&self) -> Duration {
        self.control.slower()
    }

    pub fn pause(&self) {
        self.control.pause()
    }

    pub fn resume(&self) {
        self.control.resume()
    }

    pub fn set_verbosity_level(&self, level: i32) {
        self.control.set_verbosity_level(level)
    }

    /// Run one iteration without waiting.
    pub fn tick(&mut self) -> Tick {
        let state = self.control.snapshot();

        if state.paused {
            debug!("Paused, no event this tick");
            return Tick {
                event: None,
                tier: None,
                wait: state.interval,
            };
        }

        let event = Event::generate(&mut self.rng, Local::now());
        let tier = self.tiers.select(state.verbosity_level);

        if let Some(tier) = tier {
            if let Err(e) = tier.render(&event, self.format, &mut self.sink) {
                warn!(error = %e, tier = tier.label(), "Failed to render event");
            }
        }

        debug!(
            event_id = event.event_id,
            verbosity_level = state.verbosity_level,
            rendered = tier.is_some(),
            "Tick"
        );

        Tick {
            event: Some(event),
            tier: tier.map(|t| t.kind()),
            wait: state.interval,
        }
    }

    /// Tick until `shutdown` receives a message or is disconnected. Returns
    /// the sink once the loop has stopped.
    pub fn run(mut self, shutdown: &Receiver<()>) -> W {
        info!(
            interval_ms = self.control.snapshot().interval.as_millis() as u64,
            "Generator started"
        );

        loop {
            let tick = self.tick();
            match shutdown.recv_timeout(tick.wait) {
                Err(RecvTimeoutError::Timeout) => continue,
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        info!("Generator stopped");
        self.sink
    }
}

impl<W: Write + Send + 'static> EventGenerator<W> {
    /// Move the loop onto its own thread.
    pub fn spawn(self) -> Result<GeneratorTask<W>, GeneratorError> {
        let (shutdown_tx, shutdown_rx) = bounded::<()>(1);

        let handle = thread::Builder::new()
            .name("pulse-generator".into())
            .spawn(move || self.run(&shutdown_rx))
            .map_err(GeneratorError::Spawn)?;

        Ok(GeneratorTask {
            shutdown_tx,
            handle,
        })
    }
}

/// A running generator loop.
pub struct GeneratorTask<W> {
    shutdown_tx: Sender<()>,
    handle: JoinHandle<W>,
}

impl<W> GeneratorTask<W> {
    /// Interrupt the current wait, stop the loop and join its thread.
    pub fn shutdown(self) -> Result<W, GeneratorError> {
        let GeneratorTask {
            shutdown_tx,
            handle,
        } = self;

        // A full channel means a stop is already pending.
        let _ = shutdown_tx.try_send(());
        drop(shutdown_tx);

        handle.join().map_err(|_| GeneratorError::Panicked)
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
