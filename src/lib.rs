//! # pulse-gen - runtime-controllable synthetic event generator
//!
//! A background thread emits timestamped pseudo-events at an adjustable
//! cadence while an operator console changes the cadence, pause state and
//! verbosity without stopping it.
//!
//! ```text
//! ┌──────────────────┐   faster/slower/pause/level   ┌──────────────────┐
//! │  CommandConsole  │ ────────────────────────────► │  ControlHandle   │
//! │  (main thread)   │                               │ Arc<Mutex<State>>│
//! └──────────────────┘                               └────────┬─────────┘
//!                                                             │ snapshot per tick
//!                                                    ┌────────▼─────────┐
//!                                                    │  EventGenerator  │
//!                                                    │ (pulse-generator)│
//!                                                    └────────┬─────────┘
//!                                                             │ Event
//!                                                    ┌────────▼─────────┐
//!                                                    │  VerbosityTier   │──► sink
//!                                                    └──────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pulse_gen::{CommandConsole, EventGenerator, GeneratorConfig, TIER_LABELS};
//!
//! let config = GeneratorConfig::default();
//! let generator = EventGenerator::new(&config, std::io::stdout()).unwrap();
//! let control = generator.control();
//! let task = generator.spawn().unwrap();
//!
//! let console = CommandConsole::new(control, TIER_LABELS[1]);
//! console.run(std::io::stdin().lock(), &mut std::io::stdout()).unwrap();
//! task.shutdown().unwrap();
//! ```

pub mod config;
pub mod console;
pub mod control;
pub mod error;
pub mod event;
pub mod generator;
pub mod tier;

pub use config::{ExitMode, GeneratorConfig, OutputFormat};
pub use console::{
    CommandConsole, CommandTable, ConsoleContext, ConsoleExit, Flow, Handler, count_lines,
};
pub use control::{ControlHandle, ControlState, FASTER_STEP, SLOWER_STEP};
pub use error::GeneratorError;
pub use event::Event;
pub use generator::{EventGenerator, GeneratorTask, Tick};
pub use tier::{TIER_LABELS, TierKind, TierSet, VerbosityTier};
