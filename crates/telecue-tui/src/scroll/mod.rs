//! Auto-scroll engine for the telecue prompter
//!
//! Moves a block of content through a fixed viewport in an endless loop,
//! with eased manual nudges and hold-to-repeat on top.
//!
//! # Architecture
//!
//! ## L4 Atomic Layer
//! - `easing` - Pure easing functions
//! - `timing` - Time calculation utilities (progress, interpolation, velocity)
//! - `metrics` - Layout metrics, wrap rule and progress-preserving translation
//! - `scheduler` - Frame and timer port plus the deterministic `TimerQueue`
//! - `hold` - Hold-repeat states
//!
//! ## L3 Molecular Layer
//! - `animation` - Eased nudge transition combining atoms
//!
//! ## L2 Organism Layer
//! - `engine` - `ScrollEngine`, the single writer of the offset
//!
//! # Usage
//!
//! ```ignore
//! use telecue_tui::scroll::{LayoutMetrics, ScrollEngine, TimerQueue};
//!
//! let mut engine = ScrollEngine::new(config.scroll.clone(), layout, TimerQueue::new());
//! engine.enter_presentation();
//! engine.start();
//!
//! // In the main loop, dispatch due frames and timers
//! engine.pump(started.elapsed());
//! let offset = engine.offset();
//! ```

// L4 Atomic Layer
pub mod easing;
pub mod hold;
pub mod metrics;
pub mod scheduler;
pub mod timing;

// L3 Molecular Layer
pub mod animation;

// L2 Organism Layer
pub mod engine;

// Re-exports for convenient access
pub use animation::{NudgeAnimation, NudgeSample};
pub use engine::{Activity, EngineEvent, ScrollEngine};
pub use hold::{HoldPhase, NudgeDirection};
pub use metrics::{LayoutMetrics, LayoutProvider};
pub use scheduler::{Scheduler, TaskId, TimerQueue, Wakeup};
