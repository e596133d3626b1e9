//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! store + routing produce:
//!     → tracing events (navigate, subscribe, dispatch pass, notifications)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → logging.rs subscriber (stderr)
//!     → whatever metrics recorder the host installs
//! ```
//!
//! # Design Decisions
//! - Library code only emits; installing subscribers/recorders is the
//!   binary's job
//! - Per-notification events are `trace` level to keep passes cheap

pub mod logging;
pub mod metrics;
