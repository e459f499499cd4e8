//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Bind listener → Serve
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain in-flight requests → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - The platform stops apps with SIGTERM, so it is handled like Ctrl+C
//! - Every fixture binary shares the same serve/shutdown path

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
