//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID assigned and propagated)
//!     → echo.rs (peer address recorded, /echosourceip answered)
//!     → relay.rs (/proxy/{destination})
//!         → destination.rs (strict host:port parsing)
//!         → outbound GET, bounded by the upstream timeout
//!         → error.rs (failures mapped to status codes)
//!     → Send to client
//! ```

pub mod destination;
pub mod echo;
pub mod error;
pub mod relay;
pub mod request;
pub mod server;

pub use destination::{Destination, DestinationError};
pub use echo::RemoteAddr;
pub use error::RelayError;
pub use relay::Relay;
pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
