//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! client, session, provider produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (operation and provider request counters)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Structured fields, never interpolated secrets
//! - Metrics are cheap no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
