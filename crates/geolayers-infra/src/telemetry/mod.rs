//! Tracing initialization
//!
//! Logs go to stdout through `tracing-subscriber`, filtered by `RUST_LOG`.

mod init_basic;

pub use init_basic::{init_telemetry, LogFormat};
