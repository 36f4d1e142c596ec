//! Structured logging with file-based output.
//!
//! Every layer of the crate logs through `tracing` macros with structured
//! fields. This module installs the subscriber that decides what is kept and
//! where it goes.
//!
//! # Architecture
//!
//! ```text
//! tracing macros → EnvFilter → fmt layer → RotatingFileWriter | stderr
//! ```
//!
//! # Features
//!
//! - **File Output**: Logs written to `<data_dir>/bankflow.log`
//! - **Automatic Rotation**: Files rotate at 10MB with 3-backup retention
//! - **Level Control**: `RUST_LOG` or the `trace_level` config option
//!
//! # Modules
//!
//! - `init`: Subscriber setup
//! - `file_writer`: Rotating file writer with size-based rotation

mod file_writer;
mod init;

pub use file_writer::{LogHandle, RotatingFileWriter, MAX_BACKUP_FILES, MAX_FILE_SIZE_BYTES};
pub use init::{init_tracing, LogTarget, LOG_FILE_NAME};
