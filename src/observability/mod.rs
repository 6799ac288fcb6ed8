//! Structured logging setup.
//!
//! Every layer logs through `tracing` macros; this module installs the
//! subscriber that turns them into output.
//!
//! ```text
//! tracing macros → EnvFilter → fmt layer → stderr
//! ```
//!
//! # Configuration
//!
//! The filter directive is resolved in order:
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `trace_level` from [`Config`](crate::Config)
//! 3. Default: `"info"`
//!
//! # Usage
//!
//! ```rust
//! use eventdesk::observability::init_tracing;
//! use eventdesk::Config;
//!
//! let config = Config::new("https://api.example.com");
//! init_tracing(&config);
//!
//! tracing::debug!("client initialized");
//! ```
//!
//! # Modules
//!
//! - `init`: Filter resolution and subscriber setup

mod init;

pub use init::{init_tracing, resolve_directive, DEFAULT_DIRECTIVE};
