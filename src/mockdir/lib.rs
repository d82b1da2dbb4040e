//! # Mockdir Architecture
//!
//! Mockdir records service responses ("mocks") on disk and replays them later
//! in place of the real service. It is a **library with a thin CLI client**:
//! test harnesses link the library, humans use the `mockdir` binary.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (main.rs, args.rs)                                     │
//! │  - Parses arguments, prints results, installs logging       │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - One module per operation, returns CmdResult              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - MockStore: put / get with fallback search                │
//! │  - Layout: placement, capacity, overflow shards             │
//! │  - StorageBackend: FsBackend (production), MemBackend (test)│
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Keys and Lookup
//!
//! A mock is addressed by `(service, identity)` and stored as
//! `<root>/<identity>/<service>_<identity><suffix>`. Reading a key that was
//! never recorded falls back to any mock of the same service, so a suite
//! recorded with one test user can replay for another.
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! Below the CLI, code never prints, never exits and never installs a log
//! subscriber. It emits `tracing` events and returns `Result<T, MockError>`.
//!
//! ## Module Overview
//!
//! - [`store`]: Storage abstraction, layout, scan, and the `MockStore` facade
//! - [`commands`]: Business logic for each CLI operation
//! - [`config`]: Configuration loading
//! - [`properties`]: The properties-file reader behind `config`
//! - [`model`]: Keys, entries, lookup results
//! - [`logging`]: Subscriber setup for binaries
//! - [`error`]: Error types

pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod properties;
pub mod store;
