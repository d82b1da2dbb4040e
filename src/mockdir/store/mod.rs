//! # Storage Layer
//!
//! Everything that decides where mocks live and how they are found.
//!
//! ## Pieces
//!
//! - [`backend::StorageBackend`]: raw tree operations (exists, mkdir, atomic
//!   write, read, list). The only part that knows about a concrete medium.
//!   - [`fs_backend::FsBackend`]: the real filesystem.
//!   - [`mem_backend::MemBackend`]: an in-memory tree for tests, able to
//!     simulate write failures and unreadable directories.
//! - [`layout::Layout`]: directory placement, capacity checks and the
//!   overflow (sharding) policy.
//! - [`scan`]: recursive substring search used for fallback lookups.
//! - [`mock_store::MockStore`]: the `put` / `get` facade tying them together.
//!
//! ## Storage Format
//!
//! ```text
//! <mockFolderPath>/
//! ├── u1/
//! │   └── login_u1.json       # <service>_<identity><fileExtension>
//! └── ~4e/                    # overflow shard, only once the root is full
//!     └── u7/
//!         └── login_u7.json
//! ```
//!
//! Writes go to a hidden `.<uuid>.tmp` sibling first and are renamed into
//! place, so a reader never sees half a mock.

pub mod backend;
pub mod fs_backend;
pub mod layout;
pub mod mem_backend;
pub mod mock_store;
pub mod scan;
