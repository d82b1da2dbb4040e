//! # Commands
//!
//! One module per user-facing operation. Each `run` takes the store, does the
//! work and returns a [`CmdResult`]: data for the caller plus human-readable
//! messages. Nothing here prints or exits; that is the CLI's job.

use crate::config::StoreConfig;
use crate::model::{LookupSource, MockEntry, RootStatus};
use std::path::PathBuf;

pub mod config;
pub mod get;
pub mod list;
pub mod paths;
pub mod put;
pub mod search;
pub mod status;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub payload: Option<Vec<u8>>,
    pub source: Option<LookupSource>,
    pub paths: Vec<PathBuf>,
    pub entries: Vec<MockEntry>,
    pub status: Option<RootStatus>,
    pub config: Option<StoreConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_payload(mut self, payload: Vec<u8>, source: LookupSource) -> Self {
        self.payload = Some(payload);
        self.source = Some(source);
        self
    }

    pub fn with_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.paths = paths;
        self
    }

    pub fn with_entries(mut self, entries: Vec<MockEntry>) -> Self {
        self.entries = entries;
        self
    }

    pub fn with_status(mut self, status: RootStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_config(mut self, config: StoreConfig) -> Self {
        self.config = Some(config);
        self
    }
}
