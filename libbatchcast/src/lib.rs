//! Batchcast - bulk scheduling for social media drafts
//!
//! This library holds the draft store, validation rules, CSV/JSON import,
//! recurring time slots and the content library shared by the Batchcast
//! command-line tools.

pub mod config;
pub mod error;
pub mod logging;
pub mod scheduling;
pub mod service;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use error::{BatchcastError, ConfigError, ImportError, Result};
pub use service::import::ImportReport;
pub use service::BatchService;
pub use types::{
    ContentLibraryItem, DraftPost, MediaAttachment, MediaKind, Platform, PostPatch, PostStatus,
    RawRow, TimeSlot,
};
