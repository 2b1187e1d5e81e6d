//! `coursetrack` - Per-section completion and notes for static course pages
//!
//! A course page is a list of sections, each with a completion flag and an
//! optional free-text note. This library keeps that state in a string
//! key-value store namespaced by page path, restores it when the page
//! loads, and moves it between machines as a JSON backup. It never touches
//! a rendered page: operations return [`UiUpdate`] instructions that the
//! host applies.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod backup;
pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod format;
pub mod keys;
pub mod logging;
pub mod manager;
pub mod nav;
pub mod page;
pub mod section;
pub mod storage;
pub mod ui;

pub use backup::{Backup, ImportReport};
pub use config::Config;
pub use error::{Error, Result};
pub use events::{Payload, Trigger};
pub use format::Emphasis;
pub use keys::PageContext;
pub use logging::init_logging;
pub use manager::SectionStateManager;
pub use page::{Page, PageLayout};
pub use section::{Section, SectionStatus};
pub use storage::{KeyValueStore, MemoryStore, SqliteStore, StorageStats};
pub use ui::{Prompt, Role, UiUpdate};
