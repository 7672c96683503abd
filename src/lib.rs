//! # taskpad
//!
//! A small local task manager. Tasks carry a title, a description and an
//! optional number of days until their deadline; they are either pending or
//! completed. Everything is stored as JSON in a local data directory.
//!
//! * [`storage`]: the key-value store and the whole-collection task store
//! * [`views`]: pending, completed and statistics views derived from a collection
//! * [`mutations`]: validated create / edit / complete / delete operations
//! * [`commands`] and [`tui`]: the command line and terminal UI front ends

pub mod commands;
pub mod config;
pub mod error;
pub mod lock;
pub mod models;
pub mod mutations;
pub mod storage;
pub mod tui;
pub mod views;

pub use error::{Error, Result};
pub use models::{Profile, Task};
pub use mutations::TaskDraft;
pub use storage::TaskStore;
