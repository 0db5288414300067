//! Core of Wedge: profiles that each own a small labeled dataset rendered as a
//! pie chart.
//!
//! The crate is split the same way the data flows. [`dataset`] holds the row
//! types and the normalization rules, [`repository`] persists profiles into a
//! key-value store, and [`session`] ties the two together behind the edit
//! operations a front end calls.

use thiserror::Error;

pub mod chart;
pub mod dataset;
pub mod fs;
pub mod repository;
pub mod session;

pub use chart::Slice;
pub use dataset::{Dataset, DatasetRow, RowEdit, RowId, ValueDomain};
pub use repository::{
    Cfg, CoreConfig, Db, KeyValueStore, Profile, ProfileId, ProfileStore, State, StorageKeys,
};
pub use session::{Confirm, Notice, Phase, Removal, Session};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Internal database error {0}")]
    Db(#[from] agdb::DbError),
    #[error("Failed to encode or decode stored data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed configuration file: {0}")]
    Config(#[from] toml::de::Error),
    #[error("Failed to serialize configuration: {0}")]
    ConfigSer(#[from] toml::ser::Error),
    #[error("Could not determine the home directory")]
    NoHome,
    #[error("Path is not valid UTF-8: {0}")]
    NonUtf8Path(std::path::PathBuf),
}
