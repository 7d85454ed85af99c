//! Data and computation core of a desktop gradebook: classes, students,
//! weighted assignments and grades in a local SQLite workspace.
//!
//! The desktop UI drives it through the line-delimited JSON protocol in [`ipc`];
//! [`store`] is the persistence gateway and [`calc`] the averaging rules.

pub mod calc;
pub mod config;
pub mod db;
pub mod error;
pub mod ipc;
pub mod logging;
pub mod model;
pub mod store;
pub mod validate;

pub use error::{ErrorKind, GradebookError, Result};
