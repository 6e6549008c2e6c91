//! Configuration loading

pub mod catalog;

pub use catalog::{RepoCatalog, RepoEntry};
