//! exedit-core: exercise model, store, editing and grading.
//!
//! This crate holds everything the exedit front ends share: the exercise
//! data model and its JSON wire format, the in-memory store, filtered and
//! sorted views, the form editor, the grader with its preview session, and
//! JSON import/export.

pub mod config;
pub mod editor;
pub mod error;
pub mod export;
pub mod grader;
pub mod import;
pub mod markup;
pub mod model;
pub mod notify;
pub mod stats;
pub mod store;
pub mod traits;
pub mod view;
pub mod workspace;
