//! Core runtime logic for mediascope.
//!
//! This module contains the non-UI "engine" pieces used by the application:
//! - [format]: unit-aware formatting of raw property values.
//! - [stream]: stream kinds and the records exchanged with the backend.
//! - [property]: per-kind property definitions for the summary views.
//! - [backend]: the [MediaBackend] interface and its error type.
//! - [mediainfo]: the `mediainfo` command line backend.
//! - [scan]: directory expansion into media file lists.
//! - [worker]: the backend thread and its message protocol.
//! - [terminal]: terminal setup/teardown and the main crossterm/ratatui event loop.

pub mod backend;
pub mod format;
pub mod mediainfo;
pub mod property;
pub mod scan;
pub mod stream;
pub mod terminal;
pub mod worker;

pub use backend::{BackendError, MediaBackend};
pub use stream::{
    About, Parameter, PropertyMap, PropertyRequest, StreamCounts, StreamKind, StreamProperties,
};
pub use worker::{PropertyScope, ScopeKind, WorkerResponse, WorkerTask, Workers};
