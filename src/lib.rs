//! Nectar: a terminal front end for a document-summarization backend.
//!
//! The backend does all the language work (extraction, summarization,
//! translation, analysis). This crate is the client side: a typed API
//! client, the session state and view model a browser page would hold,
//! the coordinators that connect user actions to endpoints, and the
//! renderers, CLI and shell that present the results.
pub mod activity;
pub mod api;
pub mod app;
pub mod cli;
pub mod clipboard;
pub mod config;
pub mod format;
pub mod page;
pub mod prefs;
pub mod shell;
pub mod state;
pub mod view;
