//! mvnscope - Maven dependency tree analyzer with a terminal UI
//!
//! This crate parses the text printed by `mvn dependency:tree` (including
//! the `-Dverbose` annotations) into a forest of nodes, finds artifacts
//! resolved with several versions, measures how the tree is spread across
//! groupIds and scopes, and presents the result as a report or an
//! interactive tree browser.

pub mod analysis;
pub mod config;
pub mod export;
pub mod parser;
pub mod ui;
