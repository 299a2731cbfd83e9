//! Shared helpers for the records integration suites.
//!
//! Each file under `tests/` compiles as its own crate and pulls these in with
//! `mod support;`, so not every helper is used by every suite.
#![allow(dead_code)]

pub mod cluster_skip;
pub mod workbooks;
