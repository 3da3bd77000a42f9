// Copyright 2026 the Atlas Text Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! This crate contains the integration test suite for `atlas_text`.
//!
//! - The `util` module contains helpers shared by different test modules, most importantly
//!   a constructor for fonts backed by the in-memory collaborators of `atlas_text::testing`.
//! - We do not use the default Rust test harness, but instead use this `mod.rs` file as the
//!   entry point to run all other tests, so that the helpers are easy to share.
//! - For test naming, put the "topic" of the test at the start of the name, for example
//!   `wrap_is_idempotent` rather than `idempotent_wrap`.

#![allow(missing_docs, reason = "we don't need docs for testing")]
#![allow(clippy::cast_possible_truncation, reason = "not critical for testing")]

mod util;
