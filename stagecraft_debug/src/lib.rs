// Copyright 2026 the Stagecraft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, and Chrome trace export for stagecraft
//! frame diagnostics.
//!
//! This crate consumes the [`FrameStats`](stagecraft_core::director::FrameStats)
//! a [`Director`](stagecraft_core::director::Director) returns each tick:
//!
//! - [`recorder::FrameRecorder`] — keeps a run of frames and summarizes it.
//! - [`pretty::PrettyPrinter`] — human-readable one-line-per-frame output.
//! - [`chrome::export`] — writes Chrome Trace Event Format JSON from
//!   recorded frames.

pub mod chrome;
pub mod pretty;
pub mod recorder;
