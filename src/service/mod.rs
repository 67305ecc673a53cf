// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer containing the load and store pipeline.
//!
//! This module contains [`Ini`], which ties a profile to its settings and
//! file binding, the [`Source`] and [`Sink`] descriptors it accepts, and the
//! byte-order-mark detection that runs in front of byte streams.

pub mod ini;
pub mod sniffer;
pub mod source;

// Re-export commonly used types
pub use ini::Ini;
pub use sniffer::{DetectionResult, Lookahead};
pub use source::{ByteStream, Sink, Source};
