//! Constellation: a fixed set of drifting points, joined by lines when they come
//! close, that slides with drags and scatters on release.
//!
//! The animation core ([`field::AnimatedPointField`]) is host-agnostic: it paints
//! through [`draw::DrawSink`] and takes [`gesture::PointerEvent`]s. The binary wires
//! it to a `minifb` window.

pub mod config;
pub mod draw;
pub mod error;
pub mod field;
pub mod gesture;
pub mod snapshot;
pub mod types;
