//! # Route Modules
//!
//! - [`index`]: banner page at `/`.
//! - [`artifacts`]: GET, HEAD and PUT of artifact paths, with and
//!   without an explicit repository segment.

pub mod artifacts;
pub mod index;
