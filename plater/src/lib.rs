#![doc = document_features::document_features!()]
//! Centre-first arrangement of 2D footprints on a bounded work area.
//!
//! All overlap and containment tests are carried out in a scaled integer space,
//! floating point coordinates only appear at the boundaries of the library.

/// Centre-first arrangement of new footprints between fixed obstacles
pub mod arrange;

/// Everything related to the scaled-integer Collision Detection Engine
pub mod collision_detection;

/// Entities to model an arrangement problem: footprints, work areas and their results
pub mod entities;

/// Geometric primitives and base algorithms
pub mod geometry;

/// Helper functions which do not belong to any specific module
pub mod util;

mod error;

#[doc(inline)]
pub use error::ArrangeError;
