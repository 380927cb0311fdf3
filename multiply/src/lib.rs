//! Duplicates selected objects of a scene and arranges the copies on the build plate.
//!
//! The heavy lifting is done by the [`plater`] arrangement engine, this crate wires it into a scene graph:
//! it derives footprints, clones objects, and records every mutation as a reversible command.

use std::sync::LazyLock;
use std::time::Instant;

/// Reversible scene mutations and the undo/redo history
pub mod command;

/// Configuration of the multiply application
pub mod config;

/// Derivation of 2D footprints from scene nodes
pub mod extract;

/// Reading and writing scenes, results, logs and SVG exports
pub mod io;

/// Background polling of removable devices
pub mod monitor;

/// Presentation of progress and status messages
pub mod notify;

/// Orchestration of a multiply-and-place request
pub mod placement;

/// The scene graph owning all objects
pub mod scene;

mod error;

#[doc(inline)]
pub use error::MultiplyError;
#[doc(inline)]
pub use error::SceneError;

pub static EPOCH: LazyLock<Instant> = LazyLock::new(Instant::now);
