//! A persistent model of a document's layer tree.
//!
//! The editor reports a document's layers as a flat, bottom-to-top list in which a group is a group head followed (in reading order)
//! by its members and closed by a group end sentinel. [`LayerStructure`] keeps that list as the source of truth, derives the tree from it,
//! and answers tree, selection and geometry queries over it. Every edit returns a new snapshot and leaves the old one intact.

// `macro_use` puts the log macros (`error!`, `warn!`, `debug!`, `info!` and `trace!`) in scope for the crate
// #[macro_use]
extern crate log;

pub mod bounds;
pub mod consts;
pub mod descriptor;
pub mod error;
pub mod layer_node;
pub mod layers;
pub mod memo;
pub mod radii;
pub mod structure;

#[cfg(test)]
mod test_utils;

pub use error::{LayerStructureError, Result};
pub use structure::{LayerPosition, LayerSize, LayerStructure, PerLayer, Replace};

/// A number that identifies a layer within its document, as assigned by the editor.
pub type LayerId = u32;

/// A number that identifies an open document.
pub type DocumentId = u32;
