//! # Interactive Transform
//!
//! Everything between a pointer on the scaled preview and a document edit.
//!
//! - [`mapper`]: doc ↔ preview coordinates
//! - [`handles`]: resize handle geometry and cursor affordances
//! - [`controller`]: selection, hit-testing and the drag state machine

pub mod controller;
pub mod handles;
pub mod mapper;

use std::collections::BTreeSet;

pub use controller::{ControllerState, DragMode, Press, TransformController, TransformSession};
pub use handles::{Cursor, HANDLE_SIZE, Handle};
pub use mapper::CoordinateMapper;

/// Selected element keys.
pub type Selection = BTreeSet<String>;
