//! A multi-section, multi-select option sheet.
//!
//! The crate is headless: [`layout_engine`] computes every frame a host needs
//! to draw a sheet, fitted to a container or anchored to a point with a
//! pointer, and [`presentation`] runs the show/move/dismiss lifecycle against
//! a host-implemented [`presentation::Container`].

pub mod common;
pub mod layout_engine;
pub mod model;
pub mod presentation;
pub mod sys;

pub use common::config::Config;
pub use common::error::{Result, SheetError};
pub use layout_engine::{ArrowDirections, Direction, GeometryEngine, SheetFrames, SizeClass};
pub use model::{Row, RowIndex, RowStyle, Section};
pub use presentation::{Container, Outcome, PresentationState, Sheet, SheetDelegate};
