//! Presentation lifecycle of a sheet.
//!
//! A [`Sheet`] owns its sections and drives a host-supplied [`Container`]
//! through show, move and dismiss transitions, reporting to a
//! [`SheetDelegate`]. Geometry comes from the layout engine.

mod container;
mod delegate;
mod sheet;
mod state;
mod transition;

#[cfg(test)]
mod testing;


pub use container::Container;
pub use delegate::{PressResponse, SheetDelegate, SheetRef};
pub use sheet::{AnchorContext, Sheet, SheetId};
pub use state::{Outcome, PresentationState, Rejection};
pub use transition::{Easing, Stage, Transition, TransitionKind, TransitionOptions};
