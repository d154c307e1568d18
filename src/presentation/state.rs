use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::sheet::SheetId;
use super::transition::TransitionKind;
use crate::layout_engine::Hit;
use crate::model::RowIndex;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[derive(strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PresentationState {
    #[default]
    Hidden,
    Presenting,
    Visible,
    AnchoredVisible,
    Dismissing,
}

impl PresentationState {
    /// Settled on screen, fitted or anchored.
    pub fn is_visible(self) -> bool {
        matches!(self, PresentationState::Visible | PresentationState::AnchoredVisible)
    }
}

/// Why an operation was refused. A refused operation changes nothing.
#[derive(Error, Clone, Copy, Debug, PartialEq)]
pub enum Rejection {
    #[error("sheet is {0}, not hidden")]
    NotHidden(PresentationState),

    #[error("sheet is {0}, not anchored")]
    NotAnchored(PresentationState),

    #[error("sheet is {0}, not visible")]
    NotVisible(PresentationState),

    #[error("a {0} transition is still in flight")]
    TransitionInFlight(TransitionKind),

    #[error("no transition is in flight")]
    NothingInFlight,

    #[error("container already presents {0}")]
    ContainerOccupied(SheetId),

    #[error("row {}:{} is disabled", .0.section, .0.row)]
    RowDisabled(RowIndex),

    #[error("container bounds did not change")]
    BoundsUnchanged,

    #[error("nothing to act on at {0:?}")]
    NoTarget(Hit),
}

/// Result of a state machine operation whose preconditions may not hold.
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Outcome {
    Applied,
    Rejected(Rejection),
}

impl Outcome {
    pub fn is_applied(self) -> bool { matches!(self, Outcome::Applied) }

    pub fn rejection(self) -> Option<Rejection> {
        match self {
            Outcome::Applied => None,
            Outcome::Rejected(rejection) => Some(rejection),
        }
    }
}
