mod engine;
mod pointer;
mod section;
mod text;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

pub use engine::{
    AnchoredLayout, GeometryEngine, GeometryWarning, Hit, PlacedSection, PresentationMode,
    SheetFrames, SizeClass,
};
pub use pointer::{PointerGeometry, clamp_cross_axis};
pub use section::{SectionLayout, layout_section};
pub use text::{EstimatedTextMetrics, TextMeasure, TextRole};

use crate::common::error::SheetError;
use crate::sys::geometry::Orientation;

/// Which way the pointer points, and so which side of the sheet carries it.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[derive(strum::Display, strum::EnumString, strum::EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Axis the pointer extends along.
    pub fn orientation(self) -> Orientation {
        match self {
            Direction::Left | Direction::Right => Orientation::Horizontal,
            Direction::Up | Direction::Down => Orientation::Vertical,
        }
    }

    /// A pointer pointing right or down sits after the sheet, so the sheet
    /// lies before the anchor point on that axis.
    pub fn host_precedes_point(self) -> bool { matches!(self, Direction::Right | Direction::Down) }
}

bitflags! {
    /// Host-facing direction mask. Only single-direction masks can anchor a sheet.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ArrowDirections: u32 {
        const UP = 1 << 0;
        const DOWN = 1 << 1;
        const LEFT = 1 << 2;
        const RIGHT = 1 << 3;
        const ANY = Self::UP.bits() | Self::DOWN.bits() | Self::LEFT.bits() | Self::RIGHT.bits();
    }
}

impl From<Direction> for ArrowDirections {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => ArrowDirections::UP,
            Direction::Down => ArrowDirections::DOWN,
            Direction::Left => ArrowDirections::LEFT,
            Direction::Right => ArrowDirections::RIGHT,
        }
    }
}

impl TryFrom<ArrowDirections> for Direction {
    type Error = SheetError;

    fn try_from(mask: ArrowDirections) -> Result<Self, Self::Error> {
        if mask == ArrowDirections::UP {
            Ok(Direction::Up)
        } else if mask == ArrowDirections::DOWN {
            Ok(Direction::Down)
        } else if mask == ArrowDirections::LEFT {
            Ok(Direction::Left)
        } else if mask == ArrowDirections::RIGHT {
            Ok(Direction::Right)
        } else {
            Err(SheetError::InvalidDirection(mask))
        }
    }
}
