use thiserror::Error;

use crate::layout_engine::ArrowDirections;
use crate::model::RowStyle;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SheetError {
    #[error("a sheet needs at least one section")]
    NoSections,

    #[error("a section needs at least one option row")]
    NoOptions,

    #[error("option rows cannot use the {0} style")]
    InvalidOptionStyle(RowStyle),

    #[error("section index {index} out of range ({len} sections)")]
    SectionOutOfRange { index: usize, len: usize },

    #[error("row index {index} out of range ({len} rows)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("cannot change row {index} from {from} to {to}")]
    InvalidStyleChange {
        index: usize,
        from: RowStyle,
        to: RowStyle,
    },

    #[error("enablement of the confirm row follows the selection and cannot be set")]
    DerivedEnablement,

    /// Raised synchronously for anything but a single arrow direction.
    #[error("invalid arrow direction {0:?}, expected exactly one of up, down, left or right")]
    InvalidDirection(ArrowDirections),
}

pub type Result<T, E = SheetError> = std::result::Result<T, E>;
