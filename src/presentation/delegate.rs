use super::sheet::SheetId;
use super::state::PresentationState;
use crate::model::{Row, RowIndex, Section};

/// Read-only view of a sheet handed to delegate callbacks.
#[derive(Debug)]
pub struct SheetRef<'a, P> {
    pub id: SheetId,
    pub state: PresentationState,
    pub sections: &'a [Section<P>],
}

impl<P> Clone for SheetRef<'_, P> {
    fn clone(&self) -> Self { *self }
}

impl<P> Copy for SheetRef<'_, P> {}

/// What the sheet should do after a non multi-select row was pressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PressResponse {
    #[default]
    Keep,
    Dismiss {
        animated: bool,
    },
}

/// Host-side observer of a sheet's lifecycle.
///
/// Lifecycle callbacks arrive in order `will_present`, `did_present`,
/// `will_dismiss`, `did_dismiss`. The sheet never dismisses itself on a row
/// press; that is up to `pressed_row`.
pub trait SheetDelegate<P> {
    fn will_present(&mut self, _sheet: SheetRef<'_, P>) {}

    fn did_present(&mut self, _sheet: SheetRef<'_, P>) {}

    fn will_dismiss(&mut self, _sheet: SheetRef<'_, P>) {}

    fn did_dismiss(&mut self, _sheet: SheetRef<'_, P>) {}

    fn pressed_row(&mut self, sheet: SheetRef<'_, P>, index: RowIndex, row: &Row<P>)
    -> PressResponse;
}
