use std::cell::RefCell;
use std::rc::Rc;

use super::sheet::SheetId;
use super::transition::{Stage, Transition};
use crate::layout_engine::{SheetFrames, SizeClass};
use crate::sys::geometry::Rect;

/// The host view a sheet is presented in.
///
/// Implementations own the actual drawing and animation. A container that
/// is animating must call [`Sheet::finish_transition`](super::Sheet::finish_transition)
/// once the transition it was handed completes.
///
/// A sheet takes its container as a `Box` and drops it when `show` is
/// rejected or once the sheet is dismissed, so implementations should be
/// handles onto state the host keeps. Any container can be shared that way
/// through `Rc<RefCell<_>>`.
pub trait Container {
    fn bounds(&self) -> Rect;

    fn size_class(&self) -> SizeClass;

    /// The sheet currently attached, if any. At most one sheet may be attached.
    fn presented_sheet(&self) -> Option<SheetId>;

    fn attach(&mut self, sheet: SheetId, frames: &SheetFrames);

    fn detach(&mut self, sheet: SheetId);

    /// Blocks user input to everything in the container, the sheet included.
    fn set_input_blocked(&mut self, blocked: bool);

    /// Apply `frames` at `stage` immediately.
    fn render(&mut self, frames: &SheetFrames, stage: &Stage);

    fn animate(&mut self, frames: &SheetFrames, transition: &Transition);

    /// Selection or enablement of rows in `section` changed.
    fn rows_changed(&mut self, section: usize);
}

impl<C: Container> Container for Rc<RefCell<C>> {
    fn bounds(&self) -> Rect { self.borrow().bounds() }

    fn size_class(&self) -> SizeClass { self.borrow().size_class() }

    fn presented_sheet(&self) -> Option<SheetId> { self.borrow().presented_sheet() }

    fn attach(&mut self, sheet: SheetId, frames: &SheetFrames) {
        self.borrow_mut().attach(sheet, frames)
    }

    fn detach(&mut self, sheet: SheetId) { self.borrow_mut().detach(sheet) }

    fn set_input_blocked(&mut self, blocked: bool) { self.borrow_mut().set_input_blocked(blocked) }

    fn render(&mut self, frames: &SheetFrames, stage: &Stage) {
        self.borrow_mut().render(frames, stage)
    }

    fn animate(&mut self, frames: &SheetFrames, transition: &Transition) {
        self.borrow_mut().animate(frames, transition)
    }

    fn rows_changed(&mut self, section: usize) { self.borrow_mut().rows_changed(section) }
}
