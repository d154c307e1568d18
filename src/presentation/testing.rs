use std::cell::{Ref, RefCell};
use std::rc::Rc;

use super::container::Container;
use super::delegate::{PressResponse, SheetDelegate, SheetRef};
use super::sheet::{Sheet, SheetId};
use super::state::PresentationState;
use super::transition::{Stage, Transition};
use crate::layout_engine::{SheetFrames, SizeClass};
use crate::model::{Row, RowIndex, RowStyle, Section};
use crate::sys::geometry::Rect;

#[derive(Clone, Debug, PartialEq)]
pub enum DelegateEvent {
    WillPresent(PresentationState),
    DidPresent(PresentationState),
    WillDismiss(PresentationState),
    DidDismiss(PresentationState),
    Pressed(RowIndex, String),
}

#[derive(Default)]
pub struct RecordingDelegate {
    pub events: Vec<DelegateEvent>,
    pub response: PressResponse,
}

impl RecordingDelegate {
    pub fn dismissing_on_press(animated: bool) -> Self {
        Self {
            events: Vec::new(),
            response: PressResponse::Dismiss { animated },
        }
    }

    pub fn take(&mut self) -> Vec<DelegateEvent> { std::mem::take(&mut self.events) }
}

impl<P> SheetDelegate<P> for RecordingDelegate {
    fn will_present(&mut self, sheet: SheetRef<'_, P>) {
        self.events.push(DelegateEvent::WillPresent(sheet.state));
    }

    fn did_present(&mut self, sheet: SheetRef<'_, P>) {
        self.events.push(DelegateEvent::DidPresent(sheet.state));
    }

    fn will_dismiss(&mut self, sheet: SheetRef<'_, P>) {
        self.events.push(DelegateEvent::WillDismiss(sheet.state));
    }

    fn did_dismiss(&mut self, sheet: SheetRef<'_, P>) {
        self.events.push(DelegateEvent::DidDismiss(sheet.state));
    }

    fn pressed_row(&mut self, _sheet: SheetRef<'_, P>, index: RowIndex, row: &Row<P>) -> PressResponse {
        self.events.push(DelegateEvent::Pressed(index, row.label().to_string()));
        self.response
    }
}

#[derive(Debug, Default)]
pub struct ContainerLog {
    pub bounds: Rect,
    pub size_class: SizeClass,
    pub presented: Option<SheetId>,
    pub input_blocked: bool,
    pub attached: Vec<SheetId>,
    pub detached: Vec<SheetId>,
    pub renders: Vec<(SheetFrames, Stage)>,
    pub animations: Vec<(SheetFrames, Transition)>,
    pub rows_changed: Vec<usize>,
}

/// In-memory container. Clones share state so a test can keep a handle
/// while the sheet owns another.
#[derive(Clone, Default)]
pub struct FakeContainer(Rc<RefCell<ContainerLog>>);

impl FakeContainer {
    pub fn new(bounds: Rect, size_class: SizeClass) -> Self {
        Self(Rc::new(RefCell::new(ContainerLog {
            bounds,
            size_class,
            ..Default::default()
        })))
    }

    pub fn compact() -> Self { Self::new(Rect::from_xywh(0.0, 0.0, 375.0, 667.0), SizeClass::Compact) }

    pub fn regular() -> Self { Self::new(Rect::from_xywh(0.0, 0.0, 1024.0, 768.0), SizeClass::Regular) }

    pub fn boxed(&self) -> Box<dyn Container> { Box::new(self.clone()) }

    pub fn log(&self) -> Ref<'_, ContainerLog> { self.0.borrow() }

    pub fn set_bounds(&self, bounds: Rect) { self.0.borrow_mut().bounds = bounds; }

    pub fn last_animation(&self) -> Option<Transition> {
        self.log().animations.last().map(|(_, t)| t.clone())
    }
}

impl Container for FakeContainer {
    fn bounds(&self) -> Rect { self.0.borrow().bounds }

    fn size_class(&self) -> SizeClass { self.0.borrow().size_class }

    fn presented_sheet(&self) -> Option<SheetId> { self.0.borrow().presented }

    fn attach(&mut self, sheet: SheetId, _frames: &SheetFrames) {
        let mut log = self.0.borrow_mut();
        log.presented = Some(sheet);
        log.attached.push(sheet);
    }

    fn detach(&mut self, sheet: SheetId) {
        let mut log = self.0.borrow_mut();
        if log.presented == Some(sheet) {
            log.presented = None;
        }
        log.detached.push(sheet);
    }

    fn set_input_blocked(&mut self, blocked: bool) { self.0.borrow_mut().input_blocked = blocked; }

    fn render(&mut self, frames: &SheetFrames, stage: &Stage) {
        self.0.borrow_mut().renders.push((frames.clone(), *stage));
    }

    fn animate(&mut self, frames: &SheetFrames, transition: &Transition) {
        self.0.borrow_mut().animations.push((frames.clone(), transition.clone()));
    }

    fn rows_changed(&mut self, section: usize) { self.0.borrow_mut().rows_changed.push(section); }
}

/// A five option multi-select section confirmed with "GO!", followed by a
/// plain action section.
pub fn sample_sections() -> Vec<Section<u32>> {
    vec![
        Section::builder(RowStyle::MultiSelect)
            .title("Multi Select")
            .message("Choose Your Options")
            .options((1..=5).map(|i| (format!("Option {i}"), i)))
            .confirm_with("GO!", 0)
            .build()
            .unwrap(),
        Section::builder(RowStyle::Default)
            .options([("Share", 10), ("Delete", 11)])
            .build()
            .unwrap(),
    ]
}

pub fn sample_sheet() -> Sheet<u32, RecordingDelegate> {
    Sheet::new(sample_sections(), RecordingDelegate::default()).unwrap()
}
