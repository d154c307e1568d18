use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace, warn};

use super::container::Container;
use super::delegate::{PressResponse, SheetDelegate, SheetRef};
use super::state::{Outcome, PresentationState, Rejection};
use super::transition::{Stage, Transition, TransitionKind, TransitionOptions};
use crate::common::config::Config;
use crate::common::error::{Result, SheetError};
use crate::layout_engine::{
    ArrowDirections, Direction, EstimatedTextMetrics, GeometryEngine, Hit, SheetFrames, SizeClass,
    TextMeasure,
};
use crate::model::{RowIndex, RowStyle, Section};
use crate::sys::geometry::Point;

static NEXT_SHEET_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SheetId(u64);

impl SheetId {
    fn next() -> Self { SheetId(NEXT_SHEET_ID.fetch_add(1, Ordering::Relaxed)) }

    pub fn get(self) -> u64 { self.0 }
}

impl fmt::Display for SheetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "sheet#{}", self.0) }
}

/// Where an anchored sheet points, kept so a bounds change can re-anchor.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct AnchorContext {
    pub point: Point,
    pub direction: Direction,
    pub active: bool,
}

/// A multi-section option sheet and its presentation lifecycle.
///
/// ```text
/// Hidden -> Presenting -> Visible | AnchoredVisible -> Dismissing -> Hidden
/// ```
///
/// Everything runs on the caller's thread. Animated transitions are handed to
/// the container and stay in flight until the host calls
/// [`finish_transition`](Sheet::finish_transition); only one transition is in
/// flight at a time, and operations that would start another are rejected.
pub struct Sheet<P, D> {
    id: SheetId,
    sections: Vec<Section<P>>,
    delegate: D,
    config: Config,
    text: Box<dyn TextMeasure>,
    state: PresentationState,
    anchor: Option<AnchorContext>,
    container: Option<Box<dyn Container>>,
    frames: Option<SheetFrames>,
    in_flight: Option<Transition>,
    pending_relayout: bool,
}

impl<P, D: SheetDelegate<P>> Sheet<P, D> {
    pub fn new(sections: Vec<Section<P>>, delegate: D) -> Result<Self> {
        if sections.is_empty() {
            warn!("refusing to create a sheet without sections");
            return Err(SheetError::NoSections);
        }
        let config = Config::default();
        let id = SheetId::next();
        debug!(sheet = %id, sections = sections.len(), "created sheet");
        Ok(Self {
            id,
            sections,
            delegate,
            text: Box::new(EstimatedTextMetrics::new(config.text.clone())),
            config,
            state: PresentationState::Hidden,
            anchor: None,
            container: None,
            frames: None,
            in_flight: None,
            pending_relayout: false,
        })
    }

    /// Replaces the configuration. Also resets text measurement to estimates
    /// from the new text settings, so call [`with_text_measure`](Self::with_text_measure) after this.
    pub fn with_config(mut self, config: Config) -> Self {
        self.text = Box::new(EstimatedTextMetrics::new(config.text.clone()));
        self.config = config;
        self
    }

    pub fn with_text_measure(mut self, text: impl TextMeasure + 'static) -> Self {
        self.text = Box::new(text);
        self
    }

    pub fn id(&self) -> SheetId { self.id }

    pub fn state(&self) -> PresentationState { self.state }

    pub fn sections(&self) -> &[Section<P>] { &self.sections }

    pub fn section(&self, index: usize) -> Result<&Section<P>> {
        self.sections.get(index).ok_or_else(|| {
            let err = SheetError::SectionOutOfRange { index, len: self.sections.len() };
            warn!(sheet = %self.id, error = %err, "section lookup failed");
            err
        })
    }

    pub fn anchor(&self) -> Option<&AnchorContext> { self.anchor.as_ref() }

    /// Frames currently applied to the container.
    pub fn frames(&self) -> Option<&SheetFrames> { self.frames.as_ref() }

    pub fn in_flight(&self) -> Option<&Transition> { self.in_flight.as_ref() }

    pub fn is_attached(&self) -> bool { self.container.is_some() }

    pub fn delegate(&self) -> &D { &self.delegate }

    pub fn delegate_mut(&mut self) -> &mut D { &mut self.delegate }

    pub fn selected_payloads(&self, section: usize) -> Result<Vec<&P>> {
        Ok(self.section(section)?.selected_payloads().collect())
    }

    pub fn set_row_style(&mut self, index: RowIndex, style: RowStyle) -> Result<()> {
        self.section_mut(index.section)?.set_row_style(index.row, style)?;
        self.notify_rows_changed(index.section);
        Ok(())
    }

    pub fn set_row_enabled(&mut self, index: RowIndex, enabled: bool) -> Result<()> {
        self.section_mut(index.section)?.set_row_enabled(index.row, enabled)?;
        self.notify_rows_changed(index.section);
        Ok(())
    }

    /// Presents the sheet fitted to `container`. A rejected `container` is
    /// dropped; see [`Container`] for sharing one.
    #[instrument(skip(self, container), fields(sheet = %self.id))]
    pub fn show(&mut self, container: Box<dyn Container>, animated: bool) -> Outcome {
        if let Some(rejection) = self.can_show(container.as_ref()) {
            return self.reject("show", rejection);
        }
        let frames = self.engine().fitted(&self.sections, container.bounds(), container.size_class());
        self.begin_present(container, frames, animated);
        Outcome::Applied
    }

    /// Presents the sheet next to `point` with a pointer aimed at it. On a
    /// compact container this is [`show`](Self::show).
    ///
    /// Fails only for a direction mask that is not exactly one direction.
    #[instrument(skip(self, container), fields(sheet = %self.id))]
    pub fn show_anchored(
        &mut self,
        container: Box<dyn Container>,
        point: Point,
        directions: ArrowDirections,
        animated: bool,
    ) -> Result<Outcome> {
        let direction = self.parse_direction(directions)?;
        if container.size_class() != SizeClass::Regular {
            debug!(
                size_class = %container.size_class(),
                "anchoring needs a regular container, showing fitted"
            );
            return Ok(self.show(container, animated));
        }
        if let Some(rejection) = self.can_show(container.as_ref()) {
            return Ok(self.reject("show_anchored", rejection));
        }
        let layout = self.engine().anchored(&self.sections, container.bounds(), point, direction);
        self.anchor = Some(AnchorContext { point, direction, active: true });
        self.begin_present(container, layout.frames, animated);
        Ok(Outcome::Applied)
    }

    /// Re-anchors a visible anchored sheet at `point`.
    #[instrument(skip(self), fields(sheet = %self.id))]
    pub fn move_to_point(
        &mut self,
        point: Point,
        directions: ArrowDirections,
        animated: bool,
    ) -> Result<Outcome> {
        let direction = self.parse_direction(directions)?;
        if self.state != PresentationState::AnchoredVisible {
            return Ok(self.reject("move", Rejection::NotAnchored(self.state)));
        }
        if let Some(transition) = &self.in_flight {
            return Ok(self.reject("move", Rejection::TransitionInFlight(transition.kind)));
        }
        let duration = self.config.animation.anchored_duration();
        Ok(self.apply_anchor(
            point,
            direction,
            animated,
            TransitionKind::Move,
            duration,
            TransitionOptions::default(),
        ))
    }

    #[instrument(skip(self), fields(sheet = %self.id))]
    pub fn dismiss(&mut self, animated: bool) -> Outcome {
        if !self.state.is_visible() {
            let rejection = match &self.in_flight {
                Some(t) if self.state == PresentationState::Presenting => {
                    Rejection::TransitionInFlight(t.kind)
                }
                _ => Rejection::NotVisible(self.state),
            };
            return self.reject("dismiss", rejection);
        }
        if let Some(transition) = &self.in_flight {
            return self.reject("dismiss", Rejection::TransitionInFlight(transition.kind));
        }

        self.notify(|d, sheet| d.will_dismiss(sheet));
        self.set_state(PresentationState::Dismissing);
        if let Some(container) = self.container.as_mut() {
            container.set_input_blocked(true);
        }

        let Some(frames) = self.frames.as_ref() else {
            self.complete_dismiss();
            return Outcome::Applied;
        };
        if !animated {
            self.complete_dismiss();
            return Outcome::Applied;
        }

        let transition = Transition::new(
            TransitionKind::Dismiss,
            self.lifecycle_duration(),
            &self.config.animation,
            TransitionOptions::default(),
            Stage::shown(frames, &self.config.metrics),
            Stage::hidden(frames),
        );
        if let Some(container) = self.container.as_mut() {
            container.animate(frames, &transition);
        }
        trace!(duration = ?transition.duration, "dismiss in flight");
        self.in_flight = Some(transition);
        Outcome::Applied
    }

    /// Completion callback for the transition most recently handed to the container.
    #[instrument(skip(self), fields(sheet = %self.id))]
    pub fn finish_transition(&mut self) -> Outcome {
        let Some(transition) = self.in_flight.take() else {
            return self.reject("finish_transition", Rejection::NothingInFlight);
        };
        trace!(kind = %transition.kind, "transition finished");
        match transition.kind {
            TransitionKind::Present => self.complete_present(),
            TransitionKind::Dismiss => self.complete_dismiss(),
            TransitionKind::Move | TransitionKind::Relayout => {
                if let Some(container) = self.container.as_mut() {
                    container.set_input_blocked(false);
                }
            }
        }

        if self.pending_relayout && self.state.is_visible() {
            self.pending_relayout = false;
            debug!("applying relayout deferred during the transition");
            // A no-op when the bounds settled back where they were.
            let _ = self.relayout(true);
        }
        Outcome::Applied
    }

    /// The container's bounds changed, e.g. on rotation. Anchored sheets
    /// re-anchor at their stored point, fitted ones are laid out again.
    #[instrument(skip(self), fields(sheet = %self.id))]
    pub fn bounds_changed(&mut self, animated: bool) -> Outcome {
        match self.state {
            PresentationState::Hidden | PresentationState::Dismissing => {
                return self.reject("bounds_changed", Rejection::NotVisible(self.state));
            }
            _ => {}
        }
        if self.in_flight.is_some() {
            debug!("bounds changed mid transition, deferring relayout");
            self.pending_relayout = true;
            return Outcome::Applied;
        }
        self.relayout(animated)
    }

    /// Routes a tap at `point`, in container coordinates.
    ///
    /// Taps outside every section dismiss the sheet; taps on a row press it.
    #[instrument(skip(self), fields(sheet = %self.id))]
    pub fn tap(&mut self, point: Point) -> Result<Outcome> {
        if let Some(rejection) = self.interaction_rejection() {
            return Ok(self.reject("tap", rejection));
        }
        let Some(frames) = self.frames.as_ref() else {
            return Ok(self.reject("tap", Rejection::NotVisible(self.state)));
        };
        match frames.hit_test(point) {
            Hit::Background => Ok(self.dismiss(true)),
            Hit::Row(index) => self.press_row(index),
            hit => {
                trace!(?hit, "tap on sheet chrome");
                Ok(Outcome::Rejected(Rejection::NoTarget(hit)))
            }
        }
    }

    /// Presses row `index`. Multi-select rows toggle; anything else goes to
    /// the delegate, which decides whether the sheet goes away.
    #[instrument(skip(self), fields(sheet = %self.id))]
    pub fn press_row(&mut self, index: RowIndex) -> Result<Outcome> {
        if let Some(rejection) = self.interaction_rejection() {
            return Ok(self.reject("press_row", rejection));
        }
        let row = self.section(index.section)?.row(index.row).inspect_err(|err| {
            warn!(error = %err, "press on unknown row");
        })?;
        if !row.is_enabled() {
            return Ok(self.reject("press_row", Rejection::RowDisabled(index)));
        }

        if row.style() == RowStyle::MultiSelect {
            self.section_mut(index.section)?.toggle(index.row)?;
            self.notify_rows_changed(index.section);
            return Ok(Outcome::Applied);
        }

        let sheet = SheetRef {
            id: self.id,
            state: self.state,
            sections: &self.sections,
        };
        let row = &self.sections[index.section].rows()[index.row];
        let response = self.delegate.pressed_row(sheet, index, row);
        debug!(?response, style = %row.style(), "row pressed");
        match response {
            PressResponse::Keep => Ok(Outcome::Applied),
            PressResponse::Dismiss { animated } => Ok(self.dismiss(animated)),
        }
    }

    fn engine(&self) -> GeometryEngine<'_> {
        GeometryEngine::new(&self.config.metrics, self.text.as_ref())
    }

    fn parse_direction(&self, directions: ArrowDirections) -> Result<Direction> {
        Direction::try_from(directions).inspect_err(|err| {
            warn!(sheet = %self.id, error = %err, "rejecting arrow direction");
        })
    }

    fn section_mut(&mut self, index: usize) -> Result<&mut Section<P>> {
        let len = self.sections.len();
        self.sections.get_mut(index).ok_or_else(|| {
            let err = SheetError::SectionOutOfRange { index, len };
            warn!(error = %err, "section lookup failed");
            err
        })
    }

    fn can_show(&self, container: &dyn Container) -> Option<Rejection> {
        if self.state != PresentationState::Hidden {
            return Some(Rejection::NotHidden(self.state));
        }
        container.presented_sheet().map(Rejection::ContainerOccupied)
    }

    fn interaction_rejection(&self) -> Option<Rejection> {
        if !self.state.is_visible() {
            return Some(Rejection::NotVisible(self.state));
        }
        self.in_flight.as_ref().map(|t| Rejection::TransitionInFlight(t.kind))
    }

    fn reject(&self, operation: &'static str, rejection: Rejection) -> Outcome {
        warn!(sheet = %self.id, operation, state = %self.state, "{rejection}");
        Outcome::Rejected(rejection)
    }

    fn set_state(&mut self, state: PresentationState) {
        debug!(sheet = %self.id, from = %self.state, to = %state, "state change");
        self.state = state;
    }

    fn notify(&mut self, callback: impl FnOnce(&mut D, SheetRef<'_, P>)) {
        let sheet = SheetRef {
            id: self.id,
            state: self.state,
            sections: &self.sections,
        };
        callback(&mut self.delegate, sheet);
    }

    fn notify_rows_changed(&mut self, section: usize) {
        if let Some(container) = self.container.as_mut() {
            container.rows_changed(section);
        }
    }

    /// Fitted transitions scale with the number of sections; anchored ones are fixed.
    fn lifecycle_duration(&self) -> Duration {
        if self.anchor.is_some() {
            self.config.animation.anchored_duration()
        } else {
            self.config.animation.fitted_duration(self.sections.len())
        }
    }

    fn relayout_duration(&self, size_class: SizeClass) -> Duration {
        let secs = match size_class {
            SizeClass::Compact => self.config.animation.relayout_compact_secs,
            SizeClass::Regular => self.config.animation.relayout_regular_secs,
        };
        Duration::from_secs_f64(secs)
    }

    fn begin_present(
        &mut self,
        mut container: Box<dyn Container>,
        frames: SheetFrames,
        animated: bool,
    ) {
        container.set_input_blocked(true);
        self.notify(|d, sheet| d.will_present(sheet));
        container.attach(self.id, &frames);
        self.set_state(PresentationState::Presenting);

        let shown = Stage::shown(&frames, &self.config.metrics);
        if animated {
            let transition = Transition::new(
                TransitionKind::Present,
                self.lifecycle_duration(),
                &self.config.animation,
                TransitionOptions::default(),
                Stage::hidden(&frames),
                shown,
            );
            container.animate(&frames, &transition);
            trace!(duration = ?transition.duration, "present in flight");
            self.in_flight = Some(transition);
        } else {
            container.render(&frames, &shown);
        }
        self.container = Some(container);
        self.frames = Some(frames);

        if !animated {
            self.complete_present();
        }
    }

    fn complete_present(&mut self) {
        let settled = if self.anchor.is_some() {
            PresentationState::AnchoredVisible
        } else {
            PresentationState::Visible
        };
        self.set_state(settled);
        if let Some(container) = self.container.as_mut() {
            container.set_input_blocked(false);
        }
        self.notify(|d, sheet| d.did_present(sheet));
    }

    fn complete_dismiss(&mut self) {
        self.anchor = None;
        self.frames = None;
        self.pending_relayout = false;
        if let Some(mut container) = self.container.take() {
            container.detach(self.id);
            container.set_input_blocked(false);
        }
        self.set_state(PresentationState::Hidden);
        self.notify(|d, sheet| d.did_dismiss(sheet));
    }

    fn relayout(&mut self, animated: bool) -> Outcome {
        let Some(container) = self.container.as_ref() else {
            return self.reject("relayout", Rejection::NotVisible(self.state));
        };
        let bounds = container.bounds();
        let size_class = container.size_class();
        if self.frames.as_ref().is_some_and(|f| f.container.approx_eq(&bounds)) {
            debug!(?bounds, "bounds unchanged, keeping layout");
            return Outcome::Rejected(Rejection::BoundsUnchanged);
        }
        let duration = self.relayout_duration(size_class);
        let options = TransitionOptions { suppress_custom_easing: true };

        if let Some(anchor) = self.anchor {
            return self.apply_anchor(
                anchor.point,
                anchor.direction,
                animated,
                TransitionKind::Relayout,
                duration,
                options,
            );
        }
        let frames = self.engine().fitted(&self.sections, bounds, size_class);
        debug!(?bounds, host = ?frames.host, "fitted relayout");
        self.apply_frames(frames, animated, TransitionKind::Relayout, duration, options);
        Outcome::Applied
    }

    fn apply_anchor(
        &mut self,
        point: Point,
        direction: Direction,
        animated: bool,
        kind: TransitionKind,
        duration: Duration,
        options: TransitionOptions,
    ) -> Outcome {
        let Some(container) = self.container.as_ref() else {
            return self.reject("move", Rejection::NotVisible(self.state));
        };
        let layout = self.engine().anchored(&self.sections, container.bounds(), point, direction);
        self.anchor = Some(AnchorContext { point, direction, active: true });
        self.apply_frames(layout.frames, animated, kind, duration, options);
        Outcome::Applied
    }

    fn apply_frames(
        &mut self,
        frames: SheetFrames,
        animated: bool,
        kind: TransitionKind,
        duration: Duration,
        options: TransitionOptions,
    ) {
        let to = Stage::shown(&frames, &self.config.metrics);
        let from = self.frames.as_ref().map_or(to, |old| Stage::shown(old, &self.config.metrics));
        if let Some(container) = self.container.as_mut() {
            if animated {
                let transition =
                    Transition::new(kind, duration, &self.config.animation, options, from, to);
                container.set_input_blocked(true);
                container.animate(&frames, &transition);
                self.in_flight = Some(transition);
            } else {
                container.render(&frames, &to);
            }
        }
        self.frames = Some(frames);
    }
}

impl<P, D> Drop for Sheet<P, D> {
    fn drop(&mut self) {
        if let Some(mut container) = self.container.take() {
            debug!(sheet = %self.id, state = %self.state, "dropping an attached sheet, detaching");
            container.detach(self.id);
            container.set_input_blocked(false);
        }
    }
}
