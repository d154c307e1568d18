use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::common::config::{AnimationSettings, SheetMetrics};
use crate::layout_engine::{PresentationMode, SheetFrames};
use crate::sys::geometry::Rect;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[derive(strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TransitionKind {
    Present,
    Dismiss,
    Move,
    Relayout,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    CubicBezier([f64; 4]),
    /// Follow whatever curve the host is already animating with.
    Inherited,
}

/// Per-transition knobs. Passed with each transition and gone once it finishes.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct TransitionOptions {
    /// Set for moves driven by a container bounds change, which the host is
    /// typically animating already.
    pub suppress_custom_easing: bool,
}

/// Visual endpoint of a transition.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Stage {
    pub host: Rect,
    pub host_alpha: f64,
    pub backdrop_alpha: f64,
}

impl Stage {
    pub fn shown(frames: &SheetFrames, metrics: &SheetMetrics) -> Self {
        Self {
            host: frames.host,
            host_alpha: 1.0,
            backdrop_alpha: metrics.backdrop_alpha,
        }
    }

    /// Fitted sheets slide in from below the container; anchored ones fade.
    pub fn hidden(frames: &SheetFrames) -> Self {
        match frames.mode {
            PresentationMode::Fitted => Self {
                host: frames.host.offset(0.0, frames.container.max_y() - frames.host.min_y()),
                host_alpha: 1.0,
                backdrop_alpha: 0.0,
            },
            PresentationMode::Anchored { .. } => Self {
                host: frames.host,
                host_alpha: 0.0,
                backdrop_alpha: 0.0,
            },
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Transition {
    pub kind: TransitionKind,
    pub duration: Duration,
    pub easing: Easing,
    pub from: Stage,
    pub to: Stage,
}

impl Transition {
    pub fn new(
        kind: TransitionKind,
        duration: Duration,
        settings: &AnimationSettings,
        options: TransitionOptions,
        from: Stage,
        to: Stage,
    ) -> Self {
        let easing = if options.suppress_custom_easing {
            Easing::Inherited
        } else {
            Easing::CubicBezier(settings.easing)
        };
        Self { kind, duration, easing, from, to }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout_engine::Direction;
    use crate::sys::geometry::{Point, Size};

    fn frames(mode: PresentationMode) -> SheetFrames {
        SheetFrames {
            mode,
            container: Rect::from_xywh(0.0, 0.0, 375.0, 667.0),
            host: Rect::from_xywh(15.0, 200.0, 345.0, 267.0),
            content_size: Size::new(345.0, 267.0),
            content_offset: Point::ZERO,
            scrollable: false,
            sections: Vec::new(),
            pointer: None,
        }
    }

    #[test]
    fn fitted_sheets_hide_below_the_container() {
        let hidden = Stage::hidden(&frames(PresentationMode::Fitted));
        assert_eq!(hidden.host.min_y(), 667.0);
        assert_eq!(hidden.host.size, Size::new(345.0, 267.0));
        assert_eq!(hidden.backdrop_alpha, 0.0);
    }

    #[test]
    fn anchored_sheets_fade() {
        let mode = PresentationMode::Anchored {
            point: Point::new(10.0, 10.0),
            direction: Direction::Up,
        };
        let f = frames(mode);
        let hidden = Stage::hidden(&f);
        assert_eq!(hidden.host, f.host);
        assert_eq!(hidden.host_alpha, 0.0);
        assert_eq!(Stage::shown(&f, &SheetMetrics::default()).backdrop_alpha, 0.3);
    }

    #[test]
    fn suppression_swaps_the_easing() {
        let settings = AnimationSettings::default();
        let stage = Stage::hidden(&frames(PresentationMode::Fitted));
        let plain = Transition::new(
            TransitionKind::Move,
            Duration::from_millis(300),
            &settings,
            TransitionOptions::default(),
            stage,
            stage,
        );
        assert_eq!(plain.easing, Easing::CubicBezier([0.215, 0.61, 0.355, 1.0]));

        let suppressed = Transition::new(
            TransitionKind::Move,
            Duration::from_millis(300),
            &settings,
            TransitionOptions { suppress_custom_easing: true },
            stage,
            stage,
        );
        assert_eq!(suppressed.easing, Easing::Inherited);
    }
}
