use serde::{Deserialize, Serialize};

use super::Direction;
use crate::common::config::SheetMetrics;
use crate::sys::geometry::{Orientation, Point, Rect};

/// The triangular pointer joining an anchored sheet to its anchor point.
///
/// All four directions share one computation: the pointer extends `Ah` along
/// the direction's axis and is `Ab` wide across it, centered on the point.
/// Right and Down put the host before the point on that axis, Left and Up
/// put it after.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct PointerGeometry {
    pub direction: Direction,
    /// Bounding box of the triangle.
    pub frame: Rect,
    pub tip: Point,
    /// The two corners of the edge shared with the host.
    pub base: [Point; 2],
}

impl PointerGeometry {
    pub fn new(point: Point, direction: Direction, metrics: &SheetMetrics) -> Self {
        let axis = direction.orientation();
        let along = point.along(axis);
        let cross = point.along(axis.cross());
        let height = metrics.pointer_height;
        let half_base = metrics.pointer_base / 2.0;

        let (start, base_along) = if direction.host_precedes_point() {
            (along - height, along - height)
        } else {
            (along, along + height)
        };

        Self {
            direction,
            frame: Rect::from_spans(axis, (start, height), (cross - half_base, metrics.pointer_base)),
            tip: point,
            base: [
                Point::from_axes(axis, base_along, cross - half_base),
                Point::from_axes(axis, base_along, cross + half_base),
            ],
        }
    }

    pub fn axis(&self) -> Orientation { self.direction.orientation() }

    /// Coordinate of the pointer's base edge along its axis, where the host begins or ends.
    pub fn base_along(&self) -> f64 { self.base[0].along(self.axis()) }

    /// Where a host of `length` along the pointer axis must start so its edge
    /// meets the pointer's base.
    pub fn host_start(&self, length: f64) -> f64 {
        if self.direction.host_precedes_point() {
            self.base_along() - length
        } else {
            self.base_along()
        }
    }

    /// `(start, length)` of the pointer across its axis.
    pub fn cross_span(&self) -> (f64, f64) { self.frame.span(self.axis().cross()) }
}

/// Places a host of `length` across the pointer axis.
///
/// Starts centered on `point`, is clamped into `bounds` (`(min, max)`), then
/// nudged so the pointer's `(start, length)` span stays at least `radius` away
/// from either end of the host. When the host is longer than `bounds` the
/// maximum bound wins; when it cannot clear the radius on both sides the
/// pointer's trailing side wins. Callers check containment afterwards.
pub fn clamp_cross_axis(
    point: f64,
    length: f64,
    pointer: (f64, f64),
    bounds: (f64, f64),
    radius: f64,
) -> f64 {
    let (lo, hi) = bounds;
    let mut start = (point - length / 2.0).max(lo).min(hi - length);
    start = start.min(pointer.0 - radius);
    start.max(pointer.0 + pointer.1 + radius - length)
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn right_pointer_sits_left_of_point() {
        let metrics = SheetMetrics::default();
        let pointer = PointerGeometry::new(Point::new(200.0, 100.0), Direction::Right, &metrics);
        assert_eq!(pointer.frame, Rect::from_xywh(191.0, 90.0, 9.0, 20.0));
        assert_eq!(pointer.base, [Point::new(191.0, 90.0), Point::new(191.0, 110.0)]);
        assert_eq!(pointer.host_start(345.0), 191.0 - 345.0);
    }

    #[test]
    fn up_pointer_sits_below_point() {
        let metrics = SheetMetrics::default();
        let pointer = PointerGeometry::new(Point::new(100.0, 50.0), Direction::Up, &metrics);
        assert_eq!(pointer.frame, Rect::from_xywh(90.0, 50.0, 20.0, 9.0));
        assert_eq!(pointer.host_start(200.0), 59.0);
        assert_eq!(pointer.cross_span(), (90.0, 20.0));
    }

    #[test]
    fn tip_is_the_anchor_point_for_every_direction() {
        let metrics = SheetMetrics::default();
        let point = Point::new(40.0, 60.0);
        for direction in Direction::iter() {
            let pointer = PointerGeometry::new(point, direction, &metrics);
            assert_eq!(pointer.tip, point);
            let axis = pointer.axis();
            let (start, len) = pointer.frame.span(axis);
            let tip_along = point.along(axis);
            assert!(tip_along == start || tip_along == start + len, "{direction}");
            assert_eq!(len, metrics.pointer_height);
        }
    }

    #[test]
    fn clamp_centers_when_there_is_room() {
        assert_eq!(clamp_cross_axis(500.0, 200.0, (490.0, 20.0), (0.0, 1000.0), 3.0), 400.0);
    }

    #[test]
    fn clamp_keeps_host_in_bounds() {
        assert_eq!(clamp_cross_axis(20.0, 200.0, (10.0, 20.0), (5.0, 1000.0), 3.0), 5.0);
        assert_eq!(clamp_cross_axis(980.0, 200.0, (970.0, 20.0), (5.0, 995.0), 3.0), 795.0);
    }

    #[test]
    fn clamp_lets_the_far_bound_win_for_oversized_hosts() {
        // 345 wide in a 190 wide region: flush with the far edge, spilling past the near one.
        assert_eq!(clamp_cross_axis(100.0, 345.0, (90.0, 20.0), (5.0, 195.0), 3.0), -150.0);
    }

    #[test]
    fn clamp_keeps_pointer_off_rounded_corners() {
        // Pointer hugging the container edge drags the host past the bound.
        let start = clamp_cross_axis(2.0, 200.0, (-8.0, 20.0), (5.0, 1000.0), 3.0);
        assert_eq!(start, -11.0);
    }

    #[test]
    fn clamp_grid_stays_inside_when_feasible() {
        let bounds = (5.0, 763.0);
        let radius = 3.0;
        for length in [40.0, 200.0, 758.0] {
            let mut p = bounds.0 + 10.0 + radius;
            while p <= bounds.1 - 10.0 - radius {
                let pointer = (p - 10.0, 20.0);
                let start = clamp_cross_axis(p, length, pointer, bounds, radius);
                assert!(start >= bounds.0 && start + length <= bounds.1, "p {p} len {length}");
                assert!(start <= pointer.0 - radius + 1e-9);
                assert!(start + length >= pointer.0 + pointer.1 + radius - 1e-9);
                p += 7.5;
            }
        }
    }
}
