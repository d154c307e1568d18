use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use super::pointer::{PointerGeometry, clamp_cross_axis};
use super::section::{SectionLayout, layout_section};
use super::text::TextMeasure;
use super::Direction;
use crate::common::config::SheetMetrics;
use crate::model::{RowIndex, Section};
use crate::sys::geometry::{EPSILON, Orientation, Point, Rect, Size};

/// Form factor of the hosting container.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[derive(strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SizeClass {
    /// Phone-class viewports. Sheets are always fitted.
    #[default]
    Compact,
    /// Tablet/pointer-class viewports, where sheets may be anchored to a point.
    Regular,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum PresentationMode {
    Fitted,
    Anchored { point: Point, direction: Direction },
}

/// A laid-out section and its frame in content coordinates.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PlacedSection {
    pub frame: Rect,
    pub layout: SectionLayout,
}

/// Everything the host needs to place a sheet: the host frame in container
/// coordinates, the scrollable content inside it and the optional pointer.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SheetFrames {
    pub mode: PresentationMode,
    pub container: Rect,
    pub host: Rect,
    pub content_size: Size,
    /// Scroll position of the content within the host.
    pub content_offset: Point,
    pub scrollable: bool,
    pub sections: Vec<PlacedSection>,
    pub pointer: Option<PointerGeometry>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hit {
    Row(RowIndex),
    /// Inside a section but not on a row (title, message, dividers, content view).
    Section(usize),
    Pointer,
    Background,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum GeometryWarning {
    HostOutOfBounds { host: Rect, container: Rect },
    PointerOutOfBounds { pointer: Rect, container: Rect },
    /// Too little room between the pointer and the container edge to show a
    /// single row.
    HostCollapsed { host: Rect, room: f64 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnchoredLayout {
    pub frames: SheetFrames,
    /// Non-empty when the geometry could not be made to fit.
    pub warnings: Vec<GeometryWarning>,
}

impl SheetFrames {
    fn to_container(&self, content: Point) -> Point {
        content.offset(
            self.host.min_x() - self.content_offset.x,
            self.host.min_y() - self.content_offset.y,
        )
    }

    fn to_content(&self, point: Point) -> Point {
        point.offset(
            self.content_offset.x - self.host.min_x(),
            self.content_offset.y - self.host.min_y(),
        )
    }

    /// Frame of a section in container coordinates, as currently scrolled.
    pub fn section_frame(&self, index: usize) -> Option<Rect> {
        let placed = self.sections.get(index)?;
        Some(Rect::new(self.to_container(placed.frame.origin), placed.frame.size))
    }

    /// Frame of a row in container coordinates, as currently scrolled.
    pub fn row_frame(&self, index: RowIndex) -> Option<Rect> {
        let placed = self.sections.get(index.section)?;
        let row = placed.layout.rows.get(index.row)?;
        let origin = placed.frame.origin.offset(row.origin.x, row.origin.y);
        Some(Rect::new(self.to_container(origin), row.size))
    }

    pub fn hit_test(&self, point: Point) -> Hit {
        if self.pointer.is_some_and(|p| p.frame.contains(point)) {
            return Hit::Pointer;
        }
        if !self.host.contains(point) {
            return Hit::Background;
        }
        let local = self.to_content(point);
        for (i, placed) in self.sections.iter().enumerate() {
            if !placed.frame.contains(local) {
                continue;
            }
            let within = local.offset(-placed.frame.min_x(), -placed.frame.min_y());
            return match placed.layout.row_at(within) {
                Some(row) => Hit::Row(RowIndex::new(i, row)),
                None => Hit::Section(i),
            };
        }
        Hit::Background
    }
}

/// Composes laid-out sections with a container into sheet frames.
pub struct GeometryEngine<'a> {
    metrics: &'a SheetMetrics,
    text: &'a dyn TextMeasure,
}

impl<'a> GeometryEngine<'a> {
    pub fn new(metrics: &'a SheetMetrics, text: &'a dyn TextMeasure) -> Self {
        Self { metrics, text }
    }

    fn layouts<P>(&self, sections: &[Section<P>], width: f64) -> Vec<SectionLayout> {
        sections.iter().map(|s| layout_section(s, width, self.metrics, self.text)).collect()
    }

    /// Stacks sections centered in `container`. Content taller than the
    /// container is pinned to its height and scrolled to the bottom.
    pub fn fitted<P>(
        &self,
        sections: &[Section<P>],
        container: Rect,
        size_class: SizeClass,
    ) -> SheetFrames {
        let gap = self.metrics.stack_gap();
        let band_width = match size_class {
            SizeClass::Compact => container.size.width,
            SizeClass::Regular => self.metrics.fixed_width.min(container.size.width),
        };
        let section_width = (band_width.min(self.metrics.content_width) - 2.0 * gap).max(0.0);

        let mut y = gap;
        let placed: Vec<PlacedSection> = self
            .layouts(sections, section_width)
            .into_iter()
            .map(|layout| {
                let frame = Rect::new(Point::new(gap, y), layout.size);
                y += layout.size.height + gap;
                PlacedSection { frame, layout }
            })
            .collect();

        let content_size = Size::new(section_width + 2.0 * gap, y);
        let host_height = content_size.height.min(container.size.height);
        let host = Rect::from_xywh(
            container.mid().x - content_size.width / 2.0,
            container.min_y() + (container.size.height - host_height) / 2.0,
            content_size.width,
            host_height,
        );
        let scroll = (content_size.height - host_height).max(0.0);

        trace!(?container, ?host, ?content_size, scroll, "fitted geometry");
        SheetFrames {
            mode: PresentationMode::Fitted,
            container,
            host,
            content_size,
            content_offset: Point::new(0.0, scroll),
            scrollable: scroll > EPSILON,
            sections: placed,
            pointer: None,
        }
    }

    /// Places fixed-width content next to `point` with a pointer aimed at it.
    ///
    /// The host is kept inside the container inset by the outer spacing when
    /// it fits; otherwise the best-effort frame is returned together with
    /// warnings.
    pub fn anchored<P>(
        &self,
        sections: &[Section<P>],
        container: Rect,
        point: Point,
        direction: Direction,
    ) -> AnchoredLayout {
        let m = self.metrics;
        let gap = m.stack_gap();
        let width = m.content_width;

        let mut y = 0.0;
        let placed: Vec<PlacedSection> = self
            .layouts(sections, width)
            .into_iter()
            .map(|layout| {
                let frame = Rect::new(Point::new(0.0, y), layout.size);
                y += layout.size.height + gap;
                PlacedSection { frame, layout }
            })
            .collect();
        let content_height = if placed.is_empty() { 0.0 } else { y - gap };

        let pointer = PointerGeometry::new(point, direction, m);
        let axis = direction.orientation();
        let cross = axis.cross();
        let region = container.inset(m.outer_spacing, m.outer_spacing);
        let (region_start, region_len) = region.span(axis);
        let room = if direction.host_precedes_point() {
            pointer.base_along() - region_start
        } else {
            region_start + region_len - pointer.base_along()
        };
        let room = room.max(0.0);

        let (along_len, cross_len) = match axis {
            Orientation::Vertical => (content_height.min(room), width),
            Orientation::Horizontal => (width, content_height.min(region.size.height)),
        };
        let along_start = pointer.host_start(along_len);
        let (cross_min, cross_extent) = region.span(cross);
        let cross_start = clamp_cross_axis(
            point.along(cross),
            cross_len,
            pointer.cross_span(),
            (cross_min, cross_min + cross_extent),
            m.corner_radius,
        );
        let host = Rect::from_spans(axis, (along_start, along_len), (cross_start, cross_len));

        let content_size = Size::new(width, content_height);
        let scroll = (content_height - host.size.height).max(0.0);

        let mut warnings = Vec::new();
        if !container.contains_rect(&host) {
            warn!(?host, ?container, %direction, "anchored sheet does not fit its container");
            warnings.push(GeometryWarning::HostOutOfBounds { host, container });
        }
        if !container.contains_rect(&pointer.frame) {
            warn!(pointer = ?pointer.frame, ?container, "pointer falls outside its container");
            warnings.push(GeometryWarning::PointerOutOfBounds { pointer: pointer.frame, container });
        }
        if axis == Orientation::Vertical && room < content_height.min(m.row_height) {
            warn!(?host, room, %direction, "no room for the anchored sheet past its pointer");
            warnings.push(GeometryWarning::HostCollapsed { host, room });
        }
        debug!(?point, %direction, ?host, scroll, "anchored geometry");

        AnchoredLayout {
            frames: SheetFrames {
                mode: PresentationMode::Anchored { point, direction },
                container,
                host,
                content_size,
                content_offset: Point::new(0.0, scroll),
                scrollable: scroll > EPSILON,
                sections: placed,
                pointer: Some(pointer),
            },
            warnings,
        }
    }
}
