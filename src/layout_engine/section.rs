use serde::{Deserialize, Serialize};
use tracing::trace;

use super::text::{TextMeasure, TextRole};
use crate::common::config::SheetMetrics;
use crate::model::Section;
use crate::sys::geometry::{Point, Rect, Size};

/// Frames of everything inside one section, relative to the section's origin.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SectionLayout {
    pub size: Size,
    pub title: Option<Rect>,
    pub message: Option<Rect>,
    /// Horizontal dividers, top to bottom. The first one closes the title block.
    pub dividers: Vec<Rect>,
    /// One frame per row, in row order.
    pub rows: Vec<Rect>,
    /// Vertical divider between cancel and confirm, when both exist.
    pub band_divider: Option<Rect>,
    pub content_view: Option<Rect>,
}

impl SectionLayout {
    pub fn total_height(&self) -> f64 { self.size.height }

    pub fn row_at(&self, point: Point) -> Option<usize> {
        self.rows.iter().position(|frame| frame.contains(point))
    }
}

/// Lays out `section` for `width`. Pure: the result depends only on the
/// section's content, the width and the metrics, so it can be recomputed for
/// any width after a resize.
pub fn layout_section<P>(
    section: &Section<P>,
    width: f64,
    metrics: &SheetMetrics,
    text: &dyn TextMeasure,
) -> SectionLayout {
    let inset = metrics.section_inset;
    let divider = metrics.divider_thickness;
    let row_height = metrics.row_height;
    let inner = (width - 2.0 * inset).max(0.0);

    let mut y = 0.0;
    let mut title_frame = None;
    let mut message_frame = None;

    if let Some(title) = section.title() {
        y += inset;
        let height = text.line_height(title, TextRole::Title) * metrics.title_scale;
        title_frame = Some(Rect::from_xywh(inset, y, inner, height));
        y += height;
    }

    if let Some(message) = section.message() {
        y += inset;
        let height = text.wrapped_height(message, TextRole::Message, inner);
        message_frame = Some(Rect::from_xywh(inset, y, inner, height));
        y += height;
    }

    let mut dividers = vec![Rect::from_xywh(0.0, y, width, divider)];
    y += divider;

    let rows = section.rows();
    let mut frames = vec![Rect::ZERO; rows.len()];
    let options: Vec<usize> =
        (0..rows.len()).filter(|&i| !rows[i].style().in_action_band()).collect();

    for (n, &i) in options.iter().enumerate() {
        y += inset;
        frames[i] = Rect::from_xywh(inset, y, inner, row_height);
        y += row_height;
        if n + 1 < options.len() {
            dividers.push(Rect::from_xywh(0.0, y, width, divider));
            y += divider;
        }
    }

    let cancel = section.cancel_index();
    let confirm = section.confirm_index();
    let mut band_divider = None;
    if cancel.is_some() || confirm.is_some() {
        y += inset;
        let half = ((inner - divider) / 2.0).max(0.0);
        if let Some(i) = cancel {
            frames[i] = Rect::from_xywh(inset, y, half, row_height);
        }
        if let Some(i) = confirm {
            frames[i] = Rect::from_xywh(inset + half + divider, y, half, row_height);
        }
        if cancel.is_some() && confirm.is_some() {
            band_divider = Some(Rect::from_xywh(inset + half, y, divider, row_height));
        }
        y += row_height;
    }

    let mut content_frame = None;
    if let Some(view) = section.content_view() {
        y += inset;
        content_frame = Some(Rect::from_xywh(inset, y, inner, view.height));
        y += view.height;
    }

    y += inset;
    trace!(width, height = y, rows = rows.len(), "laid out section");

    SectionLayout {
        size: Size::new(width, y),
        title: title_frame,
        message: message_frame,
        dividers,
        rows: frames,
        band_divider,
        content_view: content_frame,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::common::config::TextSettings;
    use crate::layout_engine::text::EstimatedTextMetrics;
    use crate::model::{ContentView, RowStyle};

    fn text() -> EstimatedTextMetrics { EstimatedTextMetrics::new(TextSettings::default()) }

    fn options(n: usize) -> Section<usize> {
        Section::builder(RowStyle::MultiSelect)
            .title("Multi Select")
            .message("Choose Your Options")
            .options((0..n).map(|i| (format!("Option {i}"), i)))
            .confirm("GO!")
            .build()
            .unwrap()
    }

    #[test]
    fn layout_is_pure() {
        let section = options(5);
        let metrics = SheetMetrics::default();
        let a = layout_section(&section, 325.0, &metrics, &text());
        let b = layout_section(&section, 325.0, &metrics, &text());
        assert_eq!(a, b);
    }

    #[test]
    fn height_grows_with_row_count() {
        let metrics = SheetMetrics::default();
        let mut last = 0.0;
        for n in 1..12 {
            let height = layout_section(&options(n), 325.0, &metrics, &text()).total_height();
            assert!(height >= last, "{n} rows: {height} < {last}");
            last = height;
        }
    }

    #[test]
    fn title_reserves_extra_height() {
        let metrics = SheetMetrics::default();
        let layout = layout_section(&options(1), 325.0, &metrics, &text());
        let title = layout.title.unwrap();
        assert_eq!(title, Rect::from_xywh(1.0, 1.0, 323.0, 45.0));
        let message = layout.message.unwrap();
        assert_eq!(message.origin.y, 47.0);
        assert_eq!(layout.dividers[0].origin.y, message.max_y());
    }

    #[test]
    fn cancel_and_confirm_share_a_band() {
        let metrics = SheetMetrics::default();
        let section = options(3);
        let layout = layout_section(&section, 325.0, &metrics, &text());
        let cancel = layout.rows[section.cancel_index().unwrap()];
        let confirm = layout.rows[section.confirm_index().unwrap()];

        assert_eq!(cancel.origin.y, confirm.origin.y);
        assert_eq!(cancel.size, confirm.size);
        assert_eq!(cancel.size.height, metrics.row_height);
        assert_eq!(cancel.min_x(), 1.0);
        assert_eq!(confirm.max_x(), 324.0);

        let divider = layout.band_divider.unwrap();
        assert_eq!(divider.min_x(), cancel.max_x());
        assert_eq!(divider.max_x(), confirm.min_x());
    }

    #[test]
    fn lone_cancel_keeps_its_half() {
        let metrics = SheetMetrics::default();
        let section = Section::builder(RowStyle::Default).option("Share", 0).build().unwrap();
        let layout = layout_section(&section, 325.0, &metrics, &text());
        let cancel = layout.rows[1];
        assert_eq!(cancel.size.width, 161.0);
        assert_eq!(layout.band_divider, None);
    }

    #[test]
    fn options_are_divided_except_before_the_band() {
        let metrics = SheetMetrics::default();
        let layout = layout_section(&options(4), 325.0, &metrics, &text());
        // Title divider plus one between each pair of options.
        assert_eq!(layout.dividers.len(), 1 + 3);
        for pair in layout.rows[..4].windows(2) {
            assert!(pair[0].max_y() < pair[1].min_y());
        }
    }

    #[test]
    fn rows_stack_below_the_title_block() {
        let metrics = SheetMetrics::default();
        let section = Section::builder(RowStyle::MultiSelect)
            .options([("a", 0), ("b", 1)])
            .confirm("GO!")
            .build()
            .unwrap();
        let layout = layout_section(&section, 100.0, &metrics, &text());

        // divider(1) + inset(1) + row(50) + divider(1) + inset(1) + row(50) + inset(1) + band(50) + inset(1)
        assert_eq!(layout.rows[0], Rect::from_xywh(1.0, 2.0, 98.0, 50.0));
        assert_eq!(layout.rows[1], Rect::from_xywh(1.0, 54.0, 98.0, 50.0));
        assert_eq!(layout.rows[2].origin.y, 105.0);
        assert_eq!(layout.total_height(), 156.0);
    }

    #[test]
    fn content_view_goes_last() {
        let metrics = SheetMetrics::default();
        let section = Section::builder(RowStyle::Default)
            .option("a", 0)
            .content_view(ContentView::new(7, 80.0))
            .build()
            .unwrap();
        let plain = Section::builder(RowStyle::Default).option("a", 0).build().unwrap();

        let with_view = layout_section(&section, 200.0, &metrics, &text());
        let without = layout_section(&plain, 200.0, &metrics, &text());
        let frame = with_view.content_view.unwrap();

        assert_eq!(frame.size.height, 80.0);
        assert!(frame.min_y() > with_view.rows[1].max_y());
        assert_eq!(with_view.total_height(), without.total_height() + 81.0);
    }

    #[test]
    fn row_at_hits_rows_only() {
        let metrics = SheetMetrics::default();
        let layout = layout_section(&options(2), 325.0, &metrics, &text());
        assert_eq!(layout.row_at(layout.rows[1].mid()), Some(1));
        assert_eq!(layout.row_at(layout.title.unwrap().mid()), None);
    }
}
