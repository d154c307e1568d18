use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::row::{Row, RowStyle};
use crate::common::error::{Result, SheetError};

pub const DEFAULT_CANCEL_LABEL: &str = "Cancel";

/// An externally owned view placed below a section's rows. Only its declared
/// height takes part in layout; `handle` lets the host find its view again.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct ContentView {
    pub handle: u64,
    pub height: f64,
}

impl ContentView {
    pub fn new(handle: u64, height: f64) -> Self { Self { handle, height } }
}

/// A group of rows presented together under an optional title and message.
///
/// Row membership is fixed once built. Only selection, enablement and the
/// Default/MultiSelect style of option rows change afterwards, and the confirm
/// row's enablement always mirrors the selection.
#[derive(Clone, Debug, PartialEq)]
pub struct Section<P> {
    title: Option<String>,
    message: Option<String>,
    rows: Vec<Row<P>>,
    content_view: Option<ContentView>,
}

pub struct SectionBuilder<P> {
    style: RowStyle,
    title: Option<String>,
    message: Option<String>,
    options: Vec<(String, P)>,
    cancel_label: String,
    confirm: Option<(String, Option<P>)>,
    content_view: Option<ContentView>,
}

impl<P> SectionBuilder<P> {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn option(mut self, label: impl Into<String>, payload: P) -> Self {
        self.options.push((label.into(), payload));
        self
    }

    pub fn options<L: Into<String>>(mut self, options: impl IntoIterator<Item = (L, P)>) -> Self {
        self.options.extend(options.into_iter().map(|(label, payload)| (label.into(), payload)));
        self
    }

    pub fn cancel_label(mut self, label: impl Into<String>) -> Self {
        self.cancel_label = label.into();
        self
    }

    pub fn confirm(mut self, label: impl Into<String>) -> Self {
        self.confirm = Some((label.into(), None));
        self
    }

    pub fn confirm_with(mut self, label: impl Into<String>, payload: P) -> Self {
        self.confirm = Some((label.into(), Some(payload)));
        self
    }

    pub fn content_view(mut self, view: ContentView) -> Self {
        self.content_view = Some(view);
        self
    }

    pub fn build(self) -> Result<Section<P>> {
        if !self.style.is_option() {
            warn!(style = %self.style, "option rows need the default or multi_select style");
            return Err(SheetError::InvalidOptionStyle(self.style));
        }
        if self.options.is_empty() {
            warn!("refusing to build a section without options");
            return Err(SheetError::NoOptions);
        }

        let style = self.style;
        let mut rows: Vec<Row<P>> = self
            .options
            .into_iter()
            .map(|(label, payload)| Row::new(label, style, Some(payload)))
            .collect();
        rows.push(Row::new(self.cancel_label, RowStyle::Cancel, None));
        if let Some((label, payload)) = self.confirm {
            let mut confirm = Row::new(label, RowStyle::ConfirmAction, payload);
            confirm.set_enabled(false);
            rows.push(confirm);
        }

        Ok(Section {
            title: self.title.filter(|t| !t.is_empty()),
            message: self.message.filter(|m| !m.is_empty()),
            rows,
            content_view: self.content_view,
        })
    }
}

impl<P> Section<P> {
    /// Starts a section whose option rows all use `style`. A cancel row is
    /// always appended after the options.
    pub fn builder(style: RowStyle) -> SectionBuilder<P> {
        SectionBuilder {
            style,
            title: None,
            message: None,
            options: Vec::new(),
            cancel_label: DEFAULT_CANCEL_LABEL.to_string(),
            confirm: None,
            content_view: None,
        }
    }

    pub fn title(&self) -> Option<&str> { self.title.as_deref() }

    pub fn message(&self) -> Option<&str> { self.message.as_deref() }

    pub fn rows(&self) -> &[Row<P>] { &self.rows }

    pub fn content_view(&self) -> Option<&ContentView> { self.content_view.as_ref() }

    pub fn row(&self, index: usize) -> Result<&Row<P>> {
        self.rows.get(index).ok_or_else(|| self.out_of_range(index))
    }

    pub fn cancel_index(&self) -> Option<usize> {
        self.rows.iter().position(|r| r.style() == RowStyle::Cancel)
    }

    pub fn confirm_index(&self) -> Option<usize> {
        self.rows.iter().position(|r| r.style() == RowStyle::ConfirmAction)
    }

    pub fn confirm_row(&self) -> Option<&Row<P>> { self.confirm_index().map(|i| &self.rows[i]) }

    /// True iff at least one multi-select row is selected, regardless of how
    /// many options the section has.
    pub fn confirm_enabled(&self) -> bool {
        self.rows.iter().any(|r| r.style() == RowStyle::MultiSelect && r.is_selected())
    }

    /// Flips the selection of a multi-select row. Returns whether anything changed;
    /// rows of other styles are left alone.
    pub fn toggle(&mut self, index: usize) -> Result<bool> {
        let len = self.rows.len();
        let Some(row) = self.rows.get_mut(index) else {
            warn!(index, len, "toggle: row index out of range");
            return Err(SheetError::IndexOutOfRange { index, len });
        };
        if row.style() != RowStyle::MultiSelect {
            warn!(index, style = %row.style(), "toggle ignored for non multi-select row");
            return Ok(false);
        }
        row.set_selected(!row.is_selected());
        debug!(index, selected = row.is_selected(), "toggled row");
        self.refresh_confirm();
        Ok(true)
    }

    /// Switches an option row between the default and multi-select styles.
    pub fn set_row_style(&mut self, index: usize, style: RowStyle) -> Result<()> {
        let from = self.row(index).map_err(|e| self.log_range(e))?.style();
        if !from.is_option() || !style.is_option() {
            warn!(index, %from, to = %style, "style change would break the action band");
            return Err(SheetError::InvalidStyleChange { index, from, to: style });
        }
        let row = &mut self.rows[index];
        row.set_style(style);
        if style != RowStyle::MultiSelect {
            row.set_selected(false);
        }
        self.refresh_confirm();
        Ok(())
    }

    pub fn set_row_enabled(&mut self, index: usize, enabled: bool) -> Result<()> {
        let style = self.row(index).map_err(|e| self.log_range(e))?.style();
        if style == RowStyle::ConfirmAction {
            warn!(index, "confirm enablement is derived from the selection");
            return Err(SheetError::DerivedEnablement);
        }
        self.rows[index].set_enabled(enabled);
        Ok(())
    }

    pub fn selected_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, r)| r.style() == RowStyle::MultiSelect && r.is_selected())
            .map(|(i, _)| i)
    }

    pub fn selected_payloads(&self) -> impl Iterator<Item = &P> + '_ {
        self.selected_indices().filter_map(move |i| self.rows[i].payload())
    }

    pub fn clear_selection(&mut self) {
        for row in &mut self.rows {
            row.set_selected(false);
        }
        self.refresh_confirm();
    }

    fn refresh_confirm(&mut self) {
        let enabled = self.confirm_enabled();
        if let Some(index) = self.confirm_index() {
            self.rows[index].set_enabled(enabled);
        }
    }

    fn out_of_range(&self, index: usize) -> SheetError {
        SheetError::IndexOutOfRange { index, len: self.rows.len() }
    }

    fn log_range(&self, err: SheetError) -> SheetError {
        warn!(error = %err, "row lookup failed");
        err
    }
}
