use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[derive(strum::Display, strum::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RowStyle {
    Default,
    MultiSelect,
    Cancel,
    ConfirmAction,
}

impl RowStyle {
    /// Cancel and confirm share the split band at the bottom of a section.
    pub fn in_action_band(self) -> bool { matches!(self, RowStyle::Cancel | RowStyle::ConfirmAction) }

    pub fn is_option(self) -> bool { !self.in_action_band() }
}

/// `(section, row)` address of a row within a sheet.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RowIndex {
    pub section: usize,
    pub row: usize,
}

impl RowIndex {
    pub const fn new(section: usize, row: usize) -> Self { Self { section, row } }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Row<P> {
    label: String,
    style: RowStyle,
    payload: Option<P>,
    selected: bool,
    enabled: bool,
}

impl<P> Row<P> {
    pub(crate) fn new(label: impl Into<String>, style: RowStyle, payload: Option<P>) -> Self {
        Self {
            label: label.into(),
            style,
            payload,
            selected: false,
            enabled: true,
        }
    }

    pub fn label(&self) -> &str { &self.label }

    pub fn style(&self) -> RowStyle { self.style }

    pub fn payload(&self) -> Option<&P> { self.payload.as_ref() }

    pub fn is_selected(&self) -> bool { self.selected }

    pub fn is_enabled(&self) -> bool { self.enabled }

    pub(crate) fn set_style(&mut self, style: RowStyle) { self.style = style; }

    pub(crate) fn set_selected(&mut self, selected: bool) { self.selected = selected; }

    pub(crate) fn set_enabled(&mut self, enabled: bool) { self.enabled = enabled; }
}
