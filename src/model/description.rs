//! Serializable description of a sheet's sections, used by the layout tool.

use anyhow::Context;
use serde::{Deserialize, Serialize};

use super::row::RowStyle;
use super::section::{ContentView, Section};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SheetDescription {
    pub sections: Vec<SectionDescription>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SectionDescription {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default = "default_style")]
    pub style: RowStyle,
    pub options: Vec<String>,
    #[serde(default)]
    pub confirm: Option<String>,
    #[serde(default)]
    pub cancel: Option<String>,
    /// Indices of options that start out selected.
    #[serde(default)]
    pub selected: Vec<usize>,
    #[serde(default)]
    pub content_height: Option<f64>,
}

fn default_style() -> RowStyle { RowStyle::MultiSelect }

impl SheetDescription {
    pub fn parse(contents: &str) -> anyhow::Result<Self> { Ok(toml::from_str(contents)?) }

    /// Builds the sections, with each option's label doubling as its payload.
    pub fn build_sections(&self) -> anyhow::Result<Vec<Section<String>>> {
        self.sections
            .iter()
            .enumerate()
            .map(|(index, desc)| desc.build(index).with_context(|| format!("section {index}")))
            .collect()
    }
}

impl SectionDescription {
    fn build(&self, index: usize) -> anyhow::Result<Section<String>> {
        let mut builder = Section::builder(self.style)
            .options(self.options.iter().map(|label| (label.clone(), label.clone())));
        if let Some(title) = &self.title {
            builder = builder.title(title.clone());
        }
        if let Some(message) = &self.message {
            builder = builder.message(message.clone());
        }
        if let Some(confirm) = &self.confirm {
            builder = builder.confirm(confirm.clone());
        }
        if let Some(cancel) = &self.cancel {
            builder = builder.cancel_label(cancel.clone());
        }
        if let Some(height) = self.content_height {
            builder = builder.content_view(ContentView::new(index as u64, height));
        }
        let mut section = builder.build()?;
        for &row in &self.selected {
            section.toggle(row)?;
        }
        Ok(section)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [[sections]]
        title = "Multi Select"
        message = "Choose Your Options"
        options = ["Option 1", "Option 2", "Option 3"]
        confirm = "GO!"
        selected = [1]

        [[sections]]
        style = "default"
        options = ["Share"]
        cancel = "Close"
    "#;

    #[test]
    fn builds_sections_with_selection() {
        let desc = SheetDescription::parse(SAMPLE).unwrap();
        let sections = desc.build_sections().unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].selected_payloads().collect::<Vec<_>>(), vec!["Option 2"]);
        assert!(sections[0].confirm_row().unwrap().is_enabled());
        assert_eq!(sections[1].rows()[0].style(), RowStyle::Default);
        assert_eq!(sections[1].rows()[1].label(), "Close");
    }

    #[test]
    fn bad_selection_names_the_section() {
        let desc = SheetDescription::parse(
            r#"
            [[sections]]
            options = ["a"]
            selected = [4]
            "#,
        )
        .unwrap();
        let err = desc.build_sections().unwrap_err();
        assert!(format!("{err:#}").contains("section 0"));
    }

    #[test]
    fn empty_options_are_rejected() {
        let desc = SheetDescription::parse("[[sections]]\noptions = []\n").unwrap();
        assert!(desc.build_sections().is_err());
    }
}
