pub mod description;
pub mod row;
pub mod section;

pub use row::{Row, RowIndex, RowStyle};
pub use section::{ContentView, Section, SectionBuilder};
