use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::layout::TextAlign;

/// A4 in PDF points.
pub const DEFAULT_PAGE_WIDTH_PT: f32 = 595.0;
pub const DEFAULT_PAGE_HEIGHT_PT: f32 = 842.0;

/// `form.json`: the annotated rows of one printed form. Coordinates are PDF points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormDefinition {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default = "default_page_width")]
    pub page_width: f32,
    #[serde(default = "default_page_height")]
    pub page_height: f32,
    pub rows: Vec<FormRow>,
}

impl FormDefinition {
    /// The distinct non-empty source strings a translation has to cover.
    pub fn keys(&self) -> BTreeSet<&str> {
        self.rows
            .iter()
            .map(|r| r.content.as_str())
            .filter(|c| !c.is_empty())
            .collect()
    }
}

/// One annotated source string. Rows with `append` continue the previous row on
/// the same page instead of getting a box of their own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormRow {
    pub page: u32,
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub append: Option<String>,
    #[serde(default)]
    pub align: TextAlign,
}

/// `<lang>.csv`: source string → translated string.
pub type Translation = HashMap<String, String>;

fn default_page_width() -> f32 {
    DEFAULT_PAGE_WIDTH_PT
}

fn default_page_height() -> f32 {
    DEFAULT_PAGE_HEIGHT_PT
}
