//! Grid settings, loaded from JSON (native) or a JS object (wasm).

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{GridError, Result};
use crate::headers::NestedHeader;
use crate::layout::{ColumnStretch, RenderOffset, ViewportOptions, DEFAULT_COLUMN_WIDTH, DEFAULT_ROW_HEIGHT};
use crate::types::LayoutDirection;

/// Copy/paste limits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CopyPasteSettings {
    /// Maximum rows in one copy; extra rows are dropped
    pub rows_limit: Option<usize>,
    /// Maximum columns in one copy; extra columns are dropped
    pub columns_limit: Option<usize>,
    /// Leave hidden rows/columns out of copies and pastes
    pub skip_hidden: bool,
}

/// Grid-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridSettings {
    pub col_headers: bool,
    pub row_headers: bool,
    /// Header rows top-down; overrides the spreadsheet labels when set
    pub nested_headers: Option<Vec<Vec<NestedHeader>>>,
    pub fixed_rows_top: usize,
    pub fixed_columns_start: usize,
    pub default_row_height: f32,
    pub default_column_width: f32,
    #[serde(rename = "stretchH")]
    pub stretch_h: ColumnStretch,
    /// Extra rows rendered around the viewport; `None` is automatic
    #[serde(deserialize_with = "deserialize_offset")]
    pub viewport_row_rendering_offset: Option<usize>,
    #[serde(deserialize_with = "deserialize_offset")]
    pub viewport_column_rendering_offset: Option<usize>,
    pub render_all_rows: bool,
    pub render_all_columns: bool,
    pub layout_direction: LayoutDirection,
    pub copy_paste: CopyPasteSettings,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            col_headers: true,
            row_headers: false,
            nested_headers: None,
            fixed_rows_top: 0,
            fixed_columns_start: 0,
            default_row_height: DEFAULT_ROW_HEIGHT,
            default_column_width: DEFAULT_COLUMN_WIDTH,
            stretch_h: ColumnStretch::None,
            viewport_row_rendering_offset: None,
            viewport_column_rendering_offset: None,
            render_all_rows: false,
            render_all_columns: false,
            layout_direction: LayoutDirection::Ltr,
            copy_paste: CopyPasteSettings::default(),
        }
    }
}

impl GridSettings {
    /// Decode and validate settings from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("defaultRowHeight", self.default_row_height),
            ("defaultColumnWidth", self.default_column_width),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(GridError::InvalidSettings(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        Ok(())
    }

    pub fn viewport_options(&self) -> ViewportOptions {
        ViewportOptions {
            row_offset: RenderOffset::from_setting(self.viewport_row_rendering_offset),
            column_offset: RenderOffset::from_setting(self.viewport_column_rendering_offset),
            render_all_rows: self.render_all_rows,
            render_all_columns: self.render_all_columns,
            ..ViewportOptions::default()
        }
    }
}

/// Accepts a number, `null` or `"auto"`.
fn deserialize_offset<'de, D>(deserializer: D) -> std::result::Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Offset {
        Items(usize),
        Keyword(String),
    }

    match Option::<Offset>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Offset::Items(n)) => Ok(Some(n)),
        Some(Offset::Keyword(k)) if k == "auto" => Ok(None),
        Some(Offset::Keyword(k)) => Err(serde::de::Error::custom(format!(
            "expected a number or \"auto\", got \"{k}\""
        ))),
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_object() {
        let settings = GridSettings::from_json("{}").unwrap();
        assert_eq!(settings, GridSettings::default());
        assert!(settings.col_headers);
        assert_eq!(settings.default_row_height, 23.0);
    }

    #[test]
    fn test_full_settings() {
        let settings = GridSettings::from_json(
            r#"{
                "colHeaders": false,
                "nestedHeaders": [["A", {"label": "B", "colspan": 2}], ["C", "D", "E"]],
                "fixedRowsTop": 2,
                "stretchH": "all",
                "viewportRowRenderingOffset": 5,
                "viewportColumnRenderingOffset": "auto",
                "layoutDirection": "rtl",
                "copyPaste": {"rowsLimit": 100, "skipHidden": true}
            }"#,
        )
        .unwrap();
        assert!(!settings.col_headers);
        assert_eq!(settings.nested_headers.as_ref().unwrap()[0][1], NestedHeader::new("B", 2));
        assert_eq!(settings.fixed_rows_top, 2);
        assert_eq!(settings.stretch_h, ColumnStretch::All);
        assert_eq!(settings.viewport_row_rendering_offset, Some(5));
        assert_eq!(settings.viewport_column_rendering_offset, None);
        assert!(settings.layout_direction.is_rtl());
        assert_eq!(settings.copy_paste.rows_limit, Some(100));
        assert_eq!(settings.copy_paste.columns_limit, None);
        assert!(settings.copy_paste.skip_hidden);

        let options = settings.viewport_options();
        assert_eq!(options.row_offset, RenderOffset::Items(5));
        assert_eq!(options.column_offset, RenderOffset::Auto);
    }

    #[test]
    fn test_invalid_offset_keyword() {
        assert!(matches!(
            GridSettings::from_json(r#"{"viewportRowRenderingOffset": "lots"}"#),
            Err(GridError::Json(_))
        ));
    }

    #[test]
    fn test_non_positive_sizes_rejected() {
        assert!(matches!(
            GridSettings::from_json(r#"{"defaultRowHeight": 0}"#),
            Err(GridError::InvalidSettings(_))
        ));
        assert!(matches!(
            GridSettings::from_json(r#"{"defaultColumnWidth": -4}"#),
            Err(GridError::InvalidSettings(_))
        ));
    }
}
