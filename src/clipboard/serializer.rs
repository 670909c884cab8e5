//! Resolve a selection range into a [`CopyableTable`].
//!
//! Rows and columns are taken from the range's visual span clipped to the
//! current visual counts. Trimmed indexes have no visual index and so never
//! appear; hidden indexes are exported unless `skip_hidden` is set.

use std::fmt;

use super::table::{CopyableTable, HeaderSlot};
use super::ClipboardPayload;
use crate::config::CopyPasteSettings;
use crate::data::{CellValue, DataAccessor};
use crate::headers::{ColumnHeaders, ColumnRef, HeaderLevel};
use crate::index_mapper::IndexMapper;
use crate::types::CellRange;

/// Which header rows accompany the copied cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CopyMode {
    #[default]
    CellsOnly,
    /// Innermost header row only, no cells
    ColumnHeadersOnly,
    /// Innermost header row plus cells
    WithColumnHeaders,
    /// Every header row plus cells
    WithAllColumnHeaders,
}

impl CopyMode {
    fn includes_cells(self) -> bool {
        self != CopyMode::ColumnHeadersOnly
    }
}

/// Everything the serializer reads from a grid.
#[derive(Clone, Copy)]
pub struct CopySource<'a> {
    /// Values by physical index
    pub data: &'a dyn DataAccessor,
    pub rows: &'a IndexMapper,
    pub columns: &'a IndexMapper,
    pub headers: &'a ColumnHeaders,
}

/// Per-cell value transform: `(value, visual row, visual column) -> text`.
pub type CellTransform = Box<dyn Fn(&CellValue, usize, usize) -> String>;

/// Builds clipboard tables from selection ranges.
#[derive(Default)]
pub struct ClipboardSerializer {
    pub rows_limit: Option<usize>,
    pub columns_limit: Option<usize>,
    pub skip_hidden: bool,
    cell_transform: Option<CellTransform>,
}

impl fmt::Debug for ClipboardSerializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClipboardSerializer")
            .field("rows_limit", &self.rows_limit)
            .field("columns_limit", &self.columns_limit)
            .field("skip_hidden", &self.skip_hidden)
            .field("cell_transform", &self.cell_transform.is_some())
            .finish()
    }
}

impl ClipboardSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_settings(settings: &CopyPasteSettings) -> Self {
        Self {
            rows_limit: settings.rows_limit,
            columns_limit: settings.columns_limit,
            skip_hidden: settings.skip_hidden,
            cell_transform: None,
        }
    }

    pub fn set_cell_transform(&mut self, transform: Option<CellTransform>) {
        self.cell_transform = transform;
    }

    /// Serialize `range` straight to both clipboard formats.
    pub fn serialize(&self, source: &CopySource<'_>, range: &CellRange, mode: CopyMode) -> ClipboardPayload {
        self.table(source, range, mode).to_payload()
    }

    /// Resolve `range` into header rows and data rows.
    pub fn table(&self, source: &CopySource<'_>, range: &CellRange, mode: CopyMode) -> CopyableTable {
        let column_indexes = self.axis_indexes(
            range.column_span(source.columns.count_visual()),
            source.columns,
            self.columns_limit,
            "columns",
        );
        if column_indexes.is_empty() {
            return CopyableTable::default();
        }
        let row_indexes = if mode.includes_cells() {
            self.axis_indexes(
                range.row_span(source.rows.count_visual()),
                source.rows,
                self.rows_limit,
                "rows",
            )
        } else {
            Vec::new()
        };

        let column_headers = header_levels(source.headers.levels(), mode)
            .into_iter()
            .map(|level| Self::header_row(source, &column_indexes, level))
            .collect();

        let rows = row_indexes
            .iter()
            .map(|&row| {
                let physical_row = source.rows.to_physical(row);
                column_indexes
                    .iter()
                    .map(|&col| {
                        let value = match (physical_row, source.columns.to_physical(col)) {
                            (Some(r), Some(c)) => source.data.value_at(r, c),
                            _ => CellValue::Empty,
                        };
                        match &self.cell_transform {
                            Some(transform) => transform(&value, row, col),
                            None => value.to_string(),
                        }
                    })
                    .collect()
            })
            .collect();

        CopyableTable {
            column_headers,
            rows,
            row_indexes,
            column_indexes,
        }
    }

    fn axis_indexes(
        &self,
        span: Option<std::ops::RangeInclusive<usize>>,
        mapper: &IndexMapper,
        limit: Option<usize>,
        axis: &str,
    ) -> Vec<usize> {
        let Some(span) = span else {
            return Vec::new();
        };
        let mut indexes: Vec<usize> = if self.skip_hidden {
            span.filter(|&visual| !mapper.is_visual_hidden(visual)).collect()
        } else {
            span.collect()
        };
        if let Some(limit) = limit {
            if indexes.len() > limit {
                log::warn!(
                    "copy of {} {axis} exceeds the limit of {limit}, truncating",
                    indexes.len()
                );
                indexes.truncate(limit);
            }
        }
        indexes
    }

    /// One header row: a label slot at the first exported column of every
    /// header, covered slots for the rest of its span.
    fn header_row(source: &CopySource<'_>, columns: &[usize], level: HeaderLevel) -> Vec<HeaderSlot> {
        let mut slots = Vec::with_capacity(columns.len());
        let mut remaining = columns.iter().copied().peekable();
        while let Some(col) = remaining.next() {
            let column = ColumnRef {
                visual: col,
                physical: source.columns.to_physical(col).unwrap_or(col),
            };
            let Some(cell) = source.headers.cell(column, level) else {
                slots.push(HeaderSlot::label(""));
                continue;
            };
            let span_end = cell.origin.saturating_add(cell.colspan);
            let mut colspan = 1;
            while remaining.next_if(|&next| next < span_end).is_some() {
                colspan += 1;
            }
            slots.push(HeaderSlot::Label {
                text: cell.label,
                colspan,
            });
            slots.extend(std::iter::repeat(HeaderSlot::Covered).take(colspan - 1));
        }
        slots
    }
}

/// Header levels to emit, outermost first.
fn header_levels(levels: usize, mode: CopyMode) -> Vec<HeaderLevel> {
    if levels == 0 {
        return Vec::new();
    }
    match mode {
        CopyMode::CellsOnly => Vec::new(),
        CopyMode::ColumnHeadersOnly | CopyMode::WithColumnHeaders => vec![HeaderLevel::INNERMOST],
        CopyMode::WithAllColumnHeaders => (0..levels)
            .filter_map(|index| HeaderLevel::from_row_index(index, levels))
            .collect(),
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::data::GridData;
    use crate::headers::{NestedHeader, NestedHeaders};
    use crate::index_mapper::IndexMapType;
    use crate::types::CellCoords;

    struct Fixture {
        data: GridData,
        rows: IndexMapper,
        columns: IndexMapper,
        headers: ColumnHeaders,
    }

    impl Fixture {
        fn new(rows: usize, cols: usize) -> Self {
            Self {
                data: GridData::spreadsheet(rows, cols),
                rows: IndexMapper::new(rows),
                columns: IndexMapper::new(cols),
                headers: ColumnHeaders::new(true),
            }
        }

        fn source(&self) -> CopySource<'_> {
            CopySource {
                data: &self.data,
                rows: &self.rows,
                columns: &self.columns,
                headers: &self.headers,
            }
        }
    }

    fn range(r1: i32, c1: i32, r2: i32, c2: i32) -> CellRange {
        CellRange::between(CellCoords::new(r1, c1), CellCoords::new(r2, c2))
    }

    #[test]
    fn test_cells_only() {
        let fixture = Fixture::new(5, 5);
        let payload = ClipboardSerializer::new().serialize(
            &fixture.source(),
            &range(1, 1, 2, 3),
            CopyMode::CellsOnly,
        );
        assert_eq!(payload.plain_text, "B2\tC2\tD2\nB3\tC3\tD3");
    }

    #[test]
    fn test_with_column_headers() {
        let fixture = Fixture::new(3, 3);
        let table = ClipboardSerializer::new().table(
            &fixture.source(),
            &range(0, 0, 1, 1),
            CopyMode::WithColumnHeaders,
        );
        assert_eq!(table.to_plain_text(), "A\tB\nA1\tB1\nA2\tB2");
    }

    #[test]
    fn test_trimmed_column_is_skipped_hidden_is_kept() {
        let mut fixture = Fixture::new(2, 4);
        fixture
            .columns
            .register_index_map("trim", IndexMapType::Trimming, |c| c == 1);
        fixture
            .columns
            .register_index_map("hide", IndexMapType::Hiding, |c| c == 2);
        let table = ClipboardSerializer::new().table(
            &fixture.source(),
            &range(0, 0, 0, 2),
            CopyMode::WithColumnHeaders,
        );
        assert_eq!(table.to_plain_text(), "A\tC\tD\nA1\tC1\tD1");
        assert_eq!(table.column_indexes, vec![0, 1, 2]);
    }

    #[test]
    fn test_skip_hidden() {
        let mut fixture = Fixture::new(2, 3);
        fixture
            .rows
            .register_index_map("hide", IndexMapType::Hiding, |r| r == 0);
        let serializer = ClipboardSerializer {
            skip_hidden: true,
            ..ClipboardSerializer::default()
        };
        let table = serializer.table(&fixture.source(), &range(0, 0, 1, 0), CopyMode::CellsOnly);
        assert_eq!(table.to_plain_text(), "A2");
    }

    #[test]
    fn test_limits_truncate() {
        let fixture = Fixture::new(10, 10);
        let serializer = ClipboardSerializer {
            rows_limit: Some(2),
            columns_limit: Some(1),
            ..ClipboardSerializer::default()
        };
        let table = serializer.table(&fixture.source(), &range(0, 0, 9, 9), CopyMode::CellsOnly);
        assert_eq!(table.to_plain_text(), "A1\nA2");
    }

    #[test]
    fn test_cell_transform() {
        let fixture = Fixture::new(2, 2);
        let mut serializer = ClipboardSerializer::new();
        serializer.set_cell_transform(Some(Box::new(|value: &CellValue, row: usize, col: usize| {
            format!("{value}@{row},{col}")
        })));
        let table = serializer.table(&fixture.source(), &range(1, 1, 1, 1), CopyMode::CellsOnly);
        assert_eq!(table.to_plain_text(), "B2@1,1");
    }

    #[test]
    fn test_nested_span_clipped_by_selection() {
        let mut fixture = Fixture::new(1, 4);
        fixture.headers.set_source(NestedHeaders::new(&[
            vec![NestedHeader::from("A"), NestedHeader::new("B", 3)],
            vec!["C".into(), "D".into(), "E".into(), "F".into()],
        ]));
        let table = ClipboardSerializer::new().table(
            &fixture.source(),
            &range(0, 2, 0, 3),
            CopyMode::WithAllColumnHeaders,
        );
        assert_eq!(table.to_plain_text(), "B\t\nE\tF\nC1\tD1");
        assert!(table.to_html().contains("<tr><th colspan=2>B</th></tr>"));
    }

    #[test]
    fn test_headers_only_with_headers_disabled_is_empty() {
        let mut fixture = Fixture::new(2, 2);
        fixture.headers.set_enabled(false);
        let table = ClipboardSerializer::new().table(
            &fixture.source(),
            &range(0, 0, 1, 1),
            CopyMode::ColumnHeadersOnly,
        );
        assert!(table.is_empty());
    }
}
