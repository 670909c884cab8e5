use serde::{Deserialize, Serialize};

use super::{ColumnRef, HeaderCell, HeaderLevel, HeaderSource};

/// One entry of a nested header row: a plain label or a label with a colspan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawNestedHeader")]
pub struct NestedHeader {
    pub label: String,
    pub colspan: usize,
}

impl NestedHeader {
    pub fn new(label: impl Into<String>, colspan: usize) -> Self {
        Self {
            label: label.into(),
            colspan: colspan.max(1),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNestedHeader {
    Label(String),
    Spanned {
        label: String,
        #[serde(default = "default_colspan")]
        colspan: usize,
    },
}

fn default_colspan() -> usize {
    1
}

impl From<RawNestedHeader> for NestedHeader {
    fn from(raw: RawNestedHeader) -> Self {
        match raw {
            RawNestedHeader::Label(label) => NestedHeader::new(label, 1),
            RawNestedHeader::Spanned { label, colspan } => NestedHeader::new(label, colspan),
        }
    }
}

impl From<&str> for NestedHeader {
    fn from(label: &str) -> Self {
        NestedHeader::new(label, 1)
    }
}

/// Multi-row headers with colspans, given top-down over visual columns.
///
/// Each row is expected to tile the visual columns. Gaps are not filled and
/// entries past the last column are clipped; those columns simply have no
/// header at that level.
#[derive(Debug, Clone, Default)]
pub struct NestedHeaders {
    /// Per row, per visual column: the cell covering that column
    rows: Vec<Vec<HeaderCell>>,
}

impl NestedHeaders {
    pub fn new(rows: &[Vec<NestedHeader>]) -> Self {
        let rows = rows
            .iter()
            .map(|row| {
                let mut cells = Vec::new();
                for header in row {
                    let origin = cells.len();
                    let colspan = header.colspan.max(1);
                    for _ in 0..colspan {
                        cells.push(HeaderCell {
                            label: header.label.clone(),
                            origin,
                            colspan,
                        });
                    }
                }
                cells
            })
            .collect();
        Self { rows }
    }
}

impl HeaderSource for NestedHeaders {
    fn levels(&self) -> usize {
        self.rows.len()
    }

    fn cell(&self, column: ColumnRef, level: HeaderLevel) -> Option<HeaderCell> {
        // Extra rows from renderers sit above the configured ones
        let from_bottom = usize::try_from(-i64::from(level.0)).ok()?;
        let row = self.rows.len().checked_sub(1)?.checked_sub(from_bottom)?;
        self.rows.get(row)?.get(column.visual).cloned()
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

    fn col(index: usize) -> ColumnRef {
        ColumnRef {
            visual: index,
            physical: index,
        }
    }

    #[test]
    fn test_deserialize_mixed_entries() {
        let rows: Vec<Vec<NestedHeader>> =
            serde_json::from_str(r#"[["A", {"label": "B", "colspan": 3}], ["C", "D", "E", "F"]]"#)
                .unwrap();
        assert_eq!(rows[0][1], NestedHeader::new("B", 3));
        assert_eq!(rows[1][3], NestedHeader::from("F"));
    }

    #[test]
    fn test_cells_cover_span() {
        let headers = NestedHeaders::new(&[
            vec![NestedHeader::from("A"), NestedHeader::new("B", 3)],
            vec!["C".into(), "D".into(), "E".into(), "F".into()],
        ]);
        assert_eq!(headers.levels(), 2);

        let outer = headers.cell(col(2), HeaderLevel(-1)).unwrap();
        assert_eq!(outer.label, "B");
        assert_eq!(outer.origin, 1);
        assert_eq!(outer.colspan, 3);

        let inner = headers.cell(col(2), HeaderLevel(0)).unwrap();
        assert_eq!(inner.label, "E");
        assert_eq!(inner.colspan, 1);

        assert!(headers.cell(col(4), HeaderLevel(0)).is_none());
        assert!(headers.cell(col(0), HeaderLevel(-2)).is_none());
    }
}
