use std::cmp::Ordering;

use super::model::{PenguinDataset, Species};

// ---------------------------------------------------------------------------
// Projection of the filtered view onto the grid columns
// ---------------------------------------------------------------------------

/// One row of the data grid.
#[derive(Debug, Clone, PartialEq)]
pub struct GridRow {
    pub species: Species,
    pub island: String,
    pub bill_length_mm: Option<f64>,
    pub bill_depth_mm: Option<f64>,
    pub body_mass_g: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridColumn {
    Species,
    Island,
    BillLength,
    BillDepth,
    BodyMass,
}

impl GridColumn {
    pub const ALL: [GridColumn; 5] = [
        GridColumn::Species,
        GridColumn::Island,
        GridColumn::BillLength,
        GridColumn::BillDepth,
        GridColumn::BodyMass,
    ];

    pub fn header(self) -> &'static str {
        match self {
            GridColumn::Species => "species",
            GridColumn::Island => "island",
            GridColumn::BillLength => "bill_length_mm",
            GridColumn::BillDepth => "bill_depth_mm",
            GridColumn::BodyMass => "body_mass_g",
        }
    }

    pub fn is_numeric(self) -> bool {
        !matches!(self, GridColumn::Species | GridColumn::Island)
    }
}

impl GridRow {
    fn text(&self, column: GridColumn) -> Option<&str> {
        match column {
            GridColumn::Species => Some(self.species.as_str()),
            GridColumn::Island => Some(self.island.as_str()),
            _ => None,
        }
    }

    fn number(&self, column: GridColumn) -> Option<f64> {
        match column {
            GridColumn::BillLength => self.bill_length_mm,
            GridColumn::BillDepth => self.bill_depth_mm,
            GridColumn::BodyMass => self.body_mass_g,
            _ => None,
        }
    }

    /// Cell text as shown in the table.
    pub fn cell(&self, column: GridColumn) -> String {
        match column {
            GridColumn::Species | GridColumn::Island => {
                self.text(column).unwrap_or_default().to_string()
            }
            GridColumn::BodyMass => self
                .number(column)
                .map_or_else(|| "NA".to_string(), |v| format!("{v:.0}")),
            _ => self
                .number(column)
                .map_or_else(|| "NA".to_string(), |v| format!("{v:.1}")),
        }
    }
}

/// Project the view onto the grid columns.
pub fn grid_rows(dataset: &PenguinDataset, view: &[usize]) -> Vec<GridRow> {
    view.iter()
        .filter_map(|&i| dataset.records.get(i))
        .map(|r| GridRow {
            species: r.species,
            island: r.island.clone(),
            bill_length_mm: r.bill_length_mm,
            bill_depth_mm: r.bill_depth_mm,
            body_mass_g: r.body_mass_g,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Column filters and sorting (grid-local state)
// ---------------------------------------------------------------------------

/// Filter on a single column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnFilter {
    /// Case-insensitive substring match. Empty text matches everything.
    Text(String),
    /// Inclusive bounds; `None` leaves that side open.
    Range { min: Option<f64>, max: Option<f64> },
}

impl ColumnFilter {
    fn is_active(&self) -> bool {
        match self {
            ColumnFilter::Text(t) => !t.trim().is_empty(),
            ColumnFilter::Range { min, max } => min.is_some() || max.is_some(),
        }
    }

    fn matches(&self, row: &GridRow, column: GridColumn) -> bool {
        match self {
            ColumnFilter::Text(needle) => {
                let needle = needle.trim().to_lowercase();
                row.text(column)
                    .is_some_and(|t| t.to_lowercase().contains(&needle))
            }
            ColumnFilter::Range { min, max } => row.number(column).is_some_and(|v| {
                min.map_or(true, |lo| v >= lo) && max.map_or(true, |hi| v <= hi)
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Per-column filters plus an optional sort key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridFilters {
    filters: Vec<(GridColumn, ColumnFilter)>,
    pub sort: Option<(GridColumn, SortDirection)>,
}

impl GridFilters {
    /// Install or replace the filter for `column`.
    pub fn set(&mut self, column: GridColumn, filter: ColumnFilter) {
        self.filters.retain(|(c, _)| *c != column);
        if filter.is_active() {
            self.filters.push((column, filter));
        }
    }

    pub fn get(&self, column: GridColumn) -> Option<&ColumnFilter> {
        self.filters
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, f)| f)
    }

    pub fn clear(&mut self) {
        self.filters.clear();
        self.sort = None;
    }

    pub fn is_active(&self) -> bool {
        !self.filters.is_empty()
    }

    /// Cycle the sort on `column`: ascending, descending, off.
    pub fn toggle_sort(&mut self, column: GridColumn) {
        self.sort = match self.sort {
            Some((c, SortDirection::Ascending)) if c == column => {
                Some((column, SortDirection::Descending))
            }
            Some((c, SortDirection::Descending)) if c == column => None,
            _ => Some((column, SortDirection::Ascending)),
        };
    }

    /// Indices into `rows` of the rows to display, in display order.
    pub fn apply(&self, rows: &[GridRow]) -> Vec<usize> {
        let mut shown: Vec<usize> = rows
            .iter()
            .enumerate()
            .filter(|(_, row)| self.filters.iter().all(|(c, f)| f.matches(row, *c)))
            .map(|(i, _)| i)
            .collect();

        if let Some((column, direction)) = self.sort {
            // Stable, so ties keep view order.
            shown.sort_by(|&a, &b| compare_cells(&rows[a], &rows[b], column, direction));
        }
        shown
    }
}

/// Missing values sort last in both directions.
fn compare_cells(a: &GridRow, b: &GridRow, column: GridColumn, direction: SortDirection) -> Ordering {
    let ord = if column.is_numeric() {
        match (a.number(column), b.number(column)) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => return Ordering::Less,
            (None, Some(_)) => return Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    } else {
        a.text(column).cmp(&b.text(column))
    };
    match direction {
        SortDirection::Ascending => ord,
        SortDirection::Descending => ord.reverse(),
    }
}
