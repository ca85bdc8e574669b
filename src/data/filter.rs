use std::collections::BTreeSet;

use super::model::{CellValue, Dataset};

// ---------------------------------------------------------------------------
// Category selection: which groups the viewer draws
// ---------------------------------------------------------------------------

/// Selected values of the category column. An empty set hides every group.
pub type FilterState = BTreeSet<CellValue>;

/// Initialise a [`FilterState`] with every category selected (show everything).
pub fn init_filter_state(dataset: &Dataset, category: &str) -> FilterState {
    dataset.unique_values(category).unwrap_or_default()
}

/// Whether rows of the given category are drawn.
pub fn is_visible(filters: &FilterState, value: &CellValue) -> bool {
    filters.contains(value)
}

/// Return indices of rows whose category is selected.
///
/// Without a category column every row passes. A row with a null category
/// passes only if `Null` is selected.
pub fn filtered_indices(dataset: &Dataset, category: &str, filters: &FilterState) -> Vec<usize> {
    let Some(column) = dataset.column(category) else {
        return (0..dataset.n_rows()).collect();
    };
    column
        .values
        .iter()
        .enumerate()
        .filter(|(_, v)| is_visible(filters, v))
        .map(|(i, _)| i)
        .collect()
}
