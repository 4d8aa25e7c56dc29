use maud::{Markup, Render, html};
use serde_json::Number;
use std::{
    cmp::Ordering,
    fmt::{Debug, Display, Formatter},
};

/// The value a cell sorts by. Numbers order before text.
#[derive(Clone, Debug)]
pub enum SortKey {
    Number(Number),
    Text(String),
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => compare_numbers(a, b),
            (Self::Number(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Number(_)) => Ordering::Greater,
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SortKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SortKey {}

// integers compare exactly, anything involving a float falls back to f64
fn compare_numbers(a: &Number, b: &Number) -> Ordering {
    let integer = |n: &Number| {
        n.as_i64()
            .map(i128::from)
            .or_else(|| n.as_u64().map(i128::from))
    };

    match (integer(a), integer(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        _ => {
            let a = a.as_f64().unwrap_or(f64::NAN);
            let b = b.as_f64().unwrap_or(f64::NAN);
            a.total_cmp(&b)
        }
    }
}

impl Display for SortKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(t) => write!(f, "{t}"),
        }
    }
}

impl Render for SortKey {
    fn render(&self) -> Markup {
        html! {(self.to_string())}
    }
}

pub enum Cell<R> {
    Accessor(fn(&R) -> SortKey),
    Renderer(fn(&R) -> Markup),
}

impl<R> Clone for Cell<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for Cell<R> {}

pub struct Column<R> {
    pub label: &'static str,
    pub cell: Cell<R>,
}

impl<R> Column<R> {
    pub const fn accessor(label: &'static str, accessor: fn(&R) -> SortKey) -> Self {
        Self {
            label,
            cell: Cell::Accessor(accessor),
        }
    }

    pub const fn renderer(label: &'static str, renderer: fn(&R) -> Markup) -> Self {
        Self {
            label,
            cell: Cell::Renderer(renderer),
        }
    }

    pub const fn is_sortable(&self) -> bool {
        matches!(self.cell, Cell::Accessor(_))
    }

    fn render_cell(&self, row: &R) -> Markup {
        match self.cell {
            Cell::Accessor(accessor) => accessor(row).render(),
            Cell::Renderer(renderer) => renderer(row),
        }
    }
}

impl<R> Clone for Column<R> {
    fn clone(&self) -> Self {
        Self {
            label: self.label,
            cell: self.cell,
        }
    }
}

impl<R> Debug for Column<R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Column")
            .field("label", &self.label)
            .field("sortable", &self.is_sortable())
            .finish()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SortState {
    active: Option<(usize, SortDirection)>,
}

impl SortState {
    /// unsorted -> ascending -> descending -> unsorted, and a new column always starts ascending
    pub fn toggle<R>(&mut self, columns: &[Column<R>], column: usize) {
        if !columns.get(column).is_some_and(Column::is_sortable) {
            return;
        }

        self.active = match self.active {
            Some((current, SortDirection::Ascending)) if current == column => {
                Some((column, SortDirection::Descending))
            }
            Some((current, SortDirection::Descending)) if current == column => None,
            _ => Some((column, SortDirection::Ascending)),
        };
    }

    pub fn direction_for(&self, column: usize) -> Option<SortDirection> {
        self.active
            .and_then(|(current, direction)| (current == column).then_some(direction))
    }

    /// Indices into `rows` in display order. Ties keep their original relative order.
    pub fn display_order<R>(&self, columns: &[Column<R>], rows: &[R]) -> Vec<usize> {
        let mut order: Vec<usize> = (0..rows.len()).collect();

        let Some((column, direction)) = self.active else {
            return order;
        };
        let Some(Cell::Accessor(accessor)) = columns.get(column).map(|c| c.cell) else {
            return order;
        };

        let keys: Vec<SortKey> = rows.iter().map(accessor).collect();
        match direction {
            SortDirection::Ascending => order.sort_by(|&a, &b| keys[a].cmp(&keys[b])),
            SortDirection::Descending => order.sort_by(|&a, &b| keys[b].cmp(&keys[a])),
        }
        order
    }
}

pub fn render<R>(
    columns: &[Column<R>],
    rows: &[R],
    sort: SortState,
    sort_url: &str,
    target: &str,
) -> Markup {
    html! {
        div class="overflow-x-auto" {
            table class="min-w-full bg-gray-800 rounded shadow-md" {
                thead class="bg-gray-700" {
                    tr {
                        @for (i, column) in columns.iter().enumerate() {
                            @if column.is_sortable() {
                                th class="py-2 px-4 text-left font-semibold text-gray-300 uppercase cursor-pointer select-none" hx-post=(sort_url) hx-vals={"{\"column\": " (i) "}"} hx-target=(target) {
                                    (column.label)
                                    span {
                                        @match sort.direction_for(i) {
                                            Some(SortDirection::Ascending) => " ▲",
                                            Some(SortDirection::Descending) => " ▼",
                                            None => "",
                                        }
                                    }
                                }
                            } @else {
                                th class="py-2 px-4 text-left font-semibold text-gray-300 uppercase" {(column.label)}
                            }
                        }
                    }
                }
                tbody {
                    @for index in sort.display_order(columns, rows) {
                        tr {
                            @for column in columns {
                                td class="py-2 px-4 border-b border-gray-600 text-gray-200 whitespace-nowrap" {(column.render_cell(&rows[index]))}
                            }
                        }
                    }
                }
            }
        }
    }
}
