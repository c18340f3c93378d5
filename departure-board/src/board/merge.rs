//! Combining the two adapters' row lists into one board.

use super::row::DepartureRow;

/// How rail and tube rows are arranged on the final board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CombineMode {
    /// All rail rows, then all tube rows.
    #[default]
    Concatenate,

    /// Alternate one row from each list; once the shorter list runs out,
    /// the remainder of the longer list follows.
    Interleave,
}

/// Combine two row lists and reassign `index` as a contiguous 1-based
/// sequence over the final order.
///
/// Re-indexing always happens, overwriting whatever the adapters set.
pub fn combine(rail: Vec<DepartureRow>, tube: Vec<DepartureRow>, mode: CombineMode) -> Vec<DepartureRow> {
    let mut rows = match mode {
        CombineMode::Concatenate => {
            let mut rows = rail;
            rows.extend(tube);
            rows
        }
        CombineMode::Interleave => interleave(rail, tube),
    };
    reindex(&mut rows);
    rows
}

fn interleave(a: Vec<DepartureRow>, b: Vec<DepartureRow>) -> Vec<DepartureRow> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    let mut a = a.into_iter();
    let mut b = b.into_iter();
    loop {
        match (a.next(), b.next()) {
            (None, None) => break,
            (x, y) => {
                out.extend(x);
                out.extend(y);
            }
        }
    }
    out
}

fn reindex(rows: &mut [DepartureRow]) {
    for (i, row) in rows.iter_mut().enumerate() {
        row.index = (i + 1) as u32;
    }
}
