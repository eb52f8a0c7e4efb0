//! Visual row reconstruction.
//!
//! Content streams emit text in whatever order the producer chose, so the
//! runs of one page are grouped by vertical proximity into [`Row`]s and
//! then put into reading order: rows top to bottom, runs left to right.

use crate::text::TextRun;

/// Default vertical tolerance (in user space units) for joining a row.
pub const DEFAULT_ROW_TOLERANCE: f64 = 2.0;

/// A reconstructed visual line of text.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Row {
    /// Y of the run that opened the row.
    pub anchor_y: f64,
    /// Runs on this line, ascending by X.
    pub content: Vec<TextRun>,
}

impl Row {
    /// Number of runs in the row.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Returns `true` if the row has no runs.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Text of the run at `index`, if present.
    pub fn text_at(&self, index: usize) -> Option<&str> {
        self.content.get(index).map(|run| run.text.as_str())
    }

    /// Iterate over the text of every run, left to right.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.content.iter().map(|run| run.text.as_str())
    }
}

/// Group runs into rows ordered top to bottom.
///
/// Runs are visited once in emission order. A run whose Y lies strictly
/// within `tolerance` of the current row's anchor joins that row; any other
/// run opens a new row and becomes its anchor. The anchor does not move as
/// runs join. Afterwards each row is sorted by ascending X and the rows by
/// descending anchor Y (ties by the X of their first run).
pub fn group_rows(runs: Vec<TextRun>, tolerance: f64) -> Vec<Row> {
    let mut rows: Vec<Row> = Vec::new();

    for run in runs {
        match rows.last_mut() {
            Some(row) if (run.y - row.anchor_y).abs() < tolerance => row.content.push(run),
            _ => rows.push(Row {
                anchor_y: run.y,
                content: vec![run],
            }),
        }
    }

    for row in &mut rows {
        row.content.sort_by(|a, b| a.x.total_cmp(&b.x));
    }
    rows.sort_by(|a, b| {
        b.anchor_y
            .total_cmp(&a.anchor_y)
            .then_with(|| first_x(a).total_cmp(&first_x(b)))
    });
    rows
}

fn first_x(row: &Row) -> f64 {
    row.content.first().map_or(0.0, |run| run.x)
}
