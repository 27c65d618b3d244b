use prettytable::format::Alignment;
use prettytable::{row, Cell, Row, Table};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::compressor::reference::ReferenceAlgorithm;
use crate::error::Result;
use crate::metrics::{Compared, RowMetrics};

/// Outcome of one test.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub test_name: String,
    /// Input file name as shown in the table.
    pub file_name: String,
    /// Both variants decoded back to the original bytes.
    pub correct: bool,
    pub metrics: RowMetrics,
    /// Encoded artifacts whose header disagreed with the requested variant.
    #[serde(default)]
    pub header_warnings: usize,
}

impl ResultRow {
    pub fn status(&self) -> &'static str {
        if self.correct {
            "Good"
        } else {
            "FAILED"
        }
    }
}

/// Rows of a run in execution order, plus the failure count.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    rows: Vec<ResultRow>,
    failed: usize,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: ResultRow) {
        if !row.correct {
            self.failed += 1;
        }
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    /// Process exit status for the run: 1 if any round trip failed.
    pub fn exit_code(&self) -> i32 {
        if self.failed == 0 {
            0
        } else {
            1
        }
    }

    pub fn table(&self) -> Table {
        results_table(&self.rows)
    }
}

fn format_compared(compared: &Compared) -> String {
    format!("{:.2} ({:.0}%)", compared.ratio, compared.improvement_pct)
}

/// Renders rows as a left-aligned table.
pub fn results_table(rows: &[ResultRow]) -> Table {
    let mut table = Table::new();
    let gz = ReferenceAlgorithm::Gzip.label();
    let bz = ReferenceAlgorithm::Bzip2.label();
    table.set_titles(row![
        "Test file",
        "Status",
        "Simple",
        "Contextual",
        gz,
        bz,
        format!("{gz} + Contextual"),
        format!("{bz} + Contextual")
    ]);

    for result in rows {
        let m = &result.metrics;
        let cells = vec![
            result.file_name.clone(),
            result.status().to_owned(),
            format!("{:.2}", m.simple),
            format_compared(&m.contextual),
            format!("{:.2}", m.gzip),
            format!("{:.2}", m.bzip2),
            format_compared(&m.gzip_contextual),
            format_compared(&m.bzip2_contextual),
        ];
        table.add_row(Row::new(
            cells.iter().map(|c| Cell::new_align(c, Alignment::LEFT)).collect(),
        ));
    }

    table
}

pub fn print_results(rows: &[ResultRow]) {
    results_table(rows).printstd();
}

/// Stores rows as pretty-printed JSON, replacing any previous file.
pub fn write_results<P: AsRef<Path>>(rows: &[ResultRow], path: P) -> Result<()> {
    let json = serde_json::to_string_pretty(rows)?;
    fs::write(path, json)?;
    Ok(())
}

pub fn read_results<P: AsRef<Path>>(path: P) -> Result<Vec<ResultRow>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
