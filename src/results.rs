//! Comma-separated result logs: one row per (processors, modules) run.

use crate::error::{Result, SimError};
use crate::simulator::RunReport;
use std::fs::{self, File};
use std::io::{BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};

pub const HEADER: &str = "processors,memory modules,wait-times";

/// Converged statistic of one run as stored in a log.
#[derive(Clone, Debug, PartialEq)]
pub struct ResultRow {
    pub processors: usize,
    pub modules: usize,
    pub wait_time: f64,
}

impl ResultRow {
    pub fn new(processors: usize, modules: usize, wait_time: f64) -> Self {
        Self {
            processors,
            modules,
            wait_time,
        }
    }
}

impl From<&RunReport> for ResultRow {
    fn from(report: &RunReport) -> Self {
        Self::new(report.processes, report.modules, report.average_wait)
    }
}

/// Writes the header once, then one row per call to `append`.
#[derive(Debug)]
pub struct ResultLog<W: Write> {
    out: W,
    path: PathBuf,
    rows: usize,
}

impl ResultLog<BufWriter<File>> {
    /// Creates (truncating) the log at `path`, making parent directories as needed.
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| SimError::io(parent, e))?;
        }
        let file = File::create(path).map_err(|e| SimError::io(path, e))?;
        Self::new(BufWriter::new(file), path)
    }
}

impl<W: Write> ResultLog<W> {
    /// Wraps any writer; `path` is only used in error messages.
    pub fn new(mut out: W, path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        writeln!(out, "{}", HEADER).map_err(|e| SimError::io(&path, e))?;
        Ok(Self { out, path, rows: 0 })
    }

    pub fn append(&mut self, row: &ResultRow) -> Result<()> {
        writeln!(self.out, "{},{},{:.6}", row.processors, row.modules, row.wait_time)
            .map_err(|e| SimError::io(&self.path, e))?;
        self.rows += 1;
        Ok(())
    }

    pub fn rows_written(&self) -> usize {
        self.rows
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flushes and returns the underlying writer.
    pub fn finish(mut self) -> Result<W> {
        self.out.flush().map_err(|e| SimError::io(&self.path, e))?;
        Ok(self.out)
    }
}

/// Parses a log produced by `ResultLog`, skipping the header and blank lines.
pub fn read_rows<R: BufRead>(reader: R) -> Result<Vec<ResultRow>> {
    let mut rows = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.map_err(|e| SimError::io("<result log>", e))?;
        let line = line.trim();
        if line.is_empty() || (line_no == 1 && line == HEADER) {
            continue;
        }
        rows.push(parse_row(line, line_no)?);
    }
    Ok(rows)
}

/// Reads every row of the log at `path`.
pub fn load_rows(path: &Path) -> Result<Vec<ResultRow>> {
    let file = File::open(path).map_err(|e| SimError::io(path, e))?;
    read_rows(std::io::BufReader::new(file))
}

fn parse_row(line: &str, line_no: usize) -> Result<ResultRow> {
    let malformed = |reason: String| SimError::MalformedRow {
        line: line_no,
        reason,
    };
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != 3 {
        return Err(malformed(format!("expected 3 fields, found {}", fields.len())));
    }
    let processors = fields[0]
        .parse()
        .map_err(|e| malformed(format!("processors {:?}: {}", fields[0], e)))?;
    let modules = fields[1]
        .parse()
        .map_err(|e| malformed(format!("memory modules {:?}: {}", fields[1], e)))?;
    let wait_time = fields[2]
        .parse()
        .map_err(|e| malformed(format!("wait-times {:?}: {}", fields[2], e)))?;
    Ok(ResultRow::new(processors, modules, wait_time))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn log_writes_header_and_rows() {
        let mut log = ResultLog::new(Vec::new(), "mem").unwrap();
        log.append(&ResultRow::new(2, 1, 0.5)).unwrap();
        log.append(&ResultRow::new(2, 2, 0.123456789)).unwrap();
        assert_eq!(log.rows_written(), 2);
        let bytes = log.finish().unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "processors,memory modules,wait-times\n2,1,0.500000\n2,2,0.123457\n"
        );
    }

    #[test]
    fn read_rows_parses_log() {
        let text = "processors,memory modules,wait-times\n4,1,0.750000\n\n4,2,0.250000\n";
        let rows = read_rows(Cursor::new(text)).unwrap();
        assert_eq!(rows, vec![ResultRow::new(4, 1, 0.75), ResultRow::new(4, 2, 0.25)]);
    }

    #[test]
    fn read_rows_reports_bad_line() {
        let text = "processors,memory modules,wait-times\n4,1,0.75\n4,x,0.1\n";
        match read_rows(Cursor::new(text)) {
            Err(SimError::MalformedRow { line, .. }) => assert_eq!(line, 3),
            other => panic!("unexpected {:?}", other),
        }
        let text = "4,1\n";
        assert!(matches!(
            read_rows(Cursor::new(text)),
            Err(SimError::MalformedRow { line: 1, .. })
        ));
    }

    #[test]
    fn create_makes_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("nested").join("u.csv");
        let mut log = ResultLog::create(&path).unwrap();
        log.append(&ResultRow::new(1, 1, 0.0)).unwrap();
        log.finish().unwrap();
        let rows = load_rows(&path).unwrap();
        assert_eq!(rows, vec![ResultRow::new(1, 1, 0.0)]);
    }
}
