//! Flat-file formats for the fpxref lookup tables.
//!
//! Three files make up an index:
//!
//! ```text
//! idx_to_fpath.txt              <path id>\t<subject path>
//! idx_to_info.txt               <attribute id>\t<attribute value>
//! fpathidx_to_infoidxlist.txt   <path id> <attribute id> <attribute id> ... \n
//! ```
//!
//! The id tables are written in ascending id order. Cross-reference rows
//! carry a trailing space before the newline, including rows with no
//! attributes.

use std::collections::BTreeMap;
use std::io::{BufRead, Write};

use anyhow::{anyhow, bail, Context, Result};

pub const PATH_TABLE_FILE: &str = "idx_to_fpath.txt";
pub const ATTRIBUTE_TABLE_FILE: &str = "idx_to_info.txt";
pub const CROSS_REF_FILE: &str = "fpathidx_to_infoidxlist.txt";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CrossRefRow {
    pub path_id: u64,
    pub attribute_ids: Vec<u64>,
}

/// Writes `id<TAB>value` lines. Ordering is the caller's responsibility.
pub struct IdTableWriter<W> {
    writer: W,
    rows: usize,
}

impl<W: Write> IdTableWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, rows: 0 }
    }

    pub fn write_entry(&mut self, id: u64, value: &str) -> Result<()> {
        if value.contains('\n') {
            bail!("value for id {id} spans multiple lines");
        }
        writeln!(self.writer, "{id}\t{value}")?;
        self.rows += 1;
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn finish(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

pub struct CrossRefWriter<W> {
    writer: W,
    rows: usize,
}

impl<W: Write> CrossRefWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, rows: 0 }
    }

    pub fn write_row(&mut self, path_id: u64, attribute_ids: &[u64]) -> Result<()> {
        write!(self.writer, "{path_id}")?;
        for id in attribute_ids {
            write!(self.writer, " {id}")?;
        }
        self.writer.write_all(b" \n")?;
        self.rows += 1;
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn finish(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

/// Parses an id table. Duplicate ids are rejected; blank lines are skipped.
pub fn read_id_table<R: BufRead>(reader: R) -> Result<BTreeMap<u64, String>> {
    let mut table = BTreeMap::new();
    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.with_context(|| format!("failed to read line {line_no}"))?;
        if line.trim().is_empty() {
            continue;
        }
        let (raw_id, value) = line
            .split_once('\t')
            .ok_or_else(|| anyhow!("line {line_no}: missing tab separator"))?;
        let id = parse_id(raw_id, line_no)?;
        if table.insert(id, value.to_string()).is_some() {
            bail!("line {line_no}: duplicate id {id}");
        }
    }
    Ok(table)
}

pub fn read_cross_refs<R: BufRead>(reader: R) -> Result<Vec<CrossRefRow>> {
    let mut rows = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.with_context(|| format!("failed to read line {line_no}"))?;
        let mut fields = line.split_whitespace();
        let Some(first) = fields.next() else {
            continue;
        };
        let path_id = parse_id(first, line_no)?;
        let attribute_ids = fields
            .map(|field| parse_id(field, line_no))
            .collect::<Result<Vec<_>>>()?;
        rows.push(CrossRefRow {
            path_id,
            attribute_ids,
        });
    }
    Ok(rows)
}

fn parse_id(raw: &str, line_no: usize) -> Result<u64> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| anyhow!("line {line_no}: invalid id '{raw}'"))
}
