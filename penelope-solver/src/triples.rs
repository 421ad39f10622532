//! Text dump of the matrix as triples
//!
//! The only persistence format the core defines: a header line
//! `%triples: (RxC, nnz:N)` followed by one `row col value` line per stored
//! nonzero in row-major order, values carrying 13 significant digits.

use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::sparse_matrix::SparseMatrix;

impl SparseMatrix {
    /// Write the matrix as triples
    pub fn write_triples<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(
            out,
            "%triples: ({}x{}, nnz:{})",
            self.num_rows(),
            self.num_cols(),
            self.nnz()
        )?;
        for row in 0..self.num_rows() {
            for (col, val) in self.get_row(row) {
                writeln!(out, "{} {} {:.12e}", row, col, val)?;
            }
        }
        Ok(())
    }

    /// Write the triples dump to a file
    pub fn save_triples<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write_triples(&mut out)
    }

    /// Reconstruct a matrix from a triples dump
    pub fn read_triples<R: BufRead>(input: R) -> Result<SparseMatrix> {
        let mut lines = input.lines();
        let header = lines
            .next()
            .context("triples: empty input")?
            .context("triples: failed to read header")?;
        let dims = header
            .strip_prefix("%triples: (")
            .and_then(|s| s.strip_suffix(')'))
            .with_context(|| format!("triples: malformed header {:?}", header))?;
        let (shape, nnz) = dims
            .split_once(", nnz:")
            .with_context(|| format!("triples: malformed header {:?}", header))?;
        let (rows, cols) = shape
            .split_once('x')
            .with_context(|| format!("triples: malformed shape {:?}", shape))?;
        let num_rows: usize = rows.parse().context("triples: bad row count")?;
        let num_cols: usize = cols.parse().context("triples: bad column count")?;
        let nnz: usize = nnz.parse().context("triples: bad nnz count")?;

        let mut m = SparseMatrix::new(num_rows, num_cols);
        for line in lines {
            let line = line.context("triples: failed to read entry line")?;
            if line.is_empty() {
                continue;
            }
            let mut fields = line.split_whitespace();
            let (row, col, val) = match (fields.next(), fields.next(), fields.next()) {
                (Some(r), Some(c), Some(v)) => (
                    r.parse::<usize>()
                        .with_context(|| format!("triples: bad row in {:?}", line))?,
                    c.parse::<usize>()
                        .with_context(|| format!("triples: bad column in {:?}", line))?,
                    v.parse::<f64>()
                        .with_context(|| format!("triples: bad value in {:?}", line))?,
                ),
                _ => bail!("triples: expected `row col value`, got {:?}", line),
            };
            if row >= num_rows || col >= num_cols {
                bail!(
                    "triples: entry ({}, {}) outside declared {}x{} shape",
                    row,
                    col,
                    num_rows,
                    num_cols
                );
            }
            m.set(row, col, val);
        }
        if m.nnz() != nnz {
            bail!("triples: header declares nnz:{}, read {}", nnz, m.nnz());
        }
        Ok(m)
    }

    /// Write the sparsity pattern as an ASCII grid of `x` and `.`
    pub fn write_pattern<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for row in 0..self.num_rows() {
            let mut line = vec![b'.'; self.num_cols()];
            for (col, _) in self.get_row(row) {
                line[col] = b'x';
            }
            out.write_all(&line)?;
            out.write_all(b"\n")?;
        }
        Ok(())
    }
}
