use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::matrix::square::Matrix;

/// Write `m` one value per line in row-major order (N² lines).
pub fn write_matrix<W: Write>(m: &Matrix, out: W) -> io::Result<()> {
    let mut out = BufWriter::new(out);
    for row in m.rows() {
        for v in row {
            writeln!(out, "{}", v)?;
        }
    }
    out.flush()
}

pub fn write_matrix_file<P: AsRef<Path>>(m: &Matrix, path: P) -> io::Result<()> {
    write_matrix(m, File::create(path)?)
}
