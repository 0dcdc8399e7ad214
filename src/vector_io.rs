// src/vector_io.rs

//! Plain-text complex vectors, one sample per line as `real` or
//! `real, imag`.

use crate::fixed::types::FixedComplex;
use num_complex::Complex64;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Parses one line. The imaginary part defaults to zero; lines that do not
/// start with a number yield `None`.
pub fn parse_line(line: &str) -> Option<Complex64> {
    let mut fields = line.splitn(2, ',');
    let re = leading_number(fields.next()?)?;
    let im = fields.next().and_then(leading_number).unwrap_or(0.0);
    Some(Complex64::new(re, im))
}

fn leading_number(field: &str) -> Option<f64> {
    field.split_whitespace().next()?.parse().ok()
}

/// Reads samples until end of input, skipping lines that hold no number.
pub fn read_values<R: BufRead>(reader: R) -> io::Result<Vec<Complex64>> {
    let mut values = Vec::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        match parse_line(&line) {
            Some(value) => values.push(value),
            None => log::debug!("skipping line {}: {:?}", lineno + 1, line),
        }
    }
    Ok(values)
}

/// Writes samples in the format [`read_values`] accepts.
pub fn write_values<W: Write>(mut out: W, values: &[Complex64]) -> io::Result<()> {
    for value in values {
        writeln!(out, "{:.6}, {:.6}", value.re, value.im)?;
    }
    out.flush()
}

/// Writes fixed-point results as raw 32-bit hex words followed by their real
/// values.
pub fn write_fixed_values<W: Write, const WIDTH: u32, const FRAC: u32>(
    mut out: W,
    values: &[FixedComplex<WIDTH, FRAC>],
) -> io::Result<()> {
    for value in values {
        writeln!(
            out,
            "0x{:08x}, 0x{:08x},  {:.6}, {:.6}",
            value.re() as u32,
            value.im() as u32,
            value.re_f64(),
            value.im_f64()
        )?;
    }
    out.flush()
}

pub fn read_file<P: AsRef<Path>>(path: P) -> io::Result<Vec<Complex64>> {
    read_values(BufReader::new(File::open(path)?))
}

pub fn write_file<P: AsRef<Path>>(path: P, values: &[Complex64]) -> io::Result<()> {
    write_values(BufWriter::new(File::create(path)?), values)
}

pub fn write_fixed_file<P: AsRef<Path>, const WIDTH: u32, const FRAC: u32>(
    path: P,
    values: &[FixedComplex<WIDTH, FRAC>],
) -> io::Result<()> {
    write_fixed_values(BufWriter::new(File::create(path)?), values)
}
