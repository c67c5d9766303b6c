use crate::core::io::traits::StructureFile;
use crate::core::models::structure::{AtomicStructure, SpeciesBlock, StructureError};
use crate::core::utils::numeric::format_decimal;
use nalgebra::{Matrix3, Point3};
use std::io::{self, BufRead, Write};
use thiserror::Error;

const HEADER_LINE: usize = 0;
const SCALE_LINE: usize = 1;
const LATTICE_LINES: std::ops::Range<usize> = 2..5;
const SPECIES_LABEL_LINE: usize = 5;
const SPECIES_COUNT_LINE: usize = 6;
const FIRST_COORDINATE_LINE: usize = 8;

const COORDINATE_MODE: &str = "Cartesian";

#[derive(Debug, Error)]
pub enum PoscarError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: PoscarParseErrorKind,
    },
    #[error("Missing required record: {0}")]
    MissingRecord(String),
    #[error("Inconsistent data: {0}")]
    Inconsistency(#[from] StructureError),
}

#[derive(Debug, Error)]
pub enum PoscarParseErrorKind {
    #[error("Invalid float in field {field} (value: '{value}')")]
    InvalidFloat { field: usize, value: String },
    #[error("Invalid atom count in field {field} (value: '{value}')")]
    InvalidCount { field: usize, value: String },
    #[error("Expected at least {expected} fields, found {found}")]
    TooFewFields { expected: usize, found: usize },
    #[error("Species line has {labels} labels but count line has {counts} counts")]
    SpeciesMismatch { labels: usize, counts: usize },
}

/// Reader and writer for VASP POSCAR-style structure files in Cartesian mode.
///
/// Layout: header, scale factor, three lattice rows, species labels, species counts,
/// a coordinate-mode marker, then one `x y z` row per atom grouped by species.
pub struct PoscarFile;

fn parse_floats(line: &str, line_num: usize, expected: usize) -> Result<Vec<f64>, PoscarError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < expected {
        return Err(PoscarError::Parse {
            line: line_num,
            kind: PoscarParseErrorKind::TooFewFields {
                expected,
                found: fields.len(),
            },
        });
    }
    fields
        .iter()
        .take(expected)
        .enumerate()
        .map(|(field, value)| {
            value.parse::<f64>().map_err(|_| PoscarError::Parse {
                line: line_num,
                kind: PoscarParseErrorKind::InvalidFloat {
                    field: field + 1,
                    value: value.to_string(),
                },
            })
        })
        .collect()
}

fn require_line<'a>(lines: &'a [String], index: usize, what: &str) -> Result<&'a str, PoscarError> {
    lines
        .get(index)
        .map(String::as_str)
        .ok_or_else(|| PoscarError::MissingRecord(format!("{} (line {})", what, index + 1)))
}

impl StructureFile for PoscarFile {
    type Error = PoscarError;

    fn read_from(reader: &mut impl BufRead) -> Result<AtomicStructure, Self::Error> {
        let lines = reader.lines().collect::<Result<Vec<String>, io::Error>>()?;

        let header = require_line(&lines, HEADER_LINE, "header")?;

        let scale_line = require_line(&lines, SCALE_LINE, "scale factor")?;
        let scale = parse_floats(scale_line, SCALE_LINE + 1, 1)?[0];

        let mut lattice = Matrix3::zeros();
        for (row, index) in LATTICE_LINES.enumerate() {
            let line = require_line(&lines, index, "lattice vector")?;
            let values = parse_floats(line, index + 1, 3)?;
            for (col, value) in values.into_iter().enumerate() {
                lattice[(row, col)] = value;
            }
        }

        let labels: Vec<&str> = require_line(&lines, SPECIES_LABEL_LINE, "species labels")?
            .split_whitespace()
            .collect();
        let counts = require_line(&lines, SPECIES_COUNT_LINE, "species counts")?
            .split_whitespace()
            .enumerate()
            .map(|(field, value)| {
                value.parse::<usize>().map_err(|_| PoscarError::Parse {
                    line: SPECIES_COUNT_LINE + 1,
                    kind: PoscarParseErrorKind::InvalidCount {
                        field: field + 1,
                        value: value.to_string(),
                    },
                })
            })
            .collect::<Result<Vec<usize>, PoscarError>>()?;
        if labels.len() != counts.len() {
            return Err(PoscarError::Parse {
                line: SPECIES_COUNT_LINE + 1,
                kind: PoscarParseErrorKind::SpeciesMismatch {
                    labels: labels.len(),
                    counts: counts.len(),
                },
            });
        }
        let species: Vec<SpeciesBlock> = labels
            .iter()
            .zip(counts)
            .map(|(label, count)| SpeciesBlock::new(label, count))
            .collect();

        require_line(&lines, FIRST_COORDINATE_LINE - 1, "coordinate mode")?;

        let mut positions = Vec::new();
        for (index, line) in lines.iter().enumerate().skip(FIRST_COORDINATE_LINE) {
            if line.trim().is_empty() {
                continue;
            }
            let xyz = parse_floats(line, index + 1, 3)?;
            positions.push(Point3::new(xyz[0], xyz[1], xyz[2]));
        }
        if positions.is_empty() {
            return Err(PoscarError::MissingRecord("atomic coordinates".into()));
        }

        Ok(AtomicStructure::new(
            header, scale, lattice, species, positions,
        )?)
    }

    fn write_to(structure: &AtomicStructure, writer: &mut impl Write) -> Result<(), Self::Error> {
        writeln!(writer, "{}", structure.header())?;
        writeln!(writer, "1")?;

        let lattice = structure.lattice();
        for row in 0..3 {
            writeln!(
                writer,
                " {} {} {}",
                format_decimal(lattice[(row, 0)]),
                format_decimal(lattice[(row, 1)]),
                format_decimal(lattice[(row, 2)])
            )?;
        }

        let widths: Vec<usize> = structure
            .species()
            .iter()
            .map(|s| s.label.len().max(s.count.to_string().len()))
            .collect();
        let label_line: Vec<String> = structure
            .species()
            .iter()
            .zip(&widths)
            .map(|(s, w)| format!("{:>w$}", s.label, w = w))
            .collect();
        let count_line: Vec<String> = structure
            .species()
            .iter()
            .zip(&widths)
            .map(|(s, w)| format!("{:>w$}", s.count, w = w))
            .collect();
        writeln!(writer, "{}", label_line.join(" "))?;
        writeln!(writer, "{}", count_line.join(" "))?;

        writeln!(writer, "{}", COORDINATE_MODE)?;
        for p in structure.positions() {
            writeln!(writer, "{:>14.8} {:>14.8} {:>14.8}", p.x, p.y, p.z)?;
        }
        Ok(())
    }
}
