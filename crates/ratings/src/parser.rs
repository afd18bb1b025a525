//! Parser for delimited rating files.
//!
//! This module handles the rating file formats used by the MovieLens
//! datasets and friends, one record per line:
//! - `userId::itemId::score::timestamp` (ml-1m `ratings.dat`)
//! - `userId,itemId,score,timestamp` (ml-20m `ratings.csv`, with a header)
//!
//! The timestamp field is optional; the separator and header handling are
//! configurable. A record that violates the format is a fatal load-time
//! error carrying file and line context - the upstream data source broke the
//! contract and partial recovery would hide it.

use crate::error::{RatingsError, Result};
use crate::types::Rating;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Options controlling how a rating file is parsed
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Field separator, e.g. `"::"` for .dat files or `","` for .csv files
    pub separator: String,
    /// Skip the first line (column header)
    pub has_header: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            separator: "::".to_string(),
            has_header: false,
        }
    }
}

/// Helper function to read a file with ISO-8859-1 encoding (Latin-1)
///
/// The MovieLens dataset uses ISO-8859-1 encoding, not UTF-8.
/// This function reads the file as bytes and converts to UTF-8 with lossy conversion.
fn read_lines_latin1(path: &Path) -> Result<Vec<String>> {
    let mut file = File::open(path)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;

    // ISO-8859-1 is a single-byte encoding where each byte directly maps to
    // a Unicode code point
    let content: String = bytes.iter().map(|&b| b as char).collect();

    Ok(content.lines().map(|s| s.to_string()).collect())
}

/// Parse a rating file into records.
///
/// Empty lines are skipped; every other line must parse or the whole load
/// fails with a `ParseError` naming the offending line.
pub fn parse_ratings(path: &Path, options: &ParseOptions) -> Result<Vec<Rating>> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let lines = read_lines_latin1(path)?;
    let ratings = parse_lines(&lines, &file_name, options)?;

    info!("Parsed {} rating records from {}", ratings.len(), file_name);
    Ok(ratings)
}

fn parse_lines(lines: &[String], file: &str, options: &ParseOptions) -> Result<Vec<Rating>> {
    let mut ratings = Vec::new();

    let skip = if options.has_header { 1 } else { 0 };

    // Read line by line
    for (idx, line) in lines.iter().enumerate().skip(skip) {
        let line_no = idx + 1;
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue; // Skip empty lines
        }

        ratings.push(parse_line(line_trimmed, file, line_no, &options.separator)?);
    }

    Ok(ratings)
}

/// Parse a single `user SEP item SEP score [SEP timestamp]` record
fn parse_line(line: &str, file: &str, line_no: usize, separator: &str) -> Result<Rating> {
    let fields: Vec<&str> = line.split(separator).map(|f| f.trim()).collect();

    if fields.len() < 3 || fields.len() > 4 {
        return Err(RatingsError::FieldCountMismatch {
            expected: 4,
            found: fields.len(),
            line: line_no,
        });
    }

    let user_id = fields[0].parse().map_err(|e| RatingsError::ParseError {
        file: file.to_string(),
        line: line_no,
        reason: format!("Invalid userId: {}", e),
    })?;

    let item_id = fields[1].parse().map_err(|e| RatingsError::ParseError {
        file: file.to_string(),
        line: line_no,
        reason: format!("Invalid itemId: {}", e),
    })?;

    let score: f32 = fields[2].parse().map_err(|e| RatingsError::ParseError {
        file: file.to_string(),
        line: line_no,
        reason: format!("Invalid score: {}", e),
    })?;

    // The score contract: a finite, non-negative number
    if !score.is_finite() || score < 0.0 {
        return Err(RatingsError::InvalidValue {
            field: "score".to_string(),
            value: fields[2].to_string(),
        });
    }

    let timestamp = match fields.get(3) {
        Some(value) => Some(value.parse().map_err(|e| RatingsError::ParseError {
            file: file.to_string(),
            line: line_no,
            reason: format!("Invalid timestamp: {}", e),
        })?),
        None => None,
    };

    Ok(Rating {
        user_id,
        item_id,
        score,
        timestamp,
    })
}
