//! Plain-text point lists.
//!
//! The format is the one the drawing tool copies to the clipboard: an
//! `x<TAB>y` header followed by one `x<TAB>y` row per point. Reading is more
//! lenient and also takes comma separated rows from spreadsheets.

use std::path::Path;

use icp_math::Point;
use thiserror::Error;

/// Errors from reading or writing point list files
#[derive(Error, Debug)]
pub enum PointIoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no valid points found in {0}")]
    NoPoints(String),
}

/// Formats points as a tab-separated list with an `x\ty` header.
pub fn format_points(points: &[Point]) -> String {
    let mut text = String::from("x\ty\n");
    let rows: Vec<String> = points.iter().map(|p| format!("{}\t{}", p.x, p.y)).collect();
    text.push_str(&rows.join("\n"));
    text
}

/// Parses a tab or comma separated point list.
///
/// Header lines (`x<sep>y`, any case) are skipped, as is every line whose
/// first two fields are not both finite numbers (`NaN`, `inf` and overflowing
/// literals like `1e400` included). Extra fields are ignored.
pub fn parse_points(text: &str) -> Vec<Point> {
    text.trim()
        .lines()
        .filter(|line| !is_header(line))
        .filter_map(parse_row)
        .collect()
}

fn is_header(line: &str) -> bool {
    let line = line.trim_start();
    let Some(rest) = line.strip_prefix(['x', 'X']) else {
        return false;
    };

    let sep_len = rest
        .find(|c: char| !(c.is_whitespace() || c == ','))
        .unwrap_or(rest.len());
    let (separator, tail) = rest.split_at(sep_len);

    let has_separator = separator.contains('\t') || separator.trim() == ",";
    has_separator && tail.starts_with(['y', 'Y'])
}

fn parse_row(line: &str) -> Option<Point> {
    let mut fields = line.split(['\t', ',']).map(str::trim);
    let x: f64 = fields.next()?.parse().ok()?;
    let y: f64 = fields.next()?.parse().ok()?;

    if !(x.is_finite() && y.is_finite()) {
        return None;
    }
    Some(Point::new(x, y))
}

/// Reads a point list file.
///
/// # Errors
/// * `PointIoError::Io` - If the file cannot be read
/// * `PointIoError::NoPoints` - If the file holds no parseable rows
pub fn load_curve(path: &Path) -> Result<Vec<Point>, PointIoError> {
    let text = std::fs::read_to_string(path)?;
    let points = parse_points(&text);

    if points.is_empty() {
        return Err(PointIoError::NoPoints(path.display().to_string()));
    }

    log::debug!("loaded {} points from {}", points.len(), path.display());
    Ok(points)
}

/// Writes a point list file in the clipboard format.
pub fn save_curve(path: &Path, points: &[Point]) -> Result<(), PointIoError> {
    std::fs::write(path, format_points(points))?;
    Ok(())
}
