//! Weight-table parsing and encoding-table rendering.
//!
//! The tables are plain comma-separated text with a header row. Fields
//! containing commas, quotes, or leading/trailing spaces are double-quoted
//! with `""` as the embedded-quote escape. Multi-line fields are not
//! supported; targets are single command lines by construction.

use crate::error::{Error, Result};
use crate::resolve::Assignment;
use crate::weights::WeightMap;

/// Parses rows of `(target, count)` into a weight map.
///
/// `target_col` and `count_col` name the columns to read; extra columns are
/// ignored. A missing column, an unparsable count, or a short row is a
/// table error carrying the offending line number.
pub fn parse_weight_table(input: &str, target_col: &str, count_col: &str) -> Result<WeightMap> {
	let mut lines = input.lines().enumerate();
	let Some((_, header)) = lines.next() else {
		return Err(Error::Table {
			line: 1,
			reason: "missing header row".to_string(),
		});
	};
	let header = split_row(header).map_err(|reason| Error::Table { line: 1, reason })?;
	let target_idx = column_index(&header, target_col)?;
	let count_idx = column_index(&header, count_col)?;

	let mut weights = WeightMap::new();
	for (i, line) in lines {
		let line_no = i + 1;
		if line.is_empty() {
			continue;
		}
		let fields = split_row(line).map_err(|reason| Error::Table { line: line_no, reason })?;
		let width = target_idx.max(count_idx) + 1;
		if fields.len() < width {
			return Err(Error::Table {
				line: line_no,
				reason: format!("expected at least {width} columns, got {}", fields.len()),
			});
		}
		let count = fields[count_idx].parse::<u64>().map_err(|_| Error::Table {
			line: line_no,
			reason: format!("invalid count: {:?}", fields[count_idx]),
		})?;
		weights.insert(fields[target_idx].clone(), count);
	}
	Ok(weights)
}

/// Renders assignments as `sequence,target,count` rows, the sequence
/// space-joined, sorted by count descending then target ascending.
pub fn render_encoding_table(assignments: &[Assignment]) -> String {
	let mut rows: Vec<&Assignment> = assignments.iter().collect();
	rows.sort_by(|a, b| b.weight.cmp(&a.weight).then_with(|| a.target.cmp(&b.target)));

	let mut out = String::from("sequence,target,count\n");
	for assignment in rows {
		out.push_str(&quote_field(&assignment.code.join(" ")));
		out.push(',');
		out.push_str(&quote_field(&assignment.target));
		out.push(',');
		out.push_str(&assignment.weight.to_string());
		out.push('\n');
	}
	out
}

/// Renders `(target, count)` rows sorted by count descending, the
/// pre-aggregation companion of [`parse_weight_table`].
pub fn render_weight_table(weights: &WeightMap) -> String {
	let mut rows: Vec<(&String, &u64)> = weights.iter().collect();
	rows.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

	let mut out = String::from("target,count\n");
	for (target, count) in rows {
		out.push_str(&quote_field(target));
		out.push(',');
		out.push_str(&count.to_string());
		out.push('\n');
	}
	out
}

fn column_index(header: &[String], name: &str) -> Result<usize> {
	header.iter().position(|col| col == name).ok_or_else(|| Error::Table {
		line: 1,
		reason: format!("no column named {name:?}"),
	})
}

fn split_row(line: &str) -> std::result::Result<Vec<String>, String> {
	let mut fields = Vec::new();
	let mut field = String::new();
	let mut chars = line.chars().peekable();
	let mut quoted = false;

	while let Some(c) = chars.next() {
		match c {
			'"' if field.is_empty() && !quoted => quoted = true,
			'"' if quoted => {
				if chars.peek() == Some(&'"') {
					chars.next();
					field.push('"');
				} else {
					quoted = false;
				}
			}
			',' if !quoted => {
				fields.push(std::mem::take(&mut field));
			}
			_ => field.push(c),
		}
	}
	if quoted {
		return Err("unterminated quoted field".to_string());
	}
	fields.push(field);
	Ok(fields)
}

fn quote_field(field: &str) -> String {
	if field.contains([',', '"']) || field.starts_with(' ') || field.ends_with(' ') {
		format!("\"{}\"", field.replace('"', "\"\""))
	} else {
		field.to_string()
	}
}
