// SPDX-License-Identifier: GPL-3.0-only

//! Whitespace-delimited tool output
//!
//! `vgs` and `lvs` print one record per line. Both are read by the same
//! parser; only the treatment of lines that do not fit differs.

use thiserror::Error;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsePolicy {
    /// A non-conforming line fails the whole parse.
    Strict,
    /// Non-conforming lines are skipped.
    Lenient,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unexpected line {line:?} (expected {expected} fields)")]
pub struct TableError {
    pub line: String,
    pub expected: usize,
}

/// Split `output` into records of exactly `fields` whitespace-separated
/// columns and hand each to `build`.
///
/// Blank lines are ignored under both policies. A line with the wrong number
/// of columns, or one `build` refuses, is skipped or fatal depending on
/// `policy`.
pub fn parse_table<T, F>(
    output: &str,
    fields: usize,
    policy: ParsePolicy,
    build: F,
) -> Result<Vec<T>, TableError>
where
    F: Fn(&[&str]) -> Option<T>,
{
    let mut records = Vec::new();

    for line in output.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let cols: Vec<&str> = line.split_whitespace().collect();
        let record = if cols.len() == fields { build(&cols) } else { None };

        match (record, policy) {
            (Some(record), _) => records.push(record),
            (None, ParsePolicy::Lenient) => trace!("Skipping line {line:?}"),
            (None, ParsePolicy::Strict) => {
                return Err(TableError {
                    line: line.to_string(),
                    expected: fields,
                });
            }
        }
    }

    Ok(records)
}
