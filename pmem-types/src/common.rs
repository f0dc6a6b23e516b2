//! Size helpers shared across models

use anyhow::Result;
use num_format::{Locale, ToFormattedString};

/// One mebibyte; `lvcreate -L` interprets a bare number in this unit.
pub const MIB: u64 = 1024 * 1024;

/// Convert a byte count to the whole-MiB size passed to `lvcreate`.
///
/// The remainder below a whole MiB is dropped, so a request that is not
/// MiB-aligned can come out smaller than asked for when the floored size
/// already sits on an extent boundary. A sub-MiB request becomes 1 MiB, the
/// smallest size LVM accepts.
pub fn bytes_to_whole_mib(bytes: u64) -> u64 {
    (bytes / MIB).max(1)
}

/// Convert bytes to human-readable format (e.g., "1.50 GB")
pub fn bytes_to_pretty(bytes: &u64, add_bytes: bool) -> String {
    let mut steps = 0;
    let mut val: f64 = *bytes as f64;

    while val > 1024. && steps <= 6 {
        val /= 1024.;
        steps += 1;
    }

    let unit = match steps {
        0 => "B",
        1 => "KB",
        2 => "MB",
        3 => "GB",
        4 => "TB",
        5 => "PB",
        6 => "EB",
        _ => "Not Supported",
    };

    if add_bytes {
        let bytes_str = bytes.to_formatted_string(&Locale::en);
        format!("{:.2} {} ({} bytes)", val, unit, bytes_str)
    } else {
        format!("{:.2} {}", val, unit)
    }
}

/// Parse a size given as plain bytes or with a binary suffix
/// (`K`, `M`, `G`, `T`, optionally followed by `i`/`iB`/`B`).
pub fn parse_size(input: &str) -> Result<u64> {
    let trimmed = input.trim();
    let split = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (digits, unit) = trimmed.split_at(split);

    if digits.is_empty() {
        return Err(anyhow::anyhow!("Invalid size: {input:?}"));
    }
    let value: u64 = digits.parse()?;

    let shift = match unit.trim().to_ascii_uppercase().as_str() {
        "" | "B" => 0,
        "K" | "KI" | "KB" | "KIB" => 10,
        "M" | "MI" | "MB" | "MIB" => 20,
        "G" | "GI" | "GB" | "GIB" => 30,
        "T" | "TI" | "TB" | "TIB" => 40,
        other => return Err(anyhow::anyhow!("Invalid unit: {}", other)),
    };

    value
        .checked_mul(1u64 << shift)
        .ok_or_else(|| anyhow::anyhow!("Size overflows u64: {input:?}"))
}
