//! Descending ordering of version strings by their leading numeric segments
//!
//! This is intentionally simpler than semver precedence: every `.`-separated
//! segment is cut at its first hyphen and read as a decimal integer, so
//! prerelease tags never take part in the comparison.

use std::cmp::Ordering;

/// Reads the leading decimal integer of a segment the way `parseInt` would.
///
/// Leading whitespace and a `+` sign are skipped; a segment without digits
/// yields 0. Values too large for `u64` saturate.
fn parse_segment(segment: &str) -> u64 {
    let numeric = segment.split('-').next().unwrap_or_default();
    let numeric = numeric.trim_start();
    let numeric = numeric.strip_prefix('+').unwrap_or(numeric);

    numeric
        .chars()
        .map_while(|c| c.to_digit(10))
        .fold(0u64, |acc, digit| {
            acc.saturating_mul(10).saturating_add(u64::from(digit))
        })
}

fn parse_segments(version: &str) -> Vec<u64> {
    version.split('.').map(parse_segment).collect()
}

/// Compares two version strings for a descending sort (highest first).
///
/// Returns `Ordering::Less` when `a` is the higher version, i.e. when `a`
/// should be listed before `b`. Missing segments count as 0.
///
/// ```
/// use std::cmp::Ordering;
/// use npm_install_assistant::version::compare::compare_versions_desc;
///
/// assert_eq!(compare_versions_desc("2.0.0", "1.9.9"), Ordering::Less);
/// assert_eq!(compare_versions_desc("1.0", "1.0.0"), Ordering::Equal);
/// ```
pub fn compare_versions_desc(a: &str, b: &str) -> Ordering {
    let pa = parse_segments(a);
    let pb = parse_segments(b);
    let max_len = pa.len().max(pb.len());

    for i in 0..max_len {
        let av = pa.get(i).copied().unwrap_or(0);
        let bv = pb.get(i).copied().unwrap_or(0);
        match bv.cmp(&av) {
            Ordering::Equal => continue,
            ordering => return ordering,
        }
    }

    Ordering::Equal
}

/// Sorts versions in place, highest first. Equal versions keep their order.
pub fn sort_versions_desc(versions: &mut [String]) {
    versions.sort_by(|a, b| compare_versions_desc(a, b));
}
