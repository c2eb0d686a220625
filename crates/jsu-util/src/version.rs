//! Dotted numeric version comparison.

use std::cmp::Ordering;

/// Compare versions like `4.5.6` part by part.
///
/// Missing parts count as `0`. A part that is not a number on either side
/// is skipped.
///
/// # Examples
///
/// ```
/// use std::cmp::Ordering;
/// use jsu_util::version::compare_versions;
///
/// assert_eq!(compare_versions("1.1.0", "1.1.1"), Ordering::Less);
/// assert_eq!(compare_versions("1.2", "1.2.0"), Ordering::Equal);
/// ```
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let left: Vec<&str> = a.split('.').collect();
    let right: Vec<&str> = b.split('.').collect();
    let len = left.len().max(right.len());

    for i in 0..len {
        let l = part(left.get(i).copied());
        let r = part(right.get(i).copied());
        if let (Some(l), Some(r)) = (l, r) {
            match l.cmp(&r) {
                Ordering::Equal => continue,
                other => return other,
            }
        }
    }
    Ordering::Equal
}

fn part(s: Option<&str>) -> Option<u64> {
    match s {
        None => Some(0),
        Some(s) => s.trim().parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_versions() {
        assert_eq!(compare_versions("1.1.1", "1.1.1"), Ordering::Equal);
    }

    #[test]
    fn test_ordering_is_numeric() {
        assert_eq!(compare_versions("1.1.2", "1.1.1"), Ordering::Greater);
        assert_eq!(compare_versions("1.10", "1.9"), Ordering::Greater);
    }

    #[test]
    fn test_missing_parts_are_zero() {
        assert_eq!(compare_versions("1.2", "1.2.3"), Ordering::Less);
    }

    #[test]
    fn test_non_numeric_parts_are_skipped() {
        assert_eq!(compare_versions("1.beta.3", "1.alpha.2"), Ordering::Greater);
    }
}
