//! Localized date and size display.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::i18n::{Catalog, FALLBACK_LANG};

static DATE_TIME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)-(\d+)-(\d+)(?: |T)(\d+):(\d+):(\d+)$").unwrap());

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Human form of `YYYY-MM-DD HH:MM:SS` (or with a `T` separator).
///
/// English uses a 12-hour clock, every other language a 24-hour clock. Month
/// names and the word `at` go through `catalog`. Input that does not parse
/// is returned unchanged.
///
/// # Examples
///
/// ```
/// use jsu_util::format::date_display;
/// use jsu_util::i18n::Catalog;
///
/// let catalog = Catalog::new();
/// assert_eq!(date_display(&catalog, "2000-01-30 13:05:00"), "30 January 2000 at 1:05 PM");
/// ```
pub fn date_display(catalog: &Catalog, date: &str) -> String {
    if date.is_empty() {
        return String::new();
    }
    let Some(caps) = DATE_TIME.captures(date) else {
        return date.to_string();
    };
    let month = match &caps[2] {
        m if m.len() == 2 => m.parse::<usize>().ok().and_then(|n| MONTHS.get(n.checked_sub(1)?)),
        _ => None,
    };
    let (Some(month), Ok(hour), Ok(minute)) = (month, caps[4].parse::<u32>(), caps[5].parse::<u32>()) else {
        return date.to_string();
    };

    let time = if catalog.current_lang() != FALLBACK_LANG {
        format!("{hour:02}:{minute:02}")
    } else {
        let (hour, moment) = match hour {
            0 => (12, "AM"),
            h if h < 12 => (h, "AM"),
            12 => (12, "PM"),
            h => (h - 12, "PM"),
        };
        format!("{hour}:{minute:02} {moment}")
    };
    format!(
        "{} {} {} {} {}",
        &caps[3],
        catalog.translate(month, None),
        &caps[1],
        catalog.translate("at", None),
        time
    )
}

/// Decimal size with one fractional digit: `123.5 MB`.
///
/// Each unit step divides by 1000 once the value exceeds 1000. The unit
/// suffix `B` goes through `catalog`.
pub fn size_display(catalog: &Catalog, bytes: u64) -> String {
    let b = catalog.translate("B", None);
    if bytes == 0 {
        return format!("0 {b}");
    }
    let mut value = bytes as f64;
    let mut unit = "";
    for next in ["k", "M", "G", "T"] {
        if value <= 1000.0 {
            break;
        }
        value /= 1000.0;
        unit = next;
    }
    format!("{value:.1} {unit}{b}")
}
