//! Date and calendar vocabularies.
//!
//! Each function maps a selector from a path onto a display string whose
//! order comes from a small fixed vocabulary instead of the alphabet.

use super::{FunctionError, Transformed, index_in};

const MONTHS: [&str; 13] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec", "M13",
];

const DAYS: [&str; 7] = ["sun", "mon", "tue", "wed", "thu", "fri", "sat"];

const DAY_PERIODS: [&str; 12] = [
    "midnight",
    "am",
    "noon",
    "pm",
    "morning1",
    "morning2",
    "afternoon1",
    "afternoon2",
    "evening1",
    "evening2",
    "night1",
    "night2",
];

/// Calendar type → page display name, in display order.
const CALENDARS: [(&str, &str); 18] = [
    ("gregorian", "Gregorian"),
    ("generic", "Generic"),
    ("buddhist", "Buddhist"),
    ("chinese", "Chinese"),
    ("coptic", "Coptic"),
    ("dangi", "Dangi"),
    ("ethiopic", "Ethiopic"),
    ("ethiopic-amete-alem", "Ethiopic"),
    ("hebrew", "Hebrew"),
    ("indian", "Indian"),
    ("islamic", "Islamic"),
    ("islamic-civil", "Islamic"),
    ("islamic-rgsa", "Islamic"),
    ("islamic-tbla", "Islamic"),
    ("islamic-umalqura", "Islamic"),
    ("japanese", "Japanese"),
    ("persian", "Persian"),
    ("roc", "ROC"),
];

const CAL_FIELD_KINDS: [&str; 6] = ["Eras", "Quarters", "Months", "Days", "DayPeriods", "Formats"];
const CAL_CONTEXTS: [&str; 2] = ["format", "stand-alone"];
const CAL_WIDTHS: [&str; 4] = ["wide", "abbreviated", "short", "narrow"];
const FORMAT_TYPES: [&str; 3] = ["Standard", "Flexible", "Intervals"];
const FORMAT_SUBTYPES: [&str; 4] = ["date", "time", "dateTime", "fallback"];

const DATE_FIELDS: [&str; 22] = [
    "era",
    "year",
    "quarter",
    "month",
    "week",
    "weekOfMonth",
    "day",
    "dayOfYear",
    "weekday",
    "weekdayOfMonth",
    "sun",
    "mon",
    "tue",
    "wed",
    "thu",
    "fri",
    "sat",
    "dayperiod",
    "hour",
    "minute",
    "second",
    "zone",
];
const FIELD_WIDTHS: [&str; 3] = ["", "short", "narrow"];

const WIDTHS: [&str; 5] = ["wide", "long", "abbreviated", "short", "narrow"];

/// `1`..`13` → month abbreviation; order is the month number.
pub fn month(arg: &str) -> Result<Transformed, FunctionError> {
    let n: usize = arg
        .parse()
        .map_err(|_| FunctionError::unknown("month", arg))?;
    match n {
        1..=13 => Ok(Transformed::ordered(MONTHS[n - 1], n)),
        _ => Err(FunctionError::unknown("month", arg)),
    }
}

/// `sun`..`sat` → capitalized weekday; order follows a Sunday-first week.
pub fn day(arg: &str) -> Result<Transformed, FunctionError> {
    let i = index_in(&DAYS, "weekday", arg)?;
    Ok(Transformed::ordered(capitalize(arg), i))
}

pub fn day_period(arg: &str) -> Result<Transformed, FunctionError> {
    let i = index_in(&DAY_PERIODS, "day period", arg)?;
    Ok(Transformed::ordered(arg, i))
}

pub fn quarter(arg: &str) -> Result<Transformed, FunctionError> {
    match arg.parse::<usize>() {
        Ok(n @ 1..=4) => Ok(Transformed::ordered(format!("Q{n}"), n)),
        _ => Err(FunctionError::unknown("quarter", arg)),
    }
}

/// Calendar type → calendar page name. Variants of one calendar share a page.
pub fn calendar(arg: &str) -> Result<Transformed, FunctionError> {
    CALENDARS
        .iter()
        .position(|(ty, _)| *ty == arg)
        .map(|i| Transformed::ordered(CALENDARS[i].1, i))
        .ok_or_else(|| FunctionError::unknown("calendar", arg))
}

/// `Kind:context:width` or `Formats:type:subtype` → readable header.
///
/// The order is `kind * 100 + second * 10 + third`, each digit taken from its
/// own vocabulary, so kind dominates, then context (or format type), then
/// width (or format subtype).
pub fn cal_field(arg: &str) -> Result<Transformed, FunctionError> {
    let parts: Vec<&str> = arg.split(':').collect();
    let [kind, second, third] = parts[..] else {
        return Err(FunctionError(format!("calendar field `{arg}` needs kind:context:width")));
    };

    let k = index_in(&CAL_FIELD_KINDS, "calendar field", kind)?;
    let kind_name = if kind == "DayPeriods" { "Day Periods" } else { kind };

    if kind == "Formats" {
        let t = index_in(&FORMAT_TYPES, "format type", second)?;
        let s = index_in(&FORMAT_SUBTYPES, "format subtype", third)?;
        let subtype = match third {
            "date" => "Date Formats",
            "time" => "Time Formats",
            "dateTime" => "Date & Time Combination Formats",
            _ => "Fallback",
        };
        return Ok(Transformed::ordered(
            format!("{kind_name} - {second} - {subtype}"),
            k * 100 + t * 10 + s,
        ));
    }

    let c = index_in(&CAL_CONTEXTS, "calendar context", second)?;
    let w = index_in(&CAL_WIDTHS, "width", third)?;
    let context = if second == "format" { "Formatting" } else { "Standalone" };
    Ok(Transformed::ordered(
        format!("{kind_name} - {context} - {third}"),
        k * 100 + c * 10 + w,
    ))
}

/// Date field type such as `year-short` → `Year (short)`.
pub fn field(arg: &str) -> Result<Transformed, FunctionError> {
    let (name, width) = arg.split_once('-').unwrap_or((arg, ""));
    let f = index_in(&DATE_FIELDS, "date field", name)?;
    let w = index_in(&FIELD_WIDTHS, "field width", width)?;
    let text = if width.is_empty() {
        capitalize(name)
    } else {
        format!("{} ({width})", capitalize(name))
    };
    Ok(Transformed::ordered(text, f * 10 + w))
}

/// Width keyword, ordered widest first.
pub fn width(arg: &str) -> Result<Transformed, FunctionError> {
    let i = index_in(&WIDTHS, "width", arg)?;
    Ok(Transformed::ordered(arg, i))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
