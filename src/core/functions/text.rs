//! Small text rewrites: alphabetic buckets, time zone cities, unit ids.

use super::{FunctionError, Transformed};

const LANGUAGE_PAGES: [(char, &str); 5] = [
    ('d', "Languages (A-D)"),
    ('j', "Languages (E-J)"),
    ('n', "Languages (K-N)"),
    ('s', "Languages (O-S)"),
    ('z', "Languages (T-Z)"),
];

/// Unit category prefix → units page, in display order.
const UNIT_PAGES: [(&str, &str); 16] = [
    ("duration", "Duration"),
    ("length", "Length"),
    ("area", "Area"),
    ("volume", "Volume"),
    ("mass", "Weight"),
    ("speed", "Speed"),
    ("acceleration", "Speed"),
    ("temperature", "Temperature"),
    ("energy", "Energy & Power"),
    ("power", "Energy & Power"),
    ("electric", "Electric"),
    ("digital", "Digital"),
    ("concentr", "Concentrations"),
    ("consumption", "Fuel Consumption"),
    ("pressure", "Pressure"),
    ("angle", "Angles"),
];

/// First letter, uppercased, as a bucket header.
pub fn alpha(arg: &str) -> Result<Transformed, FunctionError> {
    let first = arg
        .chars()
        .next()
        .ok_or_else(|| FunctionError("alpha of an empty string".into()))?;
    Ok(Transformed::plain(first.to_uppercase().to_string()))
}

/// Language code → one of five alphabetic language pages.
pub fn language_page(arg: &str) -> Result<Transformed, FunctionError> {
    let first = arg
        .chars()
        .next()
        .map(|c| c.to_ascii_lowercase())
        .filter(char::is_ascii_lowercase)
        .ok_or_else(|| FunctionError::unknown("language code", arg))?;
    let i = LANGUAGE_PAGES
        .iter()
        .position(|(last, _)| first <= *last)
        .unwrap_or(LANGUAGE_PAGES.len() - 1);
    Ok(Transformed::ordered(LANGUAGE_PAGES[i].1, i))
}

/// `America/Argentina/Buenos_Aires` → `Buenos Aires`.
pub fn tz_city(arg: &str) -> Result<Transformed, FunctionError> {
    let city = arg.rsplit('/').next().unwrap_or(arg);
    if city.is_empty() {
        return Err(FunctionError::unknown("time zone", arg));
    }
    Ok(Transformed::plain(city.replace('_', " ")))
}

/// Unit id such as `length-meter` → its units page.
pub fn unit_page(arg: &str) -> Result<Transformed, FunctionError> {
    Ok(match UNIT_PAGES.iter().position(|(prefix, _)| arg.starts_with(prefix)) {
        Some(i) => Transformed::ordered(UNIT_PAGES[i].1, i),
        None => Transformed::ordered("Other Units", UNIT_PAGES.len()),
    })
}

/// Unit id without its category: `length-meter` → `meter`.
pub fn unit_name(arg: &str) -> Result<Transformed, FunctionError> {
    let name = arg.split_once('-').map_or(arg, |(_, rest)| rest);
    Ok(Transformed::plain(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alpha_buckets() {
        assert_eq!(alpha("élan").unwrap().text, "É");
        assert!(alpha("").is_err());
    }

    #[test]
    fn language_pages_by_first_letter() {
        assert_eq!(language_page("de").unwrap(), Transformed::ordered("Languages (A-D)", 0));
        assert_eq!(language_page("en").unwrap().text, "Languages (E-J)");
        assert_eq!(language_page("nl").unwrap().text, "Languages (K-N)");
        assert_eq!(language_page("sr_Latn").unwrap().text, "Languages (O-S)");
        assert_eq!(language_page("zu").unwrap().text, "Languages (T-Z)");
        assert!(language_page("").is_err());
    }

    #[test]
    fn cities_drop_area_and_underscores() {
        assert_eq!(tz_city("America/Argentina/Buenos_Aires").unwrap().text, "Buenos Aires");
        assert_eq!(tz_city("UTC").unwrap().text, "UTC");
        assert!(tz_city("Europe/").is_err());
    }

    #[test]
    fn units() {
        assert_eq!(unit_page("mass-kilogram").unwrap().text, "Weight");
        assert_eq!(unit_page("concentr-percent").unwrap().text, "Concentrations");
        assert_eq!(unit_page("graphics-pixel").unwrap().text, "Other Units");
        assert_eq!(unit_name("length-meter").unwrap().text, "meter");
        assert_eq!(unit_name("speed-kilometer-per-hour").unwrap().text, "kilometer-per-hour");
    }
}
