//! Geographic grouping for territories, currencies, and time zones.
//!
//! Containment follows UN M.49: world → continent → subcontinent →
//! territory. A region's rank is its index in a depth-first walk of that
//! tree, so sorting by rank keeps each grouping contiguous.

use std::collections::HashMap;
use std::sync::LazyLock;

use super::{FunctionError, Transformed};

/// (code, name, children); leaves are two-letter territories.
type Node = (&'static str, &'static str, &'static [&'static str]);

const CONTINENTS: [&str; 5] = ["002", "019", "142", "150", "009"];

const GROUPS: &[Node] = &[
    ("002", "Africa", &["015", "011", "017", "014", "018"]),
    ("015", "Northern Africa", &["DZ", "EA", "EG", "EH", "IC", "LY", "MA", "SD", "SS", "TN"]),
    (
        "011",
        "Western Africa",
        &["BF", "BJ", "CI", "CV", "GH", "GM", "GN", "GW", "LR", "ML", "MR", "NE", "NG", "SH", "SL", "SN", "TG"],
    ),
    ("017", "Middle Africa", &["AO", "CD", "CF", "CG", "CM", "GA", "GQ", "ST", "TD"]),
    (
        "014",
        "Eastern Africa",
        &[
            "BI", "DJ", "ER", "ET", "IO", "KE", "KM", "MG", "MU", "MW", "MZ", "RE", "RW", "SC", "SO", "TF", "TZ", "UG",
            "YT", "ZM", "ZW",
        ],
    ),
    ("018", "Southern Africa", &["BW", "LS", "NA", "SZ", "ZA"]),
    ("019", "Americas", &["021", "029", "013", "005"]),
    ("021", "Northern America", &["BM", "CA", "GL", "PM", "US"]),
    (
        "029",
        "Caribbean",
        &[
            "AG", "AI", "AW", "BB", "BL", "BQ", "BS", "CU", "CW", "DM", "DO", "GD", "GP", "HT", "JM", "KN", "KY", "LC",
            "MF", "MQ", "MS", "PR", "SX", "TC", "TT", "VC", "VG", "VI",
        ],
    ),
    ("013", "Central America", &["BZ", "CR", "GT", "HN", "MX", "NI", "PA", "SV"]),
    (
        "005",
        "South America",
        &["AR", "BO", "BR", "BV", "CL", "CO", "EC", "FK", "GF", "GS", "GY", "PE", "PY", "SR", "UY", "VE"],
    ),
    ("142", "Asia", &["143", "030", "034", "035", "145"]),
    ("143", "Central Asia", &["KG", "KZ", "TJ", "TM", "UZ"]),
    ("030", "Eastern Asia", &["CN", "HK", "JP", "KP", "KR", "MN", "MO", "TW"]),
    ("034", "Southern Asia", &["AF", "BD", "BT", "IN", "IR", "LK", "MV", "NP", "PK"]),
    ("035", "South-Eastern Asia", &["BN", "ID", "KH", "LA", "MM", "MY", "PH", "SG", "TH", "TL", "VN"]),
    (
        "145",
        "Western Asia",
        &[
            "AE", "AM", "AZ", "BH", "CY", "GE", "IL", "IQ", "JO", "KW", "LB", "OM", "PS", "QA", "SA", "SY", "TR", "YE",
        ],
    ),
    ("150", "Europe", &["151", "154", "039", "155"]),
    ("151", "Eastern Europe", &["BG", "BY", "CZ", "HU", "MD", "PL", "RO", "RU", "SK", "UA"]),
    (
        "154",
        "Northern Europe",
        &["AX", "DK", "EE", "FI", "FO", "GB", "GG", "IE", "IM", "IS", "JE", "LT", "LV", "NO", "SE", "SJ"],
    ),
    (
        "039",
        "Southern Europe",
        &["AD", "AL", "BA", "ES", "GI", "GR", "HR", "IT", "ME", "MK", "MT", "PT", "RS", "SI", "SM", "VA", "XK"],
    ),
    ("155", "Western Europe", &["AT", "BE", "CH", "DE", "FR", "LI", "LU", "MC", "NL"]),
    ("009", "Oceania", &["053", "054", "057", "061", "QO"]),
    ("053", "Australasia", &["AU", "CC", "CX", "HM", "NF", "NZ"]),
    ("054", "Melanesia", &["FJ", "NC", "PG", "SB", "VU"]),
    ("057", "Micronesia", &["FM", "GU", "KI", "MH", "MP", "NR", "PW", "UM"]),
    ("061", "Polynesia", &["AS", "CK", "NU", "PF", "PN", "TK", "TO", "TV", "WF", "WS"]),
    ("QO", "Outlying Oceania", &["AC", "AQ", "CP", "DG", "TA"]),
];

/// Currencies whose code does not start with their territory, plus retired
/// codes whose territory no longer exists. `None` marks currencies with no
/// home region (precious metals, testing and fund codes).
const CURRENCY_OVERRIDES: &[(&str, Option<&str>)] = &[
    ("EUR", Some("150")),
    ("XAF", Some("017")),
    ("XOF", Some("011")),
    ("XCD", Some("029")),
    ("XPF", Some("061")),
    ("ANG", Some("CW")),
    ("SUR", Some("RU")),
    ("YUD", Some("RS")),
    ("YUM", Some("RS")),
    ("YUN", Some("RS")),
    ("YUR", Some("RS")),
    ("DDM", Some("DE")),
    ("CSK", Some("CZ")),
    ("CSD", Some("RS")),
    ("ZRN", Some("CD")),
    ("ZRZ", Some("CD")),
    ("BUK", Some("MM")),
    ("TPE", Some("TL")),
    ("XDR", None),
    ("XAG", None),
    ("XAU", None),
    ("XPD", None),
    ("XPT", None),
    ("XSU", None),
    ("XTS", None),
    ("XUA", None),
    ("XXX", None),
];

/// Time zone id prefix → timezone page name, in display order.
const TZ_REGIONS: [(&str, &str); 11] = [
    ("America", "Americas"),
    ("Africa", "Africa"),
    ("Europe", "Europe"),
    ("Arctic", "Europe"),
    ("Asia", "Asia"),
    ("Australia", "Australasia & Pacific"),
    ("Pacific", "Australasia & Pacific"),
    ("Atlantic", "Atlantic"),
    ("Indian", "Indian Ocean"),
    ("Antarctica", "Antarctica"),
    ("Etc", "Unknown Region"),
];

/// Order for anything outside the containment tree; sorts after all regions.
const UNPLACED: usize = 10_000;

#[derive(Debug)]
struct Placement {
    rank: usize,
    parent: Option<&'static str>,
}

struct Containment {
    names: HashMap<&'static str, &'static str>,
    placements: HashMap<&'static str, Placement>,
}

static CONTAINMENT: LazyLock<Containment> = LazyLock::new(|| {
    let groups: HashMap<_, _> = GROUPS
        .iter()
        .map(|(code, name, children)| (*code, (*name, *children)))
        .collect();

    let mut names: HashMap<&'static str, &'static str> = HashMap::from([("001", "World")]);
    names.extend(groups.iter().map(|(code, (name, _))| (*code, *name)));

    let mut placements = HashMap::new();
    let mut stack: Vec<(&'static str, Option<&'static str>)> = vec![("001", None)];
    let world: &[&str] = &CONTINENTS;

    while let Some((code, parent)) = stack.pop() {
        let rank = placements.len();
        placements.insert(code, Placement { rank, parent });
        let children = if code == "001" {
            world
        } else {
            groups.get(code).map(|(_, c)| *c).unwrap_or(&[])
        };
        stack.extend(children.iter().rev().map(|child| (*child, Some(code))));
    }

    Containment { names, placements }
});

impl Containment {
    fn rank(&self, code: &str) -> Option<usize> {
        self.placements.get(code).map(|p| p.rank)
    }

    fn parent(&self, code: &str) -> Option<&'static str> {
        self.placements.get(code)?.parent
    }

    fn name(&self, code: &str) -> &'static str {
        self.names.get(code).copied().unwrap_or("Unknown Region")
    }

    /// Topmost ancestor below the world node.
    fn continent(&self, code: &str) -> Option<&'static str> {
        let mut cur: &'static str = *self.placements.get_key_value(code)?.0;
        while let Some(parent) = self.parent(cur) {
            if parent == "001" {
                return Some(cur);
            }
            cur = parent;
        }
        None
    }
}

/// Territory or region → the grouping that encloses it, ordered by the
/// grouping's rank.
pub fn territory(arg: &str) -> Result<Transformed, FunctionError> {
    let geo = &*CONTAINMENT;
    match geo.parent(arg) {
        Some(parent) => Ok(Transformed::ordered(geo.name(parent), geo.rank(parent).unwrap_or(UNPLACED))),
        None if geo.rank(arg).is_some() => Ok(Transformed::ordered("World", 0)),
        None if is_region_code(arg) => Ok(Transformed::ordered("Unknown Region", UNPLACED)),
        None => Err(FunctionError::unknown("region code", arg)),
    }
}

/// Territory or region → its continent name, ordered by continent rank.
pub fn continent(arg: &str) -> Result<Transformed, FunctionError> {
    let geo = &*CONTAINMENT;
    match geo.continent(arg) {
        Some(c) => Ok(Transformed::ordered(geo.name(c), geo.rank(c).unwrap_or(UNPLACED))),
        None if is_region_code(arg) => Ok(Transformed::ordered("Unknown Region", UNPLACED)),
        None => Err(FunctionError::unknown("region code", arg)),
    }
}

/// Territory → the display-names page for its continent. Numeric regions
/// and unplaced codes go to the regions page.
pub fn territory_page(arg: &str) -> Result<Transformed, FunctionError> {
    if !is_region_code(arg) {
        return Err(FunctionError::unknown("region code", arg));
    }
    let pages = &*CONTINENT_PAGES;
    let continent = if arg.bytes().all(|b| b.is_ascii_digit()) {
        None
    } else {
        CONTAINMENT.continent(arg)
    };
    Ok(match continent {
        Some(c) => Transformed::ordered(pages[c].0, CONTAINMENT.rank(c).unwrap_or(UNPLACED)),
        None => Transformed::ordered("Geographic Regions", 0),
    })
}

/// Currency → enclosing region name, ordered by region rank.
pub fn currency_region(arg: &str) -> Result<Transformed, FunctionError> {
    let geo = &*CONTAINMENT;
    Ok(match currency_home(arg)? {
        Some(region) => match geo.parent(region) {
            Some(parent) if region.len() == 2 => Transformed::ordered(geo.name(parent), geo.rank(parent).unwrap_or(UNPLACED)),
            _ => Transformed::ordered(geo.name(region), geo.rank(region).unwrap_or(UNPLACED)),
        },
        None => Transformed::ordered("Unknown Region", UNPLACED),
    })
}

/// Currency → the currencies page for its continent.
pub fn currency_page(arg: &str) -> Result<Transformed, FunctionError> {
    let pages = &*CONTINENT_PAGES;
    let continent = currency_home(arg)?.and_then(|region| CONTAINMENT.continent(region));
    Ok(match continent {
        Some(c) => Transformed::ordered(pages[c].1, CONTAINMENT.rank(c).unwrap_or(UNPLACED)),
        None => Transformed::ordered("Other Currencies", UNPLACED),
    })
}

/// Time zone id → timezone page, by the id's leading area.
pub fn tz_page(arg: &str) -> Result<Transformed, FunctionError> {
    let area = arg.split('/').next().unwrap_or(arg);
    Ok(match TZ_REGIONS.iter().position(|(prefix, _)| *prefix == area) {
        Some(i) => Transformed::ordered(TZ_REGIONS[i].1, i),
        None => Transformed::ordered("Unknown Region", TZ_REGIONS.len()),
    })
}

/// Continent code → (territory page, currency page).
static CONTINENT_PAGES: LazyLock<HashMap<&'static str, (&'static str, &'static str)>> = LazyLock::new(|| {
    HashMap::from([
        ("002", ("African Countries", "African Currencies")),
        ("019", ("American Countries", "American Currencies")),
        ("142", ("Asian Countries", "Asian Currencies")),
        ("150", ("European Countries", "European Currencies")),
        ("009", ("Oceanian Countries", "Oceanian Currencies")),
    ])
});

/// Region a currency belongs to; `Ok(None)` when it has none.
fn currency_home(code: &str) -> Result<Option<&'static str>, FunctionError> {
    if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(FunctionError::unknown("currency code", code));
    }
    if let Some((_, region)) = CURRENCY_OVERRIDES.iter().find(|(c, _)| *c == code) {
        return Ok(*region);
    }
    Ok(CONTAINMENT
        .placements
        .get_key_value(&code[..2])
        .map(|(k, _)| *k))
}

fn is_region_code(code: &str) -> bool {
    match code.len() {
        2 => code.bytes().all(|b| b.is_ascii_uppercase()),
        3 => code.bytes().all(|b| b.is_ascii_digit()),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(t: &Transformed) -> i32 {
        t.hint.order.expect("ordered")
    }

    #[test]
    fn depth_first_ranks_keep_groups_contiguous() {
        let geo = &*CONTAINMENT;
        assert_eq!(geo.rank("001"), Some(0));
        assert_eq!(geo.rank("002"), Some(1));
        assert_eq!(geo.rank("015"), Some(2));
        let west_europe = geo.rank("155").unwrap();
        for member in ["AT", "DE", "FR", "NL"] {
            assert!(geo.rank(member).unwrap() > west_europe);
        }
        assert!(geo.rank("NL").unwrap() < geo.rank("009").unwrap());
    }

    #[test]
    fn territory_names_the_enclosing_group() {
        let fr = territory("FR").unwrap();
        let de = territory("DE").unwrap();
        assert_eq!(fr.text, "Western Europe");
        assert_eq!(fr, de);
        assert_eq!(territory("150").unwrap().text, "World");
        assert_eq!(territory("155").unwrap().text, "Europe");
        assert_eq!(territory("ZZ").unwrap().text, "Unknown Region");
        assert!(territory("France").is_err());
    }

    #[test]
    fn continents_follow_world_order() {
        assert_eq!(continent("KE").unwrap().text, "Africa");
        assert_eq!(continent("BR").unwrap().text, "Americas");
        assert!(order(&continent("KE").unwrap()) < order(&continent("JP").unwrap()));
        assert!(order(&continent("JP").unwrap()) < order(&continent("AU").unwrap()));
    }

    #[test]
    fn territory_pages() {
        assert_eq!(territory_page("JP").unwrap().text, "Asian Countries");
        assert_eq!(territory_page("AQ").unwrap().text, "Oceanian Countries");
        assert_eq!(territory_page("419").unwrap().text, "Geographic Regions");
        assert_eq!(territory_page("EU").unwrap().text, "Geographic Regions");
    }

    #[test]
    fn currencies_use_overrides_before_prefix() {
        assert_eq!(currency_region("USD").unwrap().text, "Northern America");
        assert_eq!(currency_region("EUR").unwrap().text, "Europe");
        assert_eq!(currency_region("XOF").unwrap().text, "Western Africa");
        assert_eq!(currency_region("DDM").unwrap().text, "Western Europe");
        assert_eq!(currency_region("SUR").unwrap().text, "Eastern Europe");
        assert_eq!(currency_region("XAU").unwrap().text, "Unknown Region");
        assert!(currency_region("usd").is_err());

        assert_eq!(currency_page("JPY").unwrap().text, "Asian Currencies");
        assert_eq!(currency_page("EUR").unwrap().text, "European Currencies");
        assert_eq!(currency_page("XXX").unwrap().text, "Other Currencies");
    }

    #[test]
    fn time_zone_pages() {
        assert_eq!(tz_page("America/Los_Angeles").unwrap(), Transformed::ordered("Americas", 0));
        assert_eq!(tz_page("Pacific/Auckland").unwrap().text, "Australasia & Pacific");
        assert_eq!(tz_page("Mars/Olympus").unwrap().text, "Unknown Region");
    }
}
