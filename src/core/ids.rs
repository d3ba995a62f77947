//! Closed vocabularies for the first two label levels plus the edit status.
//!
//! Sections and pages sort by declaration order, never alphabetically. Page
//! display names are only unique inside their section, so page lookup always
//! goes through the owning section.

use serde::Serialize;

use crate::core::error::PathHeaderError;

/// Top-level grouping of the display tree.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum SectionId {
    Core_Data,
    Locale_Display_Names,
    DateTime,
    Timezones,
    Numbers,
    Currencies,
    Units,
    Characters,
    Misc,
    BCP47,
    Supplemental,
    Special,
}

impl SectionId {
    pub const ALL: [SectionId; 12] = [
        SectionId::Core_Data,
        SectionId::Locale_Display_Names,
        SectionId::DateTime,
        SectionId::Timezones,
        SectionId::Numbers,
        SectionId::Currencies,
        SectionId::Units,
        SectionId::Characters,
        SectionId::Misc,
        SectionId::BCP47,
        SectionId::Supplemental,
        SectionId::Special,
    ];

    /// Identifier spelling, as used in rule tables and config files.
    pub fn name(self) -> &'static str {
        match self {
            SectionId::Core_Data => "Core_Data",
            SectionId::Locale_Display_Names => "Locale_Display_Names",
            SectionId::DateTime => "DateTime",
            SectionId::Timezones => "Timezones",
            SectionId::Numbers => "Numbers",
            SectionId::Currencies => "Currencies",
            SectionId::Units => "Units",
            SectionId::Characters => "Characters",
            SectionId::Misc => "Misc",
            SectionId::BCP47 => "BCP47",
            SectionId::Supplemental => "Supplemental",
            SectionId::Special => "Special",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            SectionId::Core_Data => "Core Data",
            SectionId::Locale_Display_Names => "Locale Display Names",
            SectionId::DateTime => "Date & Time",
            SectionId::Misc => "Miscellaneous",
            other => other.name(),
        }
    }

    /// Parse either the identifier or the display spelling.
    pub fn parse(text: &str) -> Result<Self, PathHeaderError> {
        let wanted = normalize(text);
        Self::ALL
            .into_iter()
            .find(|s| normalize(s.name()) == wanted || normalize(s.display_name()) == wanted)
            .ok_or_else(|| PathHeaderError::InvalidId {
                kind: "section",
                value: text.to_string(),
            })
    }

    /// Pages owned by this section, in display order.
    pub fn pages(self) -> impl Iterator<Item = PageId> {
        PageId::ALL
            .iter()
            .copied()
            .filter(move |p| p.section() == self)
    }
}

impl std::fmt::Display for SectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Second-level grouping; each page belongs to exactly one section.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum PageId {
    // Core Data
    Alphabetic_Information,
    Numbering_Systems,
    LinguisticElements,
    // Locale Display Names
    Locale_Name_Patterns,
    Languages_A_D,
    Languages_E_J,
    Languages_K_N,
    Languages_O_S,
    Languages_T_Z,
    Scripts,
    Territories,
    T_Africa,
    T_Americas,
    T_Asia,
    T_Europe,
    T_Oceania,
    Locale_Variants,
    Keys,
    // Date & Time
    Fields,
    Relative,
    Gregorian,
    Generic,
    Buddhist,
    Chinese,
    Coptic,
    Dangi,
    Ethiopic,
    Hebrew,
    Indian,
    Islamic,
    Japanese,
    Persian,
    Minguo,
    // Timezones
    Timezone_Display_Patterns,
    Z_Americas,
    Z_Africa,
    Z_Europe,
    Z_Asia,
    Z_Oceania,
    Z_Atlantic,
    Z_Indian,
    Z_Antarctica,
    Z_Unknown,
    Metazones,
    // Numbers
    Symbols,
    Number_Formatting_Patterns,
    Compact_Decimal_Formatting,
    Minimal_Pairs,
    // Currencies
    C_Africa,
    C_Americas,
    C_Asia,
    C_Europe,
    C_Oceania,
    C_Unknown,
    // Units
    Duration,
    Length,
    Area,
    Volume,
    Weight,
    Speed,
    Temperature,
    Energy_Power,
    Electric,
    Digital,
    Concentrations,
    Consumption,
    Pressure,
    Angles,
    Other_Units,
    Compound_Units,
    Measurement_Systems,
    // Characters
    Character_Labels,
    Typography,
    // Miscellaneous
    Displaying_Lists,
    Context_Transforms,
    Transforms,
    Posix,
    // BCP47
    Bcp47_Keys,
    // Supplemental
    Territory_Info,
    Plural_Rules,
    Supplemental_Other,
    // Special
    Unknown,
    Suppress,
    Deprecated,
}

impl PageId {
    pub const ALL: [PageId; 84] = [
        PageId::Alphabetic_Information,
        PageId::Numbering_Systems,
        PageId::LinguisticElements,
        PageId::Locale_Name_Patterns,
        PageId::Languages_A_D,
        PageId::Languages_E_J,
        PageId::Languages_K_N,
        PageId::Languages_O_S,
        PageId::Languages_T_Z,
        PageId::Scripts,
        PageId::Territories,
        PageId::T_Africa,
        PageId::T_Americas,
        PageId::T_Asia,
        PageId::T_Europe,
        PageId::T_Oceania,
        PageId::Locale_Variants,
        PageId::Keys,
        PageId::Fields,
        PageId::Relative,
        PageId::Gregorian,
        PageId::Generic,
        PageId::Buddhist,
        PageId::Chinese,
        PageId::Coptic,
        PageId::Dangi,
        PageId::Ethiopic,
        PageId::Hebrew,
        PageId::Indian,
        PageId::Islamic,
        PageId::Japanese,
        PageId::Persian,
        PageId::Minguo,
        PageId::Timezone_Display_Patterns,
        PageId::Z_Americas,
        PageId::Z_Africa,
        PageId::Z_Europe,
        PageId::Z_Asia,
        PageId::Z_Oceania,
        PageId::Z_Atlantic,
        PageId::Z_Indian,
        PageId::Z_Antarctica,
        PageId::Z_Unknown,
        PageId::Metazones,
        PageId::Symbols,
        PageId::Number_Formatting_Patterns,
        PageId::Compact_Decimal_Formatting,
        PageId::Minimal_Pairs,
        PageId::C_Africa,
        PageId::C_Americas,
        PageId::C_Asia,
        PageId::C_Europe,
        PageId::C_Oceania,
        PageId::C_Unknown,
        PageId::Duration,
        PageId::Length,
        PageId::Area,
        PageId::Volume,
        PageId::Weight,
        PageId::Speed,
        PageId::Temperature,
        PageId::Energy_Power,
        PageId::Electric,
        PageId::Digital,
        PageId::Concentrations,
        PageId::Consumption,
        PageId::Pressure,
        PageId::Angles,
        PageId::Other_Units,
        PageId::Compound_Units,
        PageId::Measurement_Systems,
        PageId::Character_Labels,
        PageId::Typography,
        PageId::Displaying_Lists,
        PageId::Context_Transforms,
        PageId::Transforms,
        PageId::Posix,
        PageId::Bcp47_Keys,
        PageId::Territory_Info,
        PageId::Plural_Rules,
        PageId::Supplemental_Other,
        PageId::Unknown,
        PageId::Suppress,
        PageId::Deprecated,
    ];

    /// (owning section, identifier spelling, display spelling)
    fn info(self) -> (SectionId, &'static str, &'static str) {
        use PageId::*;
        use SectionId as S;
        match self {
            Alphabetic_Information => (S::Core_Data, "Alphabetic_Information", "Alphabetic Information"),
            Numbering_Systems => (S::Core_Data, "Numbering_Systems", "Numbering Systems"),
            LinguisticElements => (S::Core_Data, "LinguisticElements", "Linguistic Elements"),
            Locale_Name_Patterns => (S::Locale_Display_Names, "Locale_Name_Patterns", "Locale Name Patterns"),
            Languages_A_D => (S::Locale_Display_Names, "Languages_A_D", "Languages (A-D)"),
            Languages_E_J => (S::Locale_Display_Names, "Languages_E_J", "Languages (E-J)"),
            Languages_K_N => (S::Locale_Display_Names, "Languages_K_N", "Languages (K-N)"),
            Languages_O_S => (S::Locale_Display_Names, "Languages_O_S", "Languages (O-S)"),
            Languages_T_Z => (S::Locale_Display_Names, "Languages_T_Z", "Languages (T-Z)"),
            Scripts => (S::Locale_Display_Names, "Scripts", "Scripts"),
            Territories => (S::Locale_Display_Names, "Territories", "Geographic Regions"),
            T_Africa => (S::Locale_Display_Names, "T_Africa", "African Countries"),
            T_Americas => (S::Locale_Display_Names, "T_Americas", "American Countries"),
            T_Asia => (S::Locale_Display_Names, "T_Asia", "Asian Countries"),
            T_Europe => (S::Locale_Display_Names, "T_Europe", "European Countries"),
            T_Oceania => (S::Locale_Display_Names, "T_Oceania", "Oceanian Countries"),
            Locale_Variants => (S::Locale_Display_Names, "Locale_Variants", "Locale Variants"),
            Keys => (S::Locale_Display_Names, "Keys", "Keys"),
            Fields => (S::DateTime, "Fields", "Fields"),
            Relative => (S::DateTime, "Relative", "Relative Time"),
            Gregorian => (S::DateTime, "Gregorian", "Gregorian"),
            Generic => (S::DateTime, "Generic", "Generic"),
            Buddhist => (S::DateTime, "Buddhist", "Buddhist"),
            Chinese => (S::DateTime, "Chinese", "Chinese"),
            Coptic => (S::DateTime, "Coptic", "Coptic"),
            Dangi => (S::DateTime, "Dangi", "Dangi"),
            Ethiopic => (S::DateTime, "Ethiopic", "Ethiopic"),
            Hebrew => (S::DateTime, "Hebrew", "Hebrew"),
            Indian => (S::DateTime, "Indian", "Indian"),
            Islamic => (S::DateTime, "Islamic", "Islamic"),
            Japanese => (S::DateTime, "Japanese", "Japanese"),
            Persian => (S::DateTime, "Persian", "Persian"),
            Minguo => (S::DateTime, "Minguo", "ROC"),
            Timezone_Display_Patterns => (S::Timezones, "Timezone_Display_Patterns", "Timezone Display Patterns"),
            Z_Americas => (S::Timezones, "Z_Americas", "Americas"),
            Z_Africa => (S::Timezones, "Z_Africa", "Africa"),
            Z_Europe => (S::Timezones, "Z_Europe", "Europe"),
            Z_Asia => (S::Timezones, "Z_Asia", "Asia"),
            Z_Oceania => (S::Timezones, "Z_Oceania", "Australasia & Pacific"),
            Z_Atlantic => (S::Timezones, "Z_Atlantic", "Atlantic"),
            Z_Indian => (S::Timezones, "Z_Indian", "Indian Ocean"),
            Z_Antarctica => (S::Timezones, "Z_Antarctica", "Antarctica"),
            Z_Unknown => (S::Timezones, "Z_Unknown", "Unknown Region"),
            Metazones => (S::Timezones, "Metazones", "Metazones"),
            Symbols => (S::Numbers, "Symbols", "Symbols"),
            Number_Formatting_Patterns => (S::Numbers, "Number_Formatting_Patterns", "Number Formatting Patterns"),
            Compact_Decimal_Formatting => (S::Numbers, "Compact_Decimal_Formatting", "Compact Decimal Formatting"),
            Minimal_Pairs => (S::Numbers, "Minimal_Pairs", "Minimal Pairs"),
            C_Africa => (S::Currencies, "C_Africa", "African Currencies"),
            C_Americas => (S::Currencies, "C_Americas", "American Currencies"),
            C_Asia => (S::Currencies, "C_Asia", "Asian Currencies"),
            C_Europe => (S::Currencies, "C_Europe", "European Currencies"),
            C_Oceania => (S::Currencies, "C_Oceania", "Oceanian Currencies"),
            C_Unknown => (S::Currencies, "C_Unknown", "Other Currencies"),
            Duration => (S::Units, "Duration", "Duration"),
            Length => (S::Units, "Length", "Length"),
            Area => (S::Units, "Area", "Area"),
            Volume => (S::Units, "Volume", "Volume"),
            Weight => (S::Units, "Weight", "Weight"),
            Speed => (S::Units, "Speed", "Speed"),
            Temperature => (S::Units, "Temperature", "Temperature"),
            Energy_Power => (S::Units, "Energy_Power", "Energy & Power"),
            Electric => (S::Units, "Electric", "Electric"),
            Digital => (S::Units, "Digital", "Digital"),
            Concentrations => (S::Units, "Concentrations", "Concentrations"),
            Consumption => (S::Units, "Consumption", "Fuel Consumption"),
            Pressure => (S::Units, "Pressure", "Pressure"),
            Angles => (S::Units, "Angles", "Angles"),
            Other_Units => (S::Units, "Other_Units", "Other Units"),
            Compound_Units => (S::Units, "Compound_Units", "Compound Units"),
            Measurement_Systems => (S::Units, "Measurement_Systems", "Measurement Systems"),
            Character_Labels => (S::Characters, "Character_Labels", "Character Labels"),
            Typography => (S::Characters, "Typography", "Typography"),
            Displaying_Lists => (S::Misc, "Displaying_Lists", "Displaying Lists"),
            Context_Transforms => (S::Misc, "Context_Transforms", "Capitalization"),
            Transforms => (S::Misc, "Transforms", "Transforms"),
            Posix => (S::Misc, "Posix", "POSIX"),
            Bcp47_Keys => (S::BCP47, "Bcp47_Keys", "Keys"),
            Territory_Info => (S::Supplemental, "Territory_Info", "Territory Info"),
            Plural_Rules => (S::Supplemental, "Plural_Rules", "Plural Rules"),
            Supplemental_Other => (S::Supplemental, "Supplemental_Other", "Other"),
            Unknown => (S::Special, "Unknown", "Unknown"),
            Suppress => (S::Special, "Suppress", "Suppress"),
            Deprecated => (S::Special, "Deprecated", "Deprecated"),
        }
    }

    pub fn section(self) -> SectionId {
        self.info().0
    }

    pub fn name(self) -> &'static str {
        self.info().1
    }

    pub fn display_name(self) -> &'static str {
        self.info().2
    }

    /// Parse a page spelling inside `section`.
    ///
    /// Display names repeat across sections ("Keys", "Africa"), so the
    /// section is part of the lookup.
    pub fn parse(section: SectionId, text: &str) -> Result<Self, PathHeaderError> {
        let wanted = normalize(text);
        section
            .pages()
            .find(|p| normalize(p.name()) == wanted || normalize(p.display_name()) == wanted)
            .ok_or_else(|| PathHeaderError::InvalidId {
                kind: "page",
                value: format!("{text} (in section {section})"),
            })
    }
}

impl std::fmt::Display for PageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Editability of a classified item in downstream tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SurveyToolStatus {
    Deprecated,
    Hide,
    ReadOnly,
    #[default]
    ReadWrite,
}

impl SurveyToolStatus {
    pub fn parse(text: &str) -> Result<Self, PathHeaderError> {
        match normalize(text).replace(['-', ' '], "").as_str() {
            "deprecated" => Ok(Self::Deprecated),
            "hide" | "hidden" => Ok(Self::Hide),
            "readonly" => Ok(Self::ReadOnly),
            "readwrite" => Ok(Self::ReadWrite),
            _ => Err(PathHeaderError::InvalidId {
                kind: "status",
                value: text.to_string(),
            }),
        }
    }

    /// Whether the item may be edited at all.
    pub fn is_editable(self) -> bool {
        self == Self::ReadWrite
    }
}

impl std::fmt::Display for SurveyToolStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Deprecated => "deprecated",
            Self::Hide => "hidden",
            Self::ReadOnly => "read-only",
            Self::ReadWrite => "read-write",
        })
    }
}

fn normalize(text: &str) -> String {
    text.trim()
        .to_ascii_lowercase()
        .replace('_', " ")
}
