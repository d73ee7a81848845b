//! Canonical field definitions and spreadsheet header mapping.
//!
//! Incoming spreadsheets use arbitrary column headers; the importer only
//! understands the fixed set of [`CanonicalField`]s. Headers are matched
//! against a static synonym table after lower-casing. Unrecognised headers
//! map to `None` -- their values are dropped during normalization, but the
//! header string is still surfaced in the preview for transparency.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The value kind a canonical field is normalized to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Trimmed text.
    Text,
    /// `true` / `false`, coerced from truthy strings.
    Boolean,
    /// Numeric coercion; unparseable input is deferred to validation.
    Number,
    /// Comma-separated list of trimmed, non-empty elements.
    TextList,
    /// Trimmed text that must parse as a calendar date at validation time.
    Date,
}

/// The fixed set of normalized attribute names the import pipeline
/// understands, independent of the source spreadsheet's header text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    Name,
    ReptileCode,
    Sex,
    Species,
    Morph,
    HatchDate,
    AcquisitionDate,
    Weight,
    Length,
    VisualTraits,
    HetTraits,
    OriginalBreeder,
    Status,
    BreedingLine,
    LineagePath,
    Generation,
    IsBreeder,
    RetiredBreeder,
    Notes,
    DamName,
    SireName,
}

impl CanonicalField {
    /// All canonical fields, in display order.
    pub const ALL: &'static [CanonicalField] = &[
        Self::Name,
        Self::ReptileCode,
        Self::Sex,
        Self::Species,
        Self::Morph,
        Self::HatchDate,
        Self::AcquisitionDate,
        Self::Weight,
        Self::Length,
        Self::VisualTraits,
        Self::HetTraits,
        Self::OriginalBreeder,
        Self::Status,
        Self::BreedingLine,
        Self::LineagePath,
        Self::Generation,
        Self::IsBreeder,
        Self::RetiredBreeder,
        Self::Notes,
        Self::DamName,
        Self::SireName,
    ];

    /// The field name as used in wire payloads and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::ReptileCode => "reptile_code",
            Self::Sex => "sex",
            Self::Species => "species",
            Self::Morph => "morph",
            Self::HatchDate => "hatch_date",
            Self::AcquisitionDate => "acquisition_date",
            Self::Weight => "weight",
            Self::Length => "length",
            Self::VisualTraits => "visual_traits",
            Self::HetTraits => "het_traits",
            Self::OriginalBreeder => "original_breeder",
            Self::Status => "status",
            Self::BreedingLine => "breeding_line",
            Self::LineagePath => "lineage_path",
            Self::Generation => "generation",
            Self::IsBreeder => "is_breeder",
            Self::RetiredBreeder => "retired_breeder",
            Self::Notes => "notes",
            Self::DamName => "dam_name",
            Self::SireName => "sire_name",
        }
    }

    /// The value kind this field is normalized to.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::HatchDate | Self::AcquisitionDate => ValueKind::Date,
            Self::Weight | Self::Length | Self::Generation => ValueKind::Number,
            Self::VisualTraits | Self::HetTraits => ValueKind::TextList,
            Self::IsBreeder | Self::RetiredBreeder => ValueKind::Boolean,
            _ => ValueKind::Text,
        }
    }

    /// Match a spreadsheet header against the synonym table.
    ///
    /// Matching is case-insensitive and whitespace-trimmed. Returns `None`
    /// for headers the importer does not recognise.
    pub fn from_header(header: &str) -> Option<Self> {
        match header.trim().to_lowercase().as_str() {
            "name" | "reptile name" | "animal name" | "pet name" => Some(Self::Name),
            "code" | "reptile code" | "reptile_code" | "animal code" => Some(Self::ReptileCode),
            "sex" | "gender" => Some(Self::Sex),
            "species" | "species name" => Some(Self::Species),
            "morph" | "morph name" | "primary morph" => Some(Self::Morph),
            "hatch date" | "hatch_date" | "birth date" | "birth_date" | "dob" | "hatched" => {
                Some(Self::HatchDate)
            }
            "acquisition date" | "acquisition_date" | "acquired" | "date acquired"
            | "purchase date" => Some(Self::AcquisitionDate),
            "weight" | "weight (g)" | "weight grams" | "weight_g" => Some(Self::Weight),
            "length" | "length (cm)" | "length cm" | "length_cm" => Some(Self::Length),
            "visual traits" | "visual_traits" | "visuals" | "traits" => Some(Self::VisualTraits),
            "het traits" | "het_traits" | "hets" => Some(Self::HetTraits),
            "original breeder" | "original_breeder" | "breeder" | "source" => {
                Some(Self::OriginalBreeder)
            }
            "status" => Some(Self::Status),
            "breeding line" | "breeding_line" | "line" => Some(Self::BreedingLine),
            "lineage path" | "lineage_path" | "lineage" => Some(Self::LineagePath),
            "generation" | "gen" => Some(Self::Generation),
            "is breeder" | "is_breeder" | "active breeder" => Some(Self::IsBreeder),
            "retired breeder" | "retired_breeder" | "retired" => Some(Self::RetiredBreeder),
            "notes" | "note" | "comments" | "remarks" => Some(Self::Notes),
            "dam" | "dam name" | "dam_name" | "mother" => Some(Self::DamName),
            "sire" | "sire name" | "sire_name" | "father" => Some(Self::SireName),
            _ => None,
        }
    }
}

impl std::fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Original header text -> canonical field (or `None` when unmapped).
///
/// Insertion order follows the spreadsheet's column order.
pub type HeaderMapping = IndexMap<String, Option<CanonicalField>>;

/// Build the header mapping for one import batch.
pub fn map_headers(headers: &[String]) -> HeaderMapping {
    headers
        .iter()
        .map(|h| (h.clone(), CanonicalField::from_header(h)))
        .collect()
}

// ---------------------------------------------------------------------------
// Sex
// ---------------------------------------------------------------------------

/// The sex of an animal record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
    Unknown,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Unknown => "unknown",
        }
    }

    /// Parse a sex string (case-insensitive). Returns `None` for unknown values.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" => Some(Self::Male),
            "female" => Some(Self::Female),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }

    /// Single-letter code used in generated reptile codes.
    pub fn code(&self) -> char {
        match self {
            Self::Male => 'M',
            Self::Female => 'F',
            Self::Unknown => 'U',
        }
    }

    /// All valid sex values.
    pub const ALL: &'static [&'static str] = &["male", "female", "unknown"];
}

impl std::fmt::Display for Sex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Reptile status
// ---------------------------------------------------------------------------

/// Lifecycle status of an animal record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReptileStatus {
    Active,
    Sold,
    Deceased,
}

impl ReptileStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Sold => "sold",
            Self::Deceased => "deceased",
        }
    }

    /// Parse a status string (case-insensitive). Returns `None` for unknown values.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "active" => Some(Self::Active),
            "sold" => Some(Self::Sold),
            "deceased" => Some(Self::Deceased),
            _ => None,
        }
    }

    /// All valid status values.
    pub const ALL: &'static [&'static str] = &["active", "sold", "deceased"];
}

impl std::fmt::Display for ReptileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- header mapping tests -------------------------------------------------

    #[test]
    fn exact_field_names_map() {
        for field in CanonicalField::ALL {
            assert_eq!(
                CanonicalField::from_header(field.as_str()),
                Some(*field),
                "field: {field}"
            );
        }
    }

    #[test]
    fn synonyms_map_to_canonical_fields() {
        assert_eq!(
            CanonicalField::from_header("Mother"),
            Some(CanonicalField::DamName)
        );
        assert_eq!(
            CanonicalField::from_header("Father"),
            Some(CanonicalField::SireName)
        );
        assert_eq!(
            CanonicalField::from_header("Gender"),
            Some(CanonicalField::Sex)
        );
        assert_eq!(
            CanonicalField::from_header("Hatch Date"),
            Some(CanonicalField::HatchDate)
        );
        assert_eq!(
            CanonicalField::from_header("Weight (g)"),
            Some(CanonicalField::Weight)
        );
    }

    #[test]
    fn mapping_is_case_insensitive_and_trimmed() {
        assert_eq!(
            CanonicalField::from_header("  DAM NAME  "),
            Some(CanonicalField::DamName)
        );
    }

    #[test]
    fn unknown_headers_map_to_none() {
        assert_eq!(CanonicalField::from_header("Favourite Food"), None);
        assert_eq!(CanonicalField::from_header(""), None);
    }

    #[test]
    fn map_headers_preserves_column_order() {
        let headers = vec![
            "Species".to_string(),
            "Unmapped".to_string(),
            "Name".to_string(),
        ];
        let mapping = map_headers(&headers);

        let keys: Vec<&String> = mapping.keys().collect();
        assert_eq!(keys, ["Species", "Unmapped", "Name"]);
        assert_eq!(mapping["Unmapped"], None);
        assert_eq!(mapping["Name"], Some(CanonicalField::Name));
    }

    // -- value kind tests -----------------------------------------------------

    #[test]
    fn kinds_are_declared_per_field() {
        assert_eq!(CanonicalField::Name.kind(), ValueKind::Text);
        assert_eq!(CanonicalField::HatchDate.kind(), ValueKind::Date);
        assert_eq!(CanonicalField::Weight.kind(), ValueKind::Number);
        assert_eq!(CanonicalField::VisualTraits.kind(), ValueKind::TextList);
        assert_eq!(CanonicalField::IsBreeder.kind(), ValueKind::Boolean);
    }

    // -- Sex tests ------------------------------------------------------------

    #[test]
    fn sex_round_trip() {
        for s in Sex::ALL {
            let sex = Sex::from_str(s).unwrap();
            assert_eq!(sex.as_str(), *s);
        }
    }

    #[test]
    fn sex_parse_is_case_insensitive() {
        assert_eq!(Sex::from_str("FEMALE"), Some(Sex::Female));
        assert_eq!(Sex::from_str(" Male "), Some(Sex::Male));
    }

    #[test]
    fn sex_unknown_value_rejected() {
        assert!(Sex::from_str("hermaphrodite").is_none());
        assert!(Sex::from_str("").is_none());
    }

    #[test]
    fn sex_codes() {
        assert_eq!(Sex::Male.code(), 'M');
        assert_eq!(Sex::Female.code(), 'F');
        assert_eq!(Sex::Unknown.code(), 'U');
    }

    // -- ReptileStatus tests --------------------------------------------------

    #[test]
    fn status_round_trip() {
        for s in ReptileStatus::ALL {
            let status = ReptileStatus::from_str(s).unwrap();
            assert_eq!(status.as_str(), *s);
        }
    }

    #[test]
    fn status_unknown_value_rejected() {
        assert!(ReptileStatus::from_str("escaped").is_none());
    }
}
