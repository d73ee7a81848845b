//! Canonical identifier generation and case-insensitive name keys.
//!
//! Reptile codes follow the convention
//! `{seq}-{species_code}-{morph_prefix}-{yy}-{sex_code}`:
//!
//! - `seq` = count of existing records + 1, zero-padded to three digits
//! - `species_code` = first letter of each word of the species name, upper-cased
//! - `morph_prefix` = first word of the morph label, upper-cased, max 5 chars
//! - `yy` = two-digit hatch year (fallback year when no hatch date is known)
//! - `sex_code` = `M` / `F` / `U`
//!
//! Code generation is deterministic given its inputs: the caller threads the
//! growing existing-record count through a sequential commit loop so that two
//! rows in the same batch can never receive the same sequence number.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::import::fields::Sex;

/// A case-insensitive, whitespace-trimmed lookup key for entity names.
///
/// Every name-keyed map in the import pipeline (species index, morph index,
/// parent name index, duplicate checks) folds case through this one type so
/// that `"Ball Python"`, `"ball python"`, and `" BALL PYTHON "` all collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NameKey(String);

impl NameKey {
    /// Build a key by trimming and lower-casing the raw name.
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    /// Returns `true` if the underlying name was blank.
    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NameKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NameKey {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Maximum length of the morph segment in a generated code.
pub const MORPH_PREFIX_LEN: usize = 5;

/// Width of the zero-padded sequence segment.
pub const SEQ_PAD_WIDTH: usize = 3;

/// Derive a species code from a species name: the first letter of each
/// space-separated word, upper-cased.
///
/// ```
/// use scalebook_core::naming::species_code;
///
/// assert_eq!(species_code("Ball Python"), "BP");
/// assert_eq!(species_code("Corn Snake"), "CS");
/// assert_eq!(species_code("Gecko"), "G");
/// ```
pub fn species_code(species_name: &str) -> String {
    species_name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(|c| c.to_uppercase())
        .collect()
}

/// Derive the morph segment: first word of the morph label, upper-cased,
/// truncated to [`MORPH_PREFIX_LEN`] characters.
///
/// ```
/// use scalebook_core::naming::morph_prefix;
///
/// assert_eq!(morph_prefix("Albino"), "ALBIN");
/// assert_eq!(morph_prefix("Banana Pastel"), "BANAN");
/// assert_eq!(morph_prefix("Het"), "HET");
/// ```
pub fn morph_prefix(morph_label: &str) -> String {
    morph_label
        .split_whitespace()
        .next()
        .unwrap_or("")
        .chars()
        .flat_map(|c| c.to_uppercase())
        .take(MORPH_PREFIX_LEN)
        .collect()
}

/// Generate a canonical reptile code.
///
/// `existing_count` is the number of records that already exist for the
/// owner at generation time; the sequence segment is `existing_count + 1`.
/// `fallback_year` is used when the row carries no hatch date (callers pass
/// the current year; taking it as a parameter keeps this function pure).
pub fn generate_reptile_code(
    existing_count: usize,
    species_name: &str,
    morph_label: &str,
    hatch_date: Option<NaiveDate>,
    fallback_year: i32,
    sex: Sex,
) -> String {
    let year = hatch_date.map_or(fallback_year, |d| d.year());
    format!(
        "{seq:0pad$}-{species}-{morph}-{yy:02}-{sex}",
        seq = existing_count + 1,
        pad = SEQ_PAD_WIDTH,
        species = species_code(species_name),
        morph = morph_prefix(morph_label),
        yy = year.rem_euclid(100),
        sex = sex.code(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- NameKey tests --------------------------------------------------------

    #[test]
    fn name_key_folds_case_and_whitespace() {
        assert_eq!(NameKey::new("Ball Python"), NameKey::new(" ball python "));
        assert_eq!(NameKey::new("REX").as_str(), "rex");
    }

    #[test]
    fn name_key_blank_detection() {
        assert!(NameKey::new("   ").is_blank());
        assert!(NameKey::new("").is_blank());
        assert!(!NameKey::new("Nova").is_blank());
    }

    #[test]
    fn name_key_distinct_names_differ() {
        assert_ne!(NameKey::new("Rex"), NameKey::new("Nova"));
    }

    // -- species_code tests ---------------------------------------------------

    #[test]
    fn species_code_multi_word() {
        assert_eq!(species_code("Ball Python"), "BP");
        assert_eq!(species_code("Blue Tongue Skink"), "BTS");
    }

    #[test]
    fn species_code_single_word() {
        assert_eq!(species_code("Gecko"), "G");
    }

    #[test]
    fn species_code_handles_extra_whitespace() {
        assert_eq!(species_code("  ball   python  "), "BP");
    }

    #[test]
    fn species_code_empty_name() {
        assert_eq!(species_code(""), "");
    }

    // -- morph_prefix tests ---------------------------------------------------

    #[test]
    fn morph_prefix_truncates_to_five() {
        assert_eq!(morph_prefix("Albino"), "ALBIN");
        assert_eq!(morph_prefix("Piebald"), "PIEBA");
    }

    #[test]
    fn morph_prefix_uses_first_word_only() {
        assert_eq!(morph_prefix("Banana Pastel Clown"), "BANAN");
    }

    #[test]
    fn morph_prefix_short_word_kept_whole() {
        assert_eq!(morph_prefix("Het"), "HET");
    }

    // -- generate_reptile_code tests ------------------------------------------

    #[test]
    fn code_components_in_order() {
        let hatch = NaiveDate::from_ymd_opt(2024, 1, 1);
        let code = generate_reptile_code(0, "Ball Python", "Albino", hatch, 2026, Sex::Male);
        assert_eq!(code, "001-BP-ALBIN-24-M");
    }

    #[test]
    fn code_sequence_is_count_plus_one() {
        let code = generate_reptile_code(41, "Corn Snake", "Normal", None, 2026, Sex::Female);
        assert!(code.starts_with("042-CS-"));
    }

    #[test]
    fn code_uses_fallback_year_without_hatch_date() {
        let code = generate_reptile_code(0, "Gecko", "Normal", None, 2026, Sex::Unknown);
        assert_eq!(code, "001-G-NORMA-26-U");
    }

    #[test]
    fn sequential_codes_never_collide() {
        // Simulate the committer threading the growing record count.
        let first = generate_reptile_code(10, "Ball Python", "Albino", None, 2026, Sex::Male);
        let second = generate_reptile_code(11, "Ball Python", "Albino", None, 2026, Sex::Male);
        assert_ne!(first, second);
        assert!(first.starts_with("011-"));
        assert!(second.starts_with("012-"));
    }
}
