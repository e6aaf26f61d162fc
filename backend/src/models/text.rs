//! Case- and diacritic-insensitive text matching.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Fold text for comparison: decompose (NFD), drop combining marks, lowercase.
///
/// `"Sticlăria"` and `"STICLARIA"` both fold to `"sticlaria"`.
pub fn fold(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// A search needle that has already been folded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldedText(String);

impl FoldedText {
    pub fn new(raw: &str) -> Self {
        Self(fold(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Substring containment against an unfolded haystack.
    pub fn is_contained_in(&self, haystack: &str) -> bool {
        fold(haystack).contains(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_strips_diacritics_and_case() {
        assert_eq!(fold("Sticlăria Peak"), "sticlaria peak");
        assert_eq!(fold("Brașov Nord"), "brasov nord");
        assert_eq!(fold("ÎNĂLȚIME"), "inaltime");
    }

    #[test]
    fn test_match_in_both_directions() {
        assert!(FoldedText::new("sticlaria").is_contained_in("Sticlăria Peak"));
        assert!(FoldedText::new("Sticlăria").is_contained_in("Sticlaria Peak"));
        assert!(!FoldedText::new("brasov").is_contained_in("Bunloc Launch"));
    }

    #[test]
    fn test_empty_needle_matches_everything() {
        assert!(FoldedText::new("").is_contained_in("anything"));
    }
}
