use serde::{Deserialize, Serialize};

use crate::error::CandelaError;
use crate::types::SymbolId;

/// One row of a market's listing catalog: security code plus display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityListing {
    /// Exchange security code (e.g. `600519`).
    pub code: String,
    /// Listed display name.
    pub name: String,
}

/// A resolved security: the code to fetch with and the name to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSecurity {
    /// Code accepted by the provider.
    pub code: String,
    /// Display name; equals the code for speculative matches.
    pub name: String,
}

/// Code/name lookup table for listing-based markets.
///
/// The listing itself is the expensive part (one catalog download); the
/// universe of valid codes changes rarely, so callers load a directory once
/// and keep it for the process lifetime, refreshing on the order of hours.
#[derive(Debug, Clone, Default)]
pub struct SecurityDirectory {
    entries: Vec<SecurityListing>,
}

impl SecurityDirectory {
    /// Build a directory from catalog rows, preserving listing order.
    #[must_use]
    pub const fn new(entries: Vec<SecurityListing>) -> Self {
        Self { entries }
    }

    /// Number of listed securities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the directory holds no listings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve a keyword to a security.
    ///
    /// Policy: exact code match first; then substring match against names,
    /// returning the first hit in listing order; then, if the keyword is a
    /// 6-digit numeric string, accept it verbatim as a speculative code (the
    /// provider rejects it at fetch time if invalid).
    ///
    /// # Errors
    /// Returns [`CandelaError::SymbolNotFound`] when nothing matches.
    pub fn resolve(&self, keyword: &str) -> Result<ResolvedSecurity, CandelaError> {
        let keyword = keyword.trim();
        if let Some(hit) = self.entries.iter().find(|e| e.code == keyword) {
            return Ok(ResolvedSecurity {
                code: hit.code.clone(),
                name: hit.name.clone(),
            });
        }
        if !keyword.is_empty() {
            if let Some(hit) = self.entries.iter().find(|e| e.name.contains(keyword)) {
                return Ok(ResolvedSecurity {
                    code: hit.code.clone(),
                    name: hit.name.clone(),
                });
            }
        }
        if SymbolId::looks_like_code(keyword) {
            return Ok(ResolvedSecurity {
                code: keyword.to_string(),
                name: keyword.to_string(),
            });
        }
        Err(CandelaError::not_found(keyword))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> SecurityDirectory {
        SecurityDirectory::new(vec![
            SecurityListing {
                code: "600519".into(),
                name: "Kweichow Moutai".into(),
            },
            SecurityListing {
                code: "000858".into(),
                name: "Wuliangye Yibin".into(),
            },
            SecurityListing {
                code: "601318".into(),
                name: "Ping An Insurance".into(),
            },
        ])
    }

    #[test]
    fn exact_code_wins() {
        let hit = directory().resolve("600519").unwrap();
        assert_eq!(hit.name, "Kweichow Moutai");
    }

    #[test]
    fn substring_name_match_returns_first_in_listing_order() {
        let hit = directory().resolve("an").unwrap();
        // "Wuliangye" contains "an" before "Ping An" appears in the listing.
        assert_eq!(hit.code, "000858");
    }

    #[test]
    fn unknown_six_digit_code_is_accepted_speculatively() {
        let hit = directory().resolve("688981").unwrap();
        assert_eq!(hit.code, "688981");
        assert_eq!(hit.name, "688981");
    }

    #[test]
    fn non_numeric_miss_fails() {
        assert!(matches!(
            directory().resolve("no such company"),
            Err(CandelaError::SymbolNotFound { .. })
        ));
    }

    #[test]
    fn five_digit_code_is_not_speculative() {
        assert!(directory().resolve("12345").is_err());
    }
}
