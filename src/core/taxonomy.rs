//! Closed strategy vocabulary shared by the GP and LP intake forms.
//!
//! Free-text labels are normalized to a `StrategyTag` by exact,
//! case-insensitive alias lookup. Labels with no alias stay unrecognized;
//! they are never guessed into a tag.

use serde::{Deserialize, Serialize};

/// Bumped whenever a tag or alias is added, removed or re-pointed.
pub const TAXONOMY_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StrategyTag {
    PrivateEquity,
    VentureCapital,
    GrowthEquity,
    Buyout,
    PrivateCredit,
    RealEstate,
    Infrastructure,
    Secondaries,
    HedgeFunds,
    ArtificialIntelligence,
    Fintech,
    Healthcare,
    Climate,
}

impl StrategyTag {
    pub const ALL: [StrategyTag; 13] = [
        StrategyTag::PrivateEquity,
        StrategyTag::VentureCapital,
        StrategyTag::GrowthEquity,
        StrategyTag::Buyout,
        StrategyTag::PrivateCredit,
        StrategyTag::RealEstate,
        StrategyTag::Infrastructure,
        StrategyTag::Secondaries,
        StrategyTag::HedgeFunds,
        StrategyTag::ArtificialIntelligence,
        StrategyTag::Fintech,
        StrategyTag::Healthcare,
        StrategyTag::Climate,
    ];

    /// Canonical display label
    pub fn label(&self) -> &'static str {
        match self {
            StrategyTag::PrivateEquity => "Private Equity",
            StrategyTag::VentureCapital => "Venture Capital",
            StrategyTag::GrowthEquity => "Growth Equity",
            StrategyTag::Buyout => "Buyout",
            StrategyTag::PrivateCredit => "Private Credit",
            StrategyTag::RealEstate => "Real Estate",
            StrategyTag::Infrastructure => "Infrastructure",
            StrategyTag::Secondaries => "Secondaries",
            StrategyTag::HedgeFunds => "Hedge Funds",
            StrategyTag::ArtificialIntelligence => "AI",
            StrategyTag::Fintech => "Fintech",
            StrategyTag::Healthcare => "Healthcare",
            StrategyTag::Climate => "Climate",
        }
    }

    /// Lowercase spellings accepted in addition to the label
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            StrategyTag::PrivateEquity => &["pe", "private equity"],
            StrategyTag::VentureCapital => &["vc", "venture", "venture capital"],
            StrategyTag::GrowthEquity => &["growth", "growth equity", "growth capital"],
            StrategyTag::Buyout => &["buyout", "buyouts", "lbo"],
            StrategyTag::PrivateCredit => &["private credit", "private debt", "direct lending"],
            StrategyTag::RealEstate => &["real estate", "property", "re"],
            StrategyTag::Infrastructure => &["infrastructure", "infra"],
            StrategyTag::Secondaries => &["secondaries", "secondary", "gp-led secondaries"],
            StrategyTag::HedgeFunds => &["hedge funds", "hedge fund", "hf"],
            StrategyTag::ArtificialIntelligence => {
                &["ai", "artificial intelligence", "ai infrastructure", "machine learning"]
            }
            StrategyTag::Fintech => &["fintech", "financial technology"],
            StrategyTag::Healthcare => &["healthcare", "health care", "life sciences", "biotech"],
            StrategyTag::Climate => &["climate", "climate tech", "energy transition", "sustainability"],
        }
    }

    /// Resolve a free-text label, if it is a known spelling
    pub fn from_label(label: &str) -> Option<StrategyTag> {
        let needle = label.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        StrategyTag::ALL.into_iter().find(|tag| {
            tag.label().to_lowercase() == needle || tag.aliases().contains(&needle.as_str())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_resolve() {
        assert_eq!(StrategyTag::from_label("PE"), Some(StrategyTag::PrivateEquity));
        assert_eq!(StrategyTag::from_label(" private equity "), Some(StrategyTag::PrivateEquity));
        assert_eq!(StrategyTag::from_label("AI Infrastructure"), Some(StrategyTag::ArtificialIntelligence));
        assert_eq!(StrategyTag::from_label("Crypto"), None);
        assert_eq!(StrategyTag::from_label(""), None);
    }

    #[test]
    fn test_aliases_are_unambiguous() {
        for tag in StrategyTag::ALL {
            for alias in tag.aliases() {
                assert_eq!(StrategyTag::from_label(alias), Some(tag), "alias {alias}");
            }
        }
    }
}
