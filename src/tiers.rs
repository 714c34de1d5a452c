// 🪙 Contribution Tiers - Fixed three-tier table
// The tier table is static data: members reference a tier by key and the
// key never changes for the life of the member.

use serde::{Deserialize, Serialize};

use crate::money::round2;

// ============================================================================
// TIER KEY
// ============================================================================

/// The three contribution tiers a member can register into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TierKey {
    Tier1,
    Tier2,
    Tier3,
}

impl TierKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            TierKey::Tier1 => "tier1",
            TierKey::Tier2 => "tier2",
            TierKey::Tier3 => "tier3",
        }
    }

    /// Parse a tier key from its wire/form value ("tier1", "tier2", "tier3").
    pub fn parse(value: &str) -> Option<TierKey> {
        match value.trim() {
            "tier1" => Some(TierKey::Tier1),
            "tier2" => Some(TierKey::Tier2),
            "tier3" => Some(TierKey::Tier3),
            _ => None,
        }
    }

    /// Look up this key's definition in the static table.
    pub fn definition(&self) -> &'static TierDefinition {
        match self {
            TierKey::Tier1 => &TIERS[0],
            TierKey::Tier2 => &TIERS[1],
            TierKey::Tier3 => &TIERS[2],
        }
    }
}

// ============================================================================
// TIER DEFINITION
// ============================================================================

/// A contribution tier: fixed entry amount plus weekly interest rate.
#[derive(Debug, Clone, Serialize)]
pub struct TierDefinition {
    pub key: TierKey,

    /// Display label (shown in the tier selector and member cards)
    pub label: &'static str,

    /// Amount contributed at registration
    pub base_amount: f64,

    /// Fractional interest rate applied per simulated week
    pub weekly_rate: f64,
}

/// The full tier table, in selector order.
pub static TIERS: [TierDefinition; 3] = [
    TierDefinition {
        key: TierKey::Tier1,
        label: "Tier 1 (₦10,000)",
        base_amount: 10000.0,
        weekly_rate: 0.05,
    },
    TierDefinition {
        key: TierKey::Tier2,
        label: "Tier 2 (₦20,000)",
        base_amount: 20000.0,
        weekly_rate: 0.10,
    },
    TierDefinition {
        key: TierKey::Tier3,
        label: "Tier 3 (₦30,000)",
        base_amount: 30000.0,
        weekly_rate: 0.20,
    },
];

impl TierDefinition {
    /// Weekly rate as a whole percentage, for display ("5%", "10%", "20%")
    pub fn rate_percent(&self) -> f64 {
        self.weekly_rate * 100.0
    }

    /// What joining this tier looks like after one simulated week.
    /// Pure: reads only the static table.
    pub fn preview(&self) -> TierPreview {
        TierPreview {
            key: self.key,
            label: self.label,
            amount: self.base_amount,
            weekly_rate: self.weekly_rate,
            after_one_week: round2(self.base_amount * (1.0 + self.weekly_rate)),
        }
    }
}

// ============================================================================
// TIER PREVIEW
// ============================================================================

/// Snapshot shown next to the tier selector before registering.
#[derive(Debug, Clone, Serialize)]
pub struct TierPreview {
    pub key: TierKey,
    pub label: &'static str,
    pub amount: f64,
    pub weekly_rate: f64,
    pub after_one_week: f64,
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tier_keys() {
        assert_eq!(TierKey::parse("tier1"), Some(TierKey::Tier1));
        assert_eq!(TierKey::parse("tier2"), Some(TierKey::Tier2));
        assert_eq!(TierKey::parse("tier3"), Some(TierKey::Tier3));
        assert_eq!(TierKey::parse(" tier2 "), Some(TierKey::Tier2));
        assert_eq!(TierKey::parse(""), None);
        assert_eq!(TierKey::parse("tier4"), None);
        assert_eq!(TierKey::parse("TIER1"), None);
    }

    #[test]
    fn test_tier_table() {
        assert_eq!(TIERS.len(), 3);
        assert_eq!(TierKey::Tier1.definition().base_amount, 10000.0);
        assert_eq!(TierKey::Tier2.definition().base_amount, 20000.0);
        assert_eq!(TierKey::Tier3.definition().base_amount, 30000.0);
        assert_eq!(TierKey::Tier1.definition().weekly_rate, 0.05);
        assert_eq!(TierKey::Tier2.definition().weekly_rate, 0.10);
        assert_eq!(TierKey::Tier3.definition().weekly_rate, 0.20);
    }

    #[test]
    fn test_tier_preview() {
        let preview = TierKey::Tier1.definition().preview();
        assert_eq!(preview.amount, 10000.0);
        assert_eq!(preview.after_one_week, 10500.0);

        let preview = TierKey::Tier3.definition().preview();
        assert_eq!(preview.after_one_week, 36000.0);
    }

    #[test]
    fn test_preview_is_pure() {
        let first = TierKey::Tier2.definition().preview();
        let second = TierKey::Tier2.definition().preview();
        assert_eq!(first.amount, second.amount);
        assert_eq!(first.after_one_week, second.after_one_week);
    }

    #[test]
    fn test_rate_percent() {
        assert_eq!(TierKey::Tier1.definition().rate_percent(), 5.0);
        assert_eq!(TierKey::Tier3.definition().rate_percent(), 20.0);
    }
}
