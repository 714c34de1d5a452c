// 💰 Group Ledger - Roster and compounding rules
// The only stateful part of the system. One ledger per session, owned by
// whichever collaborator (TUI, server, demo walkthrough) is driving it.
//
// Rules:
// - At most 12 members, insertion order preserved
// - A member's tier never changes after registration
// - simulate_week compounds every member independently from its
//   pre-simulation balance, so update order cannot matter
// - Confirmation before withdraw/reset is the caller's job; the ledger
//   operations themselves are unconditional

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::round2;
use crate::tiers::TierKey;

/// Roster capacity. Registration fails once the group is full.
pub const MAX_MEMBERS: usize = 12;

// ============================================================================
// LEDGER ERROR
// ============================================================================

/// Everything a ledger operation can reject.
///
/// Three kinds: validation (EmptyName / UnknownTier / GroupFull),
/// not-found (MemberNotFound), and EmptyGroup. All are recoverable and
/// leave the ledger untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Name was empty or whitespace-only
    EmptyName,

    /// Tier key did not parse ("" from an unselected form, or garbage)
    UnknownTier(String),

    /// Roster already holds MAX_MEMBERS
    GroupFull,

    /// No member with the given id
    MemberNotFound(String),

    /// simulate_week on an empty roster
    EmptyGroup,
}

impl std::fmt::Display for LedgerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerError::EmptyName => write!(f, "Please enter a member name."),
            LedgerError::UnknownTier(key) => {
                if key.trim().is_empty() {
                    write!(f, "Please select a tier.")
                } else {
                    write!(f, "Unknown tier: {}", key)
                }
            }
            LedgerError::GroupFull => {
                write!(f, "Group is full ({} members). Withdraw someone first.", MAX_MEMBERS)
            }
            LedgerError::MemberNotFound(id) => write!(f, "No member with id {}", id),
            LedgerError::EmptyGroup => write!(f, "No members to simulate."),
        }
    }
}

impl std::error::Error for LedgerError {}

// ============================================================================
// MEMBER
// ============================================================================

/// A registered member of the savings group.
///
/// Identity: UUID (never changes)
/// Values: contribution (moves with each simulated week)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// Stable identity (UUID) - never changes
    pub id: String,

    /// Display name, trimmed at registration
    pub name: String,

    /// Contribution tier - immutable after registration
    pub tier: TierKey,

    /// Current balance; starts at the tier's base amount
    pub contribution: f64,

    /// When this member was registered
    pub joined_at: DateTime<Utc>,
}

impl Member {
    fn new(name: String, tier: TierKey) -> Self {
        Member {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            tier,
            contribution: tier.definition().base_amount,
            joined_at: Utc::now(),
        }
    }

    /// This member's tier label for display.
    pub fn tier_label(&self) -> &'static str {
        self.tier.definition().label
    }

    /// Interest this member would earn in one week at the current balance.
    pub fn weekly_interest(&self) -> f64 {
        round2(self.contribution * self.tier.definition().weekly_rate)
    }

    /// Balance after one more simulated week.
    pub fn projected_next_week(&self) -> f64 {
        round2(self.contribution * (1.0 + self.tier.definition().weekly_rate))
    }
}

// ============================================================================
// GROUP LEDGER
// ============================================================================

/// The in-memory roster plus its operations. Created empty at session
/// start; no persistence.
#[derive(Debug, Default)]
pub struct GroupLedger {
    members: Vec<Member>,
}

impl GroupLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        GroupLedger { members: Vec::new() }
    }

    /// Register a new member into a tier.
    ///
    /// The name is trimmed; registration fails on an empty name or a
    /// full roster. The new member starts at the tier's base amount and
    /// is appended at the end of the roster.
    pub fn register_member(&mut self, name: &str, tier: TierKey) -> Result<Member, LedgerError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::EmptyName);
        }
        if self.members.len() >= MAX_MEMBERS {
            return Err(LedgerError::GroupFull);
        }

        let member = Member::new(name.to_string(), tier);
        self.members.push(member.clone());
        Ok(member)
    }

    /// Register from raw form/wire values: the tier arrives as a string
    /// key and an unselected or invalid key is a validation error.
    /// Checked in form order: name, then tier, then capacity.
    pub fn register_member_by_key(
        &mut self,
        name: &str,
        tier_key: &str,
    ) -> Result<Member, LedgerError> {
        if name.trim().is_empty() {
            return Err(LedgerError::EmptyName);
        }
        let tier = TierKey::parse(tier_key)
            .ok_or_else(|| LedgerError::UnknownTier(tier_key.to_string()))?;
        self.register_member(name, tier)
    }

    /// Withdraw a member by id, returning their final state for display.
    ///
    /// An unknown id is surfaced as `MemberNotFound` rather than being
    /// silently ignored; the remaining members keep their order.
    pub fn withdraw_member(&mut self, id: &str) -> Result<Member, LedgerError> {
        let index = self
            .members
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| LedgerError::MemberNotFound(id.to_string()))?;

        Ok(self.members.remove(index))
    }

    /// Apply one week of compound interest to every member.
    ///
    /// Each member compounds independently from their pre-simulation
    /// balance: `contribution = round2(contribution * (1 + weekly_rate))`.
    /// Returns the post-update roster; fails on an empty group.
    pub fn simulate_week(&mut self) -> Result<Vec<Member>, LedgerError> {
        if self.members.is_empty() {
            return Err(LedgerError::EmptyGroup);
        }

        for member in &mut self.members {
            member.contribution = round2(
                member.contribution * (1.0 + member.tier.definition().weekly_rate),
            );
        }

        Ok(self.members.clone())
    }

    /// Clear the roster. Unconditional: confirming is the caller's job.
    pub fn reset_group(&mut self) {
        self.members.clear();
    }

    /// Sum of all current contributions. 0 for an empty roster.
    pub fn total_saved(&self) -> f64 {
        self.members.iter().map(|m| m.contribution).sum()
    }

    /// Current roster, insertion order.
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= MAX_MEMBERS
    }

    /// Find a member by id.
    pub fn find_member(&self, id: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.id == id)
    }
}

/// Preview a tier from its raw form/wire key without touching any ledger
/// state. Pure: same key, same answer.
pub fn preview_tier(tier_key: &str) -> Result<crate::tiers::TierPreview, LedgerError> {
    let tier = TierKey::parse(tier_key)
        .ok_or_else(|| LedgerError::UnknownTier(tier_key.to_string()))?;
    Ok(tier.definition().preview())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_member() {
        let mut ledger = GroupLedger::new();

        let member = ledger.register_member("Adaeze", TierKey::Tier1).unwrap();

        assert!(!member.id.is_empty());
        assert_eq!(member.name, "Adaeze");
        assert_eq!(member.tier, TierKey::Tier1);
        assert_eq!(member.contribution, 10000.0);
        assert_eq!(ledger.member_count(), 1);
        assert_eq!(ledger.members()[0].id, member.id);
    }

    #[test]
    fn test_register_trims_name() {
        let mut ledger = GroupLedger::new();

        let member = ledger.register_member("  Bola  ", TierKey::Tier2).unwrap();
        assert_eq!(member.name, "Bola");
        assert_eq!(member.contribution, 20000.0);
    }

    #[test]
    fn test_register_rejects_empty_name() {
        let mut ledger = GroupLedger::new();

        assert_eq!(
            ledger.register_member("", TierKey::Tier1),
            Err(LedgerError::EmptyName)
        );
        assert_eq!(
            ledger.register_member("   ", TierKey::Tier1),
            Err(LedgerError::EmptyName)
        );
        assert_eq!(ledger.member_count(), 0);
    }

    #[test]
    fn test_register_by_key() {
        let mut ledger = GroupLedger::new();

        let member = ledger.register_member_by_key("Chika", "tier3").unwrap();
        assert_eq!(member.tier, TierKey::Tier3);
        assert_eq!(member.contribution, 30000.0);
    }

    #[test]
    fn test_register_by_key_validation_order() {
        let mut ledger = GroupLedger::new();

        // Name checked before tier, matching the registration form
        assert_eq!(
            ledger.register_member_by_key("  ", ""),
            Err(LedgerError::EmptyName)
        );
        assert_eq!(
            ledger.register_member_by_key("Chika", ""),
            Err(LedgerError::UnknownTier(String::new()))
        );
        assert_eq!(
            ledger.register_member_by_key("Chika", "tier9"),
            Err(LedgerError::UnknownTier("tier9".to_string()))
        );
        assert_eq!(ledger.member_count(), 0);
    }

    #[test]
    fn test_preview_tier_by_key() {
        let preview = preview_tier("tier2").unwrap();
        assert_eq!(preview.amount, 20000.0);
        assert_eq!(preview.weekly_rate, 0.10);
        assert_eq!(preview.after_one_week, 22000.0);

        assert!(matches!(
            preview_tier("gold"),
            Err(LedgerError::UnknownTier(_))
        ));
    }

    #[test]
    fn test_register_rejects_full_group() {
        let mut ledger = GroupLedger::new();

        for i in 0..MAX_MEMBERS {
            ledger
                .register_member(&format!("Member {}", i + 1), TierKey::Tier1)
                .unwrap();
        }
        assert!(ledger.is_full());

        let result = ledger.register_member("One Too Many", TierKey::Tier2);
        assert_eq!(result, Err(LedgerError::GroupFull));
        assert_eq!(ledger.member_count(), MAX_MEMBERS);
    }

    #[test]
    fn test_register_preserves_insertion_order() {
        let mut ledger = GroupLedger::new();

        ledger.register_member("First", TierKey::Tier1).unwrap();
        ledger.register_member("Second", TierKey::Tier2).unwrap();
        ledger.register_member("Third", TierKey::Tier3).unwrap();

        let names: Vec<&str> = ledger.members().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_withdraw_member() {
        let mut ledger = GroupLedger::new();

        ledger.register_member("First", TierKey::Tier1).unwrap();
        let target = ledger.register_member("Second", TierKey::Tier2).unwrap();
        ledger.register_member("Third", TierKey::Tier3).unwrap();

        let withdrawn = ledger.withdraw_member(&target.id).unwrap();
        assert_eq!(withdrawn.name, "Second");
        assert_eq!(withdrawn.contribution, 20000.0);

        // Remaining members keep their order
        let names: Vec<&str> = ledger.members().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Third"]);
    }

    #[test]
    fn test_withdraw_unknown_id_is_error_and_no_op() {
        let mut ledger = GroupLedger::new();
        ledger.register_member("Only", TierKey::Tier1).unwrap();

        let result = ledger.withdraw_member("no-such-id");
        assert_eq!(
            result,
            Err(LedgerError::MemberNotFound("no-such-id".to_string()))
        );
        assert_eq!(ledger.member_count(), 1);
    }

    #[test]
    fn test_simulate_week_each_tier() {
        let mut ledger = GroupLedger::new();
        ledger.register_member("T1", TierKey::Tier1).unwrap();
        ledger.register_member("T2", TierKey::Tier2).unwrap();
        ledger.register_member("T3", TierKey::Tier3).unwrap();

        let updated = ledger.simulate_week().unwrap();

        assert_eq!(updated[0].contribution, 10500.0); // 10000 * 1.05
        assert_eq!(updated[1].contribution, 22000.0); // 20000 * 1.10
        assert_eq!(updated[2].contribution, 36000.0); // 30000 * 1.20
        assert_eq!(ledger.member_count(), 3);
    }

    #[test]
    fn test_simulate_week_compounds_with_rounding() {
        let mut ledger = GroupLedger::new();
        ledger.register_member("T1", TierKey::Tier1).unwrap();

        // 10000 → 10500 → 11025 → 11576.25 → 12155.06
        ledger.simulate_week().unwrap();
        ledger.simulate_week().unwrap();
        ledger.simulate_week().unwrap();
        let updated = ledger.simulate_week().unwrap();

        assert_eq!(updated[0].contribution, 12155.06);
    }

    #[test]
    fn test_simulate_week_empty_group() {
        let mut ledger = GroupLedger::new();

        assert_eq!(ledger.simulate_week(), Err(LedgerError::EmptyGroup));
        assert_eq!(ledger.member_count(), 0);
    }

    #[test]
    fn test_total_saved() {
        let mut ledger = GroupLedger::new();
        assert_eq!(ledger.total_saved(), 0.0);

        ledger.register_member("T1", TierKey::Tier1).unwrap();
        ledger.register_member("T2", TierKey::Tier2).unwrap();
        ledger.simulate_week().unwrap();

        // 10500 + 22000
        assert_eq!(ledger.total_saved(), 32500.0);
        // Pure: asking twice changes nothing
        assert_eq!(ledger.total_saved(), 32500.0);
    }

    #[test]
    fn test_reset_group() {
        let mut ledger = GroupLedger::new();
        ledger.register_member("A", TierKey::Tier1).unwrap();
        ledger.register_member("B", TierKey::Tier2).unwrap();

        ledger.reset_group();
        assert_eq!(ledger.member_count(), 0);
        assert_eq!(ledger.total_saved(), 0.0);

        // Reset on an already-empty ledger is fine
        ledger.reset_group();
        assert_eq!(ledger.member_count(), 0);
    }

    #[test]
    fn test_member_display_helpers() {
        let mut ledger = GroupLedger::new();
        let member = ledger.register_member("T2", TierKey::Tier2).unwrap();

        assert_eq!(member.tier_label(), "Tier 2 (₦20,000)");
        assert_eq!(member.weekly_interest(), 2000.0);
        assert_eq!(member.projected_next_week(), 22000.0);
    }

    #[test]
    fn test_member_json_shape() {
        let mut ledger = GroupLedger::new();
        let member = ledger.register_member("Adaeze", TierKey::Tier1).unwrap();

        let value = serde_json::to_value(&member).unwrap();
        assert_eq!(value["name"], "Adaeze");
        assert_eq!(value["tier"], "tier1");
        assert_eq!(value["contribution"], 10000.0);
        assert!(value["joined_at"].is_string());
    }

    #[test]
    fn test_member_ids_are_unique() {
        let mut ledger = GroupLedger::new();
        let a = ledger.register_member("A", TierKey::Tier1).unwrap();
        let b = ledger.register_member("B", TierKey::Tier1).unwrap();

        assert_ne!(a.id, b.id);
        assert!(ledger.find_member(&a.id).is_some());
        assert!(ledger.find_member("missing").is_none());
    }
}
