//! Ordered `(predicate, adjustment)` tables for user-specific special cases.
//!
//! Follower rules run around the hash-derived follower count; score rules run
//! on the base influence score. New cases are added as table rows.

use crate::text::strip_marks;

/// Substring (case-insensitive) that identifies an employee account.
pub const EMPLOYEE_MARKER: &str = "mbras";

pub type UserPredicate = fn(&str) -> bool;

#[must_use]
pub fn is_mbras_employee(user_id: &str) -> bool {
    user_id.to_lowercase().contains(EMPLOYEE_MARKER)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowerAdjustment {
    /// Replace the count outright; the hash is not consulted.
    Override(u64),
    /// Move the hashed count up to the nearest prime at or above it.
    NextPrime,
}

#[derive(Debug, Clone, Copy)]
pub struct FollowerRule {
    pub name: &'static str,
    pub applies: UserPredicate,
    pub adjustment: FollowerAdjustment,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoreAdjustment {
    Scale(f64),
    Add(f64),
}

impl ScoreAdjustment {
    #[must_use]
    pub fn apply(self, score: f64) -> f64 {
        match self {
            Self::Scale(factor) => score * factor,
            Self::Add(amount) => score + amount,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ScoreRule {
    pub name: &'static str,
    pub applies: UserPredicate,
    pub adjustment: ScoreAdjustment,
}

#[derive(Debug, Clone)]
pub struct RuleSet {
    pub followers: Vec<FollowerRule>,
    pub score: Vec<ScoreRule>,
}

impl RuleSet {
    /// Rules shipped with the service.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            followers: vec![
                FollowerRule {
                    name: "thirteen_char_id",
                    applies: |id| id.chars().count() == 13,
                    adjustment: FollowerAdjustment::Override(233),
                },
                FollowerRule {
                    name: "unicode_id",
                    applies: |id| strip_marks(id) != id,
                    adjustment: FollowerAdjustment::Override(4242),
                },
                FollowerRule {
                    name: "prime_suffix",
                    applies: |id| id.ends_with("_prime"),
                    adjustment: FollowerAdjustment::NextPrime,
                },
            ],
            score: vec![
                ScoreRule {
                    name: "agent_007_penalty",
                    applies: |id| id.to_lowercase().ends_with("007"),
                    adjustment: ScoreAdjustment::Scale(0.5),
                },
                ScoreRule {
                    name: "employee_bonus",
                    applies: is_mbras_employee,
                    adjustment: ScoreAdjustment::Add(2.0),
                },
            ],
        }
    }

    /// Rules with no special cases; the formulas alone.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            followers: Vec::new(),
            score: Vec::new(),
        }
    }

    /// Resolve the follower count for `user_id`.
    ///
    /// The first matching `Override` wins. Otherwise `hashed` is computed and
    /// every matching transform is applied to it in table order.
    pub fn resolve_followers(&self, user_id: &str, hashed: impl FnOnce(&str) -> u64) -> u64 {
        let matching: Vec<&FollowerRule> = self
            .followers
            .iter()
            .filter(|rule| (rule.applies)(user_id))
            .collect();

        for rule in &matching {
            if let FollowerAdjustment::Override(value) = rule.adjustment {
                tracing::trace!(user_id, rule = rule.name, value, "follower override");
                return value;
            }
        }

        matching
            .iter()
            .fold(hashed(user_id), |count, rule| match rule.adjustment {
                FollowerAdjustment::NextPrime => next_prime(count),
                FollowerAdjustment::Override(_) => count,
            })
    }

    /// Apply every matching score rule in table order.
    #[must_use]
    pub fn adjust_score(&self, user_id: &str, base: f64) -> f64 {
        self.score
            .iter()
            .filter(|rule| (rule.applies)(user_id))
            .fold(base, |score, rule| rule.adjustment.apply(score))
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::standard()
    }
}

fn is_prime(n: u64) -> bool {
    if n <= 1 {
        return false;
    }
    if n <= 3 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }
    let mut i = 5;
    while i * i <= n {
        if n % i == 0 || n % (i + 2) == 0 {
            return false;
        }
        i += 6;
    }
    true
}

/// Smallest prime `>= max(n, 2)`.
#[must_use]
pub fn next_prime(n: u64) -> u64 {
    let mut candidate = n.max(2);
    while !is_prime(candidate) {
        candidate += 1;
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn employee_marker_is_case_insensitive() {
        assert!(is_mbras_employee("user_MBRAS_007"));
        assert!(is_mbras_employee("user_mbras_team"));
        assert!(!is_mbras_employee("user_alice"));
    }

    #[test]
    fn next_prime_finds_prime_at_or_above() {
        assert_eq!(next_prime(0), 2);
        assert_eq!(next_prime(2), 2);
        assert_eq!(next_prime(24), 29);
        assert_eq!(next_prime(7919), 7919);
        assert_eq!(next_prime(7920), 7927);
    }

    #[test]
    fn thirteen_char_override_skips_hash() {
        let rules = RuleSet::standard();
        let followers = rules.resolve_followers("user_abcdefgh", |_| panic!("hash not needed"));
        assert_eq!(followers, 233);
    }

    #[test]
    fn unicode_override_applies_to_accented_ids() {
        let rules = RuleSet::standard();
        assert_eq!(rules.resolve_followers("user_café", |_| 1), 4242);
    }

    #[test]
    fn prime_suffix_moves_hash_to_prime() {
        let rules = RuleSet::standard();
        assert_eq!(rules.resolve_followers("user_x_prime", |_| 24), 29);
    }

    #[test]
    fn plain_id_keeps_hash() {
        let rules = RuleSet::standard();
        assert_eq!(rules.resolve_followers("user_alice", |_| 6850), 6850);
    }

    #[test]
    fn empty_rules_never_adjust() {
        let rules = RuleSet::empty();
        assert_eq!(rules.resolve_followers("user_abcdefgh", |_| 500), 500);
        assert_eq!(rules.adjust_score("user_mbras_007", 10.0), 10.0);
    }

    #[test]
    fn penalty_then_bonus_in_table_order() {
        let rules = RuleSet::standard();
        assert_eq!(rules.adjust_score("user_mbras_007", 10.0), 7.0);
        assert_eq!(rules.adjust_score("user_agent_007", 10.0), 5.0);
        assert_eq!(rules.adjust_score("user_mbras_team", 10.0), 12.0);
        assert_eq!(rules.adjust_score("user_alice", 10.0), 10.0);
    }

    #[test]
    fn custom_rules_extend_table() {
        let mut rules = RuleSet::empty();
        rules.score.push(ScoreRule {
            name: "vip",
            applies: |id| id.ends_with("_vip"),
            adjustment: ScoreAdjustment::Scale(3.0),
        });
        assert_eq!(rules.adjust_score("user_anna_vip", 2.0), 6.0);
        assert_eq!(rules.adjust_score("user_anna", 2.0), 2.0);
    }
}
