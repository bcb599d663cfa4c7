//! Deterministic keyword-triggered canned responses.
//!
//! The fallback tier of the match engine. Triggers are matched by
//! case-insensitive substring containment in a fixed order, so the
//! rule set is an explicitly ordered list rather than a map.

use tracing::debug;

/// One trigger phrase and its canned response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordRule {
    /// Lowercase trigger phrase matched by substring containment.
    pub trigger: String,
    /// Canned response returned when the trigger matches.
    pub response: String,
}

impl KeywordRule {
    /// Create a rule. The trigger is lowercased on construction so
    /// matching never has to normalize it again.
    pub fn new(trigger: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            trigger: trigger.into().to_lowercase(),
            response: response.into(),
        }
    }
}

/// Ordered set of keyword rules.
///
/// Rules are kept sorted alphabetically by trigger. First-match-wins
/// iteration over that canonical order makes the fallback deterministic
/// even when several triggers are substrings of the same query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordRules {
    rules: Vec<KeywordRule>,
}

impl Default for KeywordRules {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordRules {
    /// The built-in packaging-business rule set.
    pub fn new() -> Self {
        Self::with_rules(vec![
            KeywordRule::new(
                "delivery time",
                "Standard delivery time is 7-10 business days after design confirmation.",
            ),
            KeywordRule::new(
                "lead time",
                "Our lead time is typically 7-10 business days after design approval.",
            ),
            KeywordRule::new("minimum order", "Our MOQ is 500pcs."),
            KeywordRule::new("moq", "Our minimum order quantity (MOQ) is 500pcs."),
        ])
    }

    /// Build a rule set from arbitrary rules, normalizing to the
    /// canonical alphabetical trigger order.
    pub fn with_rules(mut rules: Vec<KeywordRule>) -> Self {
        rules.sort_by(|a, b| a.trigger.cmp(&b.trigger));
        Self { rules }
    }

    /// An empty rule set (fallback always misses).
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Return the canned response for the first rule whose trigger is a
    /// substring of the lowercased query, or None if no rule matches.
    pub fn find_match(&self, text: &str) -> Option<&str> {
        let lower = text.to_lowercase();
        for rule in &self.rules {
            if lower.contains(&rule.trigger) {
                debug!(trigger = %rule.trigger, "Keyword rule matched");
                return Some(&rule.response);
            }
        }
        None
    }

    /// Number of rules in the set.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the set has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The rules in canonical order.
    pub fn rules(&self) -> &[KeywordRule] {
        &self.rules
    }
}
