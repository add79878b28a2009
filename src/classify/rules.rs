//! The token-system rule chain and the label enums.
//!
//! Token-system classification is an ordered list of rules evaluated
//! top-down with first-match-wins semantics. The chain is explicit and
//! enumerable so tests (and research notebooks) can assert exactly which
//! rule fired for a given token, instead of reverse-engineering nested
//! conditionals.

use std::fmt;

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::morphology::MorphologyResult;
use crate::tables::TableSet;

/// Token-system label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SystemLabel {
    /// Member of the infrastructure token set, or a single-character token.
    Infrastructure,
    /// Full morphological parse against the primary prefix system.
    Primary,
    /// Matches the alternate prefix family.
    Secondary,
    /// Secondary prefix combined with a hybrid-marking suffix.
    SecondaryHybrid,
    /// Matches the broader pattern prefix family.
    Pattern,
    /// No rule matched.
    Unclassified,
}

impl fmt::Display for SystemLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SystemLabel::Infrastructure => "INFRASTRUCTURE",
            SystemLabel::Primary => "PRIMARY",
            SystemLabel::Secondary => "SECONDARY",
            SystemLabel::SecondaryHybrid => "SECONDARY_HYBRID",
            SystemLabel::Pattern => "PATTERN",
            SystemLabel::Unclassified => "UNCLASSIFIED",
        };
        write!(f, "{label}")
    }
}

/// Locality class: how many folios a token is activated in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocalityClass {
    /// Activated in no folio.
    NoMapping,
    /// Activated in 1–3 folios.
    Localized,
    /// Activated in 4–9 folios.
    Distributed,
    /// Activated in 10 or more folios.
    Structural,
}

impl LocalityClass {
    /// Derive the locality class from a cross-folio activation count.
    pub fn from_folio_count(count: usize) -> Self {
        match count {
            0 => LocalityClass::NoMapping,
            1..=3 => LocalityClass::Localized,
            4..=9 => LocalityClass::Distributed,
            _ => LocalityClass::Structural,
        }
    }
}

impl fmt::Display for LocalityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LocalityClass::NoMapping => "NO_MAPPING",
            LocalityClass::Localized => "LOCALIZED",
            LocalityClass::Distributed => "DISTRIBUTED",
            LocalityClass::Structural => "STRUCTURAL",
        };
        write!(f, "{label}")
    }
}

/// Table data the rule chain consults, compiled for O(1) membership tests
/// and longest-first prefix scans.
#[derive(Clone, Debug)]
pub struct CompiledRuleTables {
    infrastructure: AHashSet<String>,
    secondary_prefixes: Vec<String>,
    hybrid_suffixes: Vec<String>,
    pattern_prefixes: Vec<String>,
}

impl CompiledRuleTables {
    /// Compile from a validated table set.
    pub fn from_tables(tables: &TableSet) -> Self {
        let longest_first =
            |a: &String, b: &String| b.len().cmp(&a.len()).then_with(|| a.cmp(b));
        let mut secondary_prefixes = tables.secondary_prefixes.clone();
        let mut pattern_prefixes = tables.pattern_prefixes.clone();
        secondary_prefixes.sort_by(longest_first);
        pattern_prefixes.sort_by(longest_first);
        CompiledRuleTables {
            infrastructure: tables.infrastructure_tokens.iter().cloned().collect(),
            secondary_prefixes,
            hybrid_suffixes: tables.hybrid_suffixes.clone(),
            pattern_prefixes,
        }
    }
}

/// One rule of the token-system chain: a named predicate producing a label.
#[derive(Clone, Copy, Debug)]
pub struct SystemRule {
    name: &'static str,
    kind: RuleKind,
}

#[derive(Clone, Copy, Debug)]
enum RuleKind {
    InfrastructureLiteral,
    PrimaryParse,
    SecondaryPrefix,
    PatternPrefix,
    SingleChar,
}

impl SystemRule {
    /// Name of this rule, stable for assertions and diagnostics.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Evaluate this rule against a token; `None` passes to the next rule.
    pub fn evaluate(
        &self,
        text: &str,
        morphology: &MorphologyResult,
        tables: &CompiledRuleTables,
    ) -> Option<SystemLabel> {
        match self.kind {
            RuleKind::InfrastructureLiteral => tables
                .infrastructure
                .contains(text)
                .then_some(SystemLabel::Infrastructure),
            RuleKind::PrimaryParse => morphology.is_parsed().then_some(SystemLabel::Primary),
            RuleKind::SecondaryPrefix => {
                let prefix = tables
                    .secondary_prefixes
                    .iter()
                    .find(|p| text.starts_with(p.as_str()))?;
                let rest = &text[prefix.len()..];
                let hybrid = tables
                    .hybrid_suffixes
                    .iter()
                    .any(|s| rest.ends_with(s.as_str()));
                Some(if hybrid {
                    SystemLabel::SecondaryHybrid
                } else {
                    SystemLabel::Secondary
                })
            }
            RuleKind::PatternPrefix => tables
                .pattern_prefixes
                .iter()
                .any(|p| text.starts_with(p.as_str()))
                .then_some(SystemLabel::Pattern),
            RuleKind::SingleChar => {
                (text.chars().count() == 1).then_some(SystemLabel::Infrastructure)
            }
        }
    }
}

/// Name reported when no rule of the chain matched.
pub const NO_RULE: &str = "unclassified";

/// The default rule chain, in priority order.
pub fn default_chain() -> Vec<SystemRule> {
    vec![
        SystemRule {
            name: "infrastructure-literal",
            kind: RuleKind::InfrastructureLiteral,
        },
        SystemRule {
            name: "primary-parse",
            kind: RuleKind::PrimaryParse,
        },
        SystemRule {
            name: "secondary-prefix",
            kind: RuleKind::SecondaryPrefix,
        },
        SystemRule {
            name: "pattern-prefix",
            kind: RuleKind::PatternPrefix,
        },
        SystemRule {
            name: "single-char",
            kind: RuleKind::SingleChar,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locality_boundaries() {
        assert_eq!(LocalityClass::from_folio_count(0), LocalityClass::NoMapping);
        assert_eq!(LocalityClass::from_folio_count(1), LocalityClass::Localized);
        assert_eq!(LocalityClass::from_folio_count(3), LocalityClass::Localized);
        assert_eq!(
            LocalityClass::from_folio_count(4),
            LocalityClass::Distributed
        );
        assert_eq!(
            LocalityClass::from_folio_count(9),
            LocalityClass::Distributed
        );
        assert_eq!(
            LocalityClass::from_folio_count(10),
            LocalityClass::Structural
        );
    }

    #[test]
    fn test_chain_order() {
        let names: Vec<_> = default_chain().iter().map(|r| r.name()).collect();
        assert_eq!(
            names,
            vec![
                "infrastructure-literal",
                "primary-parse",
                "secondary-prefix",
                "pattern-prefix",
                "single-char",
            ]
        );
    }

    #[test]
    fn test_display_labels() {
        assert_eq!(SystemLabel::SecondaryHybrid.to_string(), "SECONDARY_HYBRID");
        assert_eq!(LocalityClass::NoMapping.to_string(), "NO_MAPPING");
    }
}
