//! Joins tiling rules against a sprite index.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TiledupError};
use crate::rule_tile::TileRule;
use crate::sprite::{Sprite, SpriteIndex};

/// What to do with an entry that cannot be mapped onto a sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MappingPolicy {
    /// Drop the entry and keep going. Dropped entries are reported.
    Skip,
    /// Fail on the first unresolved entry.
    Strict,
}

/// Why an entry could not be mapped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UnresolvedReason {
    /// The reference token is not declared by any sprite in the sheet.
    UnknownReference { reference_id: String },
    /// No destination sprite carries the remapped sequence number.
    MissingSequence { sequence_number: i64 },
}

impl fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnresolvedReason::UnknownReference { reference_id } => {
                write!(f, "sprite {} is not in the sheet", reference_id)
            }
            UnresolvedReason::MissingSequence { sequence_number } => {
                write!(f, "no sprite numbered {} in the sheet", sequence_number)
            }
        }
    }
}

/// Outcome of mapping one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(Sprite),
    Unresolved(UnresolvedReason),
}

impl Resolution {
    pub fn sprite(&self) -> Option<&Sprite> {
        match self {
            Resolution::Resolved(sprite) => Some(sprite),
            Resolution::Unresolved(_) => None,
        }
    }
}

/// A rule together with the sprite it resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleResolution {
    pub rule: TileRule,
    pub resolution: Resolution,
}

/// A rule dropped under [`MappingPolicy::Skip`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRule {
    pub rule_id: i64,
    pub reference_id: String,
    pub reason: UnresolvedReason,
}

/// Sprites in rule order, plus whatever was dropped on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedOrder {
    pub sprites: Vec<Sprite>,
    pub skipped: Vec<SkippedRule>,
}

/// Resolves every rule, in order, against `index`.
pub fn resolve(index: &SpriteIndex, rules: &[TileRule]) -> Vec<RuleResolution> {
    rules
        .iter()
        .map(|rule| {
            let resolution = match index.by_reference(&rule.reference_id) {
                Some(sprite) => Resolution::Resolved(sprite.clone()),
                None => Resolution::Unresolved(UnresolvedReason::UnknownReference {
                    reference_id: rule.reference_id.clone(),
                }),
            };
            RuleResolution {
                rule: rule.clone(),
                resolution,
            }
        })
        .collect()
}

/// Resolves rules and applies `policy` to the ones that did not join.
pub fn resolve_ordered(
    index: &SpriteIndex,
    rules: &[TileRule],
    policy: MappingPolicy,
) -> Result<ResolvedOrder> {
    let mut order = ResolvedOrder::default();

    for RuleResolution { rule, resolution } in resolve(index, rules) {
        match resolution {
            Resolution::Resolved(sprite) => order.sprites.push(sprite),
            Resolution::Unresolved(reason) => match policy {
                MappingPolicy::Strict => {
                    return Err(TiledupError::UnresolvedReference {
                        rule_id: rule.rule_id,
                        reference_id: rule.reference_id,
                    });
                }
                MappingPolicy::Skip => order.skipped.push(SkippedRule {
                    rule_id: rule.rule_id,
                    reference_id: rule.reference_id,
                    reason,
                }),
            },
        }
    }

    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(rule_id: i64, reference_id: &str) -> TileRule {
        TileRule {
            rule_id,
            reference_id: reference_id.to_string(),
            guid: None,
        }
    }

    fn sheet() -> SpriteIndex {
        SpriteIndex::from_sprites(vec![
            Sprite::new("Grass_10.asset", "100", None).unwrap(),
            Sprite::new("Grass_11.asset", "110", None).unwrap(),
            Sprite::new("Grass_12.asset", "120", None).unwrap(),
        ])
    }

    #[test]
    fn test_resolve_follows_rule_order() {
        let rules = vec![rule(5, "120"), rule(1, "100"), rule(3, "110")];
        let order = resolve_ordered(&sheet(), &rules, MappingPolicy::Skip).unwrap();
        let numbers: Vec<_> = order.sprites.iter().map(|s| s.sequence_number).collect();
        assert_eq!(numbers, vec![12, 10, 11]);
        assert!(order.skipped.is_empty());
    }

    #[test]
    fn test_resolve_reports_unknown_reference() {
        let rules = vec![rule(1, "100"), rule(2, "999")];
        let resolutions = resolve(&sheet(), &rules);
        assert!(resolutions[0].resolution.sprite().is_some());
        assert_eq!(
            resolutions[1].resolution,
            Resolution::Unresolved(UnresolvedReason::UnknownReference {
                reference_id: "999".to_string()
            })
        );
    }

    #[test]
    fn test_skip_policy_drops_unresolved() {
        let rules = vec![rule(1, "999"), rule(2, "110")];
        let order = resolve_ordered(&sheet(), &rules, MappingPolicy::Skip).unwrap();
        assert_eq!(order.sprites.len(), 1);
        assert_eq!(order.skipped.len(), 1);
        assert_eq!(order.skipped[0].rule_id, 1);
    }

    #[test]
    fn test_strict_policy_fails() {
        let rules = vec![rule(1, "100"), rule(2, "999")];
        let err = resolve_ordered(&sheet(), &rules, MappingPolicy::Strict).unwrap_err();
        assert!(matches!(
            err,
            TiledupError::UnresolvedReference { rule_id: 2, .. }
        ));
    }

    #[test]
    fn test_policy_serde() {
        let policy: MappingPolicy = serde_yaml::from_str("strict").unwrap();
        assert_eq!(policy, MappingPolicy::Strict);
    }
}
