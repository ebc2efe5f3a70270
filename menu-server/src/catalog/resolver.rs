//! Menu Resolver
//!
//! Picks the one menu a store serves for a context:
//! 1. an active menu with an enabled manual override wins outright;
//! 2. otherwise active non-fallback menus whose active rules all match are
//!    ranked by priority (lower first), then matched rule count, then id;
//! 3. otherwise the fallback menu is served;
//! 4. otherwise nothing is served, which is a valid outcome.

use std::cmp::Reverse;

use shared::models::{Menu, MenuResolution, MenuRule, MenuWithRules, ResolutionReason, RuleCondition};

use super::rules::{RuleContext, RuleOutcome, evaluate};

/// Group flat rule rows under their menus
pub fn attach_rules(menus: Vec<Menu>, rules: Vec<MenuRule>) -> Vec<MenuWithRules> {
    let mut grouped: Vec<MenuWithRules> = menus
        .into_iter()
        .map(|menu| MenuWithRules { menu, rules: Vec::new() })
        .collect();
    for rule in rules {
        if let Some(entry) = grouped.iter_mut().find(|m| m.menu.id == rule.menu_id) {
            entry.rules.push(rule);
        }
    }
    grouped
}

pub fn resolve(menus: &[MenuWithRules], ctx: &RuleContext) -> MenuResolution {
    let active: Vec<&MenuWithRules> = menus.iter().filter(|m| m.menu.is_active).collect();

    let mut overrides: Vec<&MenuWithRules> = active
        .iter()
        .copied()
        .filter(|m| active_rules(m).any(|r| r.condition == RuleCondition::ManualOverride { enabled: true }))
        .collect();
    if !overrides.is_empty() {
        overrides.sort_by_key(|m| (m.menu.priority, m.menu.id));
        if overrides.len() > 1 {
            tracing::warn!(
                store_id = overrides[0].menu.store_id,
                count = overrides.len(),
                "Several menus have an enabled manual override"
            );
        }
        return MenuResolution {
            menu: Some(overrides[0].menu.clone()),
            reason: ResolutionReason::ManualOverride,
            ambiguous: overrides.len() > 1,
            matched_rules: 1,
        };
    }

    let mut candidates: Vec<(&MenuWithRules, usize)> = active
        .iter()
        .copied()
        .filter(|m| !m.menu.is_fallback)
        .filter_map(|m| matched_rule_count(m, ctx).map(|n| (m, n)))
        .collect();
    candidates.sort_by_key(|(m, matched)| (m.menu.priority, Reverse(*matched), m.menu.id));
    if let Some((winner, matched)) = candidates.first() {
        return MenuResolution {
            menu: Some(winner.menu.clone()),
            reason: if *matched == 0 {
                ResolutionReason::Unconditional
            } else {
                ResolutionReason::RuleMatch
            },
            ambiguous: false,
            matched_rules: *matched,
        };
    }

    let mut fallbacks: Vec<&MenuWithRules> =
        active.iter().copied().filter(|m| m.menu.is_fallback).collect();
    fallbacks.sort_by_key(|m| (m.menu.priority, m.menu.id));
    match fallbacks.first() {
        Some(fallback) => {
            let ambiguous = fallbacks.len() > 1;
            if ambiguous {
                tracing::warn!(
                    store_id = fallback.menu.store_id,
                    count = fallbacks.len(),
                    served = fallback.menu.id,
                    "Multiple fallback menus, serving the lowest priority one"
                );
            }
            MenuResolution {
                menu: Some(fallback.menu.clone()),
                reason: ResolutionReason::Fallback,
                ambiguous,
                matched_rules: 0,
            }
        }
        None => MenuResolution::none(),
    }
}

fn active_rules(menu: &MenuWithRules) -> impl Iterator<Item = &MenuRule> {
    menu.rules.iter().filter(|r| r.is_active)
}

/// `None` if any active rule rejects the context, else how many matched
fn matched_rule_count(menu: &MenuWithRules, ctx: &RuleContext) -> Option<usize> {
    let mut matched = 0;
    for rule in active_rules(menu) {
        match evaluate(&rule.condition, ctx) {
            RuleOutcome::Match => matched += 1,
            RuleOutcome::Neutral => {}
            RuleOutcome::NoMatch => return None,
        }
    }
    Some(matched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use shared::models::{SessionContext, SessionType};

    fn menu(id: i64, priority: i32, fallback: bool) -> Menu {
        Menu {
            id,
            store_id: 1,
            name: format!("menu-{id}"),
            slug: format!("menu-{id}"),
            description: None,
            priority,
            is_fallback: fallback,
            is_active: true,
            created_at: 0,
        }
    }

    fn rule(id: i64, menu_id: i64, condition: RuleCondition) -> MenuRule {
        MenuRule {
            id,
            menu_id,
            condition,
            is_active: true,
        }
    }

    fn ctx(session: SessionContext) -> RuleContext {
        RuleContext::new(session, 3, NaiveTime::from_hms_opt(13, 0, 0).unwrap())
    }

    fn bar_only(menu_id: i64) -> MenuRule {
        rule(
            menu_id * 10,
            menu_id,
            RuleCondition::SessionType {
                values: vec![SessionType::Bar],
            },
        )
    }

    #[test]
    fn single_fallback_resolves_without_context() {
        let menus = attach_rules(vec![menu(1, 100, true), menu(2, 10, false)], vec![bar_only(2)]);
        let res = resolve(&menus, &ctx(SessionContext::generic()));
        assert_eq!(res.menu_id(), Some(1));
        assert_eq!(res.reason, ResolutionReason::Fallback);
        assert!(!res.ambiguous);
    }

    #[test]
    fn matching_context_menu_beats_fallback() {
        let menus = attach_rules(vec![menu(1, 100, true), menu(2, 10, false)], vec![bar_only(2)]);
        let res = resolve(&menus, &ctx(SessionContext::bar(7)));
        assert_eq!(res.menu_id(), Some(2));
        assert_eq!(res.reason, ResolutionReason::RuleMatch);
        assert_eq!(res.matched_rules, 1);
    }

    #[test]
    fn all_rules_must_match() {
        let menus = attach_rules(
            vec![menu(1, 100, true), menu(2, 10, false)],
            vec![
                bar_only(2),
                rule(21, 2, RuleCondition::Bars { bar_ids: vec![1] }),
            ],
        );
        assert_eq!(resolve(&menus, &ctx(SessionContext::bar(2))).menu_id(), Some(1));
        assert_eq!(resolve(&menus, &ctx(SessionContext::bar(1))).menu_id(), Some(2));
    }

    #[test]
    fn lower_priority_then_specificity_then_id() {
        let menus = attach_rules(
            vec![menu(3, 50, false), menu(2, 50, false), menu(4, 20, false)],
            vec![
                rule(31, 3, RuleCondition::Tables { table_ids: vec![5] }),
                rule(41, 4, RuleCondition::Tables { table_ids: vec![6] }),
            ],
        );
        // menu 4 does not match, 2 and 3 share a priority, 3 is more specific
        let res = resolve(&menus, &ctx(SessionContext::table(5)));
        assert_eq!(res.menu_id(), Some(3));

        // table 9: only the unconditional menu 2 is left
        let res = resolve(&menus, &ctx(SessionContext::table(9)));
        assert_eq!(res.menu_id(), Some(2));
        assert_eq!(res.reason, ResolutionReason::Unconditional);

        let menus = attach_rules(vec![menu(8, 50, false), menu(7, 50, false)], vec![]);
        assert_eq!(resolve(&menus, &ctx(SessionContext::generic())).menu_id(), Some(7));
    }

    #[test]
    fn manual_override_wins_outright() {
        let menus = attach_rules(
            vec![menu(1, 100, true), menu(2, 1, false), menu(3, 500, false)],
            vec![rule(31, 3, RuleCondition::ManualOverride { enabled: true })],
        );
        let res = resolve(&menus, &ctx(SessionContext::generic()));
        assert_eq!(res.menu_id(), Some(3));
        assert_eq!(res.reason, ResolutionReason::ManualOverride);
    }

    #[test]
    fn disabled_or_inactive_rules_do_not_constrain() {
        let mut inactive = bar_only(2);
        inactive.is_active = false;
        let menus = attach_rules(
            vec![menu(1, 100, true), menu(2, 10, false)],
            vec![inactive, rule(22, 2, RuleCondition::ManualOverride { enabled: false })],
        );
        let res = resolve(&menus, &ctx(SessionContext::generic()));
        assert_eq!(res.menu_id(), Some(2));
        assert_eq!(res.reason, ResolutionReason::Unconditional);
    }

    #[test]
    fn multiple_fallbacks_are_flagged() {
        let menus = attach_rules(vec![menu(5, 100, true), menu(4, 100, true)], vec![]);
        let res = resolve(&menus, &ctx(SessionContext::generic()));
        assert_eq!(res.menu_id(), Some(4));
        assert!(res.ambiguous);
    }

    #[test]
    fn inactive_menus_are_ignored_and_none_is_valid() {
        let mut fallback = menu(1, 100, true);
        fallback.is_active = false;
        let menus = attach_rules(vec![fallback], vec![]);
        let res = resolve(&menus, &ctx(SessionContext::generic()));
        assert!(res.menu.is_none());
        assert_eq!(res.reason, ResolutionReason::NoMenu);

        assert!(resolve(&[], &ctx(SessionContext::generic())).menu.is_none());
    }
}
