//! Menu Model

use serde::{Deserialize, Serialize};

use super::session::SessionType;

/// Menu entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Menu {
    pub id: i64,
    pub store_id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    /// Lower value wins when several menus apply
    pub priority: i32,
    /// Served when no context-specific menu matches
    pub is_fallback: bool,
    pub is_active: bool,
    pub created_at: i64,
}

/// Condition attached to a menu (JSON: `{"rule_type": ..., "rule_config": {...}}`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "rule_type", content = "rule_config", rename_all = "snake_case")]
pub enum RuleCondition {
    SessionType { values: Vec<SessionType> },
    Tables { table_ids: Vec<i64> },
    Bars { bar_ids: Vec<i64> },
    /// "HH:MM" bounds, inclusive; `from > to` spans midnight
    TimeRange { from: String, to: String },
    /// 0=Sunday..6=Saturday
    Weekdays { days: Vec<u8> },
    ManualOverride { enabled: bool },
}

impl RuleCondition {
    pub fn rule_type(&self) -> &'static str {
        match self {
            Self::SessionType { .. } => "session_type",
            Self::Tables { .. } => "tables",
            Self::Bars { .. } => "bars",
            Self::TimeRange { .. } => "time_range",
            Self::Weekdays { .. } => "weekdays",
            Self::ManualOverride { .. } => "manual_override",
        }
    }
}

/// Menu rule entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MenuRule {
    pub id: i64,
    pub menu_id: i64,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub condition: RuleCondition,
    pub is_active: bool,
}

/// Menu together with its rules
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuWithRules {
    #[serde(flatten)]
    pub menu: Menu,
    #[serde(default)]
    pub rules: Vec<MenuRule>,
}

/// Create menu payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuCreate {
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub priority: Option<i32>,
    pub is_fallback: Option<bool>,
}

/// Update menu payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub priority: Option<i32>,
    pub is_active: Option<bool>,
}

/// Create menu rule payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuRuleCreate {
    pub condition: RuleCondition,
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_condition_json_shape() {
        let cond = RuleCondition::Weekdays { days: vec![5, 6] };
        let json = serde_json::to_value(&cond).unwrap();
        assert_eq!(json["rule_type"], "weekdays");
        assert_eq!(json["rule_config"]["days"], serde_json::json!([5, 6]));
        assert_eq!(cond.rule_type(), "weekdays");
    }

    #[test]
    fn rule_condition_parses_session_values() {
        let cond: RuleCondition = serde_json::from_str(
            r#"{"rule_type":"session_type","rule_config":{"values":["table","bar"]}}"#,
        )
        .unwrap();
        assert_eq!(
            cond,
            RuleCondition::SessionType {
                values: vec![SessionType::Table, SessionType::Bar]
            }
        );
    }

    #[test]
    fn menu_with_rules_flattens_menu_fields() {
        let mwr = MenuWithRules {
            menu: Menu {
                id: 1,
                store_id: 2,
                name: "Lunch".into(),
                slug: "lunch".into(),
                description: None,
                priority: 10,
                is_fallback: false,
                is_active: true,
                created_at: 0,
            },
            rules: vec![],
        };
        let json = serde_json::to_value(&mwr).unwrap();
        assert_eq!(json["name"], "Lunch");
        assert_eq!(json["priority"], 10);
        assert!(json["rules"].as_array().unwrap().is_empty());
    }
}
