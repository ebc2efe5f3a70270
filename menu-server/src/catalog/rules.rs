//! Menu Rule Matcher
//!
//! Evaluates a menu rule condition against the caller's session context and
//! the local weekday/time.

use chrono::{DateTime, Datelike, Local, NaiveTime, TimeZone, Timelike, Weekday};
use shared::error::{AppError, ErrorCode};
use shared::models::{RuleCondition, SessionContext};

/// Everything a rule can look at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleContext {
    pub session: SessionContext,
    /// 0=Sunday..6=Saturday
    pub weekday: u8,
    pub time: NaiveTime,
}

impl RuleContext {
    pub fn new(session: SessionContext, weekday: u8, time: NaiveTime) -> Self {
        Self {
            session,
            weekday,
            time,
        }
    }

    /// Context evaluated at a given local instant
    pub fn at<Tz: TimeZone>(session: SessionContext, instant: &DateTime<Tz>) -> Self {
        let time = NaiveTime::from_hms_opt(instant.hour(), instant.minute(), 0)
            .unwrap_or(NaiveTime::MIN);
        Self::new(session, weekday_index(instant.weekday()), time)
    }

    /// Context evaluated now, in server local time
    pub fn now(session: SessionContext) -> Self {
        Self::at(session, &Local::now())
    }
}

/// Outcome of one condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleOutcome {
    Match,
    NoMatch,
    /// Condition does not constrain the context (disabled override)
    Neutral,
}

pub fn weekday_index(day: Weekday) -> u8 {
    match day {
        Weekday::Sun => 0,
        Weekday::Mon => 1,
        Weekday::Tue => 2,
        Weekday::Wed => 3,
        Weekday::Thu => 4,
        Weekday::Fri => 5,
        Weekday::Sat => 6,
    }
}

pub fn evaluate(condition: &RuleCondition, ctx: &RuleContext) -> RuleOutcome {
    let matched = match condition {
        RuleCondition::SessionType { values } => {
            values.contains(&ctx.session.effective_session_type())
        }
        RuleCondition::Tables { table_ids } => ctx
            .session
            .table_id
            .is_some_and(|id| table_ids.contains(&id)),
        RuleCondition::Bars { bar_ids } => {
            ctx.session.bar_id.is_some_and(|id| bar_ids.contains(&id))
        }
        RuleCondition::TimeRange { from, to } => match (parse_hhmm(from), parse_hhmm(to)) {
            (Some(start), Some(end)) => in_time_range(ctx.time, start, end),
            _ => false,
        },
        RuleCondition::Weekdays { days } => days.contains(&ctx.weekday),
        RuleCondition::ManualOverride { enabled } => {
            if *enabled {
                true
            } else {
                return RuleOutcome::Neutral;
            }
        }
    };
    if matched {
        RuleOutcome::Match
    } else {
        RuleOutcome::NoMatch
    }
}

/// Inclusive range; `start > end` spans midnight (e.g. 22:00 - 02:00)
pub fn in_time_range(current: NaiveTime, start: NaiveTime, end: NaiveTime) -> bool {
    if start <= end {
        current >= start && current <= end
    } else {
        current >= start || current <= end
    }
}

fn parse_hhmm(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()
}

/// Reject conditions that could never match or are malformed
pub fn validate_condition(condition: &RuleCondition) -> Result<(), AppError> {
    let invalid = |msg: String| -> Result<(), AppError> {
        Err(AppError::with_message(ErrorCode::MenuRuleInvalid, msg)
            .with_detail("rule_type", condition.rule_type()))
    };
    match condition {
        RuleCondition::SessionType { values } if values.is_empty() => {
            invalid("session_type rule needs at least one value".into())
        }
        RuleCondition::Tables { table_ids } if table_ids.is_empty() => {
            invalid("tables rule needs at least one table id".into())
        }
        RuleCondition::Bars { bar_ids } if bar_ids.is_empty() => {
            invalid("bars rule needs at least one bar id".into())
        }
        RuleCondition::TimeRange { from, to } => {
            if parse_hhmm(from).is_none() || parse_hhmm(to).is_none() {
                return invalid(format!("time_range expects HH:MM bounds, got {from}-{to}"));
            }
            Ok(())
        }
        RuleCondition::Weekdays { days } => {
            if days.is_empty() {
                return invalid("weekdays rule needs at least one day".into());
            }
            if let Some(day) = days.iter().find(|d| **d > 6) {
                return invalid(format!("weekday {day} is out of range 0..=6"));
            }
            Ok(())
        }
        _ => Ok(()),
    }
}
