//! Rule table construction and lookup.
//!
//! A [`RuleTable`] is an ordered list of [`Rule`]s that partitions the
//! elapsed-weeks axis `[0, ∞)`: it starts at week 1, each rule starts the
//! week after the previous one ends, and the last rule is open-ended. These
//! invariants are checked once at construction, so a lookup against a built
//! table always finds exactly one rule.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::rule_fields::APPLICABLE_WEEKS;
use crate::models::{Person, ReportLine, Rule};
use crate::validation;

use super::payment::render_report_line;

/// A validated, immutable table of payment rules.
///
/// # Example
///
/// ```
/// use piawe_engine::calculation::RuleTable;
/// use rust_decimal::Decimal;
/// use serde_json::json;
///
/// let table = RuleTable::from_records(&[
///     json!({"applicableWeeks": "1-26", "percentagePayable": 90, "overtimeIncluded": true}),
///     json!({"applicableWeeks": "27+", "percentagePayable": 80, "overtimeIncluded": false}),
/// ]).unwrap();
///
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.find(Decimal::from(26)).unwrap().applicable_weeks(), "27+");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    /// Validates rule records one at a time, checking each against the rule
    /// before it, then checks that the last rule is open-ended.
    ///
    /// Record errors and table errors are reported in input order, so a bad
    /// rule 2 is reported before anything wrong with rule 3.
    ///
    /// # Errors
    ///
    /// - `RuleTableConsistency` with ordinal 0 if `records` is empty
    /// - `InvalidType` if an entry is not an object
    /// - any error from [`Rule::from_record`] for the first invalid rule;
    ///   `applicableWeeks` range errors name the rule's ordinal
    /// - `RuleTableConsistency` as described on [`RuleTable::new`]
    pub fn from_records(records: &[Value]) -> EngineResult<Self> {
        let mut table = Self::with_capacity(records.len())?;
        for (index, value) in records.iter().enumerate() {
            let rule = rule_from_value(value, index + 1)?;
            table.push(rule)?;
        }
        table.finish()
    }

    /// Builds a table from already-validated rules.
    ///
    /// The checks run in this order and the first failure is returned:
    ///
    /// 1. the table is not empty
    /// 2. rule 1 starts at week 1
    /// 3. every rule except the last is bounded
    /// 4. each rule starts the week after the previous rule ends
    /// 5. the last rule is open-ended
    ///
    /// # Errors
    ///
    /// Returns `RuleTableConsistency` naming the 1-based ordinal of the
    /// offending rule.
    pub fn new(rules: Vec<Rule>) -> EngineResult<Self> {
        let mut table = Self::with_capacity(rules.len())?;
        for rule in rules {
            table.push(rule)?;
        }
        table.finish()
    }

    fn with_capacity(count: usize) -> EngineResult<Self> {
        if count == 0 {
            return Err(EngineError::RuleTableConsistency {
                rule: 0,
                message: "rules array must contain at least one entry".to_string(),
            });
        }
        Ok(Self {
            rules: Vec::with_capacity(count),
        })
    }

    /// Appends `rule` after checking it continues the rules already added.
    fn push(&mut self, rule: Rule) -> EngineResult<()> {
        let Some(previous) = self.rules.last() else {
            if rule.start_week() != 1 {
                return Err(EngineError::RuleTableConsistency {
                    rule: 1,
                    message: format!(
                        "rule 1 should start at week 1, but starts at week {}",
                        rule.start_week()
                    ),
                });
            }
            self.rules.push(rule);
            return Ok(());
        };

        let ordinal = self.rules.len();

        let Some(previous_end) = previous.end_week() else {
            return Err(EngineError::RuleTableConsistency {
                rule: ordinal,
                message: format!(
                    "rule {} has a terminating + sign but is not the last rule (rule {} is {})",
                    ordinal,
                    ordinal + 1,
                    rule.applicable_weeks()
                ),
            });
        };

        if u64::from(rule.start_week()) != u64::from(previous_end) + 1 {
            return Err(EngineError::RuleTableConsistency {
                rule: ordinal,
                message: format!(
                    "rule {} ends at week {} but rule {} starts at week {} - each rule must start one week after the previous rule ends",
                    ordinal,
                    previous_end,
                    ordinal + 1,
                    rule.start_week()
                ),
            });
        }

        self.rules.push(rule);
        Ok(())
    }

    fn finish(self) -> EngineResult<Self> {
        let last_ordinal = self.rules.len();
        if self.rules.last().is_some_and(|rule| !rule.is_open_ended()) {
            return Err(EngineError::RuleTableConsistency {
                rule: last_ordinal,
                message: "last rule must have a terminating + sign".to_string(),
            });
        }

        debug!(rules = last_ordinal, "Rule table validated");
        Ok(self)
    }

    /// Returns the rules in table order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Returns the number of rules in the table.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Always false: a constructed table holds at least one rule.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns the first rule, in table order, that applies after
    /// `weeks_since_injury` elapsed weeks.
    ///
    /// For a constructed table this is `Some` for every non-negative input.
    pub fn find(&self, weeks_since_injury: Decimal) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.matches(weeks_since_injury))
    }

    /// Computes the report line for `person` on `report_date`.
    ///
    /// # Errors
    ///
    /// - `InvalidValue` if the person's injury date is after `report_date`
    /// - `EngineInvariantViolation` if no rule matches, which the table
    ///   invariants rule out
    pub fn report_line(&self, person: &Person, report_date: NaiveDate) -> EngineResult<ReportLine> {
        let weeks_since_injury = person.weeks_since_injury(report_date)?;

        let rule = self.find(weeks_since_injury).ok_or_else(|| {
            EngineError::EngineInvariantViolation {
                message: format!(
                    "a rule table exists that does not cover all possible dates (report date {}, weeks since injury {}, person {:?})",
                    validation::format_date(report_date),
                    weeks_since_injury,
                    person.name()
                ),
            }
        })?;

        debug!(
            person = person.name(),
            weeks_since_injury = %weeks_since_injury,
            rule = rule.applicable_weeks(),
            "Matched payment rule"
        );
        render_report_line(person, rule, weeks_since_injury)
    }
}

fn rule_from_value(value: &Value, ordinal: usize) -> EngineResult<Rule> {
    let Some(record) = value.as_object() else {
        return Err(EngineError::InvalidType {
            field: "rule".to_string(),
            expected: "an object".to_string(),
            value: value.to_string(),
            record: value.to_string(),
        });
    };

    Rule::from_record(record).map_err(|error| match error {
        EngineError::InvalidValue {
            field,
            value,
            message,
            record,
        } if field == APPLICABLE_WEEKS => EngineError::InvalidValue {
            field,
            value,
            message: format!("{} in rule {}", message, ordinal),
            record,
        },
        other => other,
    })
}
