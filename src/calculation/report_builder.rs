//! Payment report orchestration.
//!
//! This module provides the [`ReportBuilder`], which runs a roster of people
//! against one [`RuleTable`] for one report date.

use std::time::Instant;

use chrono::NaiveDate;
use serde_json::Value;
use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::models::{PaymentReport, Person, ReportLine};
use crate::validation;

use super::rule_table::RuleTable;

/// Builds payment reports against a fixed rule table.
///
/// The rule table is validated once when the builder is created and can then
/// be used for any number of rosters and report dates.
///
/// # Example
///
/// ```
/// use piawe_engine::calculation::ReportBuilder;
/// use chrono::NaiveDate;
/// use serde_json::json;
///
/// let builder = ReportBuilder::from_rule_records(&[
///     json!({"applicableWeeks": "1-26", "percentagePayable": 90, "overtimeIncluded": true}),
///     json!({"applicableWeeks": "27+", "percentagePayable": 80, "overtimeIncluded": false}),
/// ]).unwrap();
///
/// let people = vec![json!({
///     "name": "test person",
///     "hourlyRate": 75.0,
///     "overtimeRate": 150.0,
///     "normalHours": 35.0,
///     "overtimeHours": 5,
///     "injuryDate": "2016/12/21"
/// })];
///
/// let report = builder
///     .build(&people, NaiveDate::from_ymd_opt(2017, 3, 1).unwrap())
///     .unwrap();
/// assert_eq!(report.report_date, "2017/03/01");
/// assert_eq!(report.report_lines[0].pay_for_this_week, "3037.50");
/// ```
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    rules: RuleTable,
}

impl ReportBuilder {
    /// Creates a builder over an already-validated rule table.
    pub fn new(rules: RuleTable) -> Self {
        Self { rules }
    }

    /// Validates `records` into a rule table and creates a builder over it.
    pub fn from_rule_records(records: &[Value]) -> EngineResult<Self> {
        RuleTable::from_records(records).map(Self::new)
    }

    /// Returns the rule table this builder reports against.
    pub fn rule_table(&self) -> &RuleTable {
        &self.rules
    }

    /// Builds the report for untyped person records.
    ///
    /// Each person is validated as their line is produced, in input order.
    /// The first invalid person aborts the whole report.
    pub fn build(&self, people: &[Value], report_date: NaiveDate) -> EngineResult<PaymentReport> {
        let started = Instant::now();

        let report_lines = people
            .iter()
            .map(|value| {
                let person = person_from_value(value)?;
                self.rules.report_line(&person, report_date)
            })
            .collect::<EngineResult<Vec<ReportLine>>>()?;

        info!(
            report_date = %report_date,
            lines = report_lines.len(),
            duration_us = started.elapsed().as_micros() as u64,
            "Payment report built"
        );

        Ok(PaymentReport {
            report_date: validation::format_date(report_date),
            report_lines,
        })
    }

    /// Builds the report for people that were validated earlier.
    ///
    /// Weeks since injury are always recomputed for `report_date`.
    pub fn build_for(&self, people: &[Person], report_date: NaiveDate) -> EngineResult<PaymentReport> {
        let report_lines = people
            .iter()
            .map(|person| self.rules.report_line(person, report_date))
            .collect::<EngineResult<Vec<ReportLine>>>()?;

        Ok(PaymentReport {
            report_date: validation::format_date(report_date),
            report_lines,
        })
    }
}

/// Validates a single untyped person entry.
pub fn person_from_value(value: &Value) -> EngineResult<Person> {
    match value.as_object() {
        Some(record) => Person::from_record(record),
        None => Err(EngineError::InvalidType {
            field: "person".to_string(),
            expected: "an object".to_string(),
            value: value.to_string(),
            record: value.to_string(),
        }),
    }
}

/// Builds a payment report in one call: validates `rules`, then runs `people`.
pub fn build_report(
    people: &[Value],
    rules: &[Value],
    report_date: NaiveDate,
) -> EngineResult<PaymentReport> {
    ReportBuilder::from_rule_records(rules)?.build(people, report_date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn report_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2017, 3, 1).unwrap()
    }

    fn valid_rules() -> Vec<Value> {
        vec![
            json!({"applicableWeeks": "1-26", "percentagePayable": 90, "overtimeIncluded": true}),
            json!({"applicableWeeks": "27-52", "percentagePayable": 80, "overtimeIncluded": true}),
            json!({"applicableWeeks": "53-79", "percentagePayable": 70, "overtimeIncluded": true}),
            json!({"applicableWeeks": "80-104", "percentagePayable": 60, "overtimeIncluded": false}),
            json!({"applicableWeeks": "105+", "percentagePayable": 10, "overtimeIncluded": false}),
        ]
    }

    fn people() -> Vec<Value> {
        vec![
            json!({"name": "Ebony Boycott", "hourlyRate": 75.0030, "overtimeRate": 150.0000, "normalHours": 35.0, "overtimeHours": 7.3, "injuryDate": "2016/05/01"}),
            json!({"name": "Geoff Rainford-Brent", "hourlyRate": 30.1234, "overtimeRate": 60.3456, "normalHours": 25.0, "overtimeHours": 10.7, "injuryDate": "2016/08/04"}),
            json!({"name": "Meg Gillespie", "hourlyRate": 50.0000, "overtimeRate": 100.0000, "normalHours": 37.5, "overtimeHours": 0.0, "injuryDate": "2015/12/31"}),
            json!({"name": "Jason Lanning", "hourlyRate": 40.0055, "overtimeRate": 90.9876, "normalHours": 40.0, "overtimeHours": 12.4, "injuryDate": "2013/01/01"}),
        ]
    }

    #[test]
    fn test_one_line_per_person_in_order() {
        let report = build_report(&people(), &valid_rules(), report_date()).unwrap();

        assert_eq!(report.report_date, "2017/03/01");
        let names: Vec<&str> = report.report_lines.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Ebony Boycott", "Geoff Rainford-Brent", "Meg Gillespie", "Jason Lanning"]
        );
    }

    #[test]
    fn test_each_person_matches_expected_band() {
        let report = build_report(&people(), &valid_rules(), report_date()).unwrap();
        let lines = &report.report_lines;

        // 304 days
        assert_eq!(lines[0].weeks_since_injury, "43.43");
        assert_eq!(lines[0].pay_for_this_week, "2976.08");

        // 209 days = 29.857 weeks, 27-52 band at 80% with overtime:
        // (25 * 30.1234 + 10.7 * 60.3456) * 0.8 = (753.085 + 645.69792) * 0.8
        assert_eq!(lines[1].weeks_since_injury, "29.86");
        assert_eq!(lines[1].percentage_payable, "80.00");
        assert_eq!(lines[1].pay_for_this_week, "1119.03");

        // 426 days = 60.857 weeks, 53-79 band at 70%: 37.5 * 50 * 0.7
        assert_eq!(lines[2].weeks_since_injury, "60.86");
        assert_eq!(lines[2].pay_for_this_week, "1312.50");

        // 1520 days = 217.14 weeks, 105+ band at 10% without overtime: 40 * 40.0055 * 0.1
        assert_eq!(lines[3].weeks_since_injury, "217.14");
        assert_eq!(lines[3].overtime_included, "false");
        assert_eq!(lines[3].pay_for_this_week, "160.02");
    }

    #[test]
    fn test_empty_roster_gives_empty_report() {
        let report = build_report(&[], &valid_rules(), report_date()).unwrap();
        assert!(report.report_lines.is_empty());
    }

    #[test]
    fn test_rule_table_errors_abort_before_people() {
        let mut rules = valid_rules();
        rules.pop();
        let people = vec![json!({})];

        assert!(matches!(
            build_report(&people, &rules, report_date()),
            Err(EngineError::RuleTableConsistency { rule: 4, .. })
        ));
    }

    #[test]
    fn test_first_invalid_person_aborts_report() {
        let mut roster = people();
        roster.insert(1, json!({"name": "No Rates"}));
        roster.push(json!({}));

        match build_report(&roster, &valid_rules(), report_date()) {
            Err(EngineError::MissingField { field, record }) => {
                assert_eq!(field, "hourlyRate");
                assert!(record.contains("No Rates"));
            }
            other => panic!("Expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_future_injury_date_aborts_report() {
        let mut roster = people();
        roster[2]["injuryDate"] = json!("2017/03/02");

        assert!(matches!(
            build_report(&roster, &valid_rules(), report_date()),
            Err(EngineError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_non_object_person_is_invalid_type() {
        assert!(matches!(
            build_report(&[json!("Ebony")], &valid_rules(), report_date()),
            Err(EngineError::InvalidType { .. })
        ));
    }

    #[test]
    fn test_builder_reuses_table_and_people_across_dates() {
        let builder = ReportBuilder::from_rule_records(&valid_rules()).unwrap();
        let validated: Vec<Person> = people().iter().map(|p| person_from_value(p).unwrap()).collect();

        let march = builder.build_for(&validated, report_date()).unwrap();
        let later = builder
            .build_for(&validated, NaiveDate::from_ymd_opt(2018, 3, 1).unwrap())
            .unwrap();

        assert_eq!(march, build_report(&people(), &valid_rules(), report_date()).unwrap());
        assert_ne!(march.report_lines[0].weeks_since_injury, later.report_lines[0].weeks_since_injury);
        assert_eq!(later.report_lines[0].percentage_payable, "60.00");
    }

    #[test]
    fn test_report_is_deterministic() {
        let first = serde_json::to_string(&build_report(&people(), &valid_rules(), report_date()).unwrap()).unwrap();
        let second = serde_json::to_string(&build_report(&people(), &valid_rules(), report_date()).unwrap()).unwrap();
        assert_eq!(first, second);
    }
}
