use std::collections::BTreeMap;
use std::fmt::Display;
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;

use crate::parser::parse_display_date;
use crate::storage::{StorageError, read_actions};
use crate::types::{EnforcementAction, MainCategory, MonthYear, Topic};

pub const STATE_ENFORCEMENT_MARKER: &str = "State Enforcement";

/// Evaluated top to bottom, first hit wins. A title mentioning both a bribe
/// and Medicare is bribery.
const TOPIC_RULES: &[(&[&str], Topic)] = &[
    (
        &["bribery", "bribe", "kickback", "corruption"],
        Topic::BriberyCorruption,
    ),
    (
        &["drug", "opioid", "fentanyl", "controlled substance"],
        Topic::DrugEnforcement,
    ),
    (
        &["bank", "financial", "money laundering", "wire fraud"],
        Topic::FinancialFraud,
    ),
    (
        &[
            "health care",
            "healthcare",
            "medicare",
            "medicaid",
            "hospital",
            "medical",
        ],
        Topic::HealthCareFraud,
    ),
];

// Missing category text falls into the criminal and civil bucket.
pub fn main_category(category_text: Option<&str>) -> MainCategory {
    match category_text {
        Some(text) if text.contains(STATE_ENFORCEMENT_MARKER) => {
            MainCategory::StateEnforcementAgencies
        }
        _ => MainCategory::CriminalAndCivilActions,
    }
}

pub fn classify_topic(title: Option<&str>) -> Topic {
    let Some(title) = title else {
        return Topic::Other;
    };
    let title = title.to_lowercase();

    TOPIC_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| title.contains(k)))
        .map(|(_, topic)| *topic)
        .unwrap_or(Topic::Other)
}

#[derive(Debug, Clone)]
pub struct ClassifiedAction {
    pub action: EnforcementAction,
    pub date: Option<NaiveDate>,
    pub month_year: Option<MonthYear>,
    pub main_category: MainCategory,
    pub topic: Option<Topic>,
}

impl ClassifiedAction {
    pub fn classify(action: EnforcementAction) -> Self {
        let date = action.date_text.as_deref().and_then(parse_display_date);
        let main_category = main_category(action.category_text.as_deref());
        let topic = (main_category == MainCategory::CriminalAndCivilActions).then(|| {
            let title = action.title.as_str();
            classify_topic((!title.is_empty()).then_some(title))
        });

        Self {
            action,
            date,
            month_year: date.map(MonthYear::of),
            main_category,
            topic,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ClassifiedTable {
    pub rows: Vec<ClassifiedAction>,
}

pub fn load_and_classify(path: impl AsRef<Path>) -> Result<ClassifiedTable, StorageError> {
    let path = path.as_ref();
    log::info!("Loading {}", path.display());
    let actions = read_actions(path)?;
    log::info!("Loaded {} records", actions.len());
    Ok(ClassifiedTable::from_actions(actions))
}

fn value_counts<K: Ord>(keys: impl Iterator<Item = K>) -> Vec<(K, usize)> {
    let mut counts: BTreeMap<K, usize> = BTreeMap::new();
    for key in keys {
        *counts.entry(key).or_default() += 1;
    }
    let mut counts: Vec<(K, usize)> = counts.into_iter().collect();
    // Stable sort keeps ties in key order.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

impl ClassifiedTable {
    pub fn from_actions(actions: Vec<EnforcementAction>) -> Self {
        Self {
            rows: actions.into_iter().map(ClassifiedAction::classify).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn most_recent(&self) -> Option<&EnforcementAction> {
        self.rows.first().map(|r| &r.action)
    }

    pub fn earliest(&self) -> Option<&EnforcementAction> {
        self.rows.last().map(|r| &r.action)
    }

    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let dates = || self.rows.iter().filter_map(|r| r.date);
        Some((dates().min()?, dates().max()?))
    }

    pub fn category_counts(&self) -> Vec<(String, usize)> {
        value_counts(
            self.rows
                .iter()
                .filter_map(|r| r.action.category_text.clone()),
        )
    }

    pub fn main_category_counts(&self) -> Vec<(MainCategory, usize)> {
        value_counts(self.rows.iter().map(|r| r.main_category))
    }

    pub fn topic_counts(&self) -> Vec<(Topic, usize)> {
        value_counts(self.rows.iter().filter_map(|r| r.topic))
    }

    pub fn monthly_counts(&self) -> Vec<(MonthYear, usize)> {
        let mut counts: BTreeMap<MonthYear, usize> = BTreeMap::new();
        for month in self.rows.iter().filter_map(|r| r.month_year) {
            *counts.entry(month).or_default() += 1;
        }
        counts.into_iter().collect()
    }

    pub fn report(&self) -> Report {
        let labelled = |counts: Vec<(String, usize)>| -> Vec<LabelCount> {
            counts
                .into_iter()
                .map(|(label, count)| LabelCount { label, count })
                .collect()
        };

        Report {
            total: self.len(),
            earliest: self.earliest().cloned(),
            most_recent: self.most_recent().cloned(),
            date_range: self.date_range().map(|(start, end)| DateRange { start, end }),
            categories: labelled(self.category_counts()),
            main_categories: labelled(
                self.main_category_counts()
                    .into_iter()
                    .map(|(c, n)| (c.to_string(), n))
                    .collect(),
            ),
            topics: labelled(
                self.topic_counts()
                    .into_iter()
                    .map(|(t, n)| (t.to_string(), n))
                    .collect(),
            ),
            monthly: self
                .monthly_counts()
                .into_iter()
                .map(|(month, count)| MonthCount { month, count })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthCount {
    pub month: MonthYear,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub total: usize,
    pub earliest: Option<EnforcementAction>,
    pub most_recent: Option<EnforcementAction>,
    pub date_range: Option<DateRange>,
    pub categories: Vec<LabelCount>,
    pub main_categories: Vec<LabelCount>,
    pub topics: Vec<LabelCount>,
    pub monthly: Vec<MonthCount>,
}

fn write_counts(f: &mut std::fmt::Formatter<'_>, counts: &[LabelCount]) -> std::fmt::Result {
    let width = counts.iter().map(|c| c.label.len()).max().unwrap_or(0);
    for c in counts {
        writeln!(f, "  {:<width$}  {:>5}", c.label, c.count)?;
    }
    Ok(())
}

impl Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rule = "=".repeat(70);
        let or_missing = |v: Option<&str>| v.unwrap_or("(missing)").to_string();

        writeln!(f, "Total enforcement actions: {}", self.total)?;

        if let Some(earliest) = &self.earliest {
            writeln!(f, "\nEarliest enforcement action:")?;
            writeln!(f, "  Date:     {}", or_missing(earliest.date_text.as_deref()))?;
            writeln!(f, "  Title:    {}", earliest.title)?;
            writeln!(
                f,
                "  Category: {}",
                or_missing(earliest.category_text.as_deref())
            )?;
            writeln!(f, "  Link:     {}", earliest.link)?;
        }
        if let Some(recent) = &self.most_recent {
            writeln!(f, "\nMost recent enforcement action:")?;
            writeln!(f, "  Date:     {}", or_missing(recent.date_text.as_deref()))?;
            writeln!(f, "  Title:    {}", recent.title)?;
        }

        writeln!(f, "\n{}", rule)?;
        match &self.date_range {
            Some(range) => writeln!(f, "Date range: {} to {}", range.start, range.end)?,
            None => writeln!(f, "Date range: no parseable dates")?,
        }

        writeln!(f, "\nCategory distribution:")?;
        write_counts(f, &self.categories)?;
        writeln!(f, "\nMain category classification:")?;
        write_counts(f, &self.main_categories)?;
        writeln!(f, "\nTopic classification (Criminal and Civil Actions only):")?;
        write_counts(f, &self.topics)?;

        writeln!(f, "\nMonthly aggregation:")?;
        writeln!(f, "  Number of months: {}", self.monthly.len())?;
        if let (Some(first), Some(last)) = (self.monthly.first(), self.monthly.last()) {
            writeln!(f, "  Month range: {} to {}", first.month, last.month)?;
        }
        write!(f, "{}", rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::write_actions;

    fn action(title: &str, date: Option<&str>, category: Option<&str>) -> EnforcementAction {
        EnforcementAction {
            title: title.to_string(),
            date_text: date.map(str::to_string),
            date_value: None,
            category_text: category.map(str::to_string),
            link: format!("https://oig.hhs.gov/fraud/enforcement/{}/", title.len()),
        }
    }

    #[test]
    fn test_main_category() {
        assert_eq!(
            main_category(Some("State Enforcement Agencies, Other")),
            MainCategory::StateEnforcementAgencies
        );
        assert_eq!(main_category(None), MainCategory::CriminalAndCivilActions);
        assert_eq!(
            main_category(Some("Criminal and Civil Actions")),
            MainCategory::CriminalAndCivilActions
        );
        assert_eq!(
            main_category(Some("state enforcement agencies")),
            MainCategory::CriminalAndCivilActions
        );
    }

    #[test]
    fn test_topic_first_match_wins() {
        assert_eq!(
            classify_topic(Some("Doctor Sentenced for Medicare Fraud and Bribery")),
            Topic::BriberyCorruption
        );
        assert_eq!(
            classify_topic(Some("Pharmacist Convicted in Opioid Scheme Billing Medicaid")),
            Topic::DrugEnforcement
        );
        assert_eq!(
            classify_topic(Some("Owner Pleads Guilty to Wire Fraud at Hospital")),
            Topic::FinancialFraud
        );
        assert_eq!(
            classify_topic(Some("HEALTH CARE Executive Charged")),
            Topic::HealthCareFraud
        );
        assert_eq!(
            classify_topic(Some("Man Sentenced for Identity Theft")),
            Topic::Other
        );
        assert_eq!(classify_topic(None), Topic::Other);
    }

    #[test]
    fn test_topic_only_for_criminal_and_civil() {
        let table = ClassifiedTable::from_actions(vec![
            action(
                "Medicaid Fraud Control Unit Recovers Funds",
                None,
                Some("State Enforcement Agencies"),
            ),
            action("Clinic Owner Accepts Kickbacks", None, None),
            action("", None, Some("Criminal and Civil Actions")),
        ]);

        assert_eq!(table.rows[0].topic, None);
        assert_eq!(table.rows[1].topic, Some(Topic::BriberyCorruption));
        assert_eq!(table.rows[2].topic, Some(Topic::Other));
        assert_eq!(
            table.topic_counts(),
            vec![(Topic::BriberyCorruption, 1), (Topic::Other, 1)]
        );
    }

    #[test]
    fn test_strict_date_parse_yields_null() {
        let table = ClassifiedTable::from_actions(vec![
            action("a", Some("January 5, 2024"), None),
            action("b", Some("2024-01-05"), None),
            action("c", None, None),
            action("d", Some("Feb 2, 2023"), None),
        ]);

        assert_eq!(table.rows[0].date, NaiveDate::from_ymd_opt(2024, 1, 5));
        assert_eq!(
            table.rows[0].month_year,
            Some(MonthYear { year: 2024, month: 1 })
        );
        assert_eq!(table.rows[1].date, None);
        assert_eq!(table.rows[1].month_year, None);
        assert_eq!(table.rows[2].month_year, None);
        assert_eq!(table.rows[3].date, None);
        assert_eq!(table.date_range().map(|(start, _)| start), table.rows[0].date);
        assert_eq!(table.monthly_counts().len(), 1);
    }

    #[test]
    fn test_monthly_counts_sorted_chronologically() {
        let mut actions = Vec::new();
        for day in 1..=5 {
            let text = format!("February {day}, 2024");
            actions.push(action("feb", Some(text.as_str()), None));
        }
        for day in 1..=3 {
            let text = format!("January {day}, 2024");
            actions.push(action("jan", Some(text.as_str()), None));
        }
        let table = ClassifiedTable::from_actions(actions);

        assert_eq!(
            table.monthly_counts(),
            vec![
                (MonthYear { year: 2024, month: 1 }, 3),
                (MonthYear { year: 2024, month: 2 }, 5),
            ]
        );
        assert_eq!(
            table.date_range(),
            Some((
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 2, 5).unwrap()
            ))
        );
    }

    #[test]
    fn test_distributions() {
        let table = ClassifiedTable::from_actions(vec![
            action("a", None, Some("Criminal and Civil Actions")),
            action("b", None, Some("State Enforcement Agencies")),
            action("c", None, Some("Criminal and Civil Actions")),
            action("d", None, None),
        ]);

        assert_eq!(
            table.category_counts(),
            vec![
                ("Criminal and Civil Actions".to_string(), 2),
                ("State Enforcement Agencies".to_string(), 1),
            ]
        );
        assert_eq!(
            table.main_category_counts(),
            vec![
                (MainCategory::CriminalAndCivilActions, 3),
                (MainCategory::StateEnforcementAgencies, 1),
            ]
        );
    }

    #[test]
    fn test_load_and_classify_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("enforcement_actions_2024_1.csv");
        let actions = vec![
            action(
                "Doctor Sentenced for Medicare Fraud and Bribery",
                Some("March 2, 2024"),
                Some("Criminal and Civil Actions"),
            ),
            action(
                "Quoted \"Title\", With Comma",
                Some("February 9, 2024"),
                None,
            ),
            action(
                "State MFCU Settles",
                Some("January 3, 2024"),
                Some("State Enforcement Agencies, Other"),
            ),
        ];
        write_actions(&path, &actions).unwrap();

        let table = load_and_classify(&path).expect("Failed to load");

        assert_eq!(table.len(), 3);
        for (row, original) in table.rows.iter().zip(&actions) {
            assert_eq!(row.action.title, original.title);
            assert_eq!(row.action.link, original.link);
        }
        assert_eq!(table.rows[0].topic, Some(Topic::BriberyCorruption));
        assert_eq!(
            table.rows[1].main_category,
            MainCategory::CriminalAndCivilActions
        );
        assert_eq!(
            table.rows[2].main_category,
            MainCategory::StateEnforcementAgencies
        );

        let report = table.report();
        assert_eq!(report.total, 3);
        assert_eq!(
            report.most_recent.as_ref().map(|a| a.title.as_str()),
            Some(actions[0].title.as_str())
        );
        assert_eq!(
            report.earliest.as_ref().map(|a| a.title.as_str()),
            Some("State MFCU Settles")
        );
        assert_eq!(report.monthly.len(), 3);
        assert!(report.to_string().contains("Number of months: 3"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_and_classify(dir.path().join("nope.csv")).expect_err("should fail");
        assert!(matches!(err, StorageError::NotFound(_)));
    }
}
