use std::fmt::Display;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

// Columns are `title,date,category,link`; `date_value` is never written out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnforcementAction {
    pub title: String,
    #[serde(rename = "date")]
    pub date_text: Option<String>,
    #[serde(skip)]
    pub date_value: Option<NaiveDate>,
    #[serde(rename = "category")]
    pub category_text: Option<String>,
    pub link: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum MainCategory {
    #[serde(rename = "State Enforcement Agencies")]
    StateEnforcementAgencies,
    #[serde(rename = "Criminal and Civil Actions")]
    CriminalAndCivilActions,
}

impl MainCategory {
    pub fn label(&self) -> &'static str {
        match self {
            MainCategory::StateEnforcementAgencies => "State Enforcement Agencies",
            MainCategory::CriminalAndCivilActions => "Criminal and Civil Actions",
        }
    }
}

impl Display for MainCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Topic {
    #[serde(rename = "Bribery/Corruption")]
    BriberyCorruption,
    #[serde(rename = "Drug Enforcement")]
    DrugEnforcement,
    #[serde(rename = "Financial Fraud")]
    FinancialFraud,
    #[serde(rename = "Health Care Fraud")]
    HealthCareFraud,
    Other,
}

impl Topic {
    pub fn label(&self) -> &'static str {
        match self {
            Topic::BriberyCorruption => "Bribery/Corruption",
            Topic::DrugEnforcement => "Drug Enforcement",
            Topic::FinancialFraud => "Financial Fraud",
            Topic::HealthCareFraud => "Health Care Fraud",
            Topic::Other => "Other",
        }
    }
}

impl Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthYear {
    pub year: i32,
    pub month: u32,
}

impl MonthYear {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl Display for MonthYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for MonthYear {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
