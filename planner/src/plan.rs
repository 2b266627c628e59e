//! Trip request and plan types, plus itinerary parsing.

use chrono::NaiveDate;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{PlannerError, Result};

/// Warning flag set when the generated text has no parseable cost total.
pub const WARN_UNPARSED_COST: &str = "unparsed cost summary";

/// User-supplied parameters for a trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripRequest {
    /// First day of the trip.
    pub start_date: NaiveDate,

    /// Last day of the trip.
    pub end_date: NaiveDate,

    /// Total budget.
    pub budget: f64,

    /// Currency tag for the budget, e.g. "USD".
    pub currency: String,

    /// Free-text preferences.
    pub preferences: String,

    /// Interest tags, e.g. "museums".
    pub interests: Vec<String>,
}

impl TripRequest {
    /// Create a request with a USD budget.
    pub fn new(
        start_date: NaiveDate,
        end_date: NaiveDate,
        budget: f64,
        preferences: impl Into<String>,
        interests: Vec<String>,
    ) -> Self {
        Self {
            start_date,
            end_date,
            budget,
            currency: "USD".to_string(),
            preferences: preferences.into(),
            interests,
        }
    }

    /// Validate the request before planning.
    pub fn validate(&self) -> Result<()> {
        if self.preferences.trim().is_empty() {
            return Err(PlannerError::InvalidRequest(
                "preferences must not be empty".to_string(),
            ));
        }
        if self.budget <= 0.0 {
            return Err(PlannerError::InvalidRequest(format!(
                "budget must be positive, got {}",
                self.budget
            )));
        }
        if self.end_date < self.start_date {
            return Err(PlannerError::InvalidRequest(format!(
                "end date {} is before start date {}",
                self.end_date, self.start_date
            )));
        }
        Ok(())
    }

    /// Trip length in days.
    pub fn num_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }

    /// The retrieval query: preferences concatenated with interest tags.
    pub fn retrieval_query(&self) -> String {
        if self.interests.is_empty() {
            self.preferences.clone()
        } else {
            format!("{} {}", self.preferences, self.interests.join(", "))
        }
    }
}

/// Derived cost figures parsed from the generated itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostSummary {
    /// Total estimated cost reported by the generator.
    pub total_estimated: f64,

    /// Budget minus total estimated cost.
    pub remaining_budget: f64,

    /// Spent over budget, 0.0..=1.0 when within budget.
    pub utilization: f64,
}

/// One heading-delimited section of the itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItinerarySection {
    /// Section heading, e.g. "Transportation" or "Day 2".
    pub heading: String,

    /// Section body text.
    pub body: String,
}

/// A generated trip plan. Ephemeral: produced per request, not persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripPlan {
    /// The full generated itinerary text.
    pub itinerary: String,

    /// Heading-delimited sections parsed from the itinerary.
    pub sections: Vec<ItinerarySection>,

    /// Cost figures, when a total-cost line was found.
    pub cost: Option<CostSummary>,

    /// Degradation flags, e.g. [`WARN_UNPARSED_COST`].
    pub warnings: Vec<String>,
}

impl TripPlan {
    /// Build a plan from generated text and the request's budget.
    ///
    /// A missing or unparseable total-cost line degrades to a flagged
    /// raw-text result instead of an error: availability wins over
    /// strict structure here.
    pub fn from_generated(itinerary: String, budget: f64) -> Self {
        let sections = split_sections(&itinerary);
        let mut warnings = Vec::new();

        let cost = match parse_total_cost(&itinerary) {
            Some(total_estimated) => Some(CostSummary {
                total_estimated,
                remaining_budget: budget - total_estimated,
                utilization: total_estimated / budget,
            }),
            None => {
                warn!("generated itinerary has no parseable total cost line");
                warnings.push(WARN_UNPARSED_COST.to_string());
                None
            }
        };

        Self {
            itinerary,
            sections,
            cost,
            warnings,
        }
    }
}

/// Extract the "Total Estimated Cost" figure from generated text.
fn parse_total_cost(text: &str) -> Option<f64> {
    // Tolerates markdown emphasis around the label and commas in the
    // figure, e.g. "**Total Estimated Cost:** $3,450.50".
    let re = Regex::new(r"Total Estimated Cost[:\*\s]*\$\s*([0-9][0-9,]*(?:\.[0-9]+)?)").ok()?;
    let captures = re.captures(text)?;
    captures.get(1)?.as_str().replace(',', "").parse().ok()
}

/// Split generated text on itinerary headings.
///
/// Recognized headings are `Transportation:`, `Accommodation:`, and
/// `Day N:`, optionally wrapped in markdown emphasis. Text before the
/// first heading is dropped, matching the expected output format.
fn split_sections(text: &str) -> Vec<ItinerarySection> {
    let re = match Regex::new(r"(?m)^\s*\**(Transportation|Accommodation|Day\s*[0-9]+)\**:\**") {
        Ok(re) => re,
        Err(_) => return Vec::new(),
    };

    let matches: Vec<(usize, usize, String)> = re
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let heading = caps.get(1)?.as_str().to_string();
            Some((whole.start(), whole.end(), heading))
        })
        .collect();

    let mut sections = Vec::with_capacity(matches.len());
    for (i, (_, body_start, heading)) in matches.iter().enumerate() {
        let body_end = matches.get(i + 1).map_or(text.len(), |next| next.0);
        let body = text[*body_start..body_end].trim().to_string();
        sections.push(ItinerarySection {
            heading: heading.clone(),
            body,
        });
    }

    sections
}
