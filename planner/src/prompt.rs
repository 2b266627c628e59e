//! Prompt assembly for plan generation.
//!
//! The prompts pin down the itinerary output format so the cost summary
//! stays machine-parseable: per-item estimated costs and a closing block
//! with total, remaining budget, and utilization.

use tripcraft_knowledge::{KnowledgeRecord, RetrievedRecord};

use crate::plan::TripRequest;

/// Build the system instructions for the plan generator.
pub fn system_prompt(request: &TripRequest) -> String {
    format!(
        r#"You are an expert travel agent.
Create a detailed itinerary covering transportation to the destination
and accommodation for the whole stay.

Use the following format:

**Transportation:**
* [Flight/Train details] ([Estimated Cost: $xxx])

**Accommodation:**
* [Hotel details] ([Estimated Cost per night: $xxx])

**Day 1:**
* **Morning:** [Activity 1] ([Estimated Cost: $xx]) - [Brief Description]
* **Afternoon:** [Activity 2] ([Estimated Cost: $xx]) - [Brief Description]
* **Evening:** [Activity 3] ([Estimated Cost: $xx]) - [Brief Description]
* **Dinner:** [Restaurant Suggestion] ([Estimated Cost per person: $xx])

**Day 2:**
* ... and so on ...

Include transportation suggestions, estimated costs, and practical tips.
Consider the user's budget: {budget} {currency}

It's crucial that you provide specific cost estimations for EACH
item in the itinerary, including transportation, accommodation,
activities, meals, and shows. Do NOT use general price ranges
like "expensive" or "$$$" as these are not helpful for budget
planning. Instead, provide numerical estimates like "$25", "$150",
or "$40-$60".

At the end of the itinerary, please provide the following:
* **Total Estimated Cost:** $[total cost]
* **Remaining Budget:** $[remaining budget]
* **Budget Utilization:** [total cost]/[budget]"#,
        budget = request.budget,
        currency = request.currency,
    )
}

/// Build the user message: dates, preferences, interests, and retrieved
/// knowledge.
pub fn user_prompt(request: &TripRequest, knowledge_summary: &str) -> String {
    format!(
        "Plan a trip from {start} to {end}.\n\
         The traveler's preferences are: {preferences} and their interests include: {interests}.\n\n\
         Here's some relevant information about the destination:\n{knowledge_summary}",
        start = request.start_date,
        end = request.end_date,
        preferences = request.preferences,
        interests = request.interests.join(", "),
    )
}

/// Format retrieved records for inclusion in the generation prompt.
pub fn summarize_records(records: &[RetrievedRecord]) -> String {
    let mut summary = String::new();

    for retrieved in records {
        let record = &retrieved.record;
        let core = record.core();

        summary.push_str(&format!("**{}**\n", core.name));
        summary.push_str(&format!("Description: {}\n", core.description));

        if let Some(address) = &core.address {
            summary.push_str(&format!("Address: {address}\n"));
        }
        if let Some(website) = &core.website {
            summary.push_str(&format!("Website: {website}\n"));
        }
        match record {
            KnowledgeRecord::Restaurant {
                price_range: Some(price_range),
                ..
            }
            | KnowledgeRecord::Lodging {
                price_range: Some(price_range),
                ..
            } => {
                summary.push_str(&format!("Price range: {price_range}\n"));
            }
            KnowledgeRecord::Attraction { activities, .. } if !activities.is_empty() => {
                summary.push_str(&format!("Activities: {}\n", activities.join(", ")));
            }
            _ => {}
        }
        if !core.tips.is_empty() {
            summary.push_str("Tips:\n");
            summary.push_str(&core.tips.join("\n"));
            summary.push('\n');
        }

        summary.push('\n');
    }

    summary
}
