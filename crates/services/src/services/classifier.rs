//! Keyword-based task location classifier.
//!
//! Rules are data, not code: each rule maps a keyword to a location with a
//! weight, so the table can be extended and unit-tested without touching the
//! classification logic.

use db::models::task::Task;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use ts_rs::TS;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, EnumString, Display, Hash,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TaskLocation {
    Indoor,
    Outdoor,
    Flexible,
}

#[derive(Debug, Clone, Copy)]
pub struct LocationRule {
    pub keyword: &'static str,
    pub location: TaskLocation,
    pub weight: u32,
}

const fn rule(keyword: &'static str, location: TaskLocation) -> LocationRule {
    LocationRule {
        keyword,
        location,
        weight: 1,
    }
}

/// Declarative rule table. Matching is lower-cased substring containment.
pub const LOCATION_RULES: &[LocationRule] = &[
    // Outdoor
    rule("walk", TaskLocation::Outdoor),
    rule("run", TaskLocation::Outdoor),
    rule("jog", TaskLocation::Outdoor),
    rule("hike", TaskLocation::Outdoor),
    rule("bike", TaskLocation::Outdoor),
    rule("cycle", TaskLocation::Outdoor),
    rule("drive", TaskLocation::Outdoor),
    rule("travel", TaskLocation::Outdoor),
    rule("garden", TaskLocation::Outdoor),
    rule("yard", TaskLocation::Outdoor),
    rule("lawn", TaskLocation::Outdoor),
    rule("plant", TaskLocation::Outdoor),
    rule("outdoor", TaskLocation::Outdoor),
    rule("outside", TaskLocation::Outdoor),
    rule("patio", TaskLocation::Outdoor),
    rule("park", TaskLocation::Outdoor),
    rule("beach", TaskLocation::Outdoor),
    rule("pool", TaskLocation::Outdoor),
    rule("swim", TaskLocation::Outdoor),
    rule("tennis", TaskLocation::Outdoor),
    rule("golf", TaskLocation::Outdoor),
    rule("soccer", TaskLocation::Outdoor),
    rule("football", TaskLocation::Outdoor),
    rule("basketball", TaskLocation::Outdoor),
    rule("volleyball", TaskLocation::Outdoor),
    rule("baseball", TaskLocation::Outdoor),
    rule("cricket", TaskLocation::Outdoor),
    rule("hockey", TaskLocation::Outdoor),
    rule("skate", TaskLocation::Outdoor),
    rule("surf", TaskLocation::Outdoor),
    rule("kayak", TaskLocation::Outdoor),
    rule("canoe", TaskLocation::Outdoor),
    rule("fishing", TaskLocation::Outdoor),
    rule("camping", TaskLocation::Outdoor),
    rule("picnic", TaskLocation::Outdoor),
    rule("bbq", TaskLocation::Outdoor),
    rule("grill", TaskLocation::Outdoor),
    rule("street", TaskLocation::Outdoor),
    rule("sidewalk", TaskLocation::Outdoor),
    rule("construction", TaskLocation::Outdoor),
    rule("landscaping", TaskLocation::Outdoor),
    rule("roof", TaskLocation::Outdoor),
    rule("exterior", TaskLocation::Outdoor),
    rule("festival", TaskLocation::Outdoor),
    rule("concert", TaskLocation::Outdoor),
    rule("market", TaskLocation::Outdoor),
    rule("terrace", TaskLocation::Outdoor),
    rule("balcony", TaskLocation::Outdoor),
    rule("delivery", TaskLocation::Outdoor),
    rule("pickup", TaskLocation::Outdoor),
    rule("errand", TaskLocation::Outdoor),
    rule("visit", TaskLocation::Outdoor),
    rule("appointment", TaskLocation::Outdoor),
    rule("outdoor meeting", TaskLocation::Outdoor),
    rule("outdoor event", TaskLocation::Outdoor),
    rule("outdoor dining", TaskLocation::Outdoor),
    rule("shopping mall", TaskLocation::Outdoor),
    // Indoor
    rule("desk", TaskLocation::Indoor),
    rule("computer", TaskLocation::Indoor),
    rule("laptop", TaskLocation::Indoor),
    rule("office", TaskLocation::Indoor),
    rule("home", TaskLocation::Indoor),
    rule("indoor", TaskLocation::Indoor),
    rule("inside", TaskLocation::Indoor),
    rule("conference", TaskLocation::Indoor),
    rule("conference room", TaskLocation::Indoor),
    rule("meeting room", TaskLocation::Indoor),
    rule("call", TaskLocation::Indoor),
    rule("video call", TaskLocation::Indoor),
    rule("zoom", TaskLocation::Indoor),
    rule("teams", TaskLocation::Indoor),
    rule("email", TaskLocation::Indoor),
    rule("document", TaskLocation::Indoor),
    rule("report", TaskLocation::Indoor),
    rule("analysis", TaskLocation::Indoor),
    rule("research", TaskLocation::Indoor),
    rule("study", TaskLocation::Indoor),
    rule("read", TaskLocation::Indoor),
    rule("write", TaskLocation::Indoor),
    rule("code", TaskLocation::Indoor),
    rule("programming", TaskLocation::Indoor),
    rule("development", TaskLocation::Indoor),
    rule("design", TaskLocation::Indoor),
    rule("planning", TaskLocation::Indoor),
    rule("strategy", TaskLocation::Indoor),
    rule("budget", TaskLocation::Indoor),
    rule("finance", TaskLocation::Indoor),
    rule("accounting", TaskLocation::Indoor),
    rule("admin", TaskLocation::Indoor),
    rule("kitchen", TaskLocation::Indoor),
    rule("cooking", TaskLocation::Indoor),
    rule("baking", TaskLocation::Indoor),
    rule("cleaning", TaskLocation::Indoor),
    rule("laundry", TaskLocation::Indoor),
    rule("organize", TaskLocation::Indoor),
    rule("library", TaskLocation::Indoor),
    rule("classroom", TaskLocation::Indoor),
    rule("training", TaskLocation::Indoor),
    rule("workshop", TaskLocation::Indoor),
    rule("presentation", TaskLocation::Indoor),
    rule("gym", TaskLocation::Indoor),
    rule("workout", TaskLocation::Indoor),
    rule("exercise", TaskLocation::Indoor),
    rule("yoga", TaskLocation::Indoor),
    rule("meditation", TaskLocation::Indoor),
    rule("therapy", TaskLocation::Indoor),
    rule("doctor", TaskLocation::Indoor),
    rule("dentist", TaskLocation::Indoor),
    rule("hospital", TaskLocation::Indoor),
    rule("clinic", TaskLocation::Indoor),
    rule("pharmacy", TaskLocation::Indoor),
    rule("bank", TaskLocation::Indoor),
    rule("store", TaskLocation::Indoor),
    rule("shop", TaskLocation::Indoor),
    rule("restaurant", TaskLocation::Indoor),
    rule("cafe", TaskLocation::Indoor),
    rule("theater", TaskLocation::Indoor),
    rule("cinema", TaskLocation::Indoor),
    rule("museum", TaskLocation::Indoor),
    rule("gallery", TaskLocation::Indoor),
    rule("exhibition", TaskLocation::Indoor),
    rule("boardroom", TaskLocation::Indoor),
];

/// Classify free text as indoor, outdoor, or flexible.
///
/// Total and deterministic: outdoor-only matches → outdoor, indoor-only →
/// indoor, both → flexible, neither → indoor.
pub fn classify(text: &str) -> TaskLocation {
    let text = text.to_lowercase();

    let mut indoor_score = 0u32;
    let mut outdoor_score = 0u32;
    for rule in LOCATION_RULES {
        if text.contains(rule.keyword) {
            match rule.location {
                TaskLocation::Indoor => indoor_score += rule.weight,
                TaskLocation::Outdoor => outdoor_score += rule.weight,
                TaskLocation::Flexible => {}
            }
        }
    }

    match (indoor_score > 0, outdoor_score > 0) {
        (false, true) => TaskLocation::Outdoor,
        (true, false) => TaskLocation::Indoor,
        (true, true) => TaskLocation::Flexible,
        (false, false) => TaskLocation::Indoor,
    }
}

pub fn classify_task(task: &Task) -> TaskLocation {
    classify(&format!("{} {}", task.name, task.description))
}

/// Task list bucketed by location category.
#[derive(Debug, Default)]
pub struct CategorizedTasks<'a> {
    pub indoor: Vec<&'a Task>,
    pub outdoor: Vec<&'a Task>,
    pub flexible: Vec<&'a Task>,
}

pub fn categorize(tasks: &[Task]) -> CategorizedTasks<'_> {
    let mut buckets = CategorizedTasks::default();
    for task in tasks {
        match classify_task(task) {
            TaskLocation::Indoor => buckets.indoor.push(task),
            TaskLocation::Outdoor => buckets.outdoor.push(task),
            TaskLocation::Flexible => buckets.flexible.push(task),
        }
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outdoor_only_text_is_outdoor() {
        assert_eq!(classify("Walk the dog"), TaskLocation::Outdoor);
        assert_eq!(classify("mow the lawn"), TaskLocation::Outdoor);
    }

    #[test]
    fn indoor_only_text_is_indoor() {
        assert_eq!(classify("Write the quarterly report"), TaskLocation::Indoor);
        assert_eq!(classify("zoom standup"), TaskLocation::Indoor);
    }

    #[test]
    fn mixed_text_is_flexible() {
        assert_eq!(classify("walk to the office"), TaskLocation::Flexible);
    }

    #[test]
    fn multi_word_keywords_match_as_phrases() {
        // "shopping mall" is an outdoor keyword while "shop" alone is
        // indoor, so the phrase tips the text to flexible.
        assert_eq!(classify("go to the shopping mall"), TaskLocation::Flexible);
        assert_eq!(classify("book the meeting room"), TaskLocation::Indoor);
        assert_eq!(classify("outdoor dining with friends"), TaskLocation::Outdoor);
    }

    #[test]
    fn unmatched_text_defaults_to_indoor() {
        assert_eq!(classify("xyzzy"), TaskLocation::Indoor);
        assert_eq!(classify(""), TaskLocation::Indoor);
    }

    #[test]
    fn classification_is_case_insensitive_and_deterministic() {
        assert_eq!(classify("WALK THE DOG"), classify("walk the dog"));
        for _ in 0..3 {
            assert_eq!(classify("walk the dog"), TaskLocation::Outdoor);
        }
    }
}
