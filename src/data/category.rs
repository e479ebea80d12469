//! Category Classifier
//! Buckets a free-text major name into one of eight coarse fields.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse field of study.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[default]
    #[serde(rename = "Engineering & Technology")]
    EngineeringTechnology,
    #[serde(rename = "Business & Economics")]
    BusinessEconomics,
    #[serde(rename = "Sciences & Mathematics")]
    SciencesMathematics,
    #[serde(rename = "Health & Medicine")]
    HealthMedicine,
    #[serde(rename = "Education")]
    Education,
    #[serde(rename = "Arts & Communications")]
    ArtsCommunications,
    #[serde(rename = "Humanities & Social Sciences")]
    HumanitiesSocialSciences,
    #[serde(rename = "Other")]
    Other,
}

/// Keyword rules, evaluated top to bottom. The first rule with any substring
/// hit wins, so a name matching several buckets lands in the earliest one.
const RULES: &[(Category, &[&str])] = &[
    (
        Category::EngineeringTechnology,
        &["engineering", "computer", "information technology", "software"],
    ),
    (
        Category::BusinessEconomics,
        &["business", "economics", "finance", "accounting", "management", "marketing"],
    ),
    (
        Category::SciencesMathematics,
        &["biology", "chemistry", "physics", "science", "mathematics", "statistics"],
    ),
    (
        Category::HealthMedicine,
        &["nursing", "health", "medicine", "pharmacy", "therapy"],
    ),
    (Category::Education, &["education", "teaching"]),
    (
        Category::ArtsCommunications,
        &["art", "design", "music", "film", "media", "communication"],
    ),
    (
        Category::HumanitiesSocialSciences,
        &["history", "english", "literature", "language", "philosophy", "social"],
    ),
];

impl Category {
    /// All categories in classifier priority order.
    pub const ALL: [Category; 8] = [
        Category::EngineeringTechnology,
        Category::BusinessEconomics,
        Category::SciencesMathematics,
        Category::HealthMedicine,
        Category::Education,
        Category::ArtsCommunications,
        Category::HumanitiesSocialSciences,
        Category::Other,
    ];

    /// Classify a major by its name.
    pub fn classify(major: &str) -> Category {
        let major_lower = major.to_lowercase();

        RULES
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|kw| major_lower.contains(kw)))
            .map(|(category, _)| *category)
            .unwrap_or(Category::Other)
    }

    /// Display label, also used as the CSV value.
    pub fn label(&self) -> &'static str {
        match self {
            Category::EngineeringTechnology => "Engineering & Technology",
            Category::BusinessEconomics => "Business & Economics",
            Category::SciencesMathematics => "Sciences & Mathematics",
            Category::HealthMedicine => "Health & Medicine",
            Category::Education => "Education",
            Category::ArtsCommunications => "Arts & Communications",
            Category::HumanitiesSocialSciences => "Humanities & Social Sciences",
            Category::Other => "Other",
        }
    }

    /// Look up a category by its exact label.
    pub fn from_label(label: &str) -> Option<Category> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_each_bucket() {
        let cases = [
            ("Software Engineering", Category::EngineeringTechnology),
            ("Accounting", Category::BusinessEconomics),
            ("Applied Mathematics", Category::SciencesMathematics),
            ("Nursing", Category::HealthMedicine),
            ("Elementary Education", Category::Education),
            ("Graphic Design", Category::ArtsCommunications),
            ("Philosophy", Category::HumanitiesSocialSciences),
            ("Criminal Justice", Category::Other),
        ];
        for (major, expected) in cases {
            assert_eq!(Category::classify(major), expected, "{major}");
        }
    }

    #[test]
    fn earlier_rule_wins_on_overlap() {
        // "computer" (rule 1) beats "science" (rule 3)
        assert_eq!(Category::classify("Computer Science"), Category::EngineeringTechnology);
        // "management" (rule 2) beats "health" (rule 4)
        assert_eq!(Category::classify("Health Care Management"), Category::BusinessEconomics);
        // "art" inside "Art History" beats "history"
        assert_eq!(Category::classify("Art History"), Category::ArtsCommunications);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(Category::classify("MECHANICAL ENGINEERING"), Category::EngineeringTechnology);
    }

    #[test]
    fn classifier_is_deterministic() {
        let first = Category::classify("Music Therapy");
        for _ in 0..10 {
            assert_eq!(Category::classify("Music Therapy"), first);
        }
        assert_eq!(first, Category::HealthMedicine);
    }

    #[test]
    fn labels_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::from_label(category.label()), Some(category));
        }
        assert_eq!(Category::from_label("Astrology"), None);
    }

    #[test]
    fn default_is_engineering() {
        assert_eq!(Category::default(), Category::EngineeringTechnology);
    }

    #[test]
    fn serializes_as_label() {
        let json = serde_json::to_string(&Category::HealthMedicine).unwrap();
        assert_eq!(json, "\"Health & Medicine\"");
    }
}
