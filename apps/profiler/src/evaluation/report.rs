//! Interview evaluation report model.
//!
//! Model output is loosely typed: scores may arrive as numbers, numeric
//! strings or null, whole sections may be null, `"N/A"` or missing, and extra
//! keys appear. Any JSON object decodes: unusable values fall back to their
//! defaults, and unknown keys are preserved.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub const MIN_SCORE: f64 = 1.0;
pub const MAX_SCORE: f64 = 10.0;

/// Sections every prompt asks for. A reply without them still decodes.
pub const EXPECTED_SECTIONS: &[&str] = &["evaluation_summary", "detailed_scores"];

/// One weighted evaluation dimension and its sub-criteria.
#[derive(Debug, Clone, Copy)]
pub struct Category {
    pub key: &'static str,
    pub label: &'static str,
    pub weight: f64,
    /// `(key, label, question)` per sub-criterion.
    pub sub_criteria: &'static [(&'static str, &'static str, &'static str)],
}

pub const CATEGORIES: &[Category] = &[
    Category {
        key: "technical_competency",
        label: "TECHNICAL COMPETENCY",
        weight: 0.30,
        sub_criteria: &[
            ("depth_of_knowledge", "Depth of Knowledge", "How well does the candidate understand the technical concepts?"),
            ("problem_solving_approach", "Problem Solving", "How effectively do they approach and solve problems?"),
            ("technical_accuracy", "Technical Accuracy", "Are their technical explanations correct and precise?"),
            ("coding_skills", "Coding Skills", "If applicable, how are their programming/coding abilities?"),
            ("system_design_understanding", "System Design", "Do they understand system architecture and design principles?"),
        ],
    },
    Category {
        key: "communication_skills",
        label: "COMMUNICATION SKILLS",
        weight: 0.25,
        sub_criteria: &[
            ("clarity_of_expression", "Clarity of Expression", "How clearly do they communicate their thoughts?"),
            ("active_listening", "Active Listening", "Do they listen carefully and respond appropriately?"),
            ("question_asking_ability", "Question Asking", "Do they ask thoughtful, relevant questions?"),
            ("explanation_skills", "Explanation Skills", "Can they explain complex topics simply?"),
            ("confidence_level", "Confidence Level", "How confident and composed are they?"),
        ],
    },
    Category {
        key: "behavioral_traits",
        label: "BEHAVIORAL TRAITS",
        weight: 0.20,
        sub_criteria: &[
            ("cultural_fit", "Cultural Fit", "How well would they fit with the company culture?"),
            ("leadership_potential", "Leadership Potential", "Do they show leadership qualities?"),
            ("teamwork_orientation", "Teamwork Orientation", "Do they demonstrate collaborative skills?"),
            ("adaptability", "Adaptability", "How well do they handle unexpected questions or scenarios?"),
            ("initiative_taking", "Initiative Taking", "Do they show proactiveness and initiative?"),
        ],
    },
    Category {
        key: "domain_expertise",
        label: "DOMAIN EXPERTISE",
        weight: 0.15,
        sub_criteria: &[
            ("industry_knowledge", "Industry Knowledge", "How well do they understand the industry?"),
            ("relevant_experience", "Relevant Experience", "Is their experience relevant to the role?"),
            ("best_practices_awareness", "Best Practices", "Are they aware of industry best practices?"),
            ("trends_understanding", "Trends Understanding", "Do they understand current industry trends?"),
        ],
    },
    Category {
        key: "overall_performance",
        label: "OVERALL PERFORMANCE",
        weight: 0.10,
        sub_criteria: &[
            ("interview_preparedness", "Interview Preparedness", "How well prepared were they?"),
            ("professionalism", "Professionalism", "Did they maintain professional demeanor?"),
            ("enthusiasm", "Enthusiasm", "How enthusiastic are they about the role?"),
            ("time_management", "Time Management", "Did they manage time effectively during responses?"),
        ],
    },
];

// ────────────────────────────────────────────────────────────────────────────
// Report types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    #[serde(default, deserialize_with = "lenient_section")]
    pub evaluation_summary: EvaluationSummary,
    #[serde(default, deserialize_with = "lenient_section")]
    pub detailed_scores: DetailedScores,
    #[serde(default, deserialize_with = "lenient_text_list")]
    pub strengths: Vec<String>,
    #[serde(default, deserialize_with = "lenient_text_list")]
    pub areas_for_improvement: Vec<String>,
    #[serde(default, deserialize_with = "lenient_text_list")]
    pub specific_examples: Vec<String>,
    #[serde(default, deserialize_with = "lenient_text_list")]
    pub follow_up_questions: Vec<String>,
    #[serde(default, deserialize_with = "lenient_section")]
    pub evaluation_metadata: EvaluationMetadata,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSummary {
    #[serde(default, deserialize_with = "lenient_score")]
    pub overall_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub overall_rating: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub recommendation: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub summary_feedback: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetailedScores {
    #[serde(default, deserialize_with = "lenient_section")]
    pub technical_competency: CategoryScores,
    #[serde(default, deserialize_with = "lenient_section")]
    pub communication_skills: CategoryScores,
    #[serde(default, deserialize_with = "lenient_section")]
    pub behavioral_traits: CategoryScores,
    #[serde(default, deserialize_with = "lenient_section")]
    pub domain_expertise: CategoryScores,
    #[serde(default, deserialize_with = "lenient_section")]
    pub overall_performance: CategoryScores,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Scores for one category. Sub-scores are kept as the model sent them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryScores {
    #[serde(default, deserialize_with = "lenient_score")]
    pub overall_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub feedback: String,
    #[serde(flatten)]
    pub sub_scores: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationMetadata {
    #[serde(default, deserialize_with = "lenient_text")]
    pub evaluated_by: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub evaluation_date: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub evaluation_version: String,
    #[serde(default, deserialize_with = "lenient_score")]
    pub job_relevance_score: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CategoryScores {
    pub fn sub_score(&self, key: &str) -> Option<f64> {
        self.sub_scores.get(key).and_then(score_of)
    }
}

impl DetailedScores {
    pub fn category(&self, key: &str) -> Option<&CategoryScores> {
        match key {
            "technical_competency" => Some(&self.technical_competency),
            "communication_skills" => Some(&self.communication_skills),
            "behavioral_traits" => Some(&self.behavioral_traits),
            "domain_expertise" => Some(&self.domain_expertise),
            "overall_performance" => Some(&self.overall_performance),
            _ => None,
        }
    }
}

impl EvaluationReport {
    /// Category-weighted overall score.
    ///
    /// Categories without an `overall_score` are left out and the remaining
    /// weights renormalized. `None` when no category is scored.
    pub fn weighted_score(&self) -> Option<f64> {
        let (sum, weight) = CATEGORIES
            .iter()
            .filter_map(|category| {
                let score = self.detailed_scores.category(category.key)?.overall_score?;
                Some((score * category.weight, category.weight))
            })
            .fold((0.0, 0.0), |(s, w), (ds, dw)| (s + ds, w + dw));

        (weight > 0.0).then(|| sum / weight)
    }

    /// Every numeric score outside `[MIN_SCORE, MAX_SCORE]`, by dotted path.
    pub fn out_of_range_scores(&self) -> Vec<(String, f64)> {
        let mut scores = Vec::new();
        let mut check = |path: String, score: Option<f64>| {
            if let Some(score) = score.filter(|s| !(MIN_SCORE..=MAX_SCORE).contains(s)) {
                scores.push((path, score));
            }
        };

        check(
            "evaluation_summary.overall_score".to_string(),
            self.evaluation_summary.overall_score,
        );
        for category in CATEGORIES {
            let Some(category_scores) = self.detailed_scores.category(category.key) else {
                continue;
            };
            check(
                format!("detailed_scores.{}.overall_score", category.key),
                category_scores.overall_score,
            );
            for key in category_scores.sub_scores.keys() {
                check(
                    format!("detailed_scores.{}.{key}", category.key),
                    category_scores.sub_score(key),
                );
            }
        }
        check(
            "evaluation_metadata.job_relevance_score".to_string(),
            self.evaluation_metadata.job_relevance_score,
        );
        scores
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Lenient field decoding
// ────────────────────────────────────────────────────────────────────────────

fn score_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Expected sections that are absent from `reply` or not objects.
pub fn missing_sections(reply: &Value) -> Vec<&'static str> {
    EXPECTED_SECTIONS
        .iter()
        .copied()
        .filter(|key| !reply.get(*key).is_some_and(Value::is_object))
        .collect()
}

/// Decodes an object section; null, `"N/A"` text or any other non-object
/// value yields the section's default.
fn lenient_section<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => Ok(serde_json::from_value(value).unwrap_or_default()),
        _ => Ok(T::default()),
    }
}

fn lenient_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(score_of(&value))
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

fn lenient_text_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        single => vec![single],
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::Null => None,
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn report(value: Value) -> EvaluationReport {
        serde_json::from_value(value).unwrap()
    }

    fn category(score: Value) -> Value {
        json!({"overall_score": score, "feedback": "ok"})
    }

    #[test]
    fn test_weights_sum_to_one() {
        let total: f64 = CATEGORIES.iter().map(|c| c.weight).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_lenient_scores_and_text() {
        let r = report(json!({
            "evaluation_summary": {"overall_score": "7", "overall_rating": "Good", "recommendation": null},
            "detailed_scores": {
                "technical_competency": {"overall_score": 8.5, "depth_of_knowledge": "9", "feedback": "solid"}
            },
            "strengths": ["Clear", 42, null],
            "follow_up_questions": "Ask about testing"
        }));

        assert_eq!(r.evaluation_summary.overall_score, Some(7.0));
        assert_eq!(r.evaluation_summary.recommendation, "");
        assert_eq!(r.detailed_scores.technical_competency.overall_score, Some(8.5));
        assert_eq!(r.detailed_scores.technical_competency.sub_score("depth_of_knowledge"), Some(9.0));
        assert_eq!(r.strengths, vec!["Clear", "42"]);
        assert_eq!(r.follow_up_questions, vec!["Ask about testing"]);
        assert!(r.evaluation_metadata.evaluated_by.is_empty());
    }

    #[test]
    fn test_missing_sections_default() {
        let value = json!({"detailed_scores": {}});
        let r = report(value.clone());
        assert_eq!(r.evaluation_summary, EvaluationSummary::default());
        assert_eq!(missing_sections(&value), vec!["evaluation_summary"]);
        assert!(missing_sections(&json!({"evaluation_summary": {}, "detailed_scores": {}})).is_empty());
    }

    #[test]
    fn test_null_and_text_sections_default() {
        let r = report(json!({
            "evaluation_summary": "N/A",
            "detailed_scores": {
                "technical_competency": {"overall_score": 8},
                "domain_expertise": null,
                "behavioral_traits": "not assessed"
            },
            "evaluation_metadata": null
        }));
        assert_eq!(r.evaluation_summary, EvaluationSummary::default());
        assert_eq!(r.detailed_scores.technical_competency.overall_score, Some(8.0));
        assert_eq!(r.detailed_scores.domain_expertise, CategoryScores::default());
        assert_eq!(r.detailed_scores.behavioral_traits, CategoryScores::default());
        assert_eq!(r.evaluation_metadata, EvaluationMetadata::default());
        assert_eq!(missing_sections(&json!({"evaluation_summary": "N/A"})).len(), 2);
    }

    #[test]
    fn test_unknown_keys_are_preserved() {
        let r = report(json!({
            "evaluation_summary": {},
            "detailed_scores": {},
            "red_flags": ["none observed"]
        }));
        assert_eq!(r.extra.get("red_flags"), Some(&json!(["none observed"])));

        let round = serde_json::to_value(&r).unwrap();
        assert_eq!(round["red_flags"], json!(["none observed"]));
    }

    #[test]
    fn test_weighted_score_renormalizes_missing_categories() {
        let r = report(json!({
            "evaluation_summary": {},
            "detailed_scores": {
                "technical_competency": category(json!(8)),
                "communication_skills": category(json!(6)),
                "behavioral_traits": category(Value::Null)
            }
        }));
        // (8 * 0.30 + 6 * 0.25) / 0.55
        let expected = (8.0 * 0.30 + 6.0 * 0.25) / 0.55;
        assert!((r.weighted_score().unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_weighted_score_none_without_scores() {
        let r = report(json!({"evaluation_summary": {}, "detailed_scores": {}}));
        assert_eq!(r.weighted_score(), None);
    }

    #[test]
    fn test_out_of_range_scores_are_listed() {
        let r = report(json!({
            "evaluation_summary": {"overall_score": 12},
            "detailed_scores": {
                "domain_expertise": {"overall_score": 5, "industry_knowledge": 0}
            },
            "evaluation_metadata": {"job_relevance_score": 7}
        }));

        assert_eq!(
            r.out_of_range_scores(),
            vec![
                ("evaluation_summary.overall_score".to_string(), 12.0),
                ("detailed_scores.domain_expertise.industry_knowledge".to_string(), 0.0),
            ]
        );
    }
}
