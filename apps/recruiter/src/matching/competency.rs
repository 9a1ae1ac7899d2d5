//! Competency model: the structured breakdown of a job's required skills,
//! desirable skills and per-skill synonyms.
//!
//! The model arrives from the LLM as loosely-typed JSON. It is validated once,
//! here, and every missing or mistyped part collapses to an empty collection.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

const REQUIRED_KEYS: &[&str] = &["obrigatorias", "required"];
const DESIRABLE_KEYS: &[&str] = &["desejaveis", "desirable"];
const SYNONYM_KEYS: &[&str] = &["sinonimos", "synonyms"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct CompetencyModel {
    /// Essential skills, in priority order.
    #[serde(rename = "obrigatorias")]
    pub required: Vec<String>,
    /// Secondary skills and traits. Duplicates are dropped on construction.
    #[serde(rename = "desejaveis")]
    pub desirable: Vec<String>,
    /// Related terms for a required skill. Keys are not guaranteed to cover
    /// (or even belong to) `required`.
    #[serde(rename = "sinonimos")]
    pub synonyms: BTreeMap<String, Vec<String>>,
}

impl CompetencyModel {
    pub fn new(
        required: Vec<String>,
        desirable: Vec<String>,
        synonyms: BTreeMap<String, Vec<String>>,
    ) -> Self {
        Self {
            required: clean_list(required),
            desirable: dedup_preserving_order(clean_list(desirable)),
            synonyms: synonyms
                .into_iter()
                .filter(|(skill, _)| !skill.trim().is_empty())
                .map(|(skill, terms)| (skill, clean_list(terms)))
                .collect(),
        }
    }

    /// Builds a model from arbitrary JSON. Never fails: a non-object value
    /// yields the empty model.
    pub fn from_value(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::default();
        };

        let required = lookup(object, REQUIRED_KEYS)
            .map(string_list)
            .unwrap_or_default();
        let desirable = lookup(object, DESIRABLE_KEYS)
            .map(string_list)
            .unwrap_or_default();
        let synonyms = lookup(object, SYNONYM_KEYS)
            .and_then(Value::as_object)
            .map(|groups| {
                groups
                    .iter()
                    .map(|(skill, terms)| (skill.clone(), string_list(terms)))
                    .collect()
            })
            .unwrap_or_default();

        Self::new(required, desirable, synonyms)
    }

    pub fn is_empty(&self) -> bool {
        self.required.is_empty() && self.desirable.is_empty() && self.synonyms.is_empty()
    }

    /// Required skills that have no synonym group.
    pub fn unlisted_required(&self) -> impl Iterator<Item = &str> {
        self.required
            .iter()
            .filter(|skill| !self.synonyms.contains_key(skill.as_str()))
            .map(String::as_str)
    }
}

impl From<Value> for CompetencyModel {
    fn from(value: Value) -> Self {
        Self::from_value(&value)
    }
}

fn lookup<'a>(object: &'a serde_json::Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| object.get(*key))
}

/// Non-string elements are skipped; a non-array value is an empty list.
fn string_list(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Blank strings would match every candidate text, so they are removed.
/// This departs from the established scores on purpose: `""` used to earn
/// its points for every candidate and `" "` for any text with a space.
fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .filter(|item| !item.trim().is_empty())
        .collect()
}

fn dedup_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_model_deserializes_from_wire_keys() {
        let json = r#"{
            "obrigatorias": ["Python", "Django", "AWS"],
            "desejaveis": ["React", "Docker"],
            "sinonimos": {
                "Python": ["Pandas", "Numpy", "Flask"],
                "AWS": ["EC2", "S3", "Lambda"]
            }
        }"#;

        let model: CompetencyModel = serde_json::from_str(json).unwrap();
        assert_eq!(model.required, vec!["Python", "Django", "AWS"]);
        assert_eq!(model.desirable, vec!["React", "Docker"]);
        assert_eq!(model.synonyms["AWS"], vec!["EC2", "S3", "Lambda"]);
        assert!(!model.synonyms.contains_key("Django"));
    }

    #[test]
    fn test_english_keys_are_accepted() {
        let model = CompetencyModel::from_value(&json!({
            "required": ["Rust"],
            "desirable": ["Kafka"],
            "synonyms": {"Rust": ["Tokio"]}
        }));
        assert_eq!(model.required, vec!["Rust"]);
        assert_eq!(model.desirable, vec!["Kafka"]);
        assert_eq!(model.synonyms["Rust"], vec!["Tokio"]);
    }

    #[test]
    fn test_missing_keys_become_empty_collections() {
        let model = CompetencyModel::from_value(&json!({"obrigatorias": ["Go"]}));
        assert_eq!(model.required, vec!["Go"]);
        assert!(model.desirable.is_empty());
        assert!(model.synonyms.is_empty());
    }

    #[test]
    fn test_wrong_types_become_empty_collections() {
        let model = CompetencyModel::from_value(&json!({
            "obrigatorias": "Python",
            "desejaveis": {"a": 1},
            "sinonimos": ["Flask"]
        }));
        assert!(model.is_empty());
    }

    #[test]
    fn test_non_object_value_is_empty_model() {
        assert!(CompetencyModel::from_value(&json!([1, 2, 3])).is_empty());
        assert!(CompetencyModel::from_value(&Value::Null).is_empty());
    }

    #[test]
    fn test_non_string_and_blank_entries_are_skipped() {
        let model = CompetencyModel::from_value(&json!({
            "obrigatorias": ["Java", 42, null, "  "],
            "sinonimos": {"Java": ["Spring", "", true], "": ["ghost"]}
        }));
        assert_eq!(model.required, vec!["Java"]);
        assert_eq!(model.synonyms.len(), 1);
        assert_eq!(model.synonyms["Java"], vec!["Spring"]);
    }

    #[test]
    fn test_blank_and_whitespace_skills_never_score() {
        use crate::matching::scorer::HybridScorer;

        let model = CompetencyModel::from_value(&json!({
            "obrigatorias": [" "],
            "desejaveis": ["", " "],
            "sinonimos": {" ": ["", " "]}
        }));
        assert!(model.is_empty());
        assert_eq!(HybridScorer::default().score("a b", Some(&model)), 0);
    }

    #[test]
    fn test_desirable_duplicates_are_dropped_in_order() {
        let model = CompetencyModel::from_value(&json!({
            "desejaveis": ["Docker", "Scrum", "Docker", "Kubernetes"]
        }));
        assert_eq!(model.desirable, vec!["Docker", "Scrum", "Kubernetes"]);
    }

    #[test]
    fn test_serializes_with_wire_keys() {
        let model = CompetencyModel::from_value(&json!({
            "obrigatorias": ["SQL"],
            "sinonimos": {"SQL": ["PostgreSQL"]}
        }));
        let value = serde_json::to_value(&model).unwrap();
        assert_eq!(value["obrigatorias"], json!(["SQL"]));
        assert_eq!(value["desejaveis"], json!([]));
        assert_eq!(value["sinonimos"]["SQL"], json!(["PostgreSQL"]));
    }

    #[test]
    fn test_unlisted_required_lists_skills_without_synonyms() {
        let model = CompetencyModel::from_value(&json!({
            "obrigatorias": ["Python", "SQL", "AWS"],
            "sinonimos": {"Python": ["Flask"]}
        }));
        let unlisted: Vec<&str> = model.unlisted_required().collect();
        assert_eq!(unlisted, vec!["SQL", "AWS"]);
    }
}
