use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Course {
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    #[serde(flatten)]
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct College {
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// `Government` or `Private`.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(flatten)]
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TimelineEvent {
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    #[serde(default)]
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(flatten)]
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, Value>,
}

/// List payload, either a bare array or wrapped as `{ "data": [...] }`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Bare(Vec<T>),
    Wrapped { data: Vec<T> },
}

impl<T> Listing<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Listing::Bare(data) | Listing::Wrapped { data } => data,
        }
    }
}

/// Single-record payload, either bare or wrapped as `{ "data": {...} }`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Record<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Record<T> {
    pub fn into_inner(self) -> T {
        match self {
            Record::Wrapped { data } | Record::Bare(data) => data,
        }
    }
}

/// Query filters for `GET /api/courses`. Unset fields are not sent.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CourseFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

/// Query filters for `GET /api/colleges`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CollegeFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Query filters for `GET /api/timeline`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TimelineFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn college_type_maps_to_kind() {
        let parsed: College = serde_json::from_value(json!({
            "id": 1,
            "name": "Indian Institute of Technology Delhi",
            "location": "New Delhi, Delhi",
            "type": "Government",
            "rating": 4.8
        }))
        .unwrap();
        assert_eq!(parsed.kind.as_deref(), Some("Government"));
        assert_eq!(parsed.extra.get("rating"), Some(&json!(4.8)));
    }

    #[test]
    fn empty_filters_serialize_to_empty_object() {
        assert_eq!(
            serde_json::to_value(CourseFilters::default()).unwrap(),
            json!({})
        );
        let filters = CollegeFilters {
            kind: Some("Private".to_string()),
            ..CollegeFilters::default()
        };
        assert_eq!(serde_json::to_value(filters).unwrap(), json!({"type": "Private"}));
    }

    #[test]
    fn listings_accept_bare_and_wrapped_arrays() {
        let bare: Listing<String> = serde_json::from_value(json!(["Science", "Commerce"])).unwrap();
        assert_eq!(bare.into_vec(), vec!["Science", "Commerce"]);

        let wrapped: Listing<Course> = serde_json::from_value(json!({
            "success": true,
            "data": [{"_id": "c1", "name": "B.Tech Computer Science"}]
        }))
        .unwrap();
        let courses = wrapped.into_vec();
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].id, Some(json!("c1")));
    }

    #[test]
    fn records_unwrap_data_envelope() {
        let wrapped: Record<College> =
            serde_json::from_value(json!({"data": {"name": "NIT Trichy"}})).unwrap();
        assert_eq!(wrapped.into_inner().name, "NIT Trichy");

        let bare: Record<TimelineEvent> =
            serde_json::from_value(json!({"title": "JEE Main", "category": "exam"})).unwrap();
        assert_eq!(bare.into_inner().category.as_deref(), Some("exam"));
    }
}
