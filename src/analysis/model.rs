//! Wire types for the analysis endpoint.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// Request body: `{ "symptoms": "..." }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomRequest {
    pub symptoms: String,
}

impl SymptomRequest {
    pub fn new(symptoms: impl Into<String>) -> Self {
        Self { symptoms: symptoms.into() }
    }
}

/// Response body: possible diagnoses and recommended next steps.
///
/// Decoding is lenient. A list that is missing, null or not an array decodes
/// as empty and renders the "no data" line of its card; non-string items are
/// skipped. Any JSON value decodes, a non-object one as two empty lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Payload")]
pub struct Diagnosis {
    pub diagnoses: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Payload {
    Object {
        #[serde(default, deserialize_with = "lenient_list")]
        diagnoses: Vec<String>,
        #[serde(default, deserialize_with = "lenient_list")]
        recommendations: Vec<String>,
    },
    Other(IgnoredAny),
}

impl From<Payload> for Diagnosis {
    fn from(payload: Payload) -> Self {
        match payload {
            Payload::Object {
                diagnoses,
                recommendations,
            } => Self {
                diagnoses,
                recommendations,
            },
            Payload::Other(_) => Self::default(),
        }
    }
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Item {
        Text(String),
        Other(IgnoredAny),
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum List {
        Items(Vec<Item>),
        Other(IgnoredAny),
    }

    Ok(match List::deserialize(deserializer)? {
        List::Items(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Item::Text(text) => Some(text),
                Item::Other(_) => None,
            })
            .collect(),
        List::Other(_) => Vec::new(),
    })
}

impl Diagnosis {
    pub fn new<D, R>(diagnoses: D, recommendations: R) -> Self
    where
        D: IntoIterator,
        D::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            diagnoses: diagnoses.into_iter().map(Into::into).collect(),
            recommendations: recommendations.into_iter().map(Into::into).collect(),
        }
    }
}
