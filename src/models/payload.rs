use serde::Deserialize;

/// Subject ids arrive as strings from the stall board and as integers from
/// the project board.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SubjectRef {
    Text(String),
    Number(i64),
}

impl SubjectRef {
    pub fn normalized(&self) -> String {
        match self {
            SubjectRef::Text(s) => s.trim().to_string(),
            SubjectRef::Number(n) => n.to_string(),
        }
    }
}

/// Request body for create and update. Every field is optional here so the
/// validation layer can report which one is missing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPayload {
    #[serde(default, alias = "stallId", alias = "projectId")]
    pub subject_id: Option<SubjectRef>,
    #[serde(default, alias = "reviewerName", alias = "userName")]
    pub author_name: Option<String>,
    #[serde(default, alias = "rating")]
    pub score: Option<i64>,
    #[serde(default, alias = "comment", alias = "reviewText")]
    pub text: Option<String>,
}
