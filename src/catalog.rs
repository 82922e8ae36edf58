use std::{collections::HashMap, path::Path};

use crate::{errors::AppError, models::Variant};

/// Project descriptions the rating board has always shipped with.
const PROJECT_DESCRIPTIONS: [(&str, &str); 11] = [
    ("1", "Eco-Friendly Energy Model"),
    ("2", "Smart Waste Management"),
    ("3", "AI-Powered Waste Sorting"),
    ("4", "Renewable Energy Plant"),
    ("5", "Low-Cost Water Purifier"),
    ("6", "Mushroom-Based Soil Restoration"),
    ("7", "Automated Recycling Robot"),
    ("8", "Bee & Organic Farming"),
    ("9", "Marine Plastic Cleaner"),
    ("10", "AI-Based Traffic Management"),
    ("11", "Lotus Leaf Self-Cleaning Surface"),
];

/// Display names for subjects. Subjects missing from the catalogue are still
/// valid; they just carry no description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubjectCatalog {
    descriptions: HashMap<String, String>,
}

impl SubjectCatalog {
    pub fn new(descriptions: HashMap<String, String>) -> Self {
        Self { descriptions }
    }

    pub fn builtin(variant: Variant) -> Self {
        match variant {
            Variant::Review => Self::default(),
            Variant::Rating => Self::new(
                PROJECT_DESCRIPTIONS
                    .iter()
                    .map(|(id, name)| (id.to_string(), name.to_string()))
                    .collect(),
            ),
        }
    }

    /// Reads a JSON object of `{"subjectId": "description"}`.
    pub async fn load(path: &Path) -> Result<Self, AppError> {
        let raw = tokio::fs::read(path).await.map_err(|e| {
            AppError::EnvError(format!("Failed to read catalogue {}: {e}", path.display()))
        })?;
        let descriptions: HashMap<String, String> = serde_json::from_slice(&raw).map_err(|e| {
            AppError::EnvError(format!("Invalid catalogue {}: {e}", path.display()))
        })?;

        tracing::info!(
            "Loaded {} subject descriptions from {}",
            descriptions.len(),
            path.display()
        );
        Ok(Self::new(descriptions))
    }

    pub fn describe(&self, subject_id: &str) -> Option<&str> {
        self.descriptions.get(subject_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.descriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptions.is_empty()
    }
}
