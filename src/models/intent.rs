use serde::{Deserialize, Serialize};

use super::amenity::normalize_tag;

/// Filters extracted from a free-text search. An absent field means "no constraint".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchCriteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amenities: Option<Vec<String>>,
}

impl SearchCriteria {
    /// Blank cities and empty amenity lists collapse to `None`; amenities keep their
    /// first-seen order without duplicates.
    pub fn new(city: Option<String>, amenities: Vec<String>) -> Self {
        let city = city
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        let mut unique: Vec<String> = Vec::with_capacity(amenities.len());
        for amenity in amenities {
            if !amenity.is_empty() && !unique.contains(&amenity) {
                unique.push(amenity);
            }
        }

        Self {
            city,
            amenities: if unique.is_empty() { None } else { Some(unique) },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.city.is_none() && self.amenities.is_none()
    }

    pub fn amenity_list(&self) -> &[String] {
        self.amenities.as_deref().unwrap_or(&[])
    }
}

/// Classified purpose of an assistant prompt. Every variant carries a message for display.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum AssistantIntent {
    Search {
        #[serde(flatten)]
        criteria: SearchCriteria,
        message: String,
    },
    Book {
        /// Free text, not yet matched against the catalog.
        #[serde(rename = "spaceName")]
        space_name_hint: String,
        /// `YYYY-MM-DD` or empty.
        #[serde(rename = "date")]
        date_hint: String,
        message: String,
    },
    Help {
        message: String,
    },
    Unknown {
        message: String,
    },
}

impl AssistantIntent {
    pub fn message(&self) -> &str {
        match self {
            AssistantIntent::Search { message, .. }
            | AssistantIntent::Book { message, .. }
            | AssistantIntent::Help { message }
            | AssistantIntent::Unknown { message } => message,
        }
    }

    pub fn action(&self) -> &'static str {
        match self {
            AssistantIntent::Search { .. } => "search",
            AssistantIntent::Book { .. } => "book",
            AssistantIntent::Help { .. } => "help",
            AssistantIntent::Unknown { .. } => "unknown",
        }
    }
}

/// Shape requested from the generation service for search prompts.
#[derive(Debug, Default, Deserialize)]
pub struct RemoteSearchReply {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub amenities: Option<Vec<String>>,
}

impl RemoteSearchReply {
    pub fn into_criteria(self) -> SearchCriteria {
        let amenities = self
            .amenities
            .unwrap_or_default()
            .iter()
            .map(|a| normalize_tag(a))
            .collect();
        SearchCriteria::new(self.city, amenities)
    }
}

/// Shape requested from the generation service for assistant prompts.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteAssistantReply {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub space_name: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub amenities: Option<Vec<String>>,
    #[serde(default)]
    pub message: Option<String>,
}
