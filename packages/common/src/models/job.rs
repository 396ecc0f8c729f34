use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use super::timestamp;

/// Placeholder stored in a tag list that would otherwise be empty.
pub const ANY_TAG: &str = "Any";

/// Seniority tier advertised by a job ad. The empty string means unspecified.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Intern,
    Junior,
    Middle,
    Senior,
    #[default]
    #[serde(rename = "")]
    Unspecified,
}

impl Position {
    pub const ALL: &'static [Position] = &[
        Self::Intern,
        Self::Junior,
        Self::Middle,
        Self::Senior,
        Self::Unspecified,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Intern => "Intern",
            Self::Junior => "Junior",
            Self::Middle => "Middle",
            Self::Senior => "Senior",
            Self::Unspecified => "",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown position '{s}'"))
    }
}

/// The four skill-tag lists attached to a job ad.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSkills {
    #[serde(default)]
    pub programming_languages: Vec<String>,
    #[serde(default)]
    pub frameworks: Vec<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub tools: Vec<String>,
}

impl JobSkills {
    /// Normalise each list with [`normalize_tags`].
    pub fn normalized(self) -> Self {
        Self {
            programming_languages: normalize_tags(self.programming_languages),
            frameworks: normalize_tags(self.frameworks),
            certifications: normalize_tags(self.certifications),
            tools: normalize_tags(self.tools),
        }
    }
}

/// Trim, drop blanks, de-duplicate keeping first occurrence; an empty list
/// becomes `["Any"]`.
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let tags: Vec<String> = tags
        .into_iter()
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .filter(|tag| seen.insert(tag.clone()))
        .collect();

    if tags.is_empty() {
        vec![ANY_TAG.to_string()]
    } else {
        tags
    }
}

/// Mutable fields of a job ad, as filled in by the firm.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JobForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub is_remote: bool,
    #[serde(default)]
    pub required_experience: String,
    #[serde(flatten)]
    pub skills: JobSkills,
}

/// A stored job ad.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub firm_id: String,
    #[serde(flatten)]
    pub form: JobForm,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Company fields joined onto a job ad at read time.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FirmSummary {
    pub company_name: String,
    pub email: String,
    pub telephone: String,
    pub firm_profile_pic: String,
}

/// A job ad enriched with its firm's display fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JobWithFirm {
    #[serde(flatten)]
    pub job: Job,
    #[serde(flatten)]
    pub firm: FirmSummary,
}
