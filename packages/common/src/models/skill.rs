use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Catalogue bucket a skill belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    ProgrammingLanguage,
    Framework,
    Certification,
    Tool,
}

impl SkillCategory {
    pub const ALL: &'static [SkillCategory] = &[
        Self::ProgrammingLanguage,
        Self::Framework,
        Self::Certification,
        Self::Tool,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProgrammingLanguage => "programming_language",
            Self::Framework => "framework",
            Self::Certification => "certification",
            Self::Tool => "tool",
        }
    }
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SkillCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "unknown skill category '{s}'. Valid values: {}",
                    Self::ALL
                        .iter()
                        .map(|c| c.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            })
    }
}

/// Catalogue entry used for tag autocompletion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub category: SkillCategory,
}
