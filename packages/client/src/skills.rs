use jobboard_common::document::{FilterOp, Query, WriteMode, encode};
use jobboard_common::models::{Skill, SkillCategory};
use serde_json::Value;
use tracing::{debug, error, info, instrument};

use crate::documents::{DocumentClient, str_field};
use crate::error::ClientError;

/// Upper bound appended to a prefix for range queries.
const PREFIX_END: char = '\u{f8ff}';

/// Outcome of a skill catalogue import.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SkillImport {
    pub added: usize,
    pub skipped: usize,
}

impl DocumentClient {
    /// Names in `category` starting with `term`, for tag autocompletion.
    #[instrument(skip(self))]
    pub async fn search_skills(&self, term: &str, category: SkillCategory) -> Vec<String> {
        let query = Query::new()
            .where_eq("category", category.as_str())
            .filter("name", FilterOp::Gte, term)
            .filter("name", FilterOp::Lte, format!("{term}{PREFIX_END}"));
        self.skill_names(&query).await
    }

    /// Every skill name in `category`.
    #[instrument(skip(self))]
    pub async fn list_skills(&self, category: SkillCategory) -> Vec<String> {
        let query = Query::new().where_eq("category", category.as_str());
        self.skill_names(&query).await
    }

    async fn skill_names(&self, query: &Query) -> Vec<String> {
        match self.store.query(&self.collections.skills, query).await {
            Ok(docs) => docs.iter().map(|doc| str_field(doc, "name")).collect(),
            Err(e) => {
                error!(error = %e, "Error searching skills");
                Vec::new()
            }
        }
    }

    /// Import a JSON array of `{"name", "category"}` objects into the skill
    /// catalogue. Skills that already exist are left untouched.
    #[instrument(skip(self, json), fields(bytes = json.len()))]
    pub async fn import_skills(&self, json: &str) -> Result<SkillImport, ClientError> {
        let skills = parse_skills(json)?;

        let mut summary = SkillImport::default();
        for skill in skills {
            if self.store.get(&self.collections.skills, &skill.name).await?.is_some() {
                debug!(name = %skill.name, "Skill already exists, skipping");
                summary.skipped += 1;
                continue;
            }
            self.store
                .set(&self.collections.skills, &skill.name, encode(&skill)?, WriteMode::Overwrite)
                .await
                .inspect_err(|e| error!(name = %skill.name, error = %e, "Error adding skill"))?;
            summary.added += 1;
        }
        info!(added = summary.added, skipped = summary.skipped, "Skills imported");
        Ok(summary)
    }
}

/// Validate the structure of a skill catalogue file.
fn parse_skills(json: &str) -> Result<Vec<Skill>, ClientError> {
    let invalid = |msg: &str| ClientError::InvalidInput(msg.to_string());

    let value: Value = serde_json::from_str(json).map_err(|_| invalid("Invalid JSON file"))?;
    let Value::Array(items) = value else {
        return Err(invalid("The JSON file must contain an array of skills."));
    };

    items
        .iter()
        .map(|item| {
            let Value::Object(fields) = item else {
                return Err(invalid("Each skill must be an object."));
            };
            let (Some(name), Some(category)) = (fields.get("name"), fields.get("category")) else {
                return Err(invalid("Each skill must have 'name' and 'category' keys."));
            };
            let (Some(name), Some(category)) = (name.as_str(), category.as_str()) else {
                return Err(invalid("'name' and 'category' must be strings."));
            };
            let name = name.trim();
            if name.is_empty() {
                return Err(invalid("Skill names cannot be empty."));
            }
            let category = category
                .parse::<SkillCategory>()
                .map_err(|e| ClientError::InvalidInput(e.to_string()))?;
            Ok(Skill {
                name: name.to_string(),
                category,
            })
        })
        .collect()
}
