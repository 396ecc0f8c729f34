use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp;

/// Profile document of an individual applicant, keyed by identity uid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
    pub uid: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub telephone: String,
    #[serde(default)]
    pub profile_pic: String,
    #[serde(default)]
    pub is_firm: bool,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Profile document of a hiring company, keyed by identity uid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FirmAccount {
    pub uid: String,
    pub email: String,
    pub company_name: String,
    pub representative_name: String,
    pub tax_id: String,
    #[serde(default)]
    pub telephone: String,
    #[serde(default)]
    pub profile_pic: String,
    #[serde(default = "firm_flag")]
    pub is_firm: bool,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

fn firm_flag() -> bool {
    true
}

/// Result of looking an identity up across the user and firm collections.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AccountDocument {
    User(UserAccount),
    Firm(FirmAccount),
}

impl AccountDocument {
    pub fn is_firm(&self) -> bool {
        matches!(self, Self::Firm(_))
    }

    pub fn uid(&self) -> &str {
        match self {
            Self::User(user) => &user.uid,
            Self::Firm(firm) => &firm.uid,
        }
    }

    pub fn email(&self) -> &str {
        match self {
            Self::User(user) => &user.email,
            Self::Firm(firm) => &firm.email,
        }
    }

    /// Name to greet the account with.
    pub fn display_name(&self) -> &str {
        match self {
            Self::User(user) => &user.name,
            Self::Firm(firm) => &firm.company_name,
        }
    }

    pub fn profile_pic(&self) -> &str {
        match self {
            Self::User(user) => &user.profile_pic,
            Self::Firm(firm) => &firm.profile_pic,
        }
    }
}

/// Sign-up form for an individual applicant.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UserRegistration {
    pub name: String,
    pub email: String,
    pub telephone: String,
    pub password: String,
    pub confirm_password: String,
}

/// Sign-up form for a firm.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FirmRegistration {
    pub company_name: String,
    pub representative_name: String,
    pub email: String,
    pub tax_id: String,
    pub telephone: String,
    pub password: String,
    pub confirm_password: String,
}

/// Editable fields of a user profile.
#[derive(Clone, Debug, Default)]
pub struct UserProfileUpdate {
    pub email: String,
    pub telephone: String,
    pub name: String,
    pub profile_pic: Option<super::FileUpload>,
}

/// Editable fields of a firm profile.
#[derive(Clone, Debug, Default)]
pub struct FirmProfileUpdate {
    pub company_name: String,
    pub representative_name: String,
    pub tax_id: String,
    pub telephone: String,
    pub profile_pic: Option<super::FileUpload>,
}
