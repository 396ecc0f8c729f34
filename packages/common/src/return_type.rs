use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Outcome of a user-initiated action.
///
/// Every fallible client operation reports through this enum instead of
/// surfacing backend errors. Codes are stable; messages are meant for display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReturnType {
    Success,
    InvalidCredentials,
    InvalidEmailFormat,
    InvalidTaxIdFormat,
    InvalidTelephoneFormat,
    InvalidUserNameFormat,
    InvalidFirmNameFormat,
    InvalidRepresentativeNameFormat,
    InvalidExperienceFormat,
    UserNotFound,
    EmailInUse,
    WeakPassword,
    RegistrationFailed,
    CredentialsRequired,
    FederatedLoginFailed,
    PasswordsNotMatch,
    LoginFailed,
    NotAuthenticated,
    JobAddFailed,
    JobEditFailed,
    JobDeleteFailed,
    JobApplicationFailed,
    ApplicationCvRequired,
    UserUpdateFailed,
}

impl ReturnType {
    /// All outcome codes, success first.
    pub const ALL: &'static [ReturnType] = &[
        Self::Success,
        Self::InvalidCredentials,
        Self::InvalidEmailFormat,
        Self::InvalidTaxIdFormat,
        Self::InvalidTelephoneFormat,
        Self::InvalidUserNameFormat,
        Self::InvalidFirmNameFormat,
        Self::InvalidRepresentativeNameFormat,
        Self::InvalidExperienceFormat,
        Self::UserNotFound,
        Self::EmailInUse,
        Self::WeakPassword,
        Self::RegistrationFailed,
        Self::CredentialsRequired,
        Self::FederatedLoginFailed,
        Self::PasswordsNotMatch,
        Self::LoginFailed,
        Self::NotAuthenticated,
        Self::JobAddFailed,
        Self::JobEditFailed,
        Self::JobDeleteFailed,
        Self::JobApplicationFailed,
        Self::ApplicationCvRequired,
        Self::UserUpdateFailed,
    ];

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Returns true for codes raised by client-side form checks, before any
    /// remote call is made.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidEmailFormat
                | Self::InvalidTaxIdFormat
                | Self::InvalidTelephoneFormat
                | Self::InvalidUserNameFormat
                | Self::InvalidFirmNameFormat
                | Self::InvalidRepresentativeNameFormat
                | Self::InvalidExperienceFormat
                | Self::CredentialsRequired
                | Self::PasswordsNotMatch
                | Self::WeakPassword
        )
    }

    /// Machine-readable code (SCREAMING_SNAKE_CASE).
    pub fn code(&self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidEmailFormat => "INVALID_EMAIL_FORMAT",
            Self::InvalidTaxIdFormat => "INVALID_TAX_ID_FORMAT",
            Self::InvalidTelephoneFormat => "INVALID_TELEPHONE_FORMAT",
            Self::InvalidUserNameFormat => "INVALID_USER_NAME_FORMAT",
            Self::InvalidFirmNameFormat => "INVALID_FIRM_NAME_FORMAT",
            Self::InvalidRepresentativeNameFormat => "INVALID_REPRESENTATIVE_NAME_FORMAT",
            Self::InvalidExperienceFormat => "INVALID_EXPERIENCE_FORMAT",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::EmailInUse => "EMAIL_IN_USE",
            Self::WeakPassword => "WEAK_PASSWORD",
            Self::RegistrationFailed => "REGISTRATION_FAILED",
            Self::CredentialsRequired => "CREDENTIALS_REQUIRED",
            Self::FederatedLoginFailed => "FEDERATED_LOGIN_FAILED",
            Self::PasswordsNotMatch => "PASSWORDS_NOT_MATCH",
            Self::LoginFailed => "LOGIN_FAILED",
            Self::NotAuthenticated => "NOT_AUTHENTICATED",
            Self::JobAddFailed => "JOB_ADD_FAILED",
            Self::JobEditFailed => "JOB_EDIT_FAILED",
            Self::JobDeleteFailed => "JOB_DELETE_FAILED",
            Self::JobApplicationFailed => "JOB_APPLICATION_FAILED",
            Self::ApplicationCvRequired => "APPLICATION_CV_REQUIRED",
            Self::UserUpdateFailed => "USER_UPDATE_FAILED",
        }
    }

    /// Human-readable message shown to the user.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Success => "Done!",
            Self::InvalidCredentials => "Invalid email or password!",
            Self::InvalidEmailFormat => "Invalid email format!",
            Self::InvalidTaxIdFormat => "Invalid CUI format!",
            Self::InvalidTelephoneFormat => "Invalid telephone format!",
            Self::InvalidUserNameFormat => "Invalid user name format!",
            Self::InvalidFirmNameFormat => "Invalid company name format!",
            Self::InvalidRepresentativeNameFormat => "Invalid representative name format!",
            Self::InvalidExperienceFormat => "Experience must look like \"3 years\" or \"2-4 years\"!",
            Self::UserNotFound => "User not found!",
            Self::EmailInUse => "Email is already in use!",
            Self::WeakPassword => "Password must be at least 6 characters long!",
            Self::RegistrationFailed => "Failed to register!",
            Self::CredentialsRequired => "Credentials are required!",
            Self::FederatedLoginFailed => "Failed to sign in with the external provider!",
            Self::PasswordsNotMatch => "Passwords do not match!",
            Self::LoginFailed => "Failed to log in!",
            Self::NotAuthenticated => "You need to be logged in!",
            Self::JobAddFailed => "Failed to add the job!",
            Self::JobEditFailed => "Failed to edit the job!",
            Self::JobDeleteFailed => "Failed to delete the job!",
            Self::JobApplicationFailed => "Failed to send the application!",
            Self::ApplicationCvRequired => "A CV is required to apply!",
            Self::UserUpdateFailed => "Failed to update the profile!",
        }
    }

    /// `Ok(())` for [`ReturnType::Success`], `Err(self)` otherwise.
    pub fn into_result(self) -> Result<(), ReturnType> {
        if self.is_success() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ReturnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for ReturnType {}

impl From<Result<(), ReturnType>> for ReturnType {
    fn from(result: Result<(), ReturnType>) -> Self {
        match result {
            Ok(()) => Self::Success,
            Err(code) => code,
        }
    }
}

/// Error when parsing an unknown outcome code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseReturnTypeError {
    invalid: String,
}

impl fmt::Display for ParseReturnTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown outcome code '{}'", self.invalid)
    }
}

impl std::error::Error for ParseReturnTypeError {}

impl FromStr for ReturnType {
    type Err = ParseReturnTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|code| code.code() == s)
            .ok_or_else(|| ParseReturnTypeError {
                invalid: s.to_string(),
            })
    }
}
