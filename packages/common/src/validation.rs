//! Client-side format checks run before any remote call.
//!
//! Each predicate is a single anchored, ASCII-only regular expression. The
//! `check_*` helpers combine them into the outcome code the form should display.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{
    ApplicationForm, FirmProfileUpdate, FirmRegistration, JobForm, UserProfileUpdate,
    UserRegistration,
};
use crate::return_type::ReturnType;

/// Minimum password length accepted by the identity provider.
pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i-u)^[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}$").expect("valid email pattern")
});
static TAX_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{2,10}$").expect("valid tax id pattern"));
static TELEPHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{7,10}$").expect("valid telephone pattern"));
static NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z][a-z]*(?: [A-Z][a-z]*)*$").expect("valid name pattern")
});
static REQUIRED_EXPERIENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i-u)^(?:[0-9]+-[0-9]+|[0-9]+) years?$").expect("valid experience pattern")
});

pub fn validate_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

/// Romanian fiscal code (CUI): 2 to 10 digits.
pub fn validate_tax_id(tax_id: &str) -> bool {
    TAX_ID.is_match(tax_id)
}

pub fn validate_telephone(telephone: &str) -> bool {
    TELEPHONE.is_match(telephone)
}

/// One or more capitalised words separated by single spaces.
pub fn validate_name(name: &str) -> bool {
    NAME.is_match(name)
}

/// `"N years"` or `"N-M years"`; the trailing `s` is optional.
pub fn validate_required_experience(experience: &str) -> bool {
    REQUIRED_EXPERIENCE.is_match(experience)
}

fn check_password(password: &str, confirm_password: &str) -> ReturnType {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return ReturnType::WeakPassword;
    }
    if password != confirm_password {
        return ReturnType::PasswordsNotMatch;
    }
    ReturnType::Success
}

pub fn check_user_registration(form: &UserRegistration) -> ReturnType {
    let required = [
        &form.name,
        &form.email,
        &form.telephone,
        &form.password,
        &form.confirm_password,
    ];
    if required.iter().any(|field| field.trim().is_empty()) {
        return ReturnType::CredentialsRequired;
    }
    if !validate_email(&form.email) {
        return ReturnType::InvalidEmailFormat;
    }
    if !validate_telephone(&form.telephone) {
        return ReturnType::InvalidTelephoneFormat;
    }
    if !validate_name(&form.name) {
        return ReturnType::InvalidUserNameFormat;
    }
    check_password(&form.password, &form.confirm_password)
}

pub fn check_firm_registration(form: &FirmRegistration) -> ReturnType {
    let required = [
        &form.company_name,
        &form.representative_name,
        &form.email,
        &form.tax_id,
        &form.telephone,
        &form.password,
        &form.confirm_password,
    ];
    if required.iter().any(|field| field.trim().is_empty()) {
        return ReturnType::CredentialsRequired;
    }
    if !validate_email(&form.email) {
        return ReturnType::InvalidEmailFormat;
    }
    if !validate_name(&form.company_name) {
        return ReturnType::InvalidFirmNameFormat;
    }
    if !validate_name(&form.representative_name) {
        return ReturnType::InvalidRepresentativeNameFormat;
    }
    if !validate_tax_id(&form.tax_id) {
        return ReturnType::InvalidTaxIdFormat;
    }
    if !validate_telephone(&form.telephone) {
        return ReturnType::InvalidTelephoneFormat;
    }
    check_password(&form.password, &form.confirm_password)
}

pub fn check_login(email: &str, password: &str) -> ReturnType {
    if email.trim().is_empty() || password.is_empty() {
        return ReturnType::CredentialsRequired;
    }
    if !validate_email(email) {
        return ReturnType::InvalidEmailFormat;
    }
    ReturnType::Success
}

pub fn check_user_profile(update: &UserProfileUpdate) -> ReturnType {
    check_contact(&update.name, &update.email, &update.telephone)
}

pub fn check_firm_profile(update: &FirmProfileUpdate) -> ReturnType {
    let required = [
        &update.company_name,
        &update.representative_name,
        &update.tax_id,
        &update.telephone,
    ];
    if required.iter().any(|field| field.trim().is_empty()) {
        return ReturnType::CredentialsRequired;
    }
    if !validate_name(&update.company_name) {
        return ReturnType::InvalidFirmNameFormat;
    }
    if !validate_name(&update.representative_name) {
        return ReturnType::InvalidRepresentativeNameFormat;
    }
    if !validate_tax_id(&update.tax_id) {
        return ReturnType::InvalidTaxIdFormat;
    }
    if !validate_telephone(&update.telephone) {
        return ReturnType::InvalidTelephoneFormat;
    }
    ReturnType::Success
}

/// Contact details typed into an application form.
pub fn check_application(form: &ApplicationForm) -> ReturnType {
    check_contact(&form.name, &form.email, &form.telephone)
}

fn check_contact(name: &str, email: &str, telephone: &str) -> ReturnType {
    if [name, email, telephone].iter().any(|field| field.trim().is_empty()) {
        return ReturnType::CredentialsRequired;
    }
    if !validate_email(email) {
        return ReturnType::InvalidEmailFormat;
    }
    if !validate_telephone(telephone) {
        return ReturnType::InvalidTelephoneFormat;
    }
    if !validate_name(name) {
        return ReturnType::InvalidUserNameFormat;
    }
    ReturnType::Success
}

/// Job forms only gate the experience string; an empty value means "any".
pub fn check_job_form(form: &JobForm) -> ReturnType {
    if !form.required_experience.is_empty()
        && !validate_required_experience(&form.required_experience)
    {
        return ReturnType::InvalidExperienceFormat;
    }
    ReturnType::Success
}
