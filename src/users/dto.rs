use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    extract::{present, MultipartForm},
    media::UploadedFile,
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn normalize_email(email: String) -> AppResult<String> {
    let email = email.trim().to_lowercase();
    if !is_valid_email(&email) {
        return Err(AppError::bad_request("Invalid email"));
    }
    Ok(email)
}

#[derive(Debug, Clone, Default)]
pub struct SocialLinks {
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub twitter_url: Option<String>,
    pub instagram_url: Option<String>,
    pub facebook_url: Option<String>,
}

impl SocialLinks {
    fn from_form(form: &mut MultipartForm) -> Self {
        Self {
            github_url: form.text("githubUrl"),
            linkedin_url: form.text("linkedinUrl"),
            twitter_url: form.text("twitterUrl"),
            instagram_url: form.text("instagramUrl"),
            facebook_url: form.text("facebookUrl"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub about: String,
    pub password: String,
    pub portfolio_url: String,
    pub links: SocialLinks,
}

/// Multipart body of `POST /user/register`.
pub struct RegisterForm {
    pub user: NewUser,
    pub avatar: UploadedFile,
    pub resume: UploadedFile,
}

impl TryFrom<MultipartForm> for RegisterForm {
    type Error = AppError;

    fn try_from(mut form: MultipartForm) -> AppResult<Self> {
        let (Some(avatar), Some(resume)) = (form.file("avatar"), form.file("resume")) else {
            return Err(AppError::bad_request("Avatar and Resume are required"));
        };

        let (
            Some(full_name),
            Some(email),
            Some(phone),
            Some(about),
            Some(password),
            Some(portfolio_url),
        ) = (
            form.text("fullName"),
            form.text("email"),
            form.text("phone"),
            form.text("about"),
            form.text("password"),
            form.text("portfolioURL"),
        )
        else {
            return Err(AppError::bad_request("All required fields must be filled"));
        };

        Ok(Self {
            user: NewUser {
                full_name,
                email: normalize_email(email)?,
                phone,
                about,
                password,
                portfolio_url,
                links: SocialLinks::from_form(&mut form),
            },
            avatar,
            resume,
        })
    }
}

/// Fields of `PUT /user/update/me`; absent values keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub about: Option<String>,
    pub portfolio_url: Option<String>,
    pub links: SocialLinks,
}

pub struct UpdateProfileForm {
    pub changes: ProfileChanges,
    pub avatar: Option<UploadedFile>,
    pub resume: Option<UploadedFile>,
}

impl TryFrom<MultipartForm> for UpdateProfileForm {
    type Error = AppError;

    fn try_from(mut form: MultipartForm) -> AppResult<Self> {
        let email = form.text("email").map(normalize_email).transpose()?;
        Ok(Self {
            changes: ProfileChanges {
                full_name: form.text("fullName"),
                email,
                phone: form.text("phone"),
                about: form.text("about"),
                portfolio_url: form.text("portfolioURL"),
                links: SocialLinks::from_form(&mut form),
            },
            avatar: form.file("avatar"),
            resume: form.file("resume"),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(self) -> AppResult<Credentials> {
        let (Some(email), Some(password)) = (present(self.email), self.password) else {
            return Err(AppError::bad_request("Email and Password are required"));
        };
        if password.is_empty() {
            return Err(AppError::bad_request("Email and Password are required"));
        }
        // No format check: a malformed address fails like any unknown one.
        Ok(Credentials {
            email: email.to_lowercase(),
            password,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdatePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
    pub confirm_new_password: Option<String>,
}

pub struct PasswordChange {
    pub current: String,
    pub new: String,
    pub confirm: String,
}

impl UpdatePasswordRequest {
    pub fn validate(self) -> AppResult<PasswordChange> {
        match (
            non_empty(self.current_password),
            non_empty(self.new_password),
            non_empty(self.confirm_new_password),
        ) {
            (Some(current), Some(new), Some(confirm)) => Ok(PasswordChange {
                current,
                new,
                confirm,
            }),
            _ => Err(AppError::bad_request("Please fill all the fields")),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ForgotPasswordRequest {
    pub email: Option<String>,
}

impl ForgotPasswordRequest {
    pub fn validate(self) -> AppResult<String> {
        let email = present(self.email).ok_or_else(|| AppError::bad_request("Email is required"))?;
        normalize_email(email)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResetPasswordRequest {
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

impl ResetPasswordRequest {
    /// The new password, once both entries are present and equal.
    pub fn validate(self) -> AppResult<String> {
        let (Some(password), Some(confirm)) =
            (non_empty(self.password), non_empty(self.confirm_password))
        else {
            return Err(AppError::bad_request("Please fill all the fields"));
        };
        if password != confirm {
            return Err(AppError::bad_request("Passwords do not match"));
        }
        Ok(password)
    }
}

// Passwords are taken verbatim; only emptiness is rejected.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
