use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    extract::{present, MultipartForm},
    media::UploadedFile,
};

#[derive(Debug, Clone)]
pub struct NewSkill {
    pub title: String,
    pub proficiency: String,
}

/// Multipart body of `POST /skill/add`.
pub struct AddSkillForm {
    pub skill: NewSkill,
    pub svg: UploadedFile,
}

impl TryFrom<MultipartForm> for AddSkillForm {
    type Error = AppError;

    fn try_from(mut form: MultipartForm) -> AppResult<Self> {
        let Some(svg) = form.file("svg") else {
            return Err(AppError::bad_request("Skill SVG are required"));
        };
        let (Some(title), Some(proficiency)) = (form.text("title"), form.text("proficiency"))
        else {
            return Err(AppError::bad_request("please fill full form"));
        };
        Ok(Self {
            skill: NewSkill { title, proficiency },
            svg,
        })
    }
}

/// Proficiency arrives as a number from some clients and as text from others.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Proficiency {
    Text(String),
    Number(serde_json::Number),
}

/// Body of `PUT /skill/update/:id`. Only the proficiency can change.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateSkillRequest {
    pub proficiency: Option<Proficiency>,
}

impl UpdateSkillRequest {
    pub fn validate(self) -> AppResult<String> {
        let value = match self.proficiency {
            Some(Proficiency::Text(text)) => present(Some(text)),
            Some(Proficiency::Number(n)) => Some(n.to_string()),
            None => None,
        };
        value.ok_or_else(|| AppError::bad_request("Proficiency is required"))
    }
}
