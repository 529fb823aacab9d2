use crate::{
    error::{AppError, AppResult},
    extract::MultipartForm,
    media::UploadedFile,
};

/// Dashboard forms send the deployed flag as text.
pub fn parse_deployed(value: &str) -> AppResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(AppError::bad_request("Deployed must be Yes or No")),
    }
}

#[derive(Debug, Clone)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub git_repo_link: String,
    pub project_link: String,
    pub technologies: String,
    pub stack: String,
    pub deployed: bool,
}

/// Multipart body of `POST /project/add`.
pub struct AddProjectForm {
    pub project: NewProject,
    pub banner: UploadedFile,
}

impl TryFrom<MultipartForm> for AddProjectForm {
    type Error = AppError;

    fn try_from(mut form: MultipartForm) -> AppResult<Self> {
        let Some(banner) = form.file("projectBanner") else {
            return Err(AppError::bad_request("Project Banner Image is Required"));
        };

        let (
            Some(title),
            Some(description),
            Some(git_repo_link),
            Some(project_link),
            Some(technologies),
            Some(stack),
            Some(deployed),
        ) = (
            form.text("title"),
            form.text("description"),
            form.text("gitRepoLink"),
            form.text("projectLink"),
            form.text("technologies"),
            form.text("stack"),
            form.text("deployed"),
        )
        else {
            return Err(AppError::bad_request("Please fill all the fields"));
        };

        Ok(Self {
            project: NewProject {
                title,
                description,
                git_repo_link,
                project_link,
                technologies,
                stack,
                deployed: parse_deployed(&deployed)?,
            },
            banner,
        })
    }
}

/// Fields of `PUT /project/update/:id`; absent values keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct ProjectChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub git_repo_link: Option<String>,
    pub project_link: Option<String>,
    pub technologies: Option<String>,
    pub stack: Option<String>,
    pub deployed: Option<bool>,
}

pub struct UpdateProjectForm {
    pub changes: ProjectChanges,
    pub banner: Option<UploadedFile>,
}

impl TryFrom<MultipartForm> for UpdateProjectForm {
    type Error = AppError;

    fn try_from(mut form: MultipartForm) -> AppResult<Self> {
        let deployed = form
            .text("deployed")
            .map(|v| parse_deployed(&v))
            .transpose()?;
        Ok(Self {
            changes: ProjectChanges {
                title: form.text("title"),
                description: form.text("description"),
                git_repo_link: form.text("gitRepoLink"),
                project_link: form.text("projectLink"),
                technologies: form.text("technologies"),
                stack: form.text("stack"),
                deployed,
            },
            banner: form.file("projectBanner"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn banner() -> UploadedFile {
        UploadedFile {
            file_name: Some("banner.png".into()),
            content_type: "image/png".into(),
            body: Bytes::from_static(b"png"),
        }
    }

    fn full_form() -> MultipartForm {
        let mut form = MultipartForm::default();
        form.insert_file("projectBanner", banner());
        for (k, v) in [
            ("title", "Portfolio"),
            ("description", "This site"),
            ("gitRepoLink", "https://github.com/ada/portfolio"),
            ("projectLink", "https://ada.dev"),
            ("technologies", "Rust, Postgres"),
            ("stack", "Full Stack"),
            ("deployed", "Yes"),
        ] {
            form.insert_text(k, v);
        }
        form
    }

    #[test]
    fn deployed_flag_parsing() {
        assert!(parse_deployed("Yes").unwrap());
        assert!(parse_deployed("true").unwrap());
        assert!(!parse_deployed("NO").unwrap());
        assert!(!parse_deployed("0").unwrap());
        assert!(parse_deployed("maybe").is_err());
    }

    #[test]
    fn add_form_parses() {
        let form = AddProjectForm::try_from(full_form()).unwrap();
        assert_eq!(form.project.title, "Portfolio");
        assert!(form.project.deployed);
        assert_eq!(form.banner.file_name.as_deref(), Some("banner.png"));
    }

    #[test]
    fn add_form_requires_banner_first() {
        let mut form = full_form();
        form.file("projectBanner");
        form.text("title");
        let err = AddProjectForm::try_from(form).err().unwrap();
        assert_eq!(err.to_string(), "Project Banner Image is Required");
    }

    #[test]
    fn add_form_requires_every_field() {
        let mut form = full_form();
        form.text("stack");
        let err = AddProjectForm::try_from(form).err().unwrap();
        assert_eq!(err.to_string(), "Please fill all the fields");
    }

    #[test]
    fn update_form_is_partial() {
        let mut form = MultipartForm::default();
        form.insert_text("deployed", "no");
        let update = UpdateProjectForm::try_from(form).unwrap();
        assert_eq!(update.changes.deployed, Some(false));
        assert!(update.changes.title.is_none());
        assert!(update.banner.is_none());
    }
}
