use crate::{
    error::{AppError, AppResult},
    extract::MultipartForm,
    media::UploadedFile,
};

/// Multipart body of `POST /softwareapplication/add`.
pub struct AddApplicationForm {
    pub name: String,
    pub svg: UploadedFile,
}

impl TryFrom<MultipartForm> for AddApplicationForm {
    type Error = AppError;

    fn try_from(mut form: MultipartForm) -> AppResult<Self> {
        let Some(svg) = form.file("svg") else {
            return Err(AppError::bad_request(
                "Software Application ICON/SVG are required",
            ));
        };
        let name = form
            .text("name")
            .ok_or_else(|| AppError::bad_request("Software Application name is required"))?;
        Ok(Self { name, svg })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn requires_icon_and_name() {
        let err = AddApplicationForm::try_from(MultipartForm::default())
            .err()
            .unwrap();
        assert_eq!(err.to_string(), "Software Application ICON/SVG are required");

        let mut form = MultipartForm::default();
        form.insert_file(
            "svg",
            UploadedFile {
                file_name: Some("vscode.svg".into()),
                content_type: "image/svg+xml".into(),
                body: Bytes::from_static(b"<svg/>"),
            },
        );
        form.insert_text("name", "  ");
        let err = AddApplicationForm::try_from(form).err().unwrap();
        assert_eq!(err.to_string(), "Software Application name is required");
    }
}
