//! Request boundary: JSON bodies, path segments and multipart forms that
//! reject with the application's error envelope instead of axum's plain text.

use std::collections::HashMap;

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Multipart, Request},
};

use crate::{error::AppError, media::UploadedFile};

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

/// Text fields and file slots of a multipart body, keyed by field name.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl MultipartForm {
    async fn collect(mut mp: Multipart) -> Result<Self, AppError> {
        let mut form = MultipartForm::default();
        while let Some(field) = mp.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            if field.file_name().is_some() {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let body = field.bytes().await?;
                form.insert_file(
                    name,
                    UploadedFile {
                        file_name,
                        content_type,
                        body,
                    },
                );
            } else {
                let value = field.text().await?;
                form.insert_text(name, value);
            }
        }
        Ok(form)
    }

    pub fn insert_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Empty uploads count as absent.
    pub fn insert_file(&mut self, name: impl Into<String>, file: UploadedFile) {
        if !file.body.is_empty() {
            self.files.insert(name.into(), file);
        }
    }

    /// Trimmed value of a text field; blank values count as absent.
    pub fn text(&mut self, name: &str) -> Option<String> {
        self.fields
            .remove(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    pub fn file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }

}

#[async_trait]
impl<S> FromRequest<S> for MultipartForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mp = Multipart::from_request(req, state).await?;
        Self::collect(mp).await
    }
}

/// Trimmed, non-blank value of an optional JSON string.
pub fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn upload(body: &'static [u8]) -> UploadedFile {
        UploadedFile {
            file_name: Some("a.png".into()),
            content_type: "image/png".into(),
            body: Bytes::from_static(body),
        }
    }

    #[test]
    fn blank_text_is_absent() {
        let mut form = MultipartForm::default();
        form.insert_text("title", "   ");
        form.insert_text("stack", "  Rust ");
        assert_eq!(form.text("title"), None);
        assert_eq!(form.text("stack").as_deref(), Some("Rust"));
        assert_eq!(form.text("missing"), None);
    }

    #[test]
    fn empty_file_is_absent() {
        let mut form = MultipartForm::default();
        form.insert_file("svg", upload(b""));
        assert!(form.file("svg").is_none());
        form.insert_file("svg", upload(b"<svg/>"));
        assert!(form.file("svg").is_some());
        assert!(form.file("svg").is_none());
    }

    #[tokio::test]
    async fn non_multipart_body_is_rejected_as_app_error() {
        let req = Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(axum::body::Body::from("{}"))
            .unwrap();
        match MultipartForm::from_request(req, &()).await {
            Err(err) => assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST),
            Ok(_) => panic!("a JSON body is not a multipart form"),
        }
    }

    #[test]
    fn present_trims() {
        assert_eq!(present(Some(" a ".into())).as_deref(), Some("a"));
        assert_eq!(present(Some("  ".into())), None);
        assert_eq!(present(None), None);
    }
}
