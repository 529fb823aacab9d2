use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    extract::present,
};

/// Body of `POST /timeline/add`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AddTimelineRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewTimeline {
    pub title: String,
    pub description: String,
    pub from: String,
    pub to: Option<String>,
}

impl AddTimelineRequest {
    pub fn validate(self) -> AppResult<NewTimeline> {
        let title = present(self.title).ok_or_else(|| AppError::bad_request("Title required"))?;
        let description =
            present(self.description).ok_or_else(|| AppError::bad_request("description required"))?;
        let from = present(self.from)
            .ok_or_else(|| AppError::bad_request("Timeline starting date is required"))?;
        Ok(NewTimeline {
            title,
            description,
            from,
            to: present(self.to),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(v: serde_json::Value) -> AppResult<NewTimeline> {
        serde_json::from_value::<AddTimelineRequest>(v).unwrap().validate()
    }

    #[test]
    fn end_date_is_optional() {
        let t = parse(json!({ "title": "Job", "description": "Dev", "from": "2021" })).unwrap();
        assert_eq!(t.from, "2021");
        assert_eq!(t.to, None);
    }

    #[test]
    fn fields_are_checked_in_order() {
        let err = parse(json!({ "from": "2021" })).err().unwrap();
        assert_eq!(err.to_string(), "Title required");
        let err = parse(json!({ "title": "Job" })).err().unwrap();
        assert_eq!(err.to_string(), "description required");
        let err = parse(json!({ "title": "Job", "description": "Dev", "to": "2022" }))
            .err()
            .unwrap();
        assert_eq!(err.to_string(), "Timeline starting date is required");
    }
}
