use serde_json::Value;
use validator::Validate;

use crate::validation::{FieldError, Fields, Schema};

/// POST /adv body.
#[derive(Debug, Validate)]
pub struct CreateAdvertisement {
    #[validate(length(max = 50, message = "must be at most 50 characters"))]
    pub heading: String,
    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    pub description: String,
    pub creator: i32,
}

impl Schema for CreateAdvertisement {
    fn parse(value: &Value) -> Result<Self, Vec<FieldError>> {
        let mut fields = Fields::of(value)?;
        let heading = fields.required_string("heading");
        let description = fields.required_string("description");
        let creator = fields.required_integer("creator");

        match (heading, description, creator) {
            (Some(heading), Some(description), Some(creator)) => {
                fields.finish_with(CreateAdvertisement {
                    heading,
                    description,
                    creator,
                })
            }
            (heading, description, creator) => Err(fields.into_errors_with(UpdateAdvertisement {
                heading,
                description,
                creator,
            })),
        }
    }
}

/// PATCH and DELETE /adv/{id} body. `creator` is the caller's claim of
/// ownership, compared against the stored creator.
#[derive(Debug, Default, Validate)]
pub struct UpdateAdvertisement {
    #[validate(length(max = 50, message = "must be at most 50 characters"))]
    pub heading: Option<String>,
    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    pub description: Option<String>,
    pub creator: Option<i32>,
}

impl Schema for UpdateAdvertisement {
    fn parse(value: &Value) -> Result<Self, Vec<FieldError>> {
        let mut fields = Fields::of(value)?;
        let schema = UpdateAdvertisement {
            heading: fields.optional_string("heading"),
            description: fields.optional_string("description"),
            creator: fields.optional_integer("creator"),
        };
        fields.finish_with(schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_coerces_string_creator() {
        let adv = CreateAdvertisement::parse(&json!({
            "heading": "Sofa",
            "description": "Barely used",
            "creator": "12"
        }))
        .unwrap();
        assert_eq!(adv.creator, 12);
    }

    #[test]
    fn create_requires_creator() {
        let errors = CreateAdvertisement::parse(&json!({
            "heading": "Sofa",
            "description": "Barely used"
        }))
        .unwrap_err();
        assert_eq!(errors, vec![FieldError::new("creator", "missing", "field required")]);
    }

    #[test]
    fn heading_over_fifty_characters_is_rejected() {
        let errors = CreateAdvertisement::parse(&json!({
            "heading": "h".repeat(51),
            "description": "d".repeat(2000),
            "creator": 1
        }))
        .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "heading");
        assert_eq!(errors[0].code, "length");
    }

    #[test]
    fn create_reports_overlong_description_with_bad_creator() {
        let errors = CreateAdvertisement::parse(&json!({
            "heading": "Sofa",
            "description": "d".repeat(2001),
            "creator": [1]
        }))
        .unwrap_err();
        let summary: Vec<(&str, &str)> = errors
            .iter()
            .map(|e| (e.field.as_str(), e.code.as_str()))
            .collect();
        assert_eq!(summary, vec![("creator", "type"), ("description", "length")]);
    }

    #[test]
    fn update_ignores_unknown_fields() {
        let update = UpdateAdvertisement::parse(&json!({
            "description": "New text",
            "date_creation": "1999-01-01",
            "id": 77
        }))
        .unwrap();
        assert_eq!(update.description.as_deref(), Some("New text"));
        assert!(update.heading.is_none());
        assert!(update.creator.is_none());
    }

    #[test]
    fn update_rejects_non_numeric_creator() {
        let errors = UpdateAdvertisement::parse(&json!({ "creator": "me" })).unwrap_err();
        assert_eq!(errors, vec![FieldError::new("creator", "type", "expected an integer")]);
    }
}
