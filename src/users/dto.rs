use serde_json::Value;
use validator::Validate;

use crate::validation::{FieldError, Fields, Schema};

/// POST /user body.
#[derive(Debug, Validate)]
pub struct CreateUser {
    #[validate(length(max = 72, message = "must be at most 72 characters"))]
    pub name: String,
    #[validate(length(max = 72, message = "must be at most 72 characters"))]
    pub password: String,
    #[validate(length(max = 72, message = "must be at most 72 characters"))]
    pub email: String,
}

impl Schema for CreateUser {
    fn parse(value: &Value) -> Result<Self, Vec<FieldError>> {
        let mut fields = Fields::of(value)?;
        let name = fields.required_string("name");
        let password = fields.required_string("password");
        let email = fields.required_string("email");

        match (name, password, email) {
            (Some(name), Some(password), Some(email)) => fields.finish_with(CreateUser {
                name,
                password,
                email,
            }),
            (name, password, email) => Err(fields.into_errors_with(UpdateUser {
                name,
                password,
                email,
            })),
        }
    }
}

/// PATCH /user/{id} body; only the supplied fields are set.
#[derive(Debug, Default, Validate)]
pub struct UpdateUser {
    #[validate(length(max = 72, message = "must be at most 72 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 72, message = "must be at most 72 characters"))]
    pub password: Option<String>,
    #[validate(length(max = 72, message = "must be at most 72 characters"))]
    pub email: Option<String>,
}

impl Schema for UpdateUser {
    fn parse(value: &Value) -> Result<Self, Vec<FieldError>> {
        let mut fields = Fields::of(value)?;
        let schema = UpdateUser {
            name: fields.optional_string("name"),
            password: fields.optional_string("password"),
            email: fields.optional_string("email"),
        };
        fields.finish_with(schema)
    }
}
