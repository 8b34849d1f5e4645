use axum::{
    Json,
    extract::{FromRequest, Request},
    http::StatusCode,
};
use serde::de::DeserializeOwned;
use shared::errors::ErrorResponse;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

/// JSON body extractor that also runs the payload's `validator` rules.
/// Both malformed JSON and rule violations are answered with the service's
/// error envelope.
pub struct SimpleValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for SimpleValidatedJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                (
                    rejection.status(),
                    Json(ErrorResponse {
                        status: "error".to_string(),
                        message: format!("Invalid JSON: {}", rejection.body_text()),
                    }),
                )
            })?;

        value.validate().map_err(|errors| {
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    status: "error".to_string(),
                    message: format!("Validation failed: {}", format_validation_errors(&errors)),
                }),
            )
        })?;

        Ok(Self(value))
    }
}

/// Flattens nested and list errors into `path: message` pairs, sorted so the
/// output is stable.
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();
    collect(errors, "", &mut messages);
    messages.sort();

    if messages.is_empty() {
        "invalid request".to_string()
    } else {
        messages.join("; ")
    }
}

fn collect(errors: &ValidationErrors, prefix: &str, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| match error.code.as_ref() {
                            "length" => "Invalid length".to_string(),
                            "range" => "Value out of range".to_string(),
                            _ => format!("Invalid {field}"),
                        });
                    out.push(format!("{path}: {message}"));
                }
            }
            ValidationErrorsKind::Struct(inner) => collect(inner, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect(inner, &format!("{path}[{index}]"), out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::requests::order::{CreateOrderItemRequest, CreateOrderRequest};

    #[test]
    fn nested_line_errors_carry_their_index() {
        let req = CreateOrderRequest {
            items: vec![
                CreateOrderItemRequest {
                    product_id: 1,
                    quantity: 3,
                },
                CreateOrderItemRequest {
                    product_id: 2,
                    quantity: 0,
                },
            ],
        };

        let errors = req.validate().unwrap_err();

        assert_eq!(
            format_validation_errors(&errors),
            "items[1].quantity: quantity must be at least 1"
        );
    }
}
