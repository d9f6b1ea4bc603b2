//! JSON body extractor that runs `validator` rules
//!
//! Malformed JSON is a 400; a body that parses but breaks a rule is a 422
//! whose message lists every failing field, nested ones as `image.data`.

use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::Json;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use super::ApiError;

/// `Json<T>` plus `T::validate()`; rejections use the API envelope.
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::bad_request(format!("Invalid JSON: {}", rejection.body_text())))?;

        value.validate().map_err(|e| validation_error(&e))?;
        Ok(ValidatedJson(value))
    }
}

/// 422 listing each failing field, sorted for stable output.
pub fn validation_error(errors: &ValidationErrors) -> ApiError {
    let mut messages = Vec::new();
    collect(errors, "", &mut messages);
    messages.sort();

    let message = if messages.is_empty() {
        "Validation failed".to_string()
    } else {
        messages.join("; ")
    };
    ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, message)
}

fn collect(errors: &ValidationErrors, prefix: &str, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };
        match kind {
            ValidationErrorsKind::Field(errs) => {
                for e in errs {
                    let msg = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    out.push(format!("{}: {}", path, msg));
                }
            }
            ValidationErrorsKind::Struct(inner) => collect(inner, &path, out),
            ValidationErrorsKind::List(items) => {
                for (idx, inner) in items {
                    collect(inner, &format!("{}[{}]", path, idx), out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::post;
    use axum::Router;
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Debug, Deserialize, Validate)]
    struct Cup {
        #[validate(range(max = 100, message = "sugar is a percentage"))]
        sugar: u8,
    }

    #[derive(Debug, Deserialize, Validate)]
    struct Order {
        #[validate(length(min = 1, message = "name is required"))]
        name: String,
        #[validate(nested)]
        cup: Cup,
    }

    async fn handler(ValidatedJson(order): ValidatedJson<Order>) -> String {
        order.name
    }

    async fn post_json(body: &'static str) -> StatusCode {
        let request = Request::builder()
            .method("POST")
            .uri("/order")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();
        Router::new()
            .route("/order", post(handler))
            .oneshot(request)
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn statuses() {
        assert_eq!(post_json(r#"{"name":"tea","cup":{"sugar":50}}"#).await, StatusCode::OK);
        assert_eq!(post_json("{oops").await, StatusCode::BAD_REQUEST);
        assert_eq!(
            post_json(r#"{"name":"","cup":{"sugar":150}}"#).await,
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn nested_fields_are_prefixed() {
        let order = Order {
            name: String::new(),
            cup: Cup { sugar: 150 },
        };
        let err = validation_error(&order.validate().unwrap_err());
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.message, "cup.sugar: sugar is a percentage; name: name is required");
    }
}
