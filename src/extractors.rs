use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::Error;

const NON_FIELD: &str = "non_field_errors";
const DATA_ERROR_PREFIX: &str = "Failed to deserialize the JSON body into the target type: ";

/// `Json` body whose rejections are reported in the same `validation_failed`
/// shape as rule failures, keyed by the offending field.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(body_error(rejection)),
        }
    }
}

fn body_error(rejection: JsonRejection) -> Error {
    let (field, message) = match rejection {
        JsonRejection::JsonDataError(err) => split_data_error(&err.body_text()),
        JsonRejection::JsonSyntaxError(_) => (NON_FIELD.to_string(), "JSON parse error.".to_string()),
        other => (NON_FIELD.to_string(), other.body_text()),
    };
    tracing::debug!(%field, %message, "request body rejected");
    Error::InvalidBody { field, message }
}

/// Splits `path: message at line L column C` into the field path and a bare
/// message. Errors without a usable path land under `non_field_errors`.
fn split_data_error(text: &str) -> (String, String) {
    let detail = text.strip_prefix(DATA_ERROR_PREFIX).unwrap_or(text);
    let detail = match detail.rfind(" at line ") {
        Some(at) => &detail[..at],
        None => detail,
    };
    match detail.split_once(": ") {
        Some((path, message)) if is_field_path(path) => (path.to_string(), message.to_string()),
        _ => (NON_FIELD.to_string(), detail.to_string()),
    }
}

fn is_field_path(path: &str) -> bool {
    !path.is_empty() && path != "." && !path.contains(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::header};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Tags {
        #[serde(default)]
        skills: Vec<String>,
    }

    async fn extract(raw: &str) -> Result<ValidatedJson<Tags>, Error> {
        let req = Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(raw.to_owned()))
            .expect("request");
        ValidatedJson::<Tags>::from_request(req, &()).await
    }

    #[test]
    fn data_errors_are_keyed_by_their_path() {
        let (field, message) = split_data_error(
            "Failed to deserialize the JSON body into the target type: projects[0].title: \
             invalid type: integer `5`, expected a string at line 1 column 30",
        );
        assert_eq!(field, "projects[0].title");
        assert_eq!(message, "invalid type: integer `5`, expected a string");
    }

    #[test]
    fn pathless_errors_fall_back_to_non_field() {
        let (field, message) = split_data_error(
            "Failed to deserialize the JSON body into the target type: \
             invalid type: string \"x\", expected struct Body at line 1 column 3",
        );
        assert_eq!(field, NON_FIELD);
        assert_eq!(message, "invalid type: string \"x\", expected struct Body");
    }

    #[tokio::test]
    async fn wrong_types_are_reported_on_the_field() {
        match extract(r#"{"skills": 5}"#).await {
            Err(Error::InvalidBody { field, .. }) => assert_eq!(field, "skills"),
            Err(other) => panic!("unexpected error: {other:?}"),
            Ok(_) => panic!("body should be rejected"),
        }
    }

    #[tokio::test]
    async fn broken_json_is_a_parse_error() {
        match extract(r#"{"skills": ["#).await {
            Err(Error::InvalidBody { field, message }) => {
                assert_eq!(field, NON_FIELD);
                assert_eq!(message, "JSON parse error.");
            }
            Err(other) => panic!("unexpected error: {other:?}"),
            Ok(_) => panic!("body should be rejected"),
        }
    }

    #[tokio::test]
    async fn well_formed_bodies_pass_through() {
        let ValidatedJson(body) = extract(r#"{"skills": ["rust"]}"#).await.expect("body");
        assert_eq!(body.skills, vec!["rust".to_string()]);
    }
}
