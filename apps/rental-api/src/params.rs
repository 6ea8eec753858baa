//! # Request Parameters
//!
//! `customer_id` and `video_id` may arrive in a JSON body, a URL-encoded
//! form body or the query string. Body values win over query values.
//!
//! An id that is absent, `null`, non-numeric or fractional resolves to
//! `None`, which the handlers answer with 404 like any id that matches no
//! record. Only a body that cannot be parsed at all is a 400.

use axum::extract::{FromRequest, Query, Request};
use axum::http::header::CONTENT_TYPE;
use axum::{Form, Json};
use serde::de::IgnoredAny;
use serde::Deserialize;

use reel_core::{CustomerId, VideoId};

use crate::error::ApiError;

/// One id as it appears on the wire.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IdParam {
    Int(i64),
    Text(String),
    Other(IgnoredAny),
}

impl IdParam {
    fn resolve(&self) -> Option<i64> {
        match self {
            IdParam::Int(id) => Some(*id),
            IdParam::Text(text) => text.trim().parse().ok(),
            IdParam::Other(_) => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawParams {
    customer_id: Option<IdParam>,
    video_id: Option<IdParam>,
}

impl RawParams {
    fn or(self, fallback: RawParams) -> RawParams {
        RawParams {
            customer_id: self.customer_id.or(fallback.customer_id),
            video_id: self.video_id.or(fallback.video_id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Json,
    Form,
    None,
}

fn body_kind(req: &Request) -> BodyKind {
    let Some(content_type) = req.headers().get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return BodyKind::None;
    };

    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if mime == "application/json" || mime.ends_with("+json") {
        BodyKind::Json
    } else if mime == "application/x-www-form-urlencoded" {
        BodyKind::Form
    } else {
        BodyKind::None
    }
}

/// Ids of a check-out or check-in request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RentalParams {
    pub customer_id: Option<CustomerId>,
    pub video_id: Option<VideoId>,
}

impl RentalParams {
    /// Both ids, if both resolved.
    pub fn ids(&self) -> Option<(CustomerId, VideoId)> {
        Some((self.customer_id?, self.video_id?))
    }
}

impl<S> FromRequest<S> for RentalParams
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let query = Query::<RawParams>::try_from_uri(req.uri())
            .map(|Query(raw)| raw)
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;

        let raw = match body_kind(&req) {
            BodyKind::Json => {
                let Json(body) = Json::<RawParams>::from_request(req, state)
                    .await
                    .map_err(|e| ApiError::BadRequest(e.body_text()))?;
                body.or(query)
            }
            BodyKind::Form => {
                let Form(body) = Form::<RawParams>::from_request(req, state)
                    .await
                    .map_err(|e| ApiError::BadRequest(e.body_text()))?;
                body.or(query)
            }
            BodyKind::None => query,
        };

        Ok(RentalParams {
            customer_id: raw.customer_id.as_ref().and_then(IdParam::resolve).map(CustomerId),
            video_id: raw.video_id.as_ref().and_then(IdParam::resolve).map(VideoId),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Method;

    async fn extract(uri: &str, content_type: Option<&str>, body: &str) -> Result<RentalParams, ApiError> {
        let mut builder = axum::http::Request::builder().method(Method::POST).uri(uri);
        if let Some(content_type) = content_type {
            builder = builder.header(CONTENT_TYPE, content_type);
        }
        let req = builder.body(Body::from(body.to_string())).unwrap();
        RentalParams::from_request(req, &()).await
    }

    #[tokio::test]
    async fn test_json_body() {
        let params = extract("/check_out", Some("application/json"), r#"{"customer_id": 1, "video_id": "2"}"#)
            .await
            .unwrap();
        assert_eq!(params.ids(), Some((CustomerId(1), VideoId(2))));
    }

    #[tokio::test]
    async fn test_form_body() {
        let params = extract(
            "/check_out",
            Some("application/x-www-form-urlencoded; charset=utf-8"),
            "customer_id=3&video_id=4",
        )
        .await
        .unwrap();
        assert_eq!(params.ids(), Some((CustomerId(3), VideoId(4))));
    }

    #[tokio::test]
    async fn test_query_string() {
        let params = extract("/check_in?customer_id=5&video_id=6", None, "").await.unwrap();
        assert_eq!(params.ids(), Some((CustomerId(5), VideoId(6))));
    }

    #[tokio::test]
    async fn test_body_wins_over_query() {
        let params = extract(
            "/check_in?customer_id=5&video_id=6",
            Some("application/json"),
            r#"{"video_id": 7}"#,
        )
        .await
        .unwrap();
        assert_eq!(params.ids(), Some((CustomerId(5), VideoId(7))));
    }

    #[tokio::test]
    async fn test_unusable_ids_resolve_to_none() {
        let params = extract(
            "/check_out",
            Some("application/json"),
            r#"{"customer_id": "abc", "video_id": 1.5}"#,
        )
        .await
        .unwrap();
        assert_eq!(params.customer_id, None);
        assert_eq!(params.video_id, None);
        assert_eq!(params.ids(), None);

        let params = extract("/check_out", Some("application/json"), r#"{"customer_id": null}"#)
            .await
            .unwrap();
        assert_eq!(params.ids(), None);
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let err = extract("/check_out", Some("application/json"), "{customer_id:").await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
