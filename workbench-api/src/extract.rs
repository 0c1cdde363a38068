//! Request extractors that reject with [`ApiError`]
//!
//! axum's own `Json`, `Path` and `Query` reject with plain-text bodies; these
//! wrappers route every rejection through the JSON error format instead.

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Query},
    http::{request::Parts, Uri},
};
use serde::{de::DeserializeOwned, Deserialize};
use validator::Validate;
use workbench_shared::query::Pagination;

use crate::error::ApiError;

/// Default page size for list endpoints
pub const DEFAULT_LIMIT: i64 = 20;

/// Default ordering for list endpoints
pub const DEFAULT_SORT: &str = "created_at desc";

/// JSON body extractor
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path parameter extractor
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// Paging parameters shared by every list endpoint
#[derive(Debug, Default, Deserialize, Validate)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,

    #[validate(length(max = 256, message = "Sort expression is too long"))]
    pub sort: Option<String>,
}

impl From<PageQuery> for Pagination {
    fn from(q: PageQuery) -> Self {
        Pagination::new(
            q.limit.unwrap_or(DEFAULT_LIMIT),
            q.offset.unwrap_or(0),
            q.sort
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SORT.to_string()),
        )
    }
}

/// Resource filter plus pagination from the query string
///
/// Parameters with an empty value (`?price_from=&name=`) are dropped before
/// deserializing, so they count as absent rather than failing to parse.
pub struct ListQuery<F> {
    pub filter: F,
    pub page: Pagination,
}

/// Removes `key=` pairs with no value
fn strip_empty_params(query: &str) -> String {
    query
        .split('&')
        .filter(|pair| matches!(pair.split_once('='), Some((k, v)) if !k.is_empty() && !v.is_empty()))
        .collect::<Vec<_>>()
        .join("&")
}

#[async_trait]
impl<F, S> FromRequestParts<S> for ListQuery<F>
where
    F: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = strip_empty_params(parts.uri.query().unwrap_or_default());
        let uri: Uri = format!("/?{}", query)
            .parse()
            .map_err(|_| ApiError::BadRequest("Invalid query string".to_string()))?;

        let Query(filter) = Query::<F>::try_from_uri(&uri)?;
        let Query(page) = Query::<PageQuery>::try_from_uri(&uri)?;
        page.validate()?;

        Ok(Self {
            filter,
            page: page.into(),
        })
    }
}
