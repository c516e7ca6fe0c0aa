use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{info, warn};

use super::query::{ProxyQuery, QueryShapeError};
use crate::omdb::OmdbError;
use crate::server::AppState;
use crate::util::QueryParams;

/// Forward a search or lookup to the upstream movie database.
///
/// Returns the upstream JSON body byte for byte with 200, or 422 with the failure text when the
/// query has the wrong shape or the upstream call fails.
pub async fn movie_proxy(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Response, ProxyError> {
    let query = ProxyQuery::from_params(&params)?;

    let body = match &query {
        ProxyQuery::Search { title, page } => {
            info!(title = %title, page = page, "Proxying title search");
            state.omdb.search(title, *page).await?
        }
        ProxyQuery::Lookup { id } => {
            info!(id = %id, "Proxying lookup");
            state.omdb.lookup(id).await?
        }
    };

    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error(transparent)]
    Shape(#[from] QueryShapeError),
    #[error(transparent)]
    Upstream(#[from] OmdbError),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        warn!(error = %self, "Proxy request rejected");
        (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()).into_response()
    }
}
