//! GraphQL endpoint
//!
//! POST executes a request body. GET executes a query carried in the query
//! string, or serves the GraphiQL IDE when there is none. Mutations are only
//! accepted over POST.

use async_graphql::http::{parse_query_string, GraphiQLSource};
use async_graphql::parser::{parse_query, types::OperationType};
use async_graphql::ServerError;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::{RawQuery, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::state::AppState;

pub const GRAPHQL_PATH: &str = "/api/graphql";

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// POST /api/graphql - Execute a query or mutation
async fn graphql_post(State(state): State<AppState>, req: GraphQLRequest) -> GraphQLResponse {
    state.schema().execute(req.into_inner()).await.into()
}

/// Whether the document declares anything other than a query.
///
/// Unparseable documents report false; execution turns them into the usual
/// syntax error.
fn declares_non_query(document: &str) -> bool {
    parse_query(document)
        .map(|doc| {
            doc.operations
                .iter()
                .any(|(_, op)| op.node.ty != OperationType::Query)
        })
        .unwrap_or(false)
}

/// GET /api/graphql - Execute a query from the query string, or serve GraphiQL
async fn graphql_get(State(state): State<AppState>, RawQuery(query): RawQuery) -> Response {
    let Some(query) = query.filter(|q| !q.is_empty()) else {
        return Html(GraphiQLSource::build().endpoint(GRAPHQL_PATH).finish()).into_response();
    };

    match parse_query_string(&query) {
        Ok(request) if declares_non_query(&request.query) => {
            tracing::warn!("Rejected mutation sent over GET");
            let response = async_graphql::Response::from_errors(vec![ServerError::new(
                "Mutations must be sent with POST",
                None,
            )]);
            (
                StatusCode::METHOD_NOT_ALLOWED,
                [(header::ALLOW, "POST")],
                GraphQLResponse::from(response),
            )
                .into_response()
        }
        Ok(request) => GraphQLResponse::from(state.schema().execute(request).await).into_response(),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}

/// GET /api/graphql/schema - Schema definition language for tooling
async fn graphql_schema(State(state): State<AppState>) -> String {
    state.schema().sdl()
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(GRAPHQL_PATH, get(graphql_get).post(graphql_post))
        .route("/api/graphql/schema", get(graphql_schema))
}
