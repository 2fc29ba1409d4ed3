use axum::{
    extract::Request,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::catalog::Catalog;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
}

impl AppState {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }
}

pub fn build_router(state: AppState) -> Router {
    let web_routes = Router::new()
        .route("/", get(crate::web::list_users))
        .route(
            "/users",
            get(crate::web::list_users).post(crate::web::create_user),
        )
        .route("/users/:user_id/delete", post(crate::web::delete_user))
        .route(
            "/users/:user_id/movies",
            get(crate::web::get_movies).post(crate::web::add_movie),
        )
        .route(
            "/users/:user_id/movies/:movie_id/update",
            post(crate::web::update_movie),
        )
        .route(
            "/users/:user_id/movies/:movie_id/delete",
            post(crate::web::delete_movie),
        );

    Router::new()
        .merge(web_routes)
        .fallback(fallback_handler)
        .layer(axum::middleware::from_fn(crate::middleware::log_request))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn fallback_handler(req: Request) -> impl IntoResponse {
    if req.method() == axum::http::Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    StatusCode::NOT_FOUND.into_response()
}
