use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Form, Json,
};

use super::types::*;
use crate::catalog::CatalogError;
use crate::db::MovieUpdate;
use crate::server::AppState;

fn status_for(err: &CatalogError) -> StatusCode {
    match err {
        CatalogError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        CatalogError::DuplicateName(_) => StatusCode::CONFLICT,
        CatalogError::UnknownUser(_)
        | CatalogError::MovieNotFound(_)
        | CatalogError::MetadataNotFound(_) => StatusCode::NOT_FOUND,
        CatalogError::Metadata(_) => StatusCode::BAD_GATEWAY,
        CatalogError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn failure(err: CatalogError) -> Response {
    (status_for(&err), Json(Notice::failed(err.to_string()))).into_response()
}

fn success(status: StatusCode, message: String) -> Response {
    (status, Json(Notice::ok(message))).into_response()
}

pub async fn list_users(State(state): State<AppState>) -> Response {
    match state.catalog.list_users().await {
        Ok(users) => Json(users).into_response(),
        Err(e) => failure(e),
    }
}

pub async fn create_user(
    State(state): State<AppState>,
    Form(form): Form<NewUserForm>,
) -> Response {
    match state.catalog.create_user(&form.user_name).await {
        Ok(user) => success(
            StatusCode::CREATED,
            format!("User '{}' added successfully!", user.name),
        ),
        Err(e) => failure(e),
    }
}

pub async fn delete_user(State(state): State<AppState>, Path(user_id): Path<i64>) -> Response {
    match state.catalog.delete_user(user_id).await {
        Ok(user) => success(
            StatusCode::OK,
            format!("User '{}' deleted successfully!", user.name),
        ),
        Err(e) => failure(e),
    }
}

pub async fn get_movies(State(state): State<AppState>, Path(user_id): Path<i64>) -> Response {
    let user = match state.catalog.get_user_by_id(user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => return failure(CatalogError::UnknownUser(user_id)),
        Err(e) => return failure(e),
    };

    match state.catalog.get_movies_by_user(user_id).await {
        Ok(movies) => Json(UserMovies { user, movies }).into_response(),
        Err(e) => failure(e),
    }
}

pub async fn add_movie(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Form(form): Form<NewMovieForm>,
) -> Response {
    match state.catalog.add_movie(user_id, &form.movie_title).await {
        Ok(movie) => success(
            StatusCode::CREATED,
            format!("Movie '{}' added successfully!", movie.name),
        ),
        Err(e) => failure(e),
    }
}

pub async fn update_movie(
    State(state): State<AppState>,
    Path((_user_id, movie_id)): Path<(i64, i64)>,
    Form(form): Form<UpdateMovieForm>,
) -> Response {
    let update = MovieUpdate::from(form);
    match state.catalog.update_movie(movie_id, &update).await {
        Ok(movie) => success(
            StatusCode::OK,
            format!("Movie updated to '{}' successfully!", movie.name),
        ),
        Err(e) => failure(e),
    }
}

pub async fn delete_movie(
    State(state): State<AppState>,
    Path((_user_id, movie_id)): Path<(i64, i64)>,
) -> Response {
    match state.catalog.delete_movie(movie_id).await {
        Ok(()) => success(StatusCode::OK, "Movie deleted successfully!".to_string()),
        Err(e) => failure(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::db::{Movie, SqliteRepository, User};
    use crate::metadata::testing::StaticMetadata;
    use axum::{body::Body, http::header, http::Request, Router};
    use serde::de::DeserializeOwned;
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn app() -> Router {
        let repo = Arc::new(SqliteRepository::in_memory().await.unwrap());
        let metadata = Arc::new(
            StaticMetadata::default()
                .with("Inception", Some("Christopher Nolan"), Some("2010"))
                .with("Heat", Some("Michael Mann"), Some("1995")),
        );
        let catalog = Arc::new(Catalog::new(repo, metadata));
        crate::server::build_router(AppState::new(catalog))
    }

    async fn get(app: &Router, uri: &str) -> Response {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        app.clone().oneshot(req).await.unwrap()
    }

    async fn post(app: &Router, uri: &str, form: &str) -> Response {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap();
        app.clone().oneshot(req).await.unwrap()
    }

    async fn body<T: DeserializeOwned>(resp: Response) -> T {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_list_users() {
        let app = app().await;

        let resp = post(&app, "/users", "user_name=Alice").await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(
            body::<Notice>(resp).await,
            Notice::ok("User 'Alice' added successfully!")
        );

        let resp = post(&app, "/users", "user_name=Alice").await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let notice: Notice = body(resp).await;
        assert!(!notice.success);
        assert_eq!(notice.message, "User 'Alice' already exists.");

        let resp = get(&app, "/").await;
        assert_eq!(resp.status(), StatusCode::OK);
        let users: Vec<User> = body(resp).await;
        assert_eq!(users, vec![User { id: 1, name: "Alice".to_string() }]);
    }

    #[tokio::test]
    async fn test_blank_user_name_is_bad_request() {
        let app = app().await;
        let resp = post(&app, "/users", "user_name=").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let resp = post(&app, "/users", "").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_movies_of_unknown_user_is_404() {
        let app = app().await;
        let resp = get(&app, "/users/9/movies").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_movie_flow() {
        let app = app().await;
        post(&app, "/users", "user_name=Alice").await;

        let resp = post(&app, "/users/1/movies", "movie_title=Inception").await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(
            body::<Notice>(resp).await.message,
            "Movie 'Inception' added successfully!"
        );

        let resp = post(&app, "/users/1/movies", "movie_title=Unknown+Film").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body::<Notice>(resp).await.message,
            "Movie 'Unknown Film' not found in OMDb."
        );

        let resp = post(
            &app,
            "/users/1/movies/1/update",
            "new_movie_name=Inception+%28director%27s+cut%29",
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            body::<Notice>(resp).await.message,
            "Movie updated to 'Inception (director's cut)' successfully!"
        );

        let resp = get(&app, "/users/1/movies").await;
        let listing: UserMovies = body(resp).await;
        assert_eq!(listing.user.name, "Alice");
        assert_eq!(
            listing.movies,
            vec![Movie {
                id: 1,
                user_id: 1,
                name: "Inception (director's cut)".to_string(),
                director: Some("Christopher Nolan".to_string()),
                year: Some("2010".to_string()),
                poster_url: None,
            }]
        );

        let resp = post(&app, "/users/1/movies/1/delete", "").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body::<Notice>(resp).await.message, "Movie deleted successfully!");

        let resp = post(&app, "/users/1/movies/1/delete", "").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_partial_update_form() {
        let app = app().await;
        post(&app, "/users", "user_name=Bob").await;
        post(&app, "/users/1/movies", "movie_title=Heat").await;

        let resp = post(&app, "/users/1/movies/1/update", "year=1996&director=").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            body::<Notice>(resp).await.message,
            "Movie updated to 'Heat' successfully!"
        );

        let listing: UserMovies = body(get(&app, "/users/1/movies").await).await;
        let movie = &listing.movies[0];
        assert_eq!(movie.name, "Heat");
        assert_eq!(movie.year.as_deref(), Some("1996"));
        assert_eq!(movie.director, None);
    }

    #[tokio::test]
    async fn test_delete_user_removes_movies() {
        let app = app().await;
        post(&app, "/users", "user_name=Carol").await;
        post(&app, "/users/1/movies", "movie_title=Heat").await;

        let resp = post(&app, "/users/1/delete", "").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            body::<Notice>(resp).await.message,
            "User 'Carol' deleted successfully!"
        );

        assert_eq!(get(&app, "/users/1/movies").await.status(), StatusCode::NOT_FOUND);
        let users: Vec<User> = body(get(&app, "/users").await).await;
        assert!(users.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let app = app().await;
        assert_eq!(get(&app, "/nope").await.status(), StatusCode::NOT_FOUND);
    }
}
