use serde::{Deserialize, Serialize};

use crate::db::{Movie, MovieUpdate, User};

/// Outcome of a mutating request, shown to the user as a one-line message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub success: bool,
    pub message: String,
}

impl Notice {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserMovies {
    pub user: User,
    pub movies: Vec<Movie>,
}

#[derive(Debug, Deserialize)]
pub struct NewUserForm {
    #[serde(default)]
    pub user_name: String,
}

#[derive(Debug, Deserialize)]
pub struct NewMovieForm {
    #[serde(default)]
    pub movie_title: String,
}

/// Fields left out of the form keep their stored value; an optional field
/// sent empty is cleared.
#[derive(Debug, Deserialize)]
pub struct UpdateMovieForm {
    #[serde(default)]
    pub new_movie_name: Option<String>,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub poster_url: Option<String>,
}

impl From<UpdateMovieForm> for MovieUpdate {
    fn from(form: UpdateMovieForm) -> Self {
        MovieUpdate {
            name: form.new_movie_name,
            director: form.director,
            year: form.year,
            poster_url: form.poster_url,
        }
    }
}
