use async_trait::async_trait;

use super::model::*;

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn create_user(&self, name: &str) -> DbResult<User>;
    async fn list_users(&self) -> DbResult<Vec<User>>;
    async fn get_user_by_id(&self, id: i64) -> DbResult<Option<User>>;
    async fn get_user_by_name(&self, name: &str) -> DbResult<Option<User>>;
    /// Removes the user together with every movie it owns.
    async fn delete_user(&self, id: i64) -> DbResult<()>;
}

#[async_trait]
pub trait MovieRepo: Send + Sync {
    /// Fails with `NotFound` when the owning user does not exist.
    async fn add_movie(&self, movie: &NewMovie) -> DbResult<Movie>;
    async fn get_movie(&self, id: i64) -> DbResult<Option<Movie>>;
    async fn list_movies_by_user(&self, user_id: i64) -> DbResult<Vec<Movie>>;
    async fn update_movie(&self, id: i64, update: &MovieUpdate) -> DbResult<Movie>;
    async fn delete_movie(&self, id: i64) -> DbResult<()>;
}

pub trait Repository: UserRepo + MovieRepo + Send + Sync {}

impl<T: UserRepo + MovieRepo> Repository for T {}
