use crate::db::{self, Pool};
use crate::types::ApiResult;
use rocket::serde::json::Json;
use rocket::{get, State};
use serde::Serialize;

pub mod models;

pub use self::models::User;

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    users: Vec<User>,
}

#[get("/users")]
pub async fn list(pool: &State<Pool>) -> ApiResult<UsersResponse> {
    let users = db::run(pool, |connection| Ok(User::load_all(connection)?)).await?;
    Ok(Json(UsersResponse { users }))
}
