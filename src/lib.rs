//! JSON API over a news dataset: topics, articles, comments and users.
//!
//! Every route lives under `/api`. Failures are rendered as
//! `{ "message": ... }` by [`types::ApiError`] or by the catchers below.

#[macro_use]
extern crate error_chain;
#[macro_use]
extern crate lazy_static;

pub mod article;
pub mod comment;
pub mod config;
pub mod db;
pub mod endpoints;
pub mod errors;
pub mod logging;
pub mod topic;
pub mod types;
pub mod users;
pub mod utils;

use rocket::request::Request;
use rocket::serde::json::Json;
use rocket::{catch, catchers, routes, Build, Rocket};
use types::{ErrorBody, INTERNAL, INVALID_PATH};

#[catch(404)]
fn not_found(_req: &Request) -> Json<ErrorBody<'static>> {
    Json(ErrorBody { message: INVALID_PATH })
}

#[catch(400)]
fn bad_request(_req: &Request) -> Json<ErrorBody<'static>> {
    Json(ErrorBody { message: "Bad Request" })
}

#[catch(500)]
fn internal_error(_req: &Request) -> Json<ErrorBody<'static>> {
    Json(ErrorBody { message: INTERNAL })
}

/// Assembles the application around an existing pool.
pub fn rocket(pool: db::Pool) -> Rocket<Build> {
    rocket::build()
        .manage(pool)
        .attach(logging::RequestLogger)
        .mount(
            "/api",
            routes![
                endpoints::index,
                topic::list,
                article::list,
                article::get,
                article::update,
                comment::list,
                comment::add,
                comment::delete,
                users::list,
            ],
        )
        .register("/", catchers![not_found, bad_request, internal_error])
}
