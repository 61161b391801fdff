use crate::db::schema::topics;
use crate::db::{self, Pool};
use crate::types::{ApiError, ApiResult, NO_SUCH_TOPIC};
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel::select;
use rocket::serde::json::Json;
use rocket::{get, State};
use serde::Serialize;

#[derive(Debug, Queryable, Selectable, Identifiable, Serialize, PartialEq)]
#[diesel(table_name = topics, primary_key(slug))]
pub struct Topic {
    pub slug: String,
    pub description: String,
}

impl Topic {
    pub fn load_all(connection: &mut PgConnection) -> QueryResult<Vec<Topic>> {
        topics::table
            .select(Topic::as_select())
            .order(topics::slug.asc())
            .load(connection)
    }

    /// Fails with 404 unless `slug` names a topic.
    pub fn ensure_exists(slug: &str, connection: &mut PgConnection) -> Result<(), ApiError> {
        let found = select(exists(topics::table.find(slug))).get_result::<bool>(connection)?;
        if found {
            Ok(())
        } else {
            Err(ApiError::not_found(NO_SUCH_TOPIC))
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TopicsResponse {
    topics: Vec<Topic>,
}

#[get("/topics")]
pub async fn list(pool: &State<Pool>) -> ApiResult<TopicsResponse> {
    let topics = db::run(pool, |connection| Ok(Topic::load_all(connection)?)).await?;
    Ok(Json(TopicsResponse { topics }))
}
