use crate::article::Article;
use crate::db::schema::comments;
use crate::db::{self, Pool};
use crate::types::*;
use crate::utils::serialize_date;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::{delete as diesel_delete, insert_into};
use rocket::http::Status;
use rocket::response::status::{Custom, NoContent};
use rocket::serde::json::{self, Json};
use rocket::{delete, get, post, State};
use serde::{Deserialize, Serialize};

#[derive(Debug, Queryable, Selectable, Identifiable, Serialize, PartialEq)]
#[diesel(table_name = comments, primary_key(comment_id))]
pub struct Comment {
    pub comment_id: i32,
    pub body: String,
    pub article_id: i32,
    pub author: String,
    pub votes: i32,
    #[serde(serialize_with = "serialize_date")]
    pub created_at: NaiveDateTime,
}

/// Missing fields stay `None` and are inserted as `DEFAULT`; the schema's
/// not-null constraints reject them.
#[derive(Debug, Insertable)]
#[diesel(table_name = comments)]
pub struct NewComment<'a> {
    pub article_id: i32,
    pub author: Option<&'a str>,
    pub body: Option<&'a str>,
}

impl Comment {
    /// Most recent first.
    pub fn for_article(article_id: i32, connection: &mut PgConnection) -> QueryResult<Vec<Comment>> {
        comments::table
            .filter(comments::article_id.eq(article_id))
            .select(Comment::as_select())
            .order((comments::created_at.desc(), comments::comment_id.desc()))
            .load(connection)
    }

    pub fn create(new_comment: &NewComment, connection: &mut PgConnection) -> QueryResult<Comment> {
        insert_into(comments::table)
            .values(new_comment)
            .returning(Comment::as_returning())
            .get_result(connection)
    }

    /// Returns whether a row was removed.
    pub fn delete(comment_id: i32, connection: &mut PgConnection) -> QueryResult<bool> {
        let removed = diesel_delete(comments::table.find(comment_id)).execute(connection)?;
        Ok(removed > 0)
    }
}

#[derive(Debug, Deserialize)]
pub struct CommentBody {
    username: Option<String>,
    body: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CommentContainer<T> {
    comment: T,
}

#[derive(Debug, Serialize)]
pub struct CommentsContainer<T> {
    comments: T,
}

#[get("/articles/<article_id>/comments")]
pub async fn list(article_id: &str, pool: &State<Pool>) -> ApiResult<CommentsContainer<Vec<Comment>>> {
    let article_id = parse_id(article_id, INVALID_ARTICLE_ID)?;
    let comments = db::run(pool, move |connection| {
        let comments = Comment::for_article(article_id, connection)?;
        if comments.is_empty() {
            Article::ensure_exists(article_id, connection)?;
        }
        Ok(comments)
    })
    .await?;
    Ok(Json(CommentsContainer { comments }))
}

#[post("/articles/<article_id>/comments", data = "<details>")]
pub async fn add(
    article_id: &str,
    details: Result<Json<CommentBody>, json::Error<'_>>,
    pool: &State<Pool>,
) -> Result<Custom<Json<CommentContainer<Comment>>>, ApiError> {
    let article_id = parse_id(article_id, INVALID_ARTICLE_ID)?;
    let details = json_body(details)?;

    // Unknown articles and users are reported by the foreign keys.
    let comment = db::run(pool, move |connection| {
        let new_comment = NewComment {
            article_id,
            author: details.username.as_deref(),
            body: details.body.as_deref(),
        };
        Ok(Comment::create(&new_comment, connection)?)
    })
    .await?;
    Ok(Custom(Status::Created, Json(CommentContainer { comment })))
}

#[delete("/comments/<comment_id>")]
pub async fn delete(comment_id: &str, pool: &State<Pool>) -> Result<NoContent, ApiError> {
    let comment_id = parse_id(comment_id, INVALID_COMMENT_ID)?;
    let removed = db::run(pool, move |connection| Ok(Comment::delete(comment_id, connection)?)).await?;
    if removed {
        Ok(NoContent)
    } else {
        Err(ApiError::not_found(NO_SUCH_COMMENT))
    }
}
