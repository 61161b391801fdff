use crate::db::schema::articles;
use crate::db::{self, Pool};
use crate::topic::Topic;
use crate::types::*;
use crate::utils::serialize_date;
use chrono::NaiveDateTime;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Integer, Nullable, Timestamp, Varchar};
use diesel::{select, sql_query};
use rocket::serde::json::{self, Json};
use rocket::{get, patch, State};
use serde::{Deserialize, Serialize};

static SELECT_ARTICLES: &str = "select articles.article_id,
       articles.title,
       articles.topic,
       articles.author,
       articles.created_at,
       articles.votes,
       articles.article_img_url,
       count(comments.comment_id) as comment_count
  from articles left join comments on comments.article_id = articles.article_id
 where ($1::varchar is null or articles.topic = $1::varchar)
 group by articles.article_id
 order by articles.created_at desc, articles.article_id desc;";

static SELECT_ARTICLE: &str = "select articles.article_id,
       articles.title,
       articles.topic,
       articles.author,
       articles.body,
       articles.created_at,
       articles.votes,
       articles.article_img_url,
       count(comments.comment_id) as comment_count
  from articles left join comments on comments.article_id = articles.article_id
 where articles.article_id = $1
 group by articles.article_id;";

/// A row of the `articles` table as stored.
#[derive(Debug, Queryable, Selectable, Identifiable, Serialize, PartialEq)]
#[diesel(table_name = articles, primary_key(article_id))]
pub struct Article {
    pub article_id: i32,
    pub title: String,
    pub topic: String,
    pub author: String,
    pub body: String,
    #[serde(serialize_with = "serialize_date")]
    pub created_at: NaiveDateTime,
    pub votes: i32,
    pub article_img_url: Option<String>,
}

impl Article {
    /// Fails with 404 unless an article with `id` exists.
    pub fn ensure_exists(id: i32, connection: &mut PgConnection) -> Result<(), ApiError> {
        let found = select(exists(articles::table.find(id))).get_result::<bool>(connection)?;
        if found {
            Ok(())
        } else {
            Err(ApiError::not_found(NO_SUCH_ARTICLE))
        }
    }

    /// Adds `inc_votes` (possibly negative) in a single UPDATE. `None` if no
    /// such article.
    pub fn add_votes(
        id: i32,
        inc_votes: i32,
        connection: &mut PgConnection,
    ) -> QueryResult<Option<Article>> {
        diesel::update(articles::table.find(id))
            .set(articles::votes.eq(articles::votes + inc_votes))
            .returning(Article::as_returning())
            .get_result(connection)
            .optional()
    }
}

/// List entry: no body, plus the number of comments.
#[derive(Debug, QueryableByName, Serialize)]
pub struct ArticleSummary {
    #[diesel(sql_type = Integer)]
    pub article_id: i32,
    #[diesel(sql_type = Varchar)]
    pub title: String,
    #[diesel(sql_type = Varchar)]
    pub topic: String,
    #[diesel(sql_type = Varchar)]
    pub author: String,
    #[diesel(sql_type = Timestamp)]
    #[serde(serialize_with = "serialize_date")]
    pub created_at: NaiveDateTime,
    #[diesel(sql_type = Integer)]
    pub votes: i32,
    #[diesel(sql_type = Nullable<Varchar>)]
    pub article_img_url: Option<String>,
    #[diesel(sql_type = BigInt)]
    pub comment_count: i64,
}

impl ArticleSummary {
    /// Newest first; restricted to `topic` when given.
    pub fn load(topic: Option<&str>, connection: &mut PgConnection) -> QueryResult<Vec<ArticleSummary>> {
        sql_query(SELECT_ARTICLES)
            .bind::<Nullable<Varchar>, _>(topic)
            .load(connection)
    }
}

/// A single article with its body and comment count.
#[derive(Debug, QueryableByName, Serialize)]
pub struct ArticleDetail {
    #[diesel(sql_type = Integer)]
    pub article_id: i32,
    #[diesel(sql_type = Varchar)]
    pub title: String,
    #[diesel(sql_type = Varchar)]
    pub topic: String,
    #[diesel(sql_type = Varchar)]
    pub author: String,
    #[diesel(sql_type = Varchar)]
    pub body: String,
    #[diesel(sql_type = Timestamp)]
    #[serde(serialize_with = "serialize_date")]
    pub created_at: NaiveDateTime,
    #[diesel(sql_type = Integer)]
    pub votes: i32,
    #[diesel(sql_type = Nullable<Varchar>)]
    pub article_img_url: Option<String>,
    #[diesel(sql_type = BigInt)]
    pub comment_count: i64,
}

impl ArticleDetail {
    pub fn load(id: i32, connection: &mut PgConnection) -> QueryResult<Option<ArticleDetail>> {
        sql_query(SELECT_ARTICLE)
            .bind::<Integer, _>(id)
            .get_result(connection)
            .optional()
    }
}

#[derive(Debug, Serialize)]
pub struct ArticlesResponse {
    articles: Vec<ArticleSummary>,
}

#[derive(Debug, Serialize)]
pub struct ArticleResponse<T> {
    article: T,
}

#[derive(Debug, Deserialize)]
pub struct VoteUpdate {
    inc_votes: Option<i32>,
}

#[get("/articles?<topic>")]
pub async fn list(topic: Option<String>, pool: &State<Pool>) -> ApiResult<ArticlesResponse> {
    let topic = topic.filter(|slug| !slug.is_empty());
    let articles = db::run(pool, move |connection| {
        let articles = ArticleSummary::load(topic.as_deref(), connection)?;
        // An empty page is only a 404 when the topic itself is unknown.
        if let (true, Some(slug)) = (articles.is_empty(), topic.as_deref()) {
            Topic::ensure_exists(slug, connection)?;
        }
        Ok(articles)
    })
    .await?;
    Ok(Json(ArticlesResponse { articles }))
}

#[get("/articles/<article_id>")]
pub async fn get(article_id: &str, pool: &State<Pool>) -> ApiResult<ArticleResponse<ArticleDetail>> {
    let article_id = parse_id(article_id, INVALID_ARTICLE_ID)?;
    let article = db::run(pool, move |connection| {
        ArticleDetail::load(article_id, connection)?.ok_or_else(|| ApiError::not_found(NO_SUCH_ARTICLE))
    })
    .await?;
    Ok(Json(ArticleResponse { article }))
}

#[patch("/articles/<article_id>", data = "<vote>")]
pub async fn update(
    article_id: &str,
    vote: Result<Json<VoteUpdate>, json::Error<'_>>,
    pool: &State<Pool>,
) -> ApiResult<ArticleResponse<Article>> {
    let article_id = parse_id(article_id, INVALID_ARTICLE_ID)?;
    let inc_votes = json_body(vote)?
        .inc_votes
        .ok_or_else(|| ApiError::bad_request(MISSING_FIELDS))?;

    let article = db::run(pool, move |connection| {
        Article::add_votes(article_id, inc_votes, connection)?.ok_or_else(|| ApiError::not_found(NO_SUCH_ARTICLE))
    })
    .await?;
    Ok(Json(ArticleResponse { article }))
}
