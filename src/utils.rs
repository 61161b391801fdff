use chrono::{NaiveDateTime, SecondsFormat};
use rocket::http::Status;
use rocket::request::Request;
use rocket::response::content::RawJson;
use rocket::response::{self, Responder, Response};
use serde::{Serialize, Serializer};

pub fn try_respond<T: Serialize>(
    req: &Request,
    body: &T,
    status: Status,
) -> response::Result<'static> {
    let as_json = serde_json::to_string(body);
    match as_json {
        Ok(json) => {
            let resp = RawJson(json).respond_to(req)?;
            Response::build_from(resp).status(status).ok()
        }
        Err(_) => Err(Status::InternalServerError),
    }
}

/// Timestamps are stored without a zone and are UTC by convention.
pub fn serialize_date<S>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let s = date.and_utc().to_rfc3339_opts(SecondsFormat::Millis, true);
    serializer.serialize_str(&s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[derive(Serialize)]
    struct Stamped {
        #[serde(serialize_with = "serialize_date")]
        created_at: NaiveDateTime,
    }

    #[test]
    fn dates_serialize_as_utc_millis() {
        let created_at = NaiveDate::from_ymd_opt(2020, 7, 9)
            .and_then(|d| d.and_hms_opt(20, 11, 0))
            .unwrap();
        let json = serde_json::to_value(Stamped { created_at }).unwrap();
        assert_eq!(json["created_at"], "2020-07-09T20:11:00.000Z");
    }
}
