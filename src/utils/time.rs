use std::fmt;

use chrono::{DateTime, Duration, DurationRound, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::de::{self, Deserializer, Visitor};

/// Current time at the precision Postgres stores, so a record read back
/// compares equal to the one that was written.
pub fn now() -> DateTime<Utc> {
    let now = Utc::now();
    now.duration_trunc(Duration::microseconds(1)).unwrap_or(now)
}

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Reads RFC 3339, an offset-less timestamp (taken as UTC) or a bare
/// `YYYY-MM-DD` date (midnight UTC).
pub fn parse_flexible(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

struct FlexibleDateTime;

impl<'de> Visitor<'de> for FlexibleDateTime {
    type Value = Option<DateTime<Utc>>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a date or date-time string")
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        if v.trim().is_empty() {
            return Ok(None);
        }
        parse_flexible(v).map(Some).ok_or_else(|| {
            E::custom("Datetime has wrong format. Use YYYY-MM-DD or YYYY-MM-DDThh:mm[:ss][+HH:MM|Z].")
        })
    }
}

/// `deserialize_with` target for optional date fields.
pub fn opt_datetime<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    deserializer.deserialize_option(FlexibleDateTime)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).single().expect("valid instant")
    }

    #[test]
    fn now_has_no_sub_microsecond_part() {
        assert_eq!(now().nanosecond() % 1_000, 0);
    }

    #[test]
    fn accepts_every_date_form_the_forms_send() {
        assert_eq!(parse_flexible("1990-05-01"), Some(utc(1990, 5, 1, 0, 0, 0)));
        assert_eq!(
            parse_flexible("1990-05-01T08:30:00"),
            Some(utc(1990, 5, 1, 8, 30, 0))
        );
        assert_eq!(
            parse_flexible("1990-05-01 08:30:00.250"),
            Some(utc(1990, 5, 1, 8, 30, 0) + Duration::milliseconds(250))
        );
        assert_eq!(parse_flexible("1990-05-01T08:30"), Some(utc(1990, 5, 1, 8, 30, 0)));
        assert_eq!(
            parse_flexible("1990-05-01T10:30:00+02:00"),
            Some(utc(1990, 5, 1, 8, 30, 0))
        );
        assert_eq!(parse_flexible("1990-05-01T08:30:00Z"), Some(utc(1990, 5, 1, 8, 30, 0)));
    }

    #[test]
    fn rejects_what_is_not_a_date() {
        assert_eq!(parse_flexible("01/05/1990"), None);
        assert_eq!(parse_flexible("1990-13-01"), None);
        assert_eq!(parse_flexible("yesterday"), None);
    }

    #[test]
    fn optional_field_reads_blank_and_null_as_absent() {
        #[derive(serde::Deserialize)]
        struct Dated {
            #[serde(default, deserialize_with = "opt_datetime")]
            at: Option<DateTime<Utc>>,
        }

        let parsed: Dated = serde_json::from_str(r#"{"at": "2020-02-29"}"#).expect("date");
        assert_eq!(parsed.at, Some(utc(2020, 2, 29, 0, 0, 0)));
        let parsed: Dated = serde_json::from_str(r#"{"at": ""}"#).expect("blank");
        assert_eq!(parsed.at, None);
        let parsed: Dated = serde_json::from_str(r#"{"at": null}"#).expect("null");
        assert_eq!(parsed.at, None);
        assert!(serde_json::from_str::<Dated>(r#"{"at": "soon"}"#).is_err());
    }
}
