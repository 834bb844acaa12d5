use chrono::{DateTime, Local, Utc};

pub fn now_utc() -> i64 {
    Utc::now().timestamp()
}

pub fn format_timestamp_datetime(ts: i64) -> String {
    let dt = DateTime::<Utc>::from_timestamp(ts, 0)
        .unwrap_or_default()
        .with_timezone(&Local);
    dt.format("%Y-%m-%d %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::format_timestamp_datetime;
    use chrono::{Local, TimeZone, Utc};

    #[test]
    fn format_timestamp_datetime_uses_local_time() {
        let local = Local.with_ymd_and_hms(2030, 1, 15, 13, 45, 0).unwrap();
        let ts = local.with_timezone(&Utc).timestamp();
        assert_eq!(format_timestamp_datetime(ts), "2030-01-15 13:45");
    }
}
