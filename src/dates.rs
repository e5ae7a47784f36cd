use time::{format_description::FormatItem, macros::format_description, Date, OffsetDateTime};

pub const ISO_DATE: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

time::serde::format_description!(pub iso_date, Date, "[year]-[month]-[day]");

/// Current calendar date in UTC.
pub fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

pub fn parse_iso_date(raw: &str) -> Option<Date> {
    Date::parse(raw.trim(), ISO_DATE).ok()
}

/// `YYYY-MM-DD`, the same shape the API serializes dates in.
pub fn format_iso_date(date: Date) -> String {
    date.format(ISO_DATE).unwrap_or_else(|_| date.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn parses_and_formats_iso_dates() {
        assert_eq!(parse_iso_date("2024-03-09"), Some(date!(2024 - 03 - 09)));
        assert_eq!(parse_iso_date(" 2024-03-09 "), Some(date!(2024 - 03 - 09)));
        assert_eq!(format_iso_date(date!(2024 - 03 - 09)), "2024-03-09");
    }

    #[test]
    fn rejects_other_date_shapes() {
        assert_eq!(parse_iso_date("09/03/2024"), None);
        assert_eq!(parse_iso_date("2024-13-01"), None);
        assert_eq!(parse_iso_date(""), None);
    }
}
