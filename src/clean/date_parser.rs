// src/clean/date_parser.rs
use chrono::NaiveDate;

/// Parse `MM/DD/YYYY` (one- or two-digit month and day) into a date.
/// Anything else, including impossible dates like `02/30/2020`, is `None`.
pub fn parse_mdy(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let mut parts = s.split('/');
    let (m, d, y) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some()
        || y.len() != 4
        || !(1..=2).contains(&m.len())
        || !(1..=2).contains(&d.len())
    {
        return None;
    }
    if ![m, d, y].iter().all(|p| p.bytes().all(|b| b.is_ascii_digit())) {
        return None;
    }
    let month: u32 = m.parse().ok()?;
    let day: u32 = d.parse().ok()?;
    let year: i32 = y.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_padded_and_unpadded() {
        let want = NaiveDate::from_ymd_opt(1939, 7, 3);
        assert_eq!(parse_mdy("07/03/1939"), want);
        assert_eq!(parse_mdy("7/3/1939"), want);
        assert_eq!(parse_mdy(" 7/3/1939 "), want);
    }

    #[test]
    fn rejects_other_shapes() {
        for bad in [
            "",
            "1939-07-03",
            "13/01/2020",
            "02/30/2020",
            "1/2/20",
            "1/2/2020/1",
            "a/b/cdef",
            "+1/2/2020",
            "not a date",
        ] {
            assert_eq!(parse_mdy(bad), None, "{bad}");
        }
    }
}
