//! Strategy report row classification and field extraction.
//!
//! A report interleaves `SellClose` order rows (`;`-separated, date in column 5)
//! with `SOHLCP` rows whose `|`-separated fields 2..=5 hold open, high, low and
//! close. Everything else in the file is ignored.

use chrono::NaiveDate;

pub const PRICE_LABEL: &str = "SOHLCP";
pub const DATE_LABEL: &str = "SellClose";

const DATE_COLUMN: usize = 5;
const MIN_DATE_COLUMNS: usize = 6;
const MIN_PRICE_FIELDS: usize = 6;

pub const DEFAULT_CENTURY_PIVOT: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Price,
    Date,
    Other,
}

/// Price takes precedence when a line carries both labels.
pub fn classify(line: &str) -> RowKind {
    if line.contains(PRICE_LABEL) {
        RowKind::Price
    } else if line.contains(DATE_LABEL) {
        RowKind::Date
    } else {
        RowKind::Other
    }
}

/// yy < pivot -> 20yy, otherwise 19yy.
pub fn expand_two_digit_year(yy: u32, pivot: u32) -> i32 {
    if yy < pivot {
        2000 + yy as i32
    } else {
        1900 + yy as i32
    }
}

/// Accepts `M/D/YY`, `M/D/YYYY` and `YYYY-MM-DD`; a trailing time component is dropped.
pub fn parse_date_field(raw: &str, century_pivot: u32) -> Result<NaiveDate, String> {
    let token = raw.split_whitespace().next().unwrap_or("");
    if token.is_empty() {
        return Err("empty date field".to_string());
    }

    if token.contains('/') {
        let parts: Vec<&str> = token.split('/').collect();
        if parts.len() != 3 {
            return Err(format!("invalid date '{token}'"));
        }
        let month: u32 = parts[0]
            .parse()
            .map_err(|_| format!("invalid month in date '{token}'"))?;
        let day: u32 = parts[1]
            .parse()
            .map_err(|_| format!("invalid day in date '{token}'"))?;
        let year_raw: u32 = parts[2]
            .parse()
            .map_err(|_| format!("invalid year in date '{token}'"))?;
        let year = match parts[2].len() {
            2 => expand_two_digit_year(year_raw, century_pivot),
            4 => year_raw as i32,
            _ => return Err(format!("invalid year in date '{token}'")),
        };
        return NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| format!("date out of range '{token}'"));
    }

    NaiveDate::parse_from_str(token, "%Y-%m-%d").map_err(|_| format!("invalid date '{token}'"))
}

/// `Ok(None)` when the row has too few columns to carry a date.
pub fn extract_date(line: &str, century_pivot: u32) -> Result<Option<NaiveDate>, String> {
    let columns: Vec<&str> = line.split(';').collect();
    if columns.len() < MIN_DATE_COLUMNS {
        return Ok(None);
    }
    parse_date_field(columns[DATE_COLUMN], century_pivot).map(Some)
}

/// `Ok(None)` when the row has too few fields; prices above 999 may carry `,` separators.
pub fn extract_prices(line: &str) -> Result<Option<[f64; 4]>, String> {
    let fields: Vec<String> = line.split('|').map(|f| f.replace(',', "")).collect();
    if fields.len() < MIN_PRICE_FIELDS {
        return Ok(None);
    }

    let names = ["open", "high", "low", "close"];
    let mut prices = [0.0; 4];
    for (i, name) in names.iter().enumerate() {
        let raw = fields[i + 2].trim();
        prices[i] = raw
            .parse::<f64>()
            .map_err(|_| format!("invalid {name} price '{raw}'"))?;
        if !prices[i].is_finite() {
            return Err(format!("invalid {name} price '{raw}'"));
        }
    }
    Ok(Some(prices))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn classify_rows() {
        assert_eq!(classify("2;SOHLCP|1|450.1|452|449|451|;"), RowKind::Price);
        assert_eq!(classify("1;SellClose;Sell to Close;-1;$451;10/17/25;"), RowKind::Date);
        assert_eq!(classify("Id;Strategy;Side;Amount;Price;Date/Time"), RowKind::Other);
        assert_eq!(classify(""), RowKind::Other);
    }

    #[test]
    fn classify_prefers_price_label() {
        assert_eq!(classify("SellClose SOHLCP|a|1|2|3|4"), RowKind::Price);
    }

    #[test]
    fn two_digit_year_pivot() {
        assert_eq!(expand_two_digit_year(25, 50), 2025);
        assert_eq!(expand_two_digit_year(0, 50), 2000);
        assert_eq!(expand_two_digit_year(49, 50), 2049);
        assert_eq!(expand_two_digit_year(50, 50), 1950);
        assert_eq!(expand_two_digit_year(99, 50), 1999);
        assert_eq!(expand_two_digit_year(75, 80), 2075);
    }

    #[test]
    fn parse_short_year_date() {
        assert_eq!(parse_date_field("10/17/25", 50).unwrap(), ymd(2025, 10, 17));
        assert_eq!(parse_date_field("1/2/98", 50).unwrap(), ymd(1998, 1, 2));
    }

    #[test]
    fn parse_full_year_date() {
        assert_eq!(parse_date_field("03/04/2024", 50).unwrap(), ymd(2024, 3, 4));
    }

    #[test]
    fn parse_iso_date() {
        assert_eq!(parse_date_field("2024-03-04", 50).unwrap(), ymd(2024, 3, 4));
    }

    #[test]
    fn parse_date_drops_time_component() {
        assert_eq!(
            parse_date_field(" 10/17/25 9:30 AM\n", 50).unwrap(),
            ymd(2025, 10, 17)
        );
    }

    #[test]
    fn parse_date_rejects_garbage() {
        assert!(parse_date_field("", 50).is_err());
        assert!(parse_date_field("yesterday", 50).is_err());
        assert!(parse_date_field("13/40/25", 50).is_err());
        assert!(parse_date_field("1/2/123", 50).is_err());
        assert!(parse_date_field("1/2", 50).is_err());
    }

    #[test]
    fn extract_date_reads_column_five() {
        let line = "1;SellClose;Sell to Close;-100;$451.00;10/17/25;$12.00;$12.00;0";
        assert_eq!(extract_date(line, 50).unwrap(), Some(ymd(2025, 10, 17)));
    }

    #[test]
    fn extract_date_short_row_is_none() {
        assert_eq!(extract_date("1;SellClose;Sell to Close", 50).unwrap(), None);
    }

    #[test]
    fn extract_date_bad_value_is_err() {
        let line = "1;SellClose;x;x;x;not-a-date";
        assert!(extract_date(line, 50).is_err());
    }

    #[test]
    fn extract_prices_reads_fields() {
        let line = "2;SOHLCP|10/17/25|450.10|452.00|449.25|451.00|;Buy to Open";
        assert_eq!(
            extract_prices(line).unwrap(),
            Some([450.10, 452.00, 449.25, 451.00])
        );
    }

    #[test]
    fn extract_prices_strips_thousands_separators() {
        let line = "2;SOHLCP|x|1,234.50|1,240.00| 1,230.25 |1,238.75|";
        assert_eq!(
            extract_prices(line).unwrap(),
            Some([1234.50, 1240.00, 1230.25, 1238.75])
        );
    }

    #[test]
    fn extract_prices_short_row_is_none() {
        assert_eq!(extract_prices("SOHLCP|1|2|3").unwrap(), None);
    }

    #[test]
    fn extract_prices_bad_value_is_err() {
        let err = extract_prices("SOHLCP|x|1.0|abc|0.5|1.0").unwrap_err();
        assert!(err.contains("high"));
    }

    #[test]
    fn extract_prices_rejects_non_finite() {
        assert!(extract_prices("SOHLCP|x|NaN|2|1|1").is_err());
        assert!(extract_prices("SOHLCP|x|1|inf|1|1").is_err());
    }
}
