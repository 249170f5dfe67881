// Stay price computation. Pure functions so the same numbers come out at
// booking time and whenever a summary is redisplayed.

use chrono::NaiveDate;

// Whole-day difference between check-out and check-in. A missing or
// inverted range counts as zero nights, it is a non-bookable selection
// rather than an error.
pub fn nights(check_in: Option<NaiveDate>, check_out: Option<NaiveDate>) -> i64 {
    match (check_in, check_out) {
        (Some(start), Some(end)) if end > start => (end - start).num_days(),
        _ => 0,
    }
}

// Total price for the stay: nights x nightly rate. Returns 0.0 for any
// range where no nights are bookable.
pub fn stay_total(
    nightly_rate: f64,
    check_in: Option<NaiveDate>,
    check_out: Option<NaiveDate>,
) -> f64 {
    nightly_rate * nights(check_in, check_out) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn date(s: &str) -> Option<NaiveDate> {
        Some(NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap())
    }

    #[test_case(date("2024-06-01"), date("2024-06-04"), 3; "three nights")]
    #[test_case(date("2024-06-01"), date("2024-06-02"), 1; "single night")]
    #[test_case(date("2024-06-04"), date("2024-06-01"), 0; "inverted range")]
    #[test_case(date("2024-06-01"), date("2024-06-01"), 0; "same day")]
    #[test_case(None, date("2024-06-04"), 0; "missing check in")]
    #[test_case(date("2024-06-01"), None, 0; "missing check out")]
    #[test_case(None, None, 0; "both missing")]
    fn nights_for_range(check_in: Option<NaiveDate>, check_out: Option<NaiveDate>, expected: i64) {
        assert_eq!(nights(check_in, check_out), expected);
    }

    #[test_case(100.0, date("2024-06-01"), date("2024-06-04"), 300.0; "rate 100 three nights")]
    #[test_case(200.0, date("2024-07-01"), date("2024-07-03"), 400.0; "rate 200 two nights")]
    #[test_case(89.5, date("2024-06-01"), date("2024-06-02"), 89.5; "fractional rate")]
    #[test_case(100.0, date("2024-06-04"), date("2024-06-01"), 0.0; "inverted range is free")]
    #[test_case(100.0, None, None, 0.0; "no dates no charge")]
    #[test_case(0.0, date("2024-06-01"), date("2024-06-04"), 0.0; "zero rate")]
    fn total_for_stay(
        rate: f64,
        check_in: Option<NaiveDate>,
        check_out: Option<NaiveDate>,
        expected: f64,
    ) {
        assert_eq!(stay_total(rate, check_in, check_out), expected);
    }

    // Redisplaying a summary must reproduce the captured total exactly.
    #[test]
    fn recomputation_is_stable() {
        let check_in = date("2024-06-10");
        let check_out = date("2024-06-15");
        let first = stay_total(149.99, check_in, check_out);
        let second = stay_total(149.99, check_in, check_out);
        assert_eq!(first, second);
        assert_eq!(first, 5.0 * 149.99);
    }
}
