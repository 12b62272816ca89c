#[macro_export]
macro_rules! t {
    (now) => {{
        $crate::core::time::DateTime::now()
    }};

    ($amount:literal days) => {{
        $crate::core::time::Duration::days($amount)
    }};

    ($amount:literal days ago) => {{
        t!(now) - t!($amount days)
    }};

    (today) => {{
        t!(now).start_of_day()
    }};
}

#[cfg(test)]
mod tests {
    use crate::core::time::*;

    fn fixed() -> DateTime {
        DateTime::parse("2024-06-15T12:00:00").unwrap()
    }

    #[test]
    fn test_now_follows_fixed_time() {
        assert_eq!(FIXED_NOW.sync_scope(fixed(), || t!(now)), fixed());
    }

    #[test]
    fn test_duration_days() {
        assert_eq!(t!(3 days), Duration::days(3));
    }

    #[test]
    fn test_days_ago() {
        let dt = FIXED_NOW.sync_scope(fixed(), || t!(30 days ago));

        assert_eq!(dt, fixed() - Duration::days(30));
    }

    #[test]
    fn test_today() {
        let today = FIXED_NOW.sync_scope(fixed(), || t!(today));

        assert_eq!(today, DateTime::parse("2024-06-15").unwrap());
    }
}
