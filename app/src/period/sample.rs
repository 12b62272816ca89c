use crate::core::time::DateTime;

use super::Record;

const SAMPLES: [(&str, &str); 5] = [
    ("Task within period 1", "2024-03-15"),
    ("Task within period 2", "2024-08-20"),
    ("Task within period 3", "2025-02-10"),
    ("Task outside period", "2023-12-01"),
    ("Task outside period 2", "2025-07-01"),
];

/// Demo records around the 2024-01-01 to 2025-06-16 reporting window, created at local midnight.
pub fn sample_records() -> Vec<Record> {
    SAMPLES
        .iter()
        .map(|(title, date)| {
            let created_at = DateTime::parse(date).expect("Sample dates are valid YYYY-MM-DD");
            Record::new(*title, created_at)
        })
        .collect()
}
