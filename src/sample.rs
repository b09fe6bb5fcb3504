//! Built-in roster used when no students are given on the command line

use crate::model::{SchoolYear, Student};
use crate::roster::Students;

const SAMPLE: &[(&str, &str, (i32, i32), (i32, i32), &str)] = &[
    ("S07", "Mei Tanaka", (2020, 2021), (2022, 2023), "JP"),
    ("S02", "Lars Berg", (2019, 2020), (2021, 2022), "SE"),
    ("S11", "Ama Owusu", (2021, 2022), (2023, 2024), "GH"),
    ("S04", "Lars Berg", (2020, 2021), (2023, 2024), "NO"),
    ("S01", "Chloe Martin", (2021, 2022), (2024, 2025), "FR"),
    ("S09", "Diego Ruiz", (2020, 2021), (2022, 2023), "ES"),
    ("S03", "Anna Novak", (2022, 2023), (2024, 2025), "CZ"),
    ("S10", "Omar Haddad", (2019, 2020), (2022, 2023), "JO"),
    ("S05", "Mei Tanaka", (2021, 2022), (2023, 2024), "JP"),
    ("S08", "Tom Hughes", (2020, 2021), (2022, 2023), "GB"),
    ("S06", "Priya Shah", (2022, 2023), (2025, 2026), "IN"),
    ("S12", "Ewa Kowalska", (2021, 2022), (2023, 2024), "PL"),
];

/// A small mixed roster: duplicate names, several start years, repeated
/// country codes
pub fn sample_roster() -> Students {
    SAMPLE
        .iter()
        .map(|&(id, name, (s0, s1), (e0, e1), country)| {
            Student::new(
                id,
                name,
                SchoolYear::new(s0, s1),
                SchoolYear::new(e0, e1),
                country,
            )
        })
        .collect()
}
