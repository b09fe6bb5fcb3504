//! Student records and school years

use crate::error::{RosterError, RosterResult};
use std::fmt;
use std::str::FromStr;

/// A school year such as 2019-2020, compared and hashed structurally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchoolYear {
    start: i32,
    end: i32,
}

impl SchoolYear {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    /// Calendar year the school year starts in
    pub fn start(&self) -> i32 {
        self.start
    }

    /// Calendar year the school year ends in
    pub fn end(&self) -> i32 {
        self.end
    }
}

impl FromStr for SchoolYear {
    type Err = RosterError;

    /// Parse "2019-2020" or "2019/2020". A leading minus belongs to the
    /// start year, so "-5-4" is the year from -5 to 4.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let separator = trimmed
            .char_indices()
            .skip(1)
            .find(|&(_, c)| c == '-' || c == '/')
            .map(|(i, _)| i)
            .ok_or_else(|| RosterError::invalid_school_year(s))?;
        let (start, end) = (&trimmed[..separator], &trimmed[separator + 1..]);

        let start = start
            .trim()
            .parse::<i32>()
            .map_err(|_| RosterError::invalid_school_year(s))?;
        let end = end
            .trim()
            .parse::<i32>()
            .map_err(|_| RosterError::invalid_school_year(s))?;

        if end < start {
            return Err(RosterError::invalid_school_year(s));
        }

        Ok(Self { start, end })
    }
}

impl fmt::Display for SchoolYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// An immutable student record.
///
/// `id` and `name` may be absent; ordering rules that need them report
/// [`RosterError::MissingField`] instead of guessing an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    id: Option<String>,
    name: Option<String>,
    start_year: SchoolYear,
    end_year: SchoolYear,
    country_code: String,
}

impl Student {
    /// Create a complete record
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        start_year: SchoolYear,
        end_year: SchoolYear,
        country_code: impl Into<String>,
    ) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
            start_year,
            end_year,
            country_code: country_code.into(),
        }
    }

    pub fn builder(start_year: SchoolYear, end_year: SchoolYear) -> StudentBuilder {
        StudentBuilder::new(start_year, end_year)
    }

    /// Parse a record from "ID,NAME,START,END,CC", e.g.
    /// `S1,Ada Lovelace,2019-2020,2021-2022,GB`.
    ///
    /// An empty ID or NAME leaves that field absent.
    pub fn parse_spec(spec: &str) -> RosterResult<Self> {
        let parts: Vec<&str> = spec.split(',').map(str::trim).collect();
        if parts.len() != 5 {
            return Err(RosterError::invalid_record_spec(
                spec,
                &format!("expected 5 comma-separated fields, found {}", parts.len()),
            ));
        }

        let start_year = parts[2]
            .parse::<SchoolYear>()
            .map_err(|e| RosterError::invalid_record_spec(spec, &e.to_string()))?;
        let end_year = parts[3]
            .parse::<SchoolYear>()
            .map_err(|e| RosterError::invalid_record_spec(spec, &e.to_string()))?;

        if end_year.end() < start_year.start() {
            return Err(RosterError::invalid_record_spec(
                spec,
                "end year finishes before the start year begins",
            ));
        }

        let mut builder = StudentBuilder::new(start_year, end_year).country_code(parts[4]);
        if !parts[0].is_empty() {
            builder = builder.id(parts[0]);
        }
        if !parts[1].is_empty() {
            builder = builder.name(parts[1]);
        }

        Ok(builder.build())
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn start_year(&self) -> SchoolYear {
        self.start_year
    }

    pub fn end_year(&self) -> SchoolYear {
        self.end_year
    }

    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    /// Years from the start of the first school year to the end of the last
    pub fn course_length(&self) -> i64 {
        i64::from(self.end_year.end()) - i64::from(self.start_year.start())
    }

    /// The id, or `MissingField` naming this record
    pub fn require_id(&self) -> RosterResult<&str> {
        self.id()
            .ok_or_else(|| RosterError::missing_field("id", &self.label()))
    }

    /// The name, or `MissingField` naming this record
    pub fn require_name(&self) -> RosterResult<&str> {
        self.name()
            .ok_or_else(|| RosterError::missing_field("name", &self.label()))
    }

    /// Human-readable handle used in errors and reports
    pub fn label(&self) -> String {
        match (self.id(), self.name()) {
            (Some(id), _) => id.to_string(),
            (None, Some(name)) => format!("named '{name}'"),
            (None, None) => "<unidentified>".to_string(),
        }
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}",
            self.id().unwrap_or("-"),
            self.name().unwrap_or("-"),
            self.start_year,
            self.end_year,
            self.country_code
        )
    }
}

/// Builder for records whose id or name may be absent
#[derive(Debug, Clone)]
pub struct StudentBuilder {
    student: Student,
}

impl StudentBuilder {
    pub fn new(start_year: SchoolYear, end_year: SchoolYear) -> Self {
        Self {
            student: Student {
                id: None,
                name: None,
                start_year,
                end_year,
                country_code: String::new(),
            },
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.student.id = Some(id.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.student.name = Some(name.into());
        self
    }

    pub fn country_code(mut self, code: impl Into<String>) -> Self {
        self.student.country_code = code.into();
        self
    }

    pub fn build(self) -> Student {
        self.student
    }
}
