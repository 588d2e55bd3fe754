use chrono::{Datelike, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    pub name: String,
    pub job: String,
    pub year_of_birth: i64,
}

impl Person {
    pub fn new(name: impl Into<String>, job: impl Into<String>, year_of_birth: i64) -> Self {
        Self {
            name: name.into(),
            job: job.into(),
            year_of_birth,
        }
    }

    /// Age reached during `year`.
    pub fn age_in(&self, year: i64) -> i64 {
        year - self.year_of_birth
    }

    /// Age reached during the current calendar year (UTC).
    pub fn age(&self) -> i64 {
        self.age_in(i64::from(Utc::now().year()))
    }

    /// A job fits when the birth year is divisible by the name length in characters.
    /// An empty name never fits.
    pub fn is_job_fit(&self) -> bool {
        let len = self.name.chars().count() as i64;
        if len == 0 {
            return false;
        }
        self.year_of_birth % len == 0
    }
}
