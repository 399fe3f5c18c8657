//! User records, read filters and pagination.
//!
//! Every attribute slot is an explicit `Option`: `None` means "not supplied".
//! An age of `0` is a real age and is filtered/assigned like any other value.

use crate::error::{DirectoryError, DirectoryResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Gender label as stored in the `gender` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = DirectoryError;

    fn from_str(s: &str) -> DirectoryResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            other => Err(DirectoryError::validation(format!(
                "unknown gender label '{other}'"
            ))),
        }
    }
}

/// A row of the users table.
///
/// Also the input of the update compiler: `id` selects the row and every
/// `Some` attribute becomes an assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i32,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub patronymic: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<Gender>,
    pub country: Option<String>,
}

impl UserRecord {
    /// An update record for `id` with no attributes set.
    pub fn for_id(id: i32) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Number of attribute slots that carry a value.
    pub fn present_count(&self) -> usize {
        [
            self.name.is_some(),
            self.surname.is_some(),
            self.patronymic.is_some(),
            self.age.is_some(),
            self.gender.is_some(),
            self.country.is_some(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }
}

/// Creation input: the name parts a caller supplies before enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub surname: String,
    #[serde(default)]
    pub patronymic: Option<String>,
}

impl NewUser {
    pub fn new(name: impl Into<String>, surname: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            surname: surname.into(),
            patronymic: None,
        }
    }

    pub fn with_patronymic(mut self, patronymic: impl Into<String>) -> Self {
        self.patronymic = Some(patronymic.into());
        self
    }
}

/// Equality filter for reads. Absent slots do not constrain the result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    name: Option<String>,
    surname: Option<String>,
    patronymic: Option<String>,
    age: Option<i32>,
    gender: Option<Gender>,
    country: Option<String>,
}

impl UserFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_surname(mut self, surname: impl Into<String>) -> Self {
        self.surname = Some(surname.into());
        self
    }

    pub fn with_patronymic(mut self, patronymic: impl Into<String>) -> Self {
        self.patronymic = Some(patronymic.into());
        self
    }

    pub fn with_age(mut self, age: i32) -> Self {
        self.age = Some(age);
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn surname(&self) -> Option<&str> {
        self.surname.as_deref()
    }

    pub fn patronymic(&self) -> Option<&str> {
        self.patronymic.as_deref()
    }

    pub fn age(&self) -> Option<i32> {
        self.age
    }

    pub fn gender(&self) -> Option<Gender> {
        self.gender
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    pub fn present_count(&self) -> usize {
        [
            self.name.is_some(),
            self.surname.is_some(),
            self.patronymic.is_some(),
            self.age.is_some(),
            self.gender.is_some(),
            self.country.is_some(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }
}

/// `LIMIT` / `OFFSET` pair for reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: u32,
    pub offset: u32,
}

impl Pagination {
    pub fn new(limit: u32, offset: u32) -> Self {
        Self { limit, offset }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: 10,
            offset: 0,
        }
    }
}
