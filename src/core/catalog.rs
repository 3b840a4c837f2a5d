//! Fixed grade and subject catalog, and the composite note key

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::store::StoreError;

/// School grade a note belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Grade {
    #[default]
    Nine,
    Ten,
    Eleven,
    Twelve,
}

impl Grade {
    /// All grades in display order
    pub const ALL: [Grade; 4] = [Grade::Nine, Grade::Ten, Grade::Eleven, Grade::Twelve];

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::Nine => "9",
            Grade::Ten => "10",
            Grade::Eleven => "11",
            Grade::Twelve => "12",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Grade {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Grade::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| StoreError::InvalidKey(format!("unknown grade: {s}")))
    }
}

impl TryFrom<String> for Grade {
    type Error = StoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Grade> for String {
    fn from(grade: Grade) -> Self {
        grade.as_str().to_string()
    }
}

/// Subject a note belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Subject {
    #[default]
    English,
    Tamil,
    Mathematics,
    Physics,
    Chemistry,
    ComputerScience,
}

impl Subject {
    /// All subjects in display order
    pub const ALL: [Subject; 6] = [
        Subject::English,
        Subject::Tamil,
        Subject::Mathematics,
        Subject::Physics,
        Subject::Chemistry,
        Subject::ComputerScience,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Subject::English => "English",
            Subject::Tamil => "Tamil",
            Subject::Mathematics => "Mathematics",
            Subject::Physics => "Physics",
            Subject::Chemistry => "Chemistry",
            Subject::ComputerScience => "Computer Science",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Subject {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Subject::ALL
            .into_iter()
            .find(|subject| subject.as_str() == s)
            .ok_or_else(|| StoreError::InvalidKey(format!("unknown subject: {s}")))
    }
}

impl TryFrom<String> for Subject {
    type Error = StoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Subject> for String {
    fn from(subject: Subject) -> Self {
        subject.as_str().to_string()
    }
}

/// Composite identity of a stored note
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NoteKey {
    pub grade: Grade,
    pub subject: Subject,
    pub filename: String,
}

impl NoteKey {
    pub fn new(grade: Grade, subject: Subject, filename: impl Into<String>) -> Self {
        Self {
            grade,
            subject,
            filename: filename.into(),
        }
    }

    /// Render as `grade/subject/filename`
    pub fn storage_key(&self) -> String {
        format!("{}/{}/{}", self.grade, self.subject, self.filename)
    }

    /// Parse a `grade/subject/filename` string. Everything after the second
    /// slash is the filename.
    pub fn parse(key: &str) -> Result<Self, StoreError> {
        let mut parts = key.splitn(3, '/');
        let (Some(grade), Some(subject), Some(filename)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(StoreError::InvalidKey(format!("malformed key: {key}")));
        };

        Ok(Self::new(grade.parse()?, subject.parse()?, filename))
    }

    /// Whether this key belongs to the given grade and subject
    pub fn is_in(&self, grade: Grade, subject: Subject) -> bool {
        self.grade == grade && self.subject == subject
    }
}

impl fmt::Display for NoteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.storage_key())
    }
}
