use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::job::JobName;

/// Validation failure raised when a raw value cannot become a typed field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {field} {value:?}: {reason}")]
pub struct FieldError {
    pub field: &'static str,
    pub value: String,
    pub reason: &'static str,
}

impl FieldError {
    pub(crate) fn new(field: &'static str, value: impl Into<String>, reason: &'static str) -> Self {
        Self {
            field,
            value: value.into(),
            reason,
        }
    }
}

/// Shared rendering for the set-valued person attributes so listings and keyword
/// matching do not need to know which concrete value type they hold.
pub trait DisplayText {
    fn display_text(&self) -> &str;
}

/// Joins set members with a single space, in set order.
pub fn join_display<'a, T, I>(items: I) -> String
where
    T: DisplayText + 'a,
    I: IntoIterator<Item = &'a T>,
{
    items
        .into_iter()
        .map(|item| item.display_text())
        .collect::<Vec<_>>()
        .join(" ")
}

fn non_blank(field: &'static str, raw: &str) -> Result<String, FieldError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FieldError::new(field, raw, "must not be blank"));
    }
    Ok(trimmed.to_string())
}

// Plain text attributes: any non-blank value, trimmed.
macro_rules! text_value {
    ($(#[$meta:meta])* $ty:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $ty(String);

        impl $ty {
            pub fn parse(raw: &str) -> Result<Self, FieldError> {
                non_blank($field, raw).map(Self)
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $ty {
            type Error = FieldError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(&value)
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> Self {
                value.0
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

text_value!(Gender, "gender");
text_value!(Race, "race");
text_value!(
    /// Free-form postal address; keyword filters tokenise it on whitespace.
    Address,
    "address"
);
text_value!(School, "school");
text_value!(Major, "major");
text_value!(KnownProgLang, "known programming language");
text_value!(PastJob, "past job");

impl DisplayText for KnownProgLang {
    fn display_text(&self) -> &str {
        &self.0
    }
}

impl DisplayText for PastJob {
    fn display_text(&self) -> &str {
        &self.0
    }
}

impl DisplayText for JobName {
    fn display_text(&self) -> &str {
        self.as_str()
    }
}

/// Candidate name: letters, digits and spaces, starting with a letter or digit.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Name(String);

impl Name {
    pub fn parse(raw: &str) -> Result<Self, FieldError> {
        let trimmed = non_blank("name", raw)?;
        if !trimmed
            .chars()
            .all(|ch| ch.is_alphanumeric() || ch == ' ')
        {
            return Err(FieldError::new(
                "name",
                raw,
                "may only contain letters, digits and spaces",
            ));
        }
        Ok(Self(trimmed))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Phone number of at least three digits.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Phone(String);

impl Phone {
    pub fn parse(raw: &str) -> Result<Self, FieldError> {
        let trimmed = raw.trim();
        if trimmed.len() < 3 || !trimmed.chars().all(|ch| ch.is_ascii_digit()) {
            return Err(FieldError::new(
                "phone",
                raw,
                "must contain only digits and be at least 3 digits long",
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    pub fn parse(raw: &str) -> Result<Self, FieldError> {
        let trimmed = raw.trim();
        let (local, domain) = trimmed
            .split_once('@')
            .ok_or_else(|| FieldError::new("email", raw, "must be of the form local@domain"))?;

        let local_ok = !local.is_empty()
            && local
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || "+_.-".contains(ch))
            && !local.starts_with(['+', '_', '.', '-']);
        if !local_ok {
            return Err(FieldError::new(
                "email",
                raw,
                "local part must be alphanumeric with optional + _ . - separators",
            ));
        }

        let domain_ok = !domain.is_empty()
            && domain.split('.').all(|label| {
                !label.is_empty()
                    && !label.starts_with('-')
                    && !label.ends_with('-')
                    && label.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '-')
            });
        if !domain_ok {
            return Err(FieldError::new(
                "email",
                raw,
                "domain must be dot-separated alphanumeric labels",
            ));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// National identity number, e.g. `S9671597H`. Stored upper-cased; this is the
/// identity key of a [`Person`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Nric(String);

impl Nric {
    pub fn parse(raw: &str) -> Result<Self, FieldError> {
        let normalized = raw.trim().to_ascii_uppercase();
        let bytes = normalized.as_bytes();
        let well_formed = bytes.len() == 9
            && matches!(bytes[0], b'S' | b'T' | b'F' | b'G' | b'M')
            && bytes[1..8].iter().all(u8::is_ascii_digit)
            && bytes[8].is_ascii_uppercase();
        if !well_formed {
            return Err(FieldError::new(
                "nric",
                raw,
                "must be a prefix letter (S, T, F, G or M), 7 digits and a checksum letter",
            ));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Single alphanumeric label.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tag(String);

impl Tag {
    pub fn parse(raw: &str) -> Result<Self, FieldError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || !trimmed.chars().all(char::is_alphanumeric) {
            return Err(FieldError::new("tag", raw, "must be alphanumeric"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl DisplayText for Tag {
    fn display_text(&self) -> &str {
        &self.0
    }
}

macro_rules! display_as_str {
    ($($ty:ident),*) => {
        $(
            impl TryFrom<String> for $ty {
                type Error = FieldError;

                fn try_from(value: String) -> Result<Self, Self::Error> {
                    Self::parse(&value)
                }
            }

            impl From<$ty> for String {
                fn from(value: $ty) -> Self {
                    value.0
                }
            }

            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&self.0)
                }
            }
        )*
    };
}

display_as_str!(Name, Phone, Email, Nric, Tag);

/// Academic grade, inclusive of both bounds.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Grade(f64);

impl Grade {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 5.0;

    pub fn new(value: f64) -> Result<Self, FieldError> {
        if !value.is_finite() || !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(FieldError::new(
                "grade",
                value.to_string(),
                "must be a number between 0.0 and 5.0",
            ));
        }
        Ok(Self(value))
    }

    pub fn parse(raw: &str) -> Result<Self, FieldError> {
        let value = raw
            .trim()
            .parse::<f64>()
            .map_err(|_| FieldError::new("grade", raw, "must be a number between 0.0 and 5.0"))?;
        Self::new(value)
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Grade {
    type Error = FieldError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Grade> for f64 {
    fn from(value: Grade) -> Self {
        value.0
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Ordered interview scores, each between 0 and 10.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct InterviewScores(Vec<u8>);

impl InterviewScores {
    pub const MAX_SCORE: u8 = 10;

    pub fn new(scores: Vec<u8>) -> Result<Self, FieldError> {
        if scores.is_empty() {
            return Err(FieldError::new(
                "interview scores",
                "",
                "at least one score is required",
            ));
        }
        if let Some(score) = scores.iter().find(|score| **score > Self::MAX_SCORE) {
            return Err(FieldError::new(
                "interview scores",
                score.to_string(),
                "each score must be between 0 and 10",
            ));
        }
        Ok(Self(scores))
    }

    /// Parses a comma separated list such as `5,8,2,4,10`.
    pub fn parse(raw: &str) -> Result<Self, FieldError> {
        let scores = raw
            .split(',')
            .map(|part| {
                part.trim().parse::<u8>().map_err(|_| {
                    FieldError::new(
                        "interview scores",
                        raw,
                        "must be comma separated whole numbers",
                    )
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(scores)
    }

    pub fn scores(&self) -> &[u8] {
        &self.0
    }

    pub fn mean(&self) -> f64 {
        let total: u32 = self.0.iter().map(|score| u32::from(*score)).sum();
        f64::from(total) / self.0.len() as f64
    }
}

impl TryFrom<Vec<u8>> for InterviewScores {
    type Error = FieldError;

    fn try_from(value: Vec<u8>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<InterviewScores> for Vec<u8> {
    fn from(value: InterviewScores) -> Self {
        value.0
    }
}

impl fmt::Display for InterviewScores {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(u8::to_string)
            .collect::<Vec<_>>()
            .join(",");
        f.write_str(&joined)
    }
}

/// Candidate record. Identity is the [`Nric`]; the registry never mutates a stored
/// person in place, edits go through [`PersonPatch::apply`] and replace the value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub name: Name,
    pub phone: Phone,
    pub email: Email,
    pub nric: Nric,
    pub gender: Gender,
    pub race: Race,
    pub address: Address,
    pub school: School,
    pub major: Major,
    pub grade: Grade,
    pub interview_scores: InterviewScores,
    #[serde(default)]
    pub known_prog_langs: BTreeSet<KnownProgLang>,
    #[serde(default)]
    pub past_jobs: BTreeSet<PastJob>,
    #[serde(default)]
    pub jobs_applied: BTreeSet<JobName>,
    #[serde(default)]
    pub tags: BTreeSet<Tag>,
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Phone: {} Email: {} NRIC: {} Gender: {} Race: {} Address: {} School: {} \
             Major: {} Grade: {} Interview Scores: {}",
            self.name,
            self.phone,
            self.email,
            self.nric,
            self.gender,
            self.race,
            self.address,
            self.school,
            self.major,
            self.grade,
            self.interview_scores,
        )?;
        if !self.known_prog_langs.is_empty() {
            write!(f, " Languages: {}", join_display(&self.known_prog_langs))?;
        }
        if !self.past_jobs.is_empty() {
            write!(f, " Past Jobs: {}", join_display(&self.past_jobs))?;
        }
        if !self.jobs_applied.is_empty() {
            write!(f, " Applied: {}", join_display(&self.jobs_applied))?;
        }
        if !self.tags.is_empty() {
            write!(f, " Tags: {}", join_display(&self.tags))?;
        }
        Ok(())
    }
}

/// Partial update for a [`Person`]. Every `Some` field replaces the corresponding
/// value; `None` keeps the existing one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonPatch {
    pub name: Option<Name>,
    pub phone: Option<Phone>,
    pub email: Option<Email>,
    pub nric: Option<Nric>,
    pub gender: Option<Gender>,
    pub race: Option<Race>,
    pub address: Option<Address>,
    pub school: Option<School>,
    pub major: Option<Major>,
    pub grade: Option<Grade>,
    pub interview_scores: Option<InterviewScores>,
    pub known_prog_langs: Option<BTreeSet<KnownProgLang>>,
    pub past_jobs: Option<BTreeSet<PastJob>>,
    pub jobs_applied: Option<BTreeSet<JobName>>,
    pub tags: Option<BTreeSet<Tag>>,
}

impl PersonPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn apply(self, base: &Person) -> Person {
        Person {
            name: self.name.unwrap_or_else(|| base.name.clone()),
            phone: self.phone.unwrap_or_else(|| base.phone.clone()),
            email: self.email.unwrap_or_else(|| base.email.clone()),
            nric: self.nric.unwrap_or_else(|| base.nric.clone()),
            gender: self.gender.unwrap_or_else(|| base.gender.clone()),
            race: self.race.unwrap_or_else(|| base.race.clone()),
            address: self.address.unwrap_or_else(|| base.address.clone()),
            school: self.school.unwrap_or_else(|| base.school.clone()),
            major: self.major.unwrap_or_else(|| base.major.clone()),
            grade: self.grade.unwrap_or(base.grade),
            interview_scores: self
                .interview_scores
                .unwrap_or_else(|| base.interview_scores.clone()),
            known_prog_langs: self
                .known_prog_langs
                .unwrap_or_else(|| base.known_prog_langs.clone()),
            past_jobs: self.past_jobs.unwrap_or_else(|| base.past_jobs.clone()),
            jobs_applied: self
                .jobs_applied
                .unwrap_or_else(|| base.jobs_applied.clone()),
            tags: self.tags.unwrap_or_else(|| base.tags.clone()),
        }
    }
}

/// Position in a displayed list. Serialised and constructed one-based, stored zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct Index(usize);

impl Index {
    pub fn from_one_based(position: usize) -> Result<Self, FieldError> {
        match position.checked_sub(1) {
            Some(zero_based) => Ok(Self(zero_based)),
            None => Err(FieldError::new(
                "index",
                position.to_string(),
                "must be a non-zero unsigned integer",
            )),
        }
    }

    pub const fn from_zero_based(position: usize) -> Self {
        Self(position)
    }

    pub const fn zero_based(self) -> usize {
        self.0
    }

    pub const fn one_based(self) -> usize {
        self.0 + 1
    }
}

impl TryFrom<usize> for Index {
    type Error = FieldError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::from_one_based(value)
    }
}

impl From<Index> for usize {
    fn from(value: Index) -> Self {
        value.one_based()
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.one_based())
    }
}
