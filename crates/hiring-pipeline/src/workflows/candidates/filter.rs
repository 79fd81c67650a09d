use std::fmt;

use serde::{Deserialize, Serialize};

use super::domain::{join_display, FieldError, Person};

/// Text attributes a keyword predicate can inspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextField {
    Name,
    Phone,
    Email,
    Nric,
    Gender,
    Race,
    Address,
    School,
    Major,
    KnownProgLangs,
    PastJobs,
    JobsApplied,
    Tags,
}

impl TextField {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Phone => "phone",
            Self::Email => "email",
            Self::Nric => "nric",
            Self::Gender => "gender",
            Self::Race => "race",
            Self::Address => "address",
            Self::School => "school",
            Self::Major => "major",
            Self::KnownProgLangs => "known_prog_langs",
            Self::PastJobs => "past_jobs",
            Self::JobsApplied => "jobs_applied",
            Self::Tags => "tags",
        }
    }

    fn text_of(self, person: &Person) -> String {
        match self {
            Self::Name => person.name.to_string(),
            Self::Phone => person.phone.to_string(),
            Self::Email => person.email.to_string(),
            Self::Nric => person.nric.to_string(),
            Self::Gender => person.gender.to_string(),
            Self::Race => person.race.to_string(),
            Self::Address => person.address.to_string(),
            Self::School => person.school.to_string(),
            Self::Major => person.major.to_string(),
            Self::KnownProgLangs => join_display(&person.known_prog_langs),
            Self::PastJobs => join_display(&person.past_jobs),
            Self::JobsApplied => join_display(&person.jobs_applied),
            Self::Tags => join_display(&person.tags),
        }
    }
}

/// Numeric attributes a range predicate can inspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericField {
    Grade,
    /// Mean of the interview scores.
    InterviewScore,
}

impl NumericField {
    fn value_of(self, person: &Person) -> f64 {
        match self {
            Self::Grade => person.grade.value(),
            Self::InterviewScore => person.interview_scores.mean(),
        }
    }
}

/// Single whitespace-free search word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Keyword(String);

impl Keyword {
    pub fn parse(raw: &str) -> Result<Self, FieldError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
            return Err(FieldError::new("keyword", raw, "must be a single word"));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Splits a free-text query into keywords.
    pub fn split_all(raw: &str) -> Result<Vec<Self>, FieldError> {
        let keywords: Vec<Self> = raw.split_whitespace().map(|word| Self(word.to_string())).collect();
        if keywords.is_empty() {
            return Err(FieldError::new("keyword", raw, "at least one keyword is required"));
        }
        Ok(keywords)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Keyword {
    type Error = FieldError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Keyword> for String {
    fn from(value: Keyword) -> Self {
        value.0
    }
}

/// True when `sentence` holds `word` as a whole whitespace-delimited token, ignoring case.
pub fn contains_word_ignore_case(sentence: &str, word: &Keyword) -> bool {
    let needle = word.as_str().to_lowercase();
    sentence
        .split_whitespace()
        .any(|token| token.to_lowercase() == needle)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    lower: f64,
    upper: f64,
}

impl Range {
    pub fn new(lower: f64, upper: f64) -> Result<Self, FieldError> {
        let valid = lower.is_finite() && upper.is_finite() && lower >= 0.0 && lower <= upper;
        if !valid {
            return Err(FieldError::new(
                "range",
                format!("{lower}-{upper}"),
                "bounds must be non-negative with lower <= upper",
            ));
        }
        Ok(Self { lower, upper })
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.lower, self.upper)
    }
}

/// Semicolon separated inclusive ranges, e.g. `3.5-4.0;4.5-5.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RangeList(Vec<Range>);

impl RangeList {
    pub fn parse(raw: &str) -> Result<Self, FieldError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(FieldError::new("range", raw, "must not be blank"));
        }

        let ranges = trimmed
            .split(';')
            .map(|part| {
                let (lower, upper) = part
                    .split_once('-')
                    .ok_or_else(|| FieldError::new("range", part, "must look like lower-upper"))?;
                let bound = |text: &str| {
                    text.trim()
                        .parse::<f64>()
                        .map_err(|_| FieldError::new("range", part, "bounds must be numbers"))
                };
                Range::new(bound(lower)?, bound(upper)?)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self(ranges))
    }

    pub fn ranges(&self) -> &[Range] {
        &self.0
    }

    pub fn contains(&self, value: f64) -> bool {
        self.0.iter().any(|range| range.contains(value))
    }
}

impl TryFrom<String> for RangeList {
    type Error = FieldError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RangeList> for String {
    fn from(value: RangeList) -> Self {
        value.to_string()
    }
}

impl fmt::Display for RangeList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(Range::to_string)
            .collect::<Vec<_>>()
            .join(";");
        f.write_str(&joined)
    }
}

/// Field-level condition on a single person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PersonPredicate {
    /// Matches when any keyword is a whole word of the field.
    Keywords {
        field: TextField,
        #[serde(deserialize_with = "non_empty_keywords")]
        keywords: Vec<Keyword>,
    },
    /// Matches when the field falls inside at least one range.
    Range {
        field: NumericField,
        ranges: RangeList,
    },
}

fn non_empty_keywords<'de, D>(deserializer: D) -> Result<Vec<Keyword>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let keywords = Vec::<Keyword>::deserialize(deserializer)?;
    if keywords.is_empty() {
        return Err(serde::de::Error::custom(FieldError::new(
            "keyword",
            "",
            "at least one keyword is required",
        )));
    }
    Ok(keywords)
}

impl PersonPredicate {
    pub fn keywords(field: TextField, query: &str) -> Result<Self, FieldError> {
        Ok(Self::Keywords {
            field,
            keywords: Keyword::split_all(query)?,
        })
    }

    pub fn range(field: NumericField, ranges: &str) -> Result<Self, FieldError> {
        Ok(Self::Range {
            field,
            ranges: RangeList::parse(ranges)?,
        })
    }

    pub fn matches(&self, person: &Person) -> bool {
        match self {
            Self::Keywords { field, keywords } => {
                let text = field.text_of(person);
                keywords
                    .iter()
                    .any(|keyword| contains_word_ignore_case(&text, keyword))
            }
            Self::Range { field, ranges } => ranges.contains(field.value_of(person)),
        }
    }
}

/// Conjunction of predicates. The empty filter accepts every person.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonFilter {
    #[serde(default)]
    predicates: Vec<PersonPredicate>,
}

impl PersonFilter {
    pub fn new(predicates: Vec<PersonPredicate>) -> Self {
        Self { predicates }
    }

    pub fn and(mut self, predicate: PersonPredicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn predicates(&self) -> &[PersonPredicate] {
        &self.predicates
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn matches(&self, person: &Person) -> bool {
        self.predicates
            .iter()
            .all(|predicate| predicate.matches(person))
    }

    pub fn apply<'a, I>(&self, persons: I) -> Vec<Person>
    where
        I: IntoIterator<Item = &'a Person>,
    {
        persons
            .into_iter()
            .filter(|person| self.matches(person))
            .cloned()
            .collect()
    }
}
