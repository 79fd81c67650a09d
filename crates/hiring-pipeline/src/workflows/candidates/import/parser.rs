use std::collections::BTreeSet;
use std::io::Read;

use serde::{Deserialize, Deserializer};

use super::super::domain::{
    Address, Email, FieldError, Gender, Grade, InterviewScores, KnownProgLang, Major, Name, Nric,
    PastJob, Person, Phone, Race, School, Tag,
};
use super::super::job::JobName;

/// A data row as read from the roster, before validation.
#[derive(Debug, Deserialize)]
pub(crate) struct RosterRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Phone")]
    phone: String,
    #[serde(rename = "Email")]
    email: String,
    #[serde(rename = "NRIC")]
    nric: String,
    #[serde(rename = "Gender")]
    gender: String,
    #[serde(rename = "Race")]
    race: String,
    #[serde(rename = "Address")]
    address: String,
    #[serde(rename = "School")]
    school: String,
    #[serde(rename = "Major")]
    major: String,
    #[serde(rename = "Grade")]
    grade: String,
    #[serde(rename = "Interview Scores")]
    interview_scores: String,
    #[serde(rename = "Languages", default, deserialize_with = "empty_string_as_none")]
    languages: Option<String>,
    #[serde(rename = "Past Jobs", default, deserialize_with = "empty_string_as_none")]
    past_jobs: Option<String>,
    #[serde(
        rename = "Jobs Applied",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    jobs_applied: Option<String>,
    #[serde(rename = "Tags", default, deserialize_with = "empty_string_as_none")]
    tags: Option<String>,
}

impl RosterRow {
    pub(crate) fn into_person(self) -> Result<Person, FieldError> {
        Ok(Person {
            name: Name::parse(&self.name)?,
            phone: Phone::parse(&self.phone)?,
            email: Email::parse(&self.email)?,
            nric: Nric::parse(&self.nric)?,
            gender: Gender::parse(&self.gender)?,
            race: Race::parse(&self.race)?,
            address: Address::parse(&self.address)?,
            school: School::parse(&self.school)?,
            major: Major::parse(&self.major)?,
            grade: Grade::parse(&self.grade)?,
            interview_scores: InterviewScores::parse(&self.interview_scores)?,
            known_prog_langs: split_list(self.languages.as_deref(), KnownProgLang::parse)?,
            past_jobs: split_list(self.past_jobs.as_deref(), PastJob::parse)?,
            jobs_applied: split_list(self.jobs_applied.as_deref(), JobName::parse)?,
            tags: split_list(self.tags.as_deref(), Tag::parse)?,
        })
    }
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<RosterRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    csv_reader.deserialize::<RosterRow>().collect()
}

fn split_list<T, F>(value: Option<&str>, parse: F) -> Result<BTreeSet<T>, FieldError>
where
    T: Ord,
    F: Fn(&str) -> Result<T, FieldError>,
{
    value
        .unwrap_or_default()
        .split(';')
        .filter(|item| !item.trim().is_empty())
        .map(parse)
        .collect()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str = "Name,Phone,Email,NRIC,Gender,Race,Address,School,Major,Grade,\
Interview Scores,Languages,Past Jobs,Jobs Applied,Tags\n";

    #[test]
    fn multi_valued_columns_split_on_semicolons() {
        let csv = format!(
            "{HEADER}Alex Yeoh,87438807,alexyeoh@example.com,S9671597H,Male,Chinese,\
\"311 Clementi Ave 2\",NUS,Computer Science,4.5,\"5,8,9\",Rust; Python,Intern,Engineer;Analyst,\n"
        );
        let person = parse_rows(Cursor::new(csv))
            .expect("parse")
            .pop()
            .expect("row")
            .into_person()
            .expect("valid person");

        assert_eq!(person.known_prog_langs.len(), 2);
        assert_eq!(person.jobs_applied.len(), 2);
        assert!(person.tags.is_empty());
        assert_eq!(person.interview_scores.scores(), &[5, 8, 9]);
    }

    #[test]
    fn invalid_fields_surface_as_field_errors() {
        let csv = format!(
            "{HEADER}Alex Yeoh,87438807,alexyeoh@example.com,BAD,Male,Chinese,Addr,NUS,CS,4.5,5,,,,\n"
        );
        let error = parse_rows(Cursor::new(csv))
            .expect("parse")
            .pop()
            .expect("row")
            .into_person()
            .expect_err("nric should be rejected");
        assert_eq!(error.field, "nric");
    }
}
