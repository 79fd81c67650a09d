use std::io::Cursor;

use super::common::*;
use crate::workflows::candidates::{
    CandidatePipeline, DuplicateRule, PipelineError, RosterImportError, RosterImporter, Stage,
};

const HEADER: &str = "Name,Phone,Email,NRIC,Gender,Race,Address,School,Major,Grade,\
Interview Scores,Languages,Past Jobs,Jobs Applied,Tags\n";

fn roster(rows: &[&str]) -> Cursor<String> {
    let mut csv = HEADER.to_string();
    for row in rows {
        csv.push_str(row);
        csv.push('\n');
    }
    Cursor::new(csv)
}

#[test]
fn import_enrols_applicants_and_becomes_the_initial_snapshot() {
    let reader = roster(&[
        "Alex Yeoh,87438807,alexyeoh@example.com,S9671597H,Male,Chinese,311 Clementi Ave 2,NUS,CS,4.5,\"5,8\",Rust;Python,,Engineer,friend",
        "Bernice Yu,99272758,berniceyu@example.com,T0123456B,Female,Malay,10 Bishan St,NTU,Maths,3.9,7,,Intern,Engineer;Analyst,",
    ]);

    let (state, summary) =
        RosterImporter::from_reader(reader, DuplicateRule::Identity).expect("import succeeds");

    assert_eq!(summary.imported, 2);
    assert_eq!(summary.skipped, 0);
    let engineer = state.jobs.lists_of(&job("Engineer")).expect("job created");
    assert_eq!(engineer.get(Stage::Applicant).len(), 2);

    let mut pipeline = CandidatePipeline::with_state(state.clone());
    assert_eq!(pipeline.history().len(), 1);
    assert_eq!(pipeline.undo(), Err(PipelineError::NoPriorState));
    assert_eq!(pipeline.state(), &state);
}

#[test]
fn duplicate_rows_are_skipped_not_overwritten() {
    let reader = roster(&[
        "Alex Yeoh,87438807,alexyeoh@example.com,S9671597H,Male,Chinese,Addr,NUS,CS,4.5,5,,,,",
        "Alex Again,90000000,other@example.com,s9671597h,Male,Chinese,Addr,SMU,Law,2.0,3,,,,",
    ]);

    let (state, summary) =
        RosterImporter::from_reader(reader, DuplicateRule::Identity).expect("import succeeds");

    assert_eq!(summary.imported, 1);
    assert_eq!(summary.skipped, 1);
    let kept = state.persons.as_slice()[0].clone();
    assert_eq!(kept.name.as_str(), "Alex Yeoh");
}

#[test]
fn contact_rule_applies_during_import() {
    let reader = roster(&[
        "Alex Yeoh,87438807,alexyeoh@example.com,S9671597H,Male,Chinese,Addr,NUS,CS,4.5,5,,,,",
        "alex yeoh,87438807,new@example.com,S1111111C,Male,Chinese,Addr,NUS,CS,4.5,5,,,,",
    ]);

    let (_, summary) = RosterImporter::from_reader(reader, DuplicateRule::IdentityOrContact)
        .expect("import succeeds");

    assert_eq!(summary.skipped, 1);
}

#[test]
fn invalid_row_aborts_with_its_row_number() {
    let reader = roster(&[
        "Alex Yeoh,87438807,alexyeoh@example.com,S9671597H,Male,Chinese,Addr,NUS,CS,4.5,5,,,,",
        "Bernice Yu,99272758,berniceyu@example.com,T0123456B,Female,Malay,Addr,NTU,Maths,7.5,7,,,,",
    ]);

    match RosterImporter::from_reader(reader, DuplicateRule::Identity) {
        Err(RosterImportError::Row {
            row,
            source: PipelineError::InvalidFieldFormat(field),
        }) => {
            assert_eq!(row, 2);
            assert_eq!(field.field, "grade");
        }
        other => panic!("expected row error, got {other:?}"),
    }
}

#[test]
fn import_from_path_propagates_io_errors() {
    let error = RosterImporter::from_path("./does-not-exist.csv", DuplicateRule::Identity)
        .expect_err("expected io error");

    match error {
        RosterImportError::Io(_) => {}
        other => panic!("expected io error, got {other:?}"),
    }
}

#[test]
fn missing_columns_surface_as_csv_errors() {
    let reader = Cursor::new("Name,Phone\nAlex Yeoh,87438807\n".to_string());

    let error = RosterImporter::from_reader(reader, DuplicateRule::Identity)
        .expect_err("expected csv error");

    assert!(matches!(error, RosterImportError::Csv(_)));
}
