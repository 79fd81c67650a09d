use clap::Args;
use hiring_pipeline::error::AppError;
use hiring_pipeline::workflows::candidates::{
    CandidatePipeline, CommandOutcome, DuplicateRule, Index, JobName, JobView, MoveRequest,
    PersonFilter, PersonPredicate, PipelineError, PipelineState, RosterImporter, Stage,
    TextField,
};
use std::io::Cursor;
use std::path::PathBuf;

const SAMPLE_ROSTER: &str = "\
Name,Phone,Email,NRIC,Gender,Race,Address,School,Major,Grade,Interview Scores,Languages,Past Jobs,Jobs Applied,Tags
Alex Yeoh,87438807,alexyeoh@example.com,S9671597H,Male,Chinese,311 Clementi Ave 2,NUS,Computer Science,4.5,\"7,8\",Rust;Python,Intern,Software Engineer,referral
Bernice Yu,99272758,berniceyu@example.com,T0123456B,Female,Malay,10 Bishan St 22,NTU,Mathematics,3.9,6,Python,,Software Engineer;Data Analyst,
Charlotte Oliveiro,93210283,charlotte@example.com,S8812345C,Female,Eurasian,11 Ang Mo Kio Ave 3,SMU,Information Systems,4.1,\"8,9\",Java;SQL,Analyst,Data Analyst,
David Li,91031282,lidavid@example.com,G1234567N,Male,Indian,436 Serangoon Gardens St 26,SUTD,Engineering,3.4,5,C;Rust,,Software Engineer,
";

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Roster CSV to start from instead of the built-in sample.
    #[arg(long)]
    pub(crate) roster: Option<PathBuf>,
    /// Job whose candidates are moved during the walkthrough.
    #[arg(long, default_value = "Software Engineer")]
    pub(crate) job: String,
    /// Address keyword used for the filter step.
    #[arg(long, default_value = "ave")]
    pub(crate) keyword: String,
    /// Print the closing analytics as JSON.
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        roster,
        job,
        keyword,
        json,
    } = args;

    println!("Hiring pipeline demo");
    let (state, summary) = match roster {
        Some(path) => RosterImporter::from_path(path, DuplicateRule::Identity)?,
        None => RosterImporter::from_reader(Cursor::new(SAMPLE_ROSTER), DuplicateRule::Identity)?,
    };
    println!(
        "- Loaded {} persons ({} duplicate rows skipped)",
        summary.imported, summary.skipped
    );

    if let Err(err) = walkthrough(state, &job, &keyword, json) {
        println!("  Demo stopped: {} ({})", err, err.kind());
    }
    Ok(())
}

fn walkthrough(
    state: PipelineState,
    job: &str,
    keyword: &str,
    json: bool,
) -> Result<(), PipelineError> {
    let mut pipeline = CandidatePipeline::with_state(state);
    let job = JobName::parse(job)?;

    println!("\nJob board");
    for summary in pipeline.list_jobs() {
        println!(
            "  - {}: {} applicants | {} KIV | {} interview | {} shortlist",
            summary.name, summary.applicants, summary.kiv, summary.interview, summary.shortlist
        );
    }

    println!("\nMoving the first two applicants of {job} to interview");
    let first = Index::from_one_based(1)?;
    let second = Index::from_one_based(2)?;
    print_outcome(&pipeline.move_persons(MoveRequest {
        job: job.clone(),
        from: Stage::Applicant,
        to: Stage::Interview,
        to_job: None,
        indices: vec![first, second],
    })?);
    render_job(&pipeline.get_job(&job)?);

    println!("\nShortlisting the first interviewee");
    print_outcome(&pipeline.move_persons(MoveRequest {
        job: job.clone(),
        from: Stage::Interview,
        to: Stage::Shortlist,
        to_job: None,
        indices: vec![first],
    })?);
    render_job(&pipeline.get_job(&job)?);

    println!("\nUndo, then redo");
    print_outcome(&pipeline.undo()?);
    render_job(&pipeline.get_job(&job)?);
    print_outcome(&pipeline.redo()?);
    render_job(&pipeline.get_job(&job)?);

    println!("\nFiltering persons by address keyword '{keyword}'");
    let filter = PersonFilter::default().and(PersonPredicate::keywords(TextField::Address, keyword)?);
    print_outcome(&pipeline.set_filter(filter));
    for (position, person) in pipeline.filtered_persons().iter().enumerate() {
        println!("  {}. {} ({})", position + 1, person.name, person.address);
    }

    println!("\nHistory");
    for entry in pipeline.history() {
        let marker = if entry.current { "*" } else { " " };
        println!("  {marker} {} {}", entry.position, entry.label);
    }

    let analytics = pipeline.analytics();
    if json {
        match serde_json::to_string_pretty(&analytics) {
            Ok(body) => println!("\nAnalytics payload:\n{}", body),
            Err(err) => println!("\nAnalytics payload unavailable: {}", err),
        }
        return Ok(());
    }

    println!("\nAnalytics");
    println!("  {} persons across {} jobs", analytics.persons, analytics.jobs);
    for entry in &analytics.stage_totals {
        println!("  - {}: {}", entry.stage_label, entry.total);
    }
    if let Some(grade) = analytics.mean_grade {
        println!("  Mean grade {:.2}", grade);
    }
    if let Some(score) = analytics.mean_interview_score {
        println!("  Mean interview score {:.2}", score);
    }
    Ok(())
}

fn print_outcome(outcome: &CommandOutcome) {
    println!("  {}", outcome.summary);
}

fn render_job(view: &JobView) {
    for stage in Stage::ordered() {
        let names: Vec<String> = view
            .list(stage)
            .iter()
            .map(|person| person.name.to_string())
            .collect();
        println!("    {:<10} {}", stage.label(), names.join(", "));
    }
}
