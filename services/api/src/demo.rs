use std::fmt::Display;
use std::sync::Arc;

use chrono::Local;
use clap::Args;
use hr_portal::error::AppError;
use hr_portal::store::{InMemoryBlobStore, InMemoryRealtimeStore};
use hr_portal::workflows::applications::{
    evaluate, ApplyError, ApplyOutcome, SkillMatch, WriteStrategy, ELIGIBILITY_THRESHOLD,
};
use hr_portal::workflows::ids::UserId;
use hr_portal::workflows::jobs::JobDraft;
use hr_portal::workflows::profiles::{ApplicantUpdate, Registration, Role};
use hr_portal::workflows::skills::parse_skill_list;
use hr_portal::workflows::Portal;
use serde::Serialize;

#[derive(Args, Debug)]
pub(crate) struct MatchArgs {
    /// Applicant skills, comma separated
    #[arg(long)]
    pub(crate) skills: String,
    /// Skills the job requires, comma separated
    #[arg(long)]
    pub(crate) required: String,
    /// Print the evaluation as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MatchReport {
    #[serde(flatten)]
    evaluation: SkillMatch,
    eligible: bool,
    threshold: u8,
}

pub(crate) fn run_match(args: MatchArgs) -> Result<(), AppError> {
    let applicant = parse_skill_list(&args.skills);
    let required = parse_skill_list(&args.required);
    let evaluation = evaluate(&applicant, &required);

    if args.json {
        let report = MatchReport {
            eligible: evaluation.is_eligible(),
            threshold: ELIGIBILITY_THRESHOLD,
            evaluation,
        };
        let rendered = serde_json::to_string_pretty(&report).map_err(workflow_error)?;
        println!("{rendered}");
        return Ok(());
    }

    render_match(&evaluation);
    Ok(())
}

fn render_match(evaluation: &SkillMatch) {
    println!("Match: {}%", evaluation.match_percentage);
    println!("  matched: {}", list_or_dash(&evaluation.matched_skills));
    println!("  missing: {}", list_or_dash(&evaluation.missing_skills));
    if evaluation.is_eligible() {
        println!("  eligible to apply");
    } else {
        println!("  below the {ELIGIBILITY_THRESHOLD}% threshold");
    }
}

fn list_or_dash(skills: &[String]) -> String {
    if skills.is_empty() {
        "-".to_string()
    } else {
        skills.join(", ")
    }
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// How an application reaches both of its copies: dual_write or multi_path
    #[arg(long, default_value = "dual_write", value_parser = parse_strategy)]
    pub(crate) strategy: WriteStrategy,
    /// Skills the demo applicant lists on their profile
    #[arg(long, default_value = "Java,SQL")]
    pub(crate) skills: String,
}

fn parse_strategy(raw: &str) -> Result<WriteStrategy, String> {
    WriteStrategy::parse(raw).ok_or_else(|| format!("unknown write strategy '{raw}'"))
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let store = Arc::new(InMemoryRealtimeStore::new());
    let blobs = Arc::new(InMemoryBlobStore::default());
    let portal = Portal::new(store, blobs, args.strategy);

    println!("HR portal demo ({})", Local::now().date_naive());
    println!("Write strategy: {:?}", args.strategy);

    let uid = UserId::from("uid_demo_applicant");
    portal
        .profiles
        .register(Registration {
            uid: uid.clone(),
            email: "applicant@example.test".to_string(),
            username: "demo-applicant".to_string(),
            role: Role::Applicant,
        })
        .await
        .map_err(workflow_error)?;
    portal
        .profiles
        .update_applicant(
            &uid,
            ApplicantUpdate {
                skills: Some(parse_skill_list(&args.skills)),
                ..ApplicantUpdate::default()
            },
        )
        .await
        .map_err(workflow_error)?;
    println!("Registered applicant {uid} with skills: {}", args.skills);

    let postings = [
        ("Backend Developer", ["Java", "SQL", "Docker"]),
        ("Systems Engineer", ["Go", "Rust", "C++"]),
    ];
    let mut jobs = Vec::with_capacity(postings.len());
    for (title, skills) in postings {
        let job = portal
            .jobs
            .create(JobDraft {
                title: title.to_string(),
                department: "Engineering".to_string(),
                skills: skills.iter().map(|skill| skill.to_string()).collect(),
                vacancies: 1,
                ..JobDraft::default()
            })
            .await
            .map_err(workflow_error)?;
        println!("Posted {} ({})", job.posting.title, job.id);
        jobs.push(job);
    }

    println!();
    println!("Applying:");
    for job in &jobs {
        match portal.applications.apply(&uid, &job.id).await {
            Ok(ApplyOutcome::Applied(application)) => println!(
                "  {}: applied at {}% ({})",
                job.posting.title, application.match_percentage, application.status
            ),
            Ok(ApplyOutcome::AlreadyApplied(_)) => {
                println!("  {}: already applied", job.posting.title)
            }
            Err(ApplyError::BelowThreshold {
                match_percentage,
                threshold,
            }) => println!(
                "  {}: refused at {match_percentage}% (needs {threshold}%)",
                job.posting.title
            ),
            Err(err) => return Err(workflow_error(err)),
        }
    }

    let activity = portal
        .applications
        .applied_jobs(&uid)
        .await
        .map_err(workflow_error)?;
    println!();
    println!("Applied jobs: {}", activity.len());
    for entry in &activity {
        println!("  - {} [{}]", entry.job_title, entry.status);
    }

    let dashboard = portal.dashboard.snapshot().await;
    println!();
    println!(
        "Dashboard: {} jobs, {} vacancies, {} applications",
        dashboard.totals.jobs, dashboard.totals.vacancies, dashboard.totals.applications
    );

    Ok(())
}

fn workflow_error(err: impl Display) -> AppError {
    AppError::Workflow(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_parser_accepts_known_names() {
        assert_eq!(parse_strategy("multi_path"), Ok(WriteStrategy::MultiPath));
        assert_eq!(parse_strategy("dual_write"), Ok(WriteStrategy::DualWrite));
        assert!(parse_strategy("eventual").is_err());
    }

    #[test]
    fn empty_skill_lists_render_as_dash() {
        assert_eq!(list_or_dash(&[]), "-");
        assert_eq!(
            list_or_dash(&["Java".to_string(), "SQL".to_string()]),
            "Java, SQL"
        );
    }

    #[test]
    fn match_command_succeeds_for_both_output_modes() {
        for json in [false, true] {
            run_match(MatchArgs {
                skills: "Java, SQL".to_string(),
                required: "Java,SQL,Docker".to_string(),
                json,
            })
            .expect("match runs");
        }
    }

    #[tokio::test]
    async fn demo_runs_against_in_memory_stores() {
        run_demo(DemoArgs {
            strategy: WriteStrategy::MultiPath,
            skills: "Java,SQL".to_string(),
        })
        .await
        .expect("demo completes");
    }
}
