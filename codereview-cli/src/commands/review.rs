//! Review command - Review a repository once and print the result

use clap::Args;
use codereview_core::{Config, ReviewRequest};

/// Arguments for the review command
#[derive(Args, Debug)]
pub struct ReviewArgs {
    /// What the candidate was asked to build
    #[arg(short, long)]
    pub assignment: String,

    /// Repository to review (owner/repo or GitHub URL)
    #[arg(short, long)]
    pub repo: String,

    /// Candidate level (e.g. Junior, Middle, Senior)
    #[arg(short, long, default_value = "Junior")]
    pub level: String,
}

impl ReviewArgs {
    /// Execute the review command
    pub async fn execute(&self, verbose: bool, config: &Config) -> anyhow::Result<()> {
        if verbose {
            tracing::info!(
                repo = %self.repo,
                level = %self.level,
                model = %config.inference.model,
                "Starting one-shot review"
            );
        }

        let orchestrator = super::build_orchestrator(config).await?;
        let request = ReviewRequest {
            assignment_description: self.assignment.clone(),
            github_repo_url: self.repo.clone(),
            candidate_level: self.level.clone(),
        };

        let review = orchestrator.review(&request).await?;
        println!("{}", review);

        Ok(())
    }
}
