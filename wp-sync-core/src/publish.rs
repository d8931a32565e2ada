//! Stage, commit and push the output tree with the `git` CLI.
//!
//! The three steps run in order and the first failure stops the sequence: a
//! failed commit means push is never attempted. Nothing is rolled back.

use std::fmt;
use std::path::Path;
use std::process::Command;

use tracing::{error, info};

use crate::config::PublishConfig;
use crate::contract::{CommandRunner, ExitOutcome};
use crate::error::PublishError;

const GIT: &str = "git";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitStep {
    Stage,
    Commit,
    Push,
}

impl GitStep {
    pub fn subcommand(self) -> &'static str {
        match self {
            GitStep::Stage => "add",
            GitStep::Commit => "commit",
            GitStep::Push => "push",
        }
    }
}

impl fmt::Display for GitStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.subcommand())
    }
}

/// [`CommandRunner`] backed by `std::process::Command`. Output is inherited.
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &str, args: &[String], workdir: &Path) -> std::io::Result<ExitOutcome> {
        let status = Command::new(program).args(args).current_dir(workdir).status()?;
        Ok(ExitOutcome {
            code: status.code(),
        })
    }
}

pub struct Publisher<'a, R: CommandRunner + ?Sized> {
    runner: &'a R,
    config: &'a PublishConfig,
}

impl<'a, R: CommandRunner + ?Sized> Publisher<'a, R> {
    pub fn new(runner: &'a R, config: &'a PublishConfig) -> Self {
        Self { runner, config }
    }

    /// The argument list of each step, in execution order.
    pub fn steps(&self) -> Vec<(GitStep, Vec<String>)> {
        let mut add = vec![GitStep::Stage.subcommand().to_string()];
        add.extend(self.config.add_paths.iter().cloned());

        let commit = vec![
            GitStep::Commit.subcommand().to_string(),
            "-m".to_string(),
            self.config.commit_message.clone(),
        ];

        let mut push = vec![GitStep::Push.subcommand().to_string()];
        if let Some(remote) = &self.config.remote {
            push.push(remote.clone());
            if let Some(branch) = &self.config.branch {
                push.push(branch.clone());
            }
        }

        vec![
            (GitStep::Stage, add),
            (GitStep::Commit, commit),
            (GitStep::Push, push),
        ]
    }

    /// Run all steps, stopping at the first failure.
    pub fn publish(&self) -> Result<(), PublishError> {
        for (step, args) in self.steps() {
            self.run_step(step, &args)?;
        }
        Ok(())
    }

    fn run_step(&self, step: GitStep, args: &[String]) -> Result<(), PublishError> {
        let workdir = self.config.workdir.as_path();
        match self.runner.run(GIT, args, workdir) {
            Ok(outcome) if outcome.success() => {
                info!(step = %step, workdir = %workdir.display(), "git step succeeded");
                Ok(())
            }
            Ok(outcome) => {
                error!(step = %step, code = ?outcome.code, "git exited with non-zero code");
                Err(PublishError::NonZeroExit {
                    step,
                    code: outcome.code,
                })
            }
            Err(source) => {
                error!(step = %step, error = ?source, "Failed to launch git process");
                Err(PublishError::Launch { step, source })
            }
        }
    }
}
