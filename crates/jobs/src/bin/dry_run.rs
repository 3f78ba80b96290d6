//! Parses a persisted job configuration with the standard handler set and
//! prints the commands the job would submit.

use std::io::Read;

use anyhow::{Context, bail};
use clap::Parser;

use jobcfg_jobs::{JobHandlerRegistry, JobHandlersConfig, JobRecord, RecordingCommandContext};

#[derive(Debug, Parser)]
#[command(name = "jobcfg-dry-run")]
#[command(about = "Show the commands a persisted job configuration would submit")]
struct Args {
    /// Handler type stored on the job, e.g. `suspend-job-definition`.
    handler_type: String,

    /// Canonical configuration string; `-` reads it from stdin.
    configuration: String,

    /// Tenant the job belongs to.
    #[arg(short = 't', long)]
    tenant: Option<String>,
}

impl Args {
    fn read_configuration(&self) -> anyhow::Result<String> {
        if self.configuration != "-" {
            return Ok(self.configuration.clone());
        }
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read configuration from stdin")?;
        Ok(buf)
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    jobcfg_observability::init();

    let registry = JobHandlerRegistry::from_config(&JobHandlersConfig::from_env());
    if !registry.contains(&args.handler_type) {
        bail!(
            "unknown handler type `{}`; known types: {}",
            args.handler_type,
            registry.handler_types().join(", ")
        );
    }

    let mut job = JobRecord::new(args.handler_type.clone(), args.read_configuration()?);
    if let Some(tenant) = &args.tenant {
        job = job.with_tenant(tenant.as_str());
    }
    tracing::info!(job_id = %job.id, handler_type = %job.handler_type, "dry run");

    let mut context = RecordingCommandContext::new();
    registry
        .execute(&job, &mut context)
        .with_context(|| format!("job {} failed", job.id))?;

    for command in context.commands() {
        println!("{}: {command:#?}", command.name());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use clap::error::ErrorKind;

    #[test]
    fn command_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_positionals_and_tenant() {
        let args = Args::try_parse_from([
            "jobcfg-dry-run",
            "history-cleanup",
            r#"{"minuteFrom":0,"minuteTo":59}"#,
            "--tenant",
            "tenant-a",
        ])
        .unwrap();
        assert_eq!(args.handler_type, "history-cleanup");
        assert_eq!(args.tenant.as_deref(), Some("tenant-a"));
        assert_eq!(args.read_configuration().unwrap(), r#"{"minuteFrom":0,"minuteTo":59}"#);
    }

    #[test]
    fn missing_configuration_is_a_usage_error() {
        let err = Args::try_parse_from(["jobcfg-dry-run", "history-cleanup"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn extra_positional_is_rejected() {
        let err = Args::try_parse_from(["jobcfg-dry-run", "history-cleanup", "{}", "surplus"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }
}
