// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// jdflink: send queue commands to a Caldera Nexio controller, write JDF
// tickets, and inspect JDF/JMF documents.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use jdflink_core::config::default_config_path;
use jdflink_core::node::{self, Node};
use jdflink_core::{ClientConfig, JdfError, time};
use jdflink_jdf::{Jdf, JdfFactory};
use jdflink_jmf::{
    AbortQueueEntryParams, Command, EndStatus, GangPolicy, JmfMessage, JmfResponse, NexioClient,
    NexioError, QueueFilter, QueueSubmissionParams, RemoveQueueEntryParams,
};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Debug, Parser)]
#[command(name = "jdflink", version, about = "JDF/JMF client for Caldera Nexio")]
struct Cli {
    /// Configuration file (defaults to the per-user config directory).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the controller's JMF endpoint.
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Override the SenderID written on envelopes.
    #[arg(long, global = true)]
    sender_id: Option<String>,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// Queue a JDF ticket on the controller.
    Submit {
        /// URL the controller fetches the ticket from.
        url: String,
        #[arg(long)]
        hold: bool,
        #[arg(long)]
        return_url: Option<String>,
        #[arg(long)]
        return_jmf: Option<String>,
        #[arg(long)]
        ref_id: Option<String>,
        #[arg(long)]
        gang: Option<String>,
        #[arg(long, default_value = "Gang", requires = "gang")]
        gang_policy: GangPolicy,
        #[command(flatten)]
        output: Output,
    },
    /// Remove every queue entry of a job.
    Remove {
        job_id: String,
        #[command(flatten)]
        output: Output,
    },
    /// Abort every queue entry of a job.
    Abort {
        job_id: String,
        /// Final state recorded for the aborted entries.
        #[arg(long, default_value = "Aborted")]
        end_status: EndStatus,
        #[command(flatten)]
        output: Output,
    },
    /// Write a minimal JDF ticket printing one file.
    Ticket {
        job_id: String,
        /// URL of the file to print.
        file_url: String,
        /// Write here instead of standard output.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Summarise a JDF ticket, JMF envelope or JMF response.
    Inspect { file: PathBuf },
    /// Write the default configuration file.
    InitConfig {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Args)]
struct Output {
    /// Print the envelope instead of sending it.
    #[arg(long)]
    dry_run: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Document(#[from] JdfError),

    #[error(transparent)]
    Nexio(#[from] NexioError),

    #[error("{0}")]
    Usage(String),
}

type CliResult<T> = std::result::Result<T, CliError>;

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "jdflink failed");
            let response = match &e {
                CliError::Nexio(nexio) => nexio.response(),
                _ => None,
            };
            match response {
                Some(response) => eprintln!("{}", describe_response(response)),
                None => eprintln!("error: {e}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);

    if let Cmd::InitConfig { force } = cli.command {
        return init_config(&config_path, force);
    }

    let mut config = ClientConfig::load_or_default(&config_path)?;
    if let Some(endpoint) = cli.endpoint {
        config.endpoint = endpoint;
    }
    if let Some(sender_id) = cli.sender_id {
        config.sender_id = sender_id;
    }

    match cli.command {
        Cmd::Submit {
            url,
            hold,
            return_url,
            return_jmf,
            ref_id,
            gang,
            gang_policy,
            output,
        } => {
            let mut params = QueueSubmissionParams::new(url).with_hold(hold);
            if let Some(url) = return_url {
                params = params.with_return_url(url);
            }
            if let Some(url) = return_jmf {
                params = params.with_return_jmf(url);
            }
            if let Some(ref_id) = ref_id {
                params = params.with_ref_id(ref_id);
            }
            if let Some(name) = gang {
                params = params.with_gang(name, gang_policy);
            }
            dispatch(config, Command::submit(params), &output)
        }
        Cmd::Remove { job_id, output } => {
            let params = RemoveQueueEntryParams::new(QueueFilter::for_job(job_id));
            dispatch(config, Command::remove(params), &output)
        }
        Cmd::Abort {
            job_id,
            end_status,
            output,
        } => {
            let params = AbortQueueEntryParams::new(end_status, QueueFilter::for_job(job_id));
            dispatch(config, Command::abort(params), &output)
        }
        Cmd::Ticket {
            job_id,
            file_url,
            output,
        } => write_ticket(&job_id, &file_url, output.as_deref()),
        Cmd::Inspect { file } => inspect(&file),
        Cmd::InitConfig { .. } => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Subcommands
// ---------------------------------------------------------------------------

fn dispatch(config: ClientConfig, command: Command, output: &Output) -> CliResult<()> {
    if output.dry_run {
        config.validate()?;
        let message = JmfMessage::from_config(&config, command);
        println!("{}", message.to_xml_string()?);
        return Ok(());
    }

    let client = NexioClient::connect(config)?;
    let response = client.send_command(command)?;
    println!("{}", describe_response(&response));
    Ok(())
}

fn write_ticket(job_id: &str, file_url: &str, output: Option<&Path>) -> CliResult<()> {
    let xml = Jdf::print_job(job_id, file_url).to_xml_string()?;
    match output {
        Some(path) => {
            std::fs::write(path, xml).map_err(JdfError::from)?;
            tracing::info!(path = %path.display(), "ticket written");
        }
        None => println!("{xml}"),
    }
    Ok(())
}

fn inspect(path: &Path) -> CliResult<()> {
    let bytes = std::fs::read(path).map_err(JdfError::from)?;
    let root = node::parse_document(&bytes)?;
    match root.name.as_str() {
        "JDF" => println!("{}", describe_jdf(&JdfFactory.from_element(&root)?)),
        "JMF" if node::child(&root, "Response").is_some() => {
            println!("{}", describe_response(&JmfResponse::from_element(&root)?));
        }
        "JMF" => println!("{}", describe_message(&JmfMessage::from_element(&root)?)),
        other => {
            return Err(CliError::Usage(format!(
                "{} is neither JDF nor JMF (root element {other})",
                path.display()
            )));
        }
    }
    Ok(())
}

fn init_config(path: &Path, force: bool) -> CliResult<()> {
    if path.exists() && !force {
        return Err(CliError::Usage(format!(
            "{} already exists; pass --force to overwrite",
            path.display()
        )));
    }
    ClientConfig::default().save(path)?;
    println!("wrote {}", path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn describe_response(response: &JmfResponse) -> String {
    let code = response.return_code();
    let mut out = format!(
        "{} {} (refID {}): {} [{}]",
        response.response.kind,
        if code.is_success() { "ok" } else { "failed" },
        response.response.ref_id,
        code.message(),
        code
    );
    if let Some(comment) = response.notification_comment() {
        out.push_str(&format!("\n  notification: {comment}"));
    }
    out
}

fn describe_message(message: &JmfMessage) -> String {
    let mut out = format!(
        "JMF {} from {} at {} (version {})",
        message.describe(),
        message.sender_id,
        time::format_iso8601(message.timestamp),
        message.version
    );
    if let Some(command) = &message.command {
        out.push_str(&format!("\n  command ID: {}", command.id));
    }
    out
}

fn describe_jdf(jdf: &Jdf) -> String {
    let mut out = format!(
        "JDF {} job {} ({}, {})",
        jdf.id, jdf.job_id, jdf.kind, jdf.status
    );
    if let Some(layout) = &jdf.resource_pool.run_list.layout_element {
        for file in layout.file_specs() {
            out.push_str(&format!("\n  file: {}", file.url));
        }
    }
    let status = jdf
        .audit_pool
        .as_ref()
        .and_then(|pool| pool.resource_audit.as_ref())
        .and_then(|audit| audit.run_list_link.as_ref())
        .and_then(|link| link.status.as_ref());
    if let Some(status) = status {
        if let Some(state) = status.job_state {
            out.push_str(&format!("\n  state: {state:?}"));
        }
        if let Some(printed) = status.number_printed {
            out.push_str(&format!("\n  printed: {printed}"));
        }
        if let Some(error) = &status.job_error {
            out.push_str(&format!("\n  error: {error}"));
        }
    }
    out
}
