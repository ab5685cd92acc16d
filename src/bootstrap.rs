//! Entrypoint flow: version query or full initialize/run.

use std::future::Future;
use std::io::Write;
use std::process::ExitCode;

use crate::cli::Cli;
use crate::lifecycle::{shutdown_signal, Application};
use crate::version::BuildInfo;

/// How the process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    VersionPrinted,
    CleanShutdown,
    Fatal,
}

impl Outcome {
    pub fn exit_code(self) -> ExitCode {
        match self {
            Outcome::VersionPrinted | Outcome::CleanShutdown => ExitCode::SUCCESS,
            Outcome::Fatal => ExitCode::FAILURE,
        }
    }
}

/// Run the process until a termination signal.
pub async fn execute<W: Write>(cli: &Cli, app: Application, out: &mut W) -> Outcome {
    execute_until(cli, app, out, shutdown_signal()).await
}

/// Like [`execute`], with the termination trigger supplied by the caller.
///
/// Fatal errors are logged here through the application's logger; the
/// caller only turns the outcome into an exit status.
pub async fn execute_until<W, F>(cli: &Cli, mut app: Application, out: &mut W, signal: F) -> Outcome
where
    W: Write,
    F: Future<Output = ()>,
{
    let build = BuildInfo::current();

    if cli.version {
        return match write!(out, "{}", build).and_then(|_| out.flush()) {
            Ok(()) => Outcome::VersionPrinted,
            Err(e) => {
                app.logger().fatal("failed to print version", &e);
                Outcome::Fatal
            }
        };
    }

    if let Err(e) = app.initialize().await {
        app.logger().fatal("failed to initialize application", &e);
        return Outcome::Fatal;
    }

    tracing::info!(
        version = build.version,
        commit = build.commit,
        built = build.built,
        "starting application"
    );

    match app.run_until(signal).await {
        Ok(()) => Outcome::CleanShutdown,
        Err(e) => {
            app.logger().fatal("application failed", &e);
            Outcome::Fatal
        }
    }
}

