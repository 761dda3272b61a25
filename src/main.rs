use std::{io, process::ExitCode};

use conai::{
   App, ConaiError, Invocation, Result, Status,
   api::OpenAiClient,
   app::write_help,
   config::{ClientSettings, JsonKeyStore},
   parse_invocation,
   style::{self, Stream, icons},
};
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Filter for tracing output. A non-empty, parseable `RUST_LOG` wins outright;
/// otherwise `--verbose` selects DEBUG and the default is WARN.
fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
   rust_log
      .filter(|directives| !directives.trim().is_empty())
      .and_then(|directives| EnvFilter::try_new(directives).ok())
      .unwrap_or_else(|| {
         let level = if verbose { Level::DEBUG } else { Level::WARN };
         EnvFilter::default().add_directive(level.into())
      })
}

/// Route tracing output to stderr.
fn init_logging(verbose: bool) {
   let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
   let _ = tracing_subscriber::registry()
      .with(fmt::layer().with_writer(io::stderr))
      .with(log_filter(verbose, rust_log.as_deref()))
      .try_init();
}

fn run() -> Result<Status> {
   // A missing .env is the normal case
   let _ = dotenvy::dotenv();

   let invocation = parse_invocation(std::env::args_os())?;
   let Invocation::Run(args) = &invocation else {
      write_help(&mut io::stdout())?;
      return Ok(Status::Help);
   };
   init_logging(args.verbose);

   let store = JsonKeyStore::locate()?;
   let client = OpenAiClient::new(ClientSettings::from_env())?;
   let app = App::new(store, client);

   // Unlocked handles: the spinner thread writes to stderr concurrently
   app.run(&invocation, &mut io::stdout(), &mut io::stderr())
}

fn main() -> ExitCode {
   match run() {
      Ok(status) if status.is_failure() => ExitCode::FAILURE,
      Ok(_) => ExitCode::SUCCESS,
      Err(ConaiError::ArgumentError(e)) => e.exit(),
      Err(e) => {
         eprintln!("{} {e}", style::error(Stream::Stderr, icons::ERROR));
         ExitCode::FAILURE
      },
   }
}
