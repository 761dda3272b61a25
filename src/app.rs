//! Command dispatch: help, store the key, or conventionalize a message.

use std::{ffi::OsString, io::Write};

use arboard::Clipboard;
use clap::{CommandFactory, Parser, error::ErrorKind};

use crate::{
   api::CompletionClient,
   config::KeyStore,
   error::{ConaiError, Result},
   prompt::build_prompts,
   style::{self, Stream, icons},
   types::{Args, Status, TransformOutcome},
};

pub const PROGRESS_MESSAGE: &str = "Working on it...";

/// What the command line asked for
#[derive(Debug, PartialEq, Eq)]
pub enum Invocation {
   /// Fewer than two arguments (or `--help`): print banner and usage
   Help,
   Run(Args),
}

/// Decide between help and a real run. `argv` includes the program name.
pub fn parse_invocation<I, T>(argv: I) -> Result<Invocation>
where
   I: IntoIterator<Item = T>,
   T: Into<OsString>,
{
   let argv: Vec<OsString> = argv.into_iter().map(Into::into).collect();
   if argv.len() < 3 {
      return Ok(Invocation::Help);
   }

   match Args::try_parse_from(argv) {
      Ok(args) => Ok(Invocation::Run(args)),
      Err(e) if e.kind() == ErrorKind::DisplayHelp => Ok(Invocation::Help),
      Err(e) => Err(ConaiError::ArgumentError(e)),
   }
}

pub fn banner() -> String {
   format!(
      "{} {} - conventionalize your commit messages with AI\n\nUsage:\n\tconai -k <key>      Sets \
       your OpenAI API key\n\tconai -m <message>  Conventionalizes your commit message\n",
      icons::SPARKLES,
      style::brand(Stream::Stdout, "conai")
   )
}

pub fn invalid_key_message() -> String {
   format!(
      "Uh oh! Looks like your {} is invalid. Try setting it using {}!",
      style::bold(Stream::Stderr, "OpenAI API key"),
      style::bold(Stream::Stderr, "conai -k <key>")
   )
}

fn key_updated_message() -> String {
   format!(
      "{} Your {} has been updated!",
      style::success(Stream::Stdout, icons::SUCCESS),
      style::bold(Stream::Stdout, "OpenAI API key")
   )
}

fn error_icon() -> String {
   style::error(Stream::Stderr, icons::ERROR)
}

/// Banner followed by clap's usage text.
///
/// Needs no credential store or HTTP client, so it works even when neither
/// can be set up.
pub fn write_help(out: &mut dyn Write) -> Result<()> {
   writeln!(out, "{}", banner())?;
   write!(out, "{}", Args::command().render_help())?;
   Ok(())
}

/// Turn an outcome into the single line shown to the user.
///
/// The corrected message goes to stdout untouched so it can be piped into
/// `git commit -F -`.
pub fn render_outcome(outcome: &TransformOutcome) -> (Stream, String) {
   match outcome {
      TransformOutcome::Corrected(text) => (Stream::Stdout, text.clone()),
      TransformOutcome::InvalidCredential => {
         (Stream::Stderr, format!("{} {}", error_icon(), invalid_key_message()))
      },
      TransformOutcome::ProviderError(msg) => {
         (Stream::Stderr, format!("{} OpenAI error: {msg}", error_icon()))
      },
   }
}

/// Build the prompts for `message` and ask the provider once.
///
/// Provider failures become outcomes; only local failures (prompt rendering)
/// are returned as errors.
pub fn conventionalize<C: CompletionClient + ?Sized>(
   client: &C,
   api_key: &str,
   message: &str,
) -> Result<TransformOutcome> {
   let prompts = build_prompts(message)?;
   match client.complete(api_key, &prompts.system, &prompts.user) {
      Ok(text) => Ok(TransformOutcome::Corrected(text)),
      Err(ConaiError::InvalidCredential) => Ok(TransformOutcome::InvalidCredential),
      Err(ConaiError::ProviderError(msg)) => Ok(TransformOutcome::ProviderError(msg)),
      Err(e) => Err(e),
   }
}

/// Copy text to clipboard
fn copy_to_clipboard(text: &str) -> Result<()> {
   let mut clipboard = Clipboard::new()?;
   clipboard.set_text(text)?;
   Ok(())
}

/// The dispatcher, wired to a credential store and a completion provider.
pub struct App<S, C> {
   store:  S,
   client: C,
}

impl<S: KeyStore, C: CompletionClient> App<S, C> {
   pub const fn new(store: S, client: C) -> Self {
      Self { store, client }
   }

   pub fn run(
      &self,
      invocation: &Invocation,
      out: &mut dyn Write,
      err: &mut dyn Write,
   ) -> Result<Status> {
      let args = match invocation {
         Invocation::Help => {
            write_help(out)?;
            return Ok(Status::Help);
         },
         Invocation::Run(args) => args,
      };

      let mut status = Status::Idle;

      // Empty values count as absent
      if let Some(key) = args.key.as_deref().filter(|k| !k.is_empty()) {
         self.store.set_key(key)?;
         writeln!(out, "{}", key_updated_message())?;
         status = Status::Done;
      }

      if let Some(message) = args.message.as_deref().filter(|m| !m.is_empty()) {
         let api_key = match self.store.load_key() {
            Ok(key) => key,
            Err(ConaiError::ConfigMissingOrInvalid { path }) => {
               tracing::debug!(%path, "no usable credential");
               writeln!(err, "{} {}", error_icon(), invalid_key_message())?;
               return Ok(Status::MissingCredential);
            },
            Err(e) => return Err(e),
         };

         let outcome = style::with_spinner(PROGRESS_MESSAGE, || {
            conventionalize(&self.client, &api_key, message)
         })?;

         match render_outcome(&outcome) {
            (Stream::Stdout, line) => writeln!(out, "{line}")?,
            (Stream::Stderr, line) => writeln!(err, "{line}")?,
         }

         if args.copy
            && let TransformOutcome::Corrected(text) = &outcome
         {
            match copy_to_clipboard(text) {
               Ok(()) => writeln!(err, "{} Copied to clipboard", icons::CLIPBOARD)?,
               Err(e) => writeln!(err, "Note: Failed to copy to clipboard: {e}")?,
            }
         }

         status = Status::from(&outcome);
      }

      Ok(status)
   }
}
