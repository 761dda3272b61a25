use clap::Parser;

// CLI Args
#[derive(Parser, Debug, Default, PartialEq, Eq)]
#[command(
   name = "conai",
   version,
   about = "Conventionalize your commit messages with AI",
   long_about = None
)]
pub struct Args {
   /// The commit message to conventionalize
   #[arg(long, short = 'm')]
   pub message: Option<String>,

   /// Set your OpenAI API key
   #[arg(long, short = 'k')]
   pub key: Option<String>,

   /// Copy the corrected message to clipboard
   #[arg(long)]
   pub copy: bool,

   /// Log debug details to stderr
   #[arg(long, short = 'v')]
   pub verbose: bool,
}

/// Result of a single completion attempt, as seen by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformOutcome {
   /// The model's reply, verbatim
   Corrected(String),
   /// Provider rejected the key
   InvalidCredential,
   /// Anything else the provider or transport reported
   ProviderError(String),
}

/// How a run ended. `main` turns this into the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
   /// Too few arguments; usage was printed
   Help,
   /// Arguments parsed but no action flag given
   Idle,
   /// Key saved and/or message transformed without error
   Done,
   /// No usable key on disk
   MissingCredential,
   /// Provider rejected the key
   InvalidCredential,
   /// Provider or transport failure
   ProviderFailed,
}

impl Status {
   pub const fn is_failure(self) -> bool {
      matches!(self, Self::MissingCredential | Self::InvalidCredential | Self::ProviderFailed)
   }
}

impl From<&TransformOutcome> for Status {
   fn from(outcome: &TransformOutcome) -> Self {
      match outcome {
         TransformOutcome::Corrected(_) => Self::Done,
         TransformOutcome::InvalidCredential => Self::InvalidCredential,
         TransformOutcome::ProviderError(_) => Self::ProviderFailed,
      }
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn test_args_short_flags() {
      let args = Args::try_parse_from(["conai", "-m", "added stuff", "-k", "sk-1"]).unwrap();
      assert_eq!(args, Args {
         message: Some("added stuff".to_string()),
         key: Some("sk-1".to_string()),
         ..Default::default()
      });
   }

   #[test]
   fn test_args_long_flags() {
      let args =
         Args::try_parse_from(["conai", "--message", "wip", "--key", "sk-2", "--copy"]).unwrap();
      assert_eq!(args.message.as_deref(), Some("wip"));
      assert_eq!(args.key.as_deref(), Some("sk-2"));
      assert!(args.copy);
   }

   #[test]
   fn test_args_message_requires_value() {
      assert!(Args::try_parse_from(["conai", "-v", "-m"]).is_err());
   }

   #[test]
   fn test_status_from_outcome() {
      assert_eq!(Status::from(&TransformOutcome::Corrected("x".into())), Status::Done);
      assert_eq!(Status::from(&TransformOutcome::InvalidCredential), Status::InvalidCredential);
      assert_eq!(
         Status::from(&TransformOutcome::ProviderError("e".into())),
         Status::ProviderFailed
      );
   }

   #[test]
   fn test_status_failure_classification() {
      assert!(!Status::Help.is_failure());
      assert!(!Status::Idle.is_failure());
      assert!(!Status::Done.is_failure());
      assert!(Status::MissingCredential.is_failure());
      assert!(Status::InvalidCredential.is_failure());
      assert!(Status::ProviderFailed.is_failure());
   }
}
