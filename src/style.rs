//! Terminal styling utilities for consistent CLI output.
//!
//! Respects `NO_COLOR` environment variable and terminal capabilities.

use std::{
   io::{self, IsTerminal, Write},
   sync::{OnceLock, mpsc},
   thread,
   time::Duration,
};

use owo_colors::OwoColorize;

/// Output stream a styled string is headed for.
///
/// Color support is decided per stream: `conai -k x > file` keeps stdout
/// plain even when stderr is a terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
   Stdout,
   Stderr,
}

impl Stream {
   const fn detection_target(self) -> supports_color::Stream {
      match self {
         Self::Stdout => supports_color::Stream::Stdout,
         Self::Stderr => supports_color::Stream::Stderr,
      }
   }
}

/// Whether color output is enabled, per stream (cached on first call).
static STDOUT_COLOR: OnceLock<bool> = OnceLock::new();
static STDERR_COLOR: OnceLock<bool> = OnceLock::new();

/// Check if colors should be used on `stream`.
pub fn colors_enabled(stream: Stream) -> bool {
   let cell = match stream {
      Stream::Stdout => &STDOUT_COLOR,
      Stream::Stderr => &STDERR_COLOR,
   };
   *cell.get_or_init(|| {
      // NO_COLOR takes precedence (https://no-color.org/)
      if std::env::var("NO_COLOR").is_ok() {
         return false;
      }
      supports_color::on(stream.detection_target()).is_some_and(|level| level.has_basic)
   })
}

/// Success: checkmarks, completed actions (green).
pub fn success(stream: Stream, s: &str) -> String {
   if colors_enabled(stream) {
      s.green().to_string()
   } else {
      s.to_string()
   }
}

/// Error: failures (red).
pub fn error(stream: Stream, s: &str) -> String {
   if colors_enabled(stream) {
      s.red().to_string()
   } else {
      s.to_string()
   }
}

/// Bold: product names, flags.
pub fn bold(stream: Stream, s: &str) -> String {
   if colors_enabled(stream) {
      s.bold().to_string()
   } else {
      s.to_string()
   }
}

/// Tool name in the banner (blue + bold).
pub fn brand(stream: Stream, s: &str) -> String {
   if colors_enabled(stream) {
      s.blue().bold().to_string()
   } else {
      s.to_string()
   }
}

// === Status Icons ===

pub mod icons {
   pub const SUCCESS: &str = "\u{2714}";
   pub const ERROR: &str = "\u{2716}";
   pub const SPARKLES: &str = "\u{2728}";
   pub const CLIPBOARD: &str = "\u{1F4CB}";
}

// === Spinner ===

const SPINNER_FRAMES: &[char] = &[
   '\u{280B}', '\u{2819}', '\u{2839}', '\u{2838}', '\u{283C}', '\u{2834}', '\u{2826}', '\u{2827}',
   '\u{2807}', '\u{280F}',
];

/// Run `f` while a spinner animates on stderr, then erase the spinner line so
/// the caller can print the outcome in its place.
///
/// Silent when stderr is not a terminal or colors are off.
pub fn with_spinner<F, T>(message: &str, f: F) -> T
where
   F: FnOnce() -> T,
{
   if !colors_enabled(Stream::Stderr) || !io::stderr().is_terminal() {
      return f();
   }

   let (tx, rx) = mpsc::channel::<()>();
   let msg = message.to_string();

   let spinner = thread::spawn(move || {
      let mut stderr = io::stderr();
      let mut idx = 0;
      loop {
         match rx.try_recv() {
            Ok(()) | Err(mpsc::TryRecvError::Disconnected) => {
               write!(stderr, "\r\x1b[K").ok();
               stderr.flush().ok();
               break;
            },
            Err(mpsc::TryRecvError::Empty) => {},
         }
         write!(stderr, "\r{} {}", SPINNER_FRAMES[idx].cyan(), msg).ok();
         stderr.flush().ok();
         idx = (idx + 1) % SPINNER_FRAMES.len();
         thread::sleep(Duration::from_millis(80));
      }
   });

   let result = f();
   tx.send(()).ok();
   spinner.join().ok();
   result
}

#[cfg(test)]
pub fn strip_ansi(s: &str) -> String {
   let mut out = String::with_capacity(s.len());
   let mut chars = s.chars();
   while let Some(c) = chars.next() {
      if c == '\x1b' {
         // CSI sequence: ESC [ params final-byte
         for next in chars.by_ref() {
            if next.is_ascii_alphabetic() {
               break;
            }
         }
      } else {
         out.push(c);
      }
   }
   out
}
