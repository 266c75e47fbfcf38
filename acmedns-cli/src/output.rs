//! Terminal output helpers: status markers, prompts and the monitor countdown.

use std::io::{self, BufRead, Write};
use std::time::Duration;

use acmedns_core::services::MonitorObserver;

const ANSI_RED: &str = "\x1b[31m";
const ANSI_GREEN: &str = "\x1b[32m";
const ANSI_YELLOW: &str = "\x1b[33m";
const ANSI_BLUE: &str = "\x1b[34m";
const ANSI_CLEAR: &str = "\x1b[0m";
const CLEAR_LINE: &str = "\r\x1b[2K";

/// Status line kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Success,
    Info,
    Warning,
    Error,
    Debug,
}

impl Marker {
    fn symbol(self) -> (&'static str, char) {
        match self {
            Self::Success => (ANSI_GREEN, '*'),
            Self::Info => (ANSI_BLUE, 'i'),
            Self::Warning => (ANSI_YELLOW, 'W'),
            Self::Error => (ANSI_RED, '!'),
            Self::Debug => (ANSI_YELLOW, 'D'),
        }
    }

    /// `[*]`-style marker in color.
    pub fn render(self) -> String {
        let (color, symbol) = self.symbol();
        format!("[{color}{symbol}{ANSI_CLEAR}]")
    }
}

/// Format a status line, indented by `offset` spaces.
pub fn status_line(marker: Marker, message: &str, offset: usize) -> String {
    format!("{}{} {message}", " ".repeat(offset), marker.render())
}

pub fn print_success(message: &str, offset: usize) {
    println!("{}", status_line(Marker::Success, message, offset));
}

pub fn print_info(message: &str, offset: usize) {
    println!("{}", status_line(Marker::Info, message, offset));
}

pub fn print_warning(message: &str, offset: usize) {
    println!("{}", status_line(Marker::Warning, message, offset));
}

pub fn print_error(message: &str, offset: usize) {
    println!("{}", status_line(Marker::Error, message, offset));
}

/// Extra detail shown with `-v` or `--vv`.
pub fn print_verbose(verbose: bool, message: &str, offset: usize) {
    if verbose {
        println!("{}", status_line(Marker::Debug, message, offset));
    }
}

/// Ask a yes/no question on the terminal.
pub fn yes_no(question: &str, default: bool) -> bool {
    let stdin = io::stdin();
    prompt_yes_no(&mut stdin.lock(), &mut io::stdout(), question, default)
}

/// Ask `question` on `output` and read the answer from `input`.
///
/// Anything other than `y` or `n` (case-insensitive) selects `default`.
pub fn prompt_yes_no<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
    default: bool,
) -> bool {
    let choices = if default { "[Y/n]" } else { "[y/N]" };
    // A broken terminal falls through to the default answer.
    let _ = write!(output, "{question} {choices}: ");
    let _ = output.flush();

    let mut answer = String::new();
    if input.read_line(&mut answer).is_err() {
        return default;
    }
    match answer.trim().to_ascii_lowercase().as_str() {
        "y" => true,
        "n" => false,
        _ => default,
    }
}

/// Prints the countdown between monitor polls to stderr.
pub struct CountdownObserver {
    verbose: bool,
}

impl CountdownObserver {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    fn clear_line() {
        eprint!("{CLEAR_LINE}");
    }
}

impl MonitorObserver for CountdownObserver {
    fn target_changed(&self, target: &str) {
        if self.verbose {
            Self::clear_line();
            print_info(
                &format!("Detected a change in CNAME record. New CNAME target: {target}"),
                0,
            );
        }
    }

    fn record_found(&self, _data: &str) {
        Self::clear_line();
    }

    fn waiting(&self, remaining: Duration) {
        eprint!(
            "{CLEAR_LINE}Waiting for {} seconds... Press Ctrl + C to abort and exit.",
            remaining.as_secs()
        );
        let _ = io::stderr().flush();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn ask(answer: &str, default: bool) -> (bool, String) {
        let mut input = answer.as_bytes();
        let mut output = Vec::new();
        let result = prompt_yes_no(&mut input, &mut output, "Continue?", default);
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_prompt_answers() {
        assert!(ask("y\n", false).0);
        assert!(ask("Y\n", false).0);
        assert!(!ask("n\n", true).0);
        assert!(!ask(" N \n", true).0);
    }

    #[test]
    fn test_prompt_default() {
        let (answer, shown) = ask("\n", true);
        assert!(answer);
        assert_eq!(shown, "Continue? [Y/n]: ");

        let (answer, shown) = ask("maybe\n", false);
        assert!(!answer);
        assert_eq!(shown, "Continue? [y/N]: ");

        assert!(ask("", true).0);
    }

    #[test]
    fn test_status_line() {
        assert_eq!(
            status_line(Marker::Success, "done", 1),
            " [\x1b[32m*\x1b[0m] done"
        );
        assert!(status_line(Marker::Error, "failed", 0).starts_with("[\x1b[31m!"));
    }
}
