//! y/N prompts and alerts on a terminal

use std::io::{BufRead, Write};

use finqa_core::{ConfirmRequest, Dialogs};
use tracing::warn;

pub struct TerminalDialogs<'a, R, W> {
    input: &'a mut R,
    output: &'a mut W,
}

impl<'a, R: BufRead, W: Write> TerminalDialogs<'a, R, W> {
    pub fn new(input: &'a mut R, output: &'a mut W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, message: &str) -> std::io::Result<bool> {
        write!(self.output, "{} [y/N] ", message)?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        let answer = line.trim().to_ascii_lowercase();
        Ok(answer == "y" || answer == "yes")
    }
}

impl<R: BufRead, W: Write> Dialogs for TerminalDialogs<'_, R, W> {
    fn confirm(&mut self, request: &ConfirmRequest) -> bool {
        match self.ask(request.message()) {
            Ok(answer) => answer,
            Err(e) => {
                warn!(error = %e, "confirmation prompt failed; treating as declined");
                false
            }
        }
    }

    fn alert(&mut self, message: &str) {
        if let Err(e) = writeln!(self.output, "{}", message) {
            warn!(error = %e, "failed to show alert");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_only_yes_confirms() {
        let mut input = Cursor::new("y\nYES\n\nno\n");
        let mut output = Vec::new();
        let mut dialogs = TerminalDialogs::new(&mut input, &mut output);
        let request = ConfirmRequest::DeleteDocument { index: 0 };

        assert!(dialogs.confirm(&request));
        assert!(dialogs.confirm(&request));
        assert!(!dialogs.confirm(&request));
        assert!(!dialogs.confirm(&request));
        // EOF declines
        assert!(!dialogs.confirm(&request));

        let shown = String::from_utf8(output).unwrap();
        assert!(shown.starts_with("Are you sure you want to delete this document? [y/N] "));
    }

    #[test]
    fn test_alert_writes_line() {
        let mut input = Cursor::new("");
        let mut output = Vec::new();
        TerminalDialogs::new(&mut input, &mut output).alert("The form contains errors.");
        assert_eq!(String::from_utf8(output).unwrap(), "The form contains errors.\n");
    }
}
