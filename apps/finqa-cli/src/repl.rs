//! Interactive form loop

use std::io::{self, BufRead, Write};
use std::time::Duration;

use finqa_core::{
    AcknowledgeSink, Collection, DocumentField, FieldPath, FormSession, ScalarField,
    SubmitOutcome, INSTRUCTIONS,
};
use tracing::info;

use crate::attachment;
use crate::commands::{Command, HELP};
use crate::render::{describe_verdict, render_errors, render_form};
use crate::terminal::TerminalDialogs;

/// What the driver does after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Submitted; wait this long, then clear the form
    AwaitCompletion(Duration),
    Quit,
}

pub struct Repl<R, W> {
    session: FormSession,
    input: R,
    out: W,
    columns: usize,
}

impl<R: BufRead, W: Write> Repl<R, W> {
    pub fn new(session: FormSession, input: R, out: W, columns: usize) -> Self {
        Self {
            session,
            input,
            out,
            columns,
        }
    }

    pub fn session(&self) -> &FormSession {
        &self.session
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        writeln!(self.out, "FinQA data-point form. Type 'help' for commands.")?;
        loop {
            write!(self.out, "> ")?;
            self.out.flush()?;

            let Some(line) = self.read_line()? else {
                break;
            };
            match self.execute(&line) {
                Ok(Flow::Continue) => {}
                Ok(Flow::AwaitCompletion(delay)) => self.await_completion(delay).await?,
                Ok(Flow::Quit) => break,
                Err(e) => writeln!(self.out, "error: {}", e)?,
            }
        }
        Ok(())
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Hold the form until the latency elapses; Ctrl-C cancels and keeps it
    async fn await_completion(&mut self, delay: Duration) -> anyhow::Result<()> {
        writeln!(self.out, "{} (Ctrl-C to cancel)", self.session.submit_label())?;
        self.out.flush()?;

        tokio::select! {
            _ = tokio::time::sleep(delay) => {
                self.session.complete_submission()?;
                writeln!(self.out, "Form cleared.")?;
            }
            _ = tokio::signal::ctrl_c() => {
                self.session.cancel_submission()?;
                writeln!(self.out, "Submission cancelled; the form was kept.")?;
            }
        }
        Ok(())
    }

    fn show_errors(&mut self, path: FieldPath) -> io::Result<()> {
        for message in self.session.form().errors().messages(&path) {
            writeln!(self.out, "  ! {}", message)?;
        }
        Ok(())
    }

    pub fn execute(&mut self, line: &str) -> anyhow::Result<Flow> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Flow::Continue);
        }

        match line.parse::<Command>()? {
            Command::SetPrompt(value) => {
                self.session.form_mut().set_field(ScalarField::Prompt, value);
                self.show_errors(FieldPath::PROMPT)?;
            }
            Command::SetAnswer(value) => {
                self.session.form_mut().set_field(ScalarField::Answer, value);
                self.show_errors(FieldPath::ANSWER)?;
            }
            Command::AddFact => {
                let index = self.session.form_mut().add_supporting_fact();
                writeln!(self.out, "Added supporting fact {}", index)?;
            }
            Command::SetFact {
                index,
                field,
                value,
            } => {
                self.session
                    .form_mut()
                    .set_supporting_fact(index, field, value)?;
                self.show_errors(FieldPath::fact(index, field))?;
            }
            Command::RemoveFact(index) => self.remove(Collection::SupportingFacts, index)?,
            Command::AddDocument => {
                let index = self.session.form_mut().add_document();
                writeln!(self.out, "Added document {}", index)?;
            }
            Command::SetDocument {
                index,
                field,
                value,
            } => {
                self.session.form_mut().set_document(index, field, value)?;
                self.show_errors(FieldPath::document(index, field))?;
            }
            Command::AttachFile { index, path } => {
                let file = attachment::load(&path)?;
                self.session.form_mut().set_document_file(index, Some(file))?;
                self.show_errors(FieldPath::document(index, DocumentField::File))?;
            }
            Command::DetachFile(index) => {
                self.session.form_mut().set_document_file(index, None)?;
            }
            Command::RemoveDocument(index) => self.remove(Collection::Documents, index)?,
            Command::Show => {
                let text = render_form(self.session.form(), self.columns);
                write!(self.out, "{}", text)?;
            }
            Command::Errors => {
                let text = render_errors(self.session.form().errors());
                write!(self.out, "{}", text)?;
            }
            Command::Check => {
                let verdict = self.session.assess();
                writeln!(self.out, "{}", describe_verdict(&verdict))?;
            }
            Command::Submit => return self.submit(),
            Command::Instructions => write!(self.out, "{}", INSTRUCTIONS.render_text())?,
            Command::Help => writeln!(self.out, "{}", HELP)?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn remove(&mut self, collection: Collection, index: usize) -> anyhow::Result<()> {
        let mut dialogs = TerminalDialogs::new(&mut self.input, &mut self.out);
        let form = self.session.form_mut();
        let removed = match collection {
            Collection::SupportingFacts => form.remove_supporting_fact(index, &mut dialogs)?,
            Collection::Documents => form.remove_document(index, &mut dialogs)?,
        };
        if removed {
            writeln!(self.out, "Removed {} {}", collection, index)?;
        }
        Ok(())
    }

    fn submit(&mut self) -> anyhow::Result<Flow> {
        let mut sink = AcknowledgeSink::default();
        let mut dialogs = TerminalDialogs::new(&mut self.input, &mut self.out);
        let outcome = self.session.submit(&mut dialogs, &mut sink)?;

        Ok(match outcome {
            SubmitOutcome::Submitted {
                receipt,
                complete_after,
            } => {
                info!(submitted_at = %receipt.submitted_at, "form submitted");
                Flow::AwaitCompletion(complete_after)
            }
            SubmitOutcome::Declined => {
                writeln!(self.out, "Not submitted.")?;
                Flow::Continue
            }
            SubmitOutcome::Blocked(_) => Flow::Continue,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use finqa_core::{FormConfig, FormData};
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn repl(script: &str) -> Repl<Cursor<Vec<u8>>, Vec<u8>> {
        let config = FormConfig {
            submit_delay_ms: 0,
            ..Default::default()
        };
        Repl::new(
            FormSession::new(config),
            Cursor::new(script.as_bytes().to_vec()),
            Vec::new(),
            80,
        )
    }

    fn output(repl: &Repl<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(repl.out.clone()).unwrap()
    }

    #[tokio::test]
    async fn test_submit_echoes_payload_and_clears() {
        let mut repl = repl(
            "prompt What was total revenue in Q3 2024?\n\
             answer Total revenue was $10 million.\n\
             doc 0 link https://www.sec.gov/Archives/a.htm\n\
             submit\n\
             quit\n",
        );
        repl.run().await.unwrap();

        let out = output(&repl);
        assert!(out.contains("\"prompt\": \"What was total revenue in Q3 2024?\""));
        assert!(out.contains("\"secPageLink\": \"https://www.sec.gov/Archives/a.htm\""));
        assert!(out.contains("Submitting... (Ctrl-C to cancel)"));
        assert!(out.contains("Form cleared."));
        assert_eq!(repl.session().form().data(), &FormData::default());
    }

    #[tokio::test]
    async fn test_pii_prompt_reads_answer_from_input() {
        let mut repl = repl(
            "prompt Who answers at 555-867-5309 for revenue?\n\
             answer Investor relations answers that line.\n\
             submit\n\
             n\n\
             quit\n",
        );
        repl.run().await.unwrap();

        let out = output(&repl);
        assert!(out.contains("  ! prompt may contain PII"));
        assert!(out.contains("Do you confirm that it does not contain PII? [y/N] "));
        assert!(out.contains("Not submitted."));
        assert!(!repl.session().is_pending());
        assert_eq!(
            repl.session().form().data().prompt,
            "Who answers at 555-867-5309 for revenue?"
        );
    }

    #[tokio::test]
    async fn test_errors_are_reported_and_loop_continues() {
        let mut repl = repl("doc remove 0\nfrobnicate\nanswer short\nsubmit\n");
        repl.run().await.unwrap();

        let out = output(&repl);
        assert!(out.contains("error: Cannot remove the last entry of documents"));
        assert!(out.contains("error: Unknown command: frobnicate"));
        assert!(out.contains("  ! answer must be at least 10 characters"));
        assert!(out.contains("The form contains errors. Please fix them before submitting."));
    }

    #[test]
    fn test_remove_asks_first() {
        let mut repl = repl("y\n");
        repl.execute("fact add").unwrap();
        repl.execute("fact 1 fact Net income was $5M").unwrap();
        repl.execute("fact remove 1").unwrap();

        assert_eq!(repl.session().form().data().supporting_facts.len(), 1);
        assert!(output(&repl).contains("Removed supportingFacts 1"));
    }

    #[test]
    fn test_check_explains_verdict() {
        let mut repl = repl("");
        repl.execute("doc 0 date 2021-06-30").unwrap();
        repl.execute("check").unwrap();
        assert!(output(&repl).contains("  ! Date must be after October 2023\nThe form contains errors."));
    }
}
