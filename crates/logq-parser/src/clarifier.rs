//! Clarification of slots left as wildcard after normalization.
//!
//! The state machine visits wildcard slots in canonical order
//! (`Pending(slot)` ... `Resolved`). Callers that suspend between requests
//! drive it step-wise through [`Clarification`]; a terminal session drives
//! it with [`clarify_interactive`] and a [`Prompter`]. Forced mode resolves
//! every pending slot to the wildcard without asking.

use std::collections::VecDeque;
use std::io::{BufRead, Write};

use thiserror::Error;

use logq_protocol::{ParseResult, SlotName, SlotValue};

use crate::error::{ParserError, ParserResult};
use crate::vocab::VocabularyTables;

/// Where a clarification currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClarifyState {
    Pending(SlotName),
    Resolved,
}

/// A caller's answer for the pending slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    /// 0-based index into the slot's choice list.
    Choose(usize),
    /// Leave the slot as the wildcard.
    Keep,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("choice {index} is out of range for {slot} ({len} options)")]
pub struct InvalidChoice {
    pub slot: SlotName,
    pub index: usize,
    pub len: usize,
}

/// Final values plus the slots the caller filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct Clarified {
    pub result: ParseResult,
    pub clarified: Vec<SlotName>,
}

/// Step-wise clarification of one parse result.
#[derive(Debug, Clone)]
pub struct Clarification<'v> {
    result: ParseResult,
    pending: VecDeque<SlotName>,
    clarified: Vec<SlotName>,
    vocab: &'v VocabularyTables,
}

impl<'v> Clarification<'v> {
    /// Slots with no choice list cannot be asked about and stay wildcard.
    pub fn new(result: ParseResult, vocab: &'v VocabularyTables) -> Self {
        let pending = result
            .wildcard_slots()
            .into_iter()
            .filter(|slot| !vocab.choices(*slot).is_empty())
            .collect();
        Self {
            result,
            pending,
            clarified: Vec::new(),
            vocab,
        }
    }

    pub fn state(&self) -> ClarifyState {
        match self.pending.front() {
            Some(slot) => ClarifyState::Pending(*slot),
            None => ClarifyState::Resolved,
        }
    }

    /// Options for the pending slot; empty once resolved.
    pub fn choices(&self) -> &'v [String] {
        match self.pending.front() {
            Some(slot) => self.vocab.choices(*slot),
            None => &[],
        }
    }

    /// Apply a reply to the pending slot. Out-of-range choices leave the
    /// state unchanged.
    pub fn answer(&mut self, reply: Reply) -> Result<ClarifyState, InvalidChoice> {
        let Some(&slot) = self.pending.front() else {
            return Ok(ClarifyState::Resolved);
        };
        match reply {
            Reply::Choose(index) => {
                let choices = self.vocab.choices(slot);
                let choice = choices.get(index).ok_or(InvalidChoice {
                    slot,
                    index,
                    len: choices.len(),
                })?;
                self.result.set(slot, SlotValue::new(choice.as_str()));
                self.clarified.push(slot);
                tracing::debug!(slot = %slot, value = %choice, "slot clarified");
            }
            Reply::Keep => {
                tracing::debug!(slot = %slot, "slot kept as wildcard");
            }
        }
        self.pending.pop_front();
        Ok(self.state())
    }

    /// Forced mode: every pending slot stays wildcard.
    pub fn force(self) -> Clarified {
        Clarified {
            result: self.result,
            clarified: self.clarified,
        }
    }

    /// The final result, once no slot is pending.
    pub fn finish(self) -> Option<Clarified> {
        match self.state() {
            ClarifyState::Resolved => Some(self.force()),
            ClarifyState::Pending(_) => None,
        }
    }
}

/// Source of answers for the blocking driver.
pub trait Prompter {
    /// Ask about `slot`. `None` means the caller aborted.
    fn ask(&mut self, slot: SlotName, choices: &[String]) -> Option<Reply>;

    /// Called after an out-of-range choice, before asking again.
    fn rejected(&mut self, _err: &InvalidChoice) {}
}

/// Run the clarification to completion against `prompter`.
pub fn clarify_interactive(
    result: ParseResult,
    vocab: &VocabularyTables,
    prompter: &mut dyn Prompter,
) -> ParserResult<Clarified> {
    let mut session = Clarification::new(result, vocab);
    while let ClarifyState::Pending(slot) = session.state() {
        let reply = prompter
            .ask(slot, session.choices())
            .ok_or(ParserError::Aborted(slot))?;
        if let Err(err) = session.answer(reply) {
            tracing::debug!(error = %err, "clarification choice rejected");
            prompter.rejected(&err);
        }
    }
    Ok(session.force())
}

// ── Terminal prompter ────────────────────────────────────────

/// Line-oriented prompter over any reader/writer pair.
///
/// A blank line, `*` or `skip` keeps the wildcard; end of input aborts.
pub struct StdioPrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> StdioPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Prompter for StdioPrompter<R, W> {
    fn ask(&mut self, slot: SlotName, choices: &[String]) -> Option<Reply> {
        loop {
            writeln!(self.output, "Which {slot}?").ok()?;
            for (i, choice) in choices.iter().enumerate() {
                writeln!(self.output, "  [{i}] {choice}").ok()?;
            }
            write!(self.output, "choice (blank keeps *): ").ok()?;
            self.output.flush().ok()?;

            let mut line = String::new();
            match self.input.read_line(&mut line) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "failed to read clarification reply");
                    return None;
                }
            }

            let answer = line.trim();
            if answer.is_empty() || answer == "*" || answer.eq_ignore_ascii_case("skip") {
                return Some(Reply::Keep);
            }
            match answer.parse::<usize>() {
                Ok(index) => return Some(Reply::Choose(index)),
                Err(_) => {
                    writeln!(self.output, "'{answer}' is not a number").ok()?;
                }
            }
        }
    }

    fn rejected(&mut self, err: &InvalidChoice) {
        let _ = writeln!(
            self.output,
            "{} is out of range, pick 0..{}",
            err.index,
            err.len.saturating_sub(1)
        );
    }
}
