//! Plain-text rendering of a triage run.

use mailtriage_core::{TicketOrigin, TriageRun, TriagedTicket};
use std::io::{self, Write};

const SEPARATOR: &str = "============================================================";

const SAMPLES_NOTICE: &str =
    "No ticket could be read from the mailbox; classifying the built-in sample tickets.";

/// Writes every entry of `run`, in order, preceded by a notice when the
/// samples replaced the mailbox.
pub fn write_run<W: Write>(out: &mut W, run: &TriageRun) -> io::Result<()> {
    if run.origin == TicketOrigin::Samples {
        writeln!(out, "{SAMPLES_NOTICE}")?;
    }
    for entry in &run.entries {
        write_entry(out, entry)?;
    }
    Ok(())
}

fn write_entry<W: Write>(out: &mut W, entry: &TriagedTicket) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{SEPARATOR}")?;
    writeln!(out, "Subject: {}", entry.ticket.subject)?;
    writeln!(out, "Body:")?;
    writeln!(out, "{}", entry.ticket.body.trim_end())?;
    writeln!(out)?;
    writeln!(out, "Classification:")?;
    serde_json::to_writer_pretty(&mut *out, &entry.result.to_json())?;
    writeln!(out)
}
