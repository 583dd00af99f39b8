//! Diagnostic printers for sessions and memory searches

use crate::error::MemoriaResult;
use crate::memory::SearchMemoryResponse;
use crate::session::Session;
use std::io::Write;

const EVENT_PREVIEW_CHARS: usize = 60;
const MEMORY_PREVIEW_CHARS: usize = 80;

/// Print one line per event: `  <role>: <text>...`
///
/// Events without text print `(empty)`.
pub fn print_session_events<W: Write>(session: &Session, out: &mut W) -> MemoriaResult<()> {
    writeln!(
        out,
        "Session {} has {} events",
        session.id,
        session.events.len()
    )?;

    for event in &session.events {
        let role = event
            .content
            .as_ref()
            .map(|c| c.role.as_str())
            .unwrap_or("unknown");
        match event.text() {
            Some(text) if !text.is_empty() => {
                writeln!(out, "  {}: {}...", role, truncate(text, EVENT_PREVIEW_CHARS))?
            }
            _ => writeln!(out, "  {}: (empty)", role)?,
        }
    }

    Ok(())
}

/// Print the hit count and one `  [author]: <text>...` line per memory
pub fn print_search_results<W: Write>(
    response: &SearchMemoryResponse,
    out: &mut W,
) -> MemoriaResult<()> {
    writeln!(out, "Found {} relevant memories", response.len())?;

    for memory in &response.memories {
        let text = memory.text().unwrap_or_default();
        writeln!(
            out,
            "  [{}]: {}...",
            memory.author,
            truncate(text, MEMORY_PREVIEW_CHARS)
        )?;
    }

    Ok(())
}

/// First `max_chars` characters of `text`
fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
