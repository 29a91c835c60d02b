use serde_json::Value;
use std::io::{self, Write};

/// Pretty-print JSON to stdout.
///
/// Full schedules run to hundreds of rows, so output is streamed and a
/// closed pipe (`mtg schedule ... | head`) ends it quietly.
pub fn print_json(value: &Value) {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let written = serde_json::to_writer_pretty(&mut out, value)
        .map_err(io::Error::from)
        .and_then(|_| writeln!(out));
    match written {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {}
        Err(e) => eprintln!("JSON output error: {}", e),
    }
}
