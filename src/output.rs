//! Writing the `subpeek` listing to stdout.
//!
//! One header line per archive, one line per entry, then a directory/file
//! count; `--json` writes one line per archive instead. Large submissions
//! are often piped into `head`, so a closed pipe ends the listing quietly.

/// Write one listing line, returning `Ok(())` from the caller once
/// stdout has been closed. Other write errors are propagated.
#[macro_export]
macro_rules! print_line {
    ($($arg:tt)*) => {{
        use std::io::Write;
        match writeln!(std::io::stdout(), $($arg)*) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        }
    }};
}

pub use print_line;
