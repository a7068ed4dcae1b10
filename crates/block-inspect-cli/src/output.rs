use std::io::Write;

use block_inspect_core::{CollectFailure, Report, source::FetchFailure};
use snafu::ResultExt;

use crate::error::{CliResult, WriteOutputSnafu};

/// Descriptors that were skipped, in the order they were encountered.
#[derive(Debug, Default)]
pub struct Skipped<'a> {
    pub fetch: &'a [FetchFailure],
    pub decode: &'a [CollectFailure],
}

impl Skipped<'_> {
    pub fn len(&self) -> usize {
        self.fetch.len() + self.decode.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn write_report<W: Write>(report: &Report, out: &mut W) -> CliResult<()> {
    writeln!(out, "{}", report.rendered).context(WriteOutputSnafu)
}

pub fn write_skipped<W: Write>(skipped: &Skipped<'_>, out: &mut W) -> CliResult<()> {
    if skipped.is_empty() {
        return Ok(());
    }

    writeln!(out, "{} descriptor(s) could not be read:", skipped.len())
        .context(WriteOutputSnafu)?;
    for f in skipped.fetch {
        writeln!(out, "  {}: {}", f.object, f.error).context(WriteOutputSnafu)?;
    }
    for f in skipped.decode {
        writeln!(out, "  {}: {}", f.object, f.error).context(WriteOutputSnafu)?;
    }
    Ok(())
}

pub fn print_report(report: &Report) -> CliResult<()> {
    let mut stdout = std::io::stdout();
    write_report(report, &mut stdout)
}

pub fn print_skipped(skipped: &Skipped<'_>) -> CliResult<()> {
    let mut stderr = std::io::stderr();
    write_skipped(skipped, &mut stderr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use block_inspect_core::{CollectPolicy, RawDescriptor, collect};

    #[test]
    fn nothing_skipped_writes_nothing() {
        let mut buf = Vec::new();
        write_skipped(&Skipped::default(), &mut buf).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn skipped_summary_lists_every_object() {
        let collection = collect(
            vec![
                RawDescriptor::new("01A/meta.json", "nope"),
                RawDescriptor::new("01B/meta.json", "[]"),
            ],
            CollectPolicy::Tolerant,
        )
        .unwrap();

        let skipped = Skipped {
            fetch: &[],
            decode: &collection.failures,
        };
        let mut buf = Vec::new();
        write_skipped(&skipped, &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "2 descriptor(s) could not be read:");
        assert!(lines[1].starts_with("  01A/meta.json: "));
        assert!(lines[2].starts_with("  01B/meta.json: "));
    }
}
