//! Report data structures for commands.
//!
//! Operations build reports; commands render them to an [`Output`].

mod check;
mod clean;
mod generate;
mod list;
mod output;

pub use check::CheckReport;
pub use clean::CleanReport;
pub use generate::GenerateReport;
pub use list::{GeneratorInfo, ListReport};
#[cfg(test)]
pub(crate) use output::BufferOutput;
pub use output::{Report, TerminalOutput};

#[cfg(test)]
pub(crate) fn render_lines(report: &dyn Report) -> Vec<String> {
    let mut out = BufferOutput::default();
    report.render(&mut out);
    out.lines
}
