//! Interactive site selection.

use std::io::{self, BufRead, Write};

/// Asks the user to pick one of the available sites.
///
/// Returns the raw answer; interpreting it (name, index, fallback) is the
/// resolver's job.
pub trait Prompt {
    fn choose(&mut self, sites: &[String]) -> io::Result<String>;
}

/// Prompt on the terminal: prints an indexed list and reads one line.
pub struct StdinPrompt<R, W> {
    input: R,
    output: W,
}

impl StdinPrompt<io::StdinLock<'static>, io::Stdout> {
    pub fn new() -> Self {
        Self {
            input: io::stdin().lock(),
            output: io::stdout(),
        }
    }
}

impl<R: BufRead, W: Write> StdinPrompt<R, W> {
    #[cfg(test)]
    pub fn with_io(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Prompt for StdinPrompt<R, W> {
    fn choose(&mut self, sites: &[String]) -> io::Result<String> {
        writeln!(self.output, "Here are the websites:")?;
        for (i, site) in sites.iter().enumerate() {
            writeln!(self.output, "{i}) {site}")?;
        }
        write!(self.output, "Which site do you want to work on? ")?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim().to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prints_indexed_list_and_reads_line() {
        let sites = vec!["alpha".to_string(), "beta".to_string()];
        let mut out = Vec::new();
        let answer = StdinPrompt::with_io(&b"  beta \n"[..], &mut out)
            .choose(&sites)
            .unwrap();

        assert_eq!(answer, "beta");
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("0) alpha\n"));
        assert!(printed.contains("1) beta\n"));
        assert!(printed.ends_with("Which site do you want to work on? "));
    }

    #[test]
    fn test_eof_yields_empty_answer() {
        let mut out = Vec::new();
        let answer = StdinPrompt::with_io(&b""[..], &mut out)
            .choose(&["alpha".to_string()])
            .unwrap();
        assert_eq!(answer, "");
    }
}
