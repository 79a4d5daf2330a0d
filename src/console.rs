//! Line-oriented console boundary.
//!
//! The ATM core never touches stdin/stdout directly; it talks to a
//! [`Console`] over any `BufRead` + `Write` pair, which lets sessions be
//! scripted in tests.

use crate::error::{AtmError, Result};
use std::io::{BufRead, Write};
use std::str::FromStr;

/// Reads answers one line at a time and writes prompts and messages.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Console { input, output }
    }

    /// Writes a prompt without a trailing newline and flushes it.
    pub fn prompt(&mut self, text: &str) -> Result<()> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;
        Ok(())
    }

    /// Writes a full line.
    pub fn say(&mut self, text: impl std::fmt::Display) -> Result<()> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    /// Reads the next line with its line ending stripped.
    ///
    /// Returns [`AtmError::InputClosed`] once the input is exhausted, and
    /// [`AtmError::Format`] for a line that is not valid UTF-8. Either way the
    /// whole line is consumed.
    pub fn read_line(&mut self) -> Result<String> {
        let bytes = self.read_raw_line()?;
        String::from_utf8(bytes).map_err(|e| AtmError::Format {
            input: String::from_utf8_lossy(e.as_bytes()).into_owned(),
        })
    }

    fn read_raw_line(&mut self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        if self.input.read_until(b'\n', &mut bytes)? == 0 {
            return Err(AtmError::InputClosed);
        }
        while matches!(bytes.last(), Some(b'\n' | b'\r')) {
            bytes.pop();
        }
        Ok(bytes)
    }

    /// Reads a line and parses it as a number.
    ///
    /// A malformed line is consumed and reported as [`AtmError::Format`].
    pub fn read_number<T: FromStr>(&mut self) -> Result<T> {
        let line = self.read_line()?;
        let trimmed = line.trim();
        trimmed.parse::<T>().map_err(|_| AtmError::Format {
            input: trimmed.to_string(),
        })
    }

    /// Reads the first non-whitespace character of the next non-blank line.
    ///
    /// Undecodable bytes come back as `U+FFFD`, which matches no option.
    pub fn read_choice(&mut self) -> Result<char> {
        loop {
            let bytes = self.read_raw_line()?;
            let line = String::from_utf8_lossy(&bytes);
            if let Some(c) = line.trim().chars().next() {
                return Ok(c);
            }
        }
    }

    /// Consumes the console, returning the output sink.
    pub fn into_output(self) -> W {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::Amount;
    use std::io::Cursor;

    fn console(input: impl AsRef<[u8]>) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
        Console::new(Cursor::new(input.as_ref().to_vec()), Vec::new())
    }

    #[test]
    fn test_read_number_parses_trimmed_line() {
        let mut c = console("  500.25 \r\n42\n");
        assert_eq!(c.read_number::<Amount>().unwrap().to_string(), "500.25");
        assert_eq!(c.read_number::<u32>().unwrap(), 42);
    }

    #[test]
    fn test_read_number_discards_malformed_line() {
        let mut c = console("abc\n7\n");
        match c.read_number::<u32>() {
            Err(AtmError::Format { input }) => assert_eq!(input, "abc"),
            other => panic!("Expected Format error, got {:?}", other),
        }
        assert_eq!(c.read_number::<u32>().unwrap(), 7);
    }

    #[test]
    fn test_invalid_utf8_line_is_a_format_error() {
        let mut c = console(b"\xff\xfe\n1234\n");
        assert!(matches!(c.read_number::<u32>(), Err(AtmError::Format { .. })));
        assert_eq!(c.read_number::<u32>().unwrap(), 1234);
    }

    #[test]
    fn test_read_choice_replaces_invalid_utf8() {
        let mut c = console(b"\xffA\nb\n");
        assert_eq!(c.read_choice().unwrap(), char::REPLACEMENT_CHARACTER);
        assert_eq!(c.read_choice().unwrap(), 'b');
    }

    #[test]
    fn test_read_choice_skips_blank_lines() {
        let mut c = console("\n   \n  d withdraw\n");
        assert_eq!(c.read_choice().unwrap(), 'd');
    }

    #[test]
    fn test_exhausted_input_reports_closed() {
        let mut c = console("");
        assert!(matches!(c.read_line(), Err(AtmError::InputClosed)));
        assert!(matches!(c.read_choice(), Err(AtmError::InputClosed)));
    }

    #[test]
    fn test_prompt_and_say_write_to_output() {
        let mut c = console("");
        c.prompt("PIN: ").unwrap();
        c.say("hello").unwrap();
        assert_eq!(String::from_utf8(c.into_output()).unwrap(), "PIN: hello\n");
    }
}
