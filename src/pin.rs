//! PIN value and its plain-text persistence.

use crate::error::{AtmError, Result};
use log::{debug, warn};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// A 4-digit numeric PIN in the range `0..=9999`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pin(u16);

impl Pin {
    /// PIN used when the PIN file is missing or unreadable.
    pub const DEFAULT: Pin = Pin(1234);

    /// Largest value a 4-digit PIN can take.
    pub const MAX: u16 = 9999;

    /// Creates a PIN, returning `None` if `value` has more than 4 digits.
    pub fn new(value: u16) -> Option<Self> {
        (value <= Self::MAX).then_some(Pin(value))
    }

    pub fn value(&self) -> u16 {
        self.0
    }
}

impl FromStr for Pin {
    type Err = AtmError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        trimmed
            .parse::<u16>()
            .ok()
            .and_then(Pin::new)
            .ok_or_else(|| AtmError::Format {
                input: trimmed.to_string(),
            })
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Loads and saves the ATM's PIN as a single integer in a text file.
#[derive(Debug, Clone)]
pub struct PinStore {
    path: PathBuf,
}

impl PinStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        PinStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored PIN.
    ///
    /// A missing or corrupt file is recovered by falling back to
    /// [`Pin::DEFAULT`] with a warning.
    pub fn load(&self) -> Pin {
        match self.try_load() {
            Ok(pin) => {
                debug!("Loaded PIN from {}", self.path.display());
                pin
            }
            Err(e) => {
                warn!("Error reading PIN ({}). Using default PIN {}.", e, Pin::DEFAULT);
                Pin::DEFAULT
            }
        }
    }

    fn try_load(&self) -> Result<Pin> {
        let contents =
            fs::read_to_string(&self.path).map_err(|e| AtmError::storage(&self.path, e))?;
        // Only the first token counts, like reading one integer from a stream.
        let token = contents.split_whitespace().next().unwrap_or("");
        token.parse()
    }

    /// Rewrites the PIN file in full.
    ///
    /// On failure the previously persisted PIN is left as it was.
    pub fn save(&self, pin: Pin) -> Result<()> {
        fs::write(&self.path, pin.to_string()).map_err(|e| AtmError::storage(&self.path, e))?;
        debug!("Saved PIN to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_pin_parse_accepts_four_digits() {
        assert_eq!("4321".parse::<Pin>().unwrap().value(), 4321);
        assert_eq!(" 0007 \n".parse::<Pin>().unwrap().value(), 7);
    }

    #[test]
    fn test_pin_parse_rejects_bad_input() {
        for bad in ["", "abcd", "12a4", "10000", "-1"] {
            assert!(matches!(bad.parse::<Pin>(), Err(AtmError::Format { .. })), "{}", bad);
        }
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let store = PinStore::new(dir.path().join("pin.txt"));
        let pin = Pin::new(4321).unwrap();

        store.save(pin).unwrap();
        assert_eq!(store.load(), pin);
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "4321");
    }

    #[test]
    fn test_load_missing_file_uses_default() {
        let dir = tempdir().unwrap();
        let store = PinStore::new(dir.path().join("absent.txt"));
        assert_eq!(store.load(), Pin::DEFAULT);
    }

    #[test]
    fn test_load_corrupt_file_uses_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pin.txt");
        fs::write(&path, "not a pin").unwrap();

        assert_eq!(PinStore::new(&path).load(), Pin::DEFAULT);
    }

    #[test]
    fn test_load_reads_first_integer_only() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pin.txt");
        fs::write(&path, "5555\ntrailing").unwrap();

        assert_eq!(PinStore::new(&path).load().value(), 5555);
    }

    #[test]
    fn test_save_to_unwritable_destination_fails_without_panicking() {
        let dir = tempdir().unwrap();
        let store = PinStore::new(dir.path().join("missing-dir").join("pin.txt"));

        let err = store.save(Pin::DEFAULT).unwrap_err();
        assert!(matches!(err, AtmError::StorageUnavailable { .. }));
    }
}
