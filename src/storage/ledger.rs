//! Line-oriented backing stores.
//!
//! A [`Ledger`] holds an ordered list of text lines. It supports appending a
//! line and replacing the whole content; there is no in-place edit. The
//! registry is written against this trait so that the flat file can be swapped
//! for another store without touching validation or business rules.

use std::{
    fs::{self, File, OpenOptions},
    io::{self, BufRead, BufReader, BufWriter, Read, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
};

/// An ordered store of text lines.
pub trait Ledger {
    /// Reads every line, in order, without terminators.
    ///
    /// A store that does not exist yet reads as empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be read.
    fn read_lines(&self) -> io::Result<Vec<String>>;

    /// Appends a single line.
    ///
    /// # Errors
    ///
    /// Returns an error if the line cannot be written.
    fn append_line(&mut self, line: &str) -> io::Result<()>;

    /// Replaces the whole content.
    ///
    /// Implementations must leave the previous content in place if the
    /// replacement fails.
    ///
    /// # Errors
    ///
    /// Returns an error if the new content cannot be stored.
    fn replace_lines(&mut self, lines: &[String]) -> io::Result<()>;
}

/// A ledger stored as a UTF-8 text file, one entry per line.
#[derive(Debug, Clone)]
pub struct LineFile {
    path: PathBuf,
}

impl LineFile {
    /// A ledger backed by the file at `path`. The file is created on first
    /// write.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling path used while replacing the content.
    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_staging(&self, staging: &Path, lines: &[String]) -> io::Result<()> {
        let file = File::create(staging)?;
        let mut writer = BufWriter::new(file);
        for line in lines {
            writeln!(writer, "{line}")?;
        }
        writer.into_inner().map_err(io::IntoInnerError::into_error)?.sync_all()
    }
}

impl Ledger for LineFile {
    fn read_lines(&self) -> io::Result<Vec<String>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("{} does not exist yet, reading as empty", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };
        BufReader::new(file).lines().collect()
    }

    /// Appends `line`, first terminating a last line that was left without a
    /// newline.
    fn append_line(&mut self, line: &str) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .read(true)
            .create(true)
            .append(true)
            .open(&self.path)?;
        let unterminated = ends_mid_line(&mut file)?;

        let mut writer = BufWriter::new(file);
        if unterminated {
            tracing::debug!("{} has no trailing newline, adding one", self.path.display());
            writeln!(writer)?;
        }
        writeln!(writer, "{line}")?;
        writer.flush()
    }

    /// Writes the new content to a sibling `.tmp` file, syncs it, then renames
    /// it over the original. The original is never removed first, so a failure
    /// at any point leaves either the old or the new content in place.
    fn replace_lines(&mut self, lines: &[String]) -> io::Result<()> {
        let staging = self.staging_path();

        if let Err(e) = self.write_staging(&staging, lines) {
            if let Err(cleanup) = fs::remove_file(&staging) {
                tracing::debug!("Failed to remove {}: {cleanup}", staging.display());
            }
            return Err(e);
        }

        fs::rename(&staging, &self.path)
    }
}

/// Whether a non-empty file's last byte is something other than `\n`.
fn ends_mid_line(file: &mut File) -> io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

/// A ledger held in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryLedger {
    lines: Vec<String>,
}

impl MemoryLedger {
    /// An empty ledger.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// A ledger pre-populated with `lines`.
    #[must_use]
    pub fn with_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// The current content.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl Ledger for MemoryLedger {
    fn read_lines(&self) -> io::Result<Vec<String>> {
        Ok(self.lines.clone())
    }

    fn append_line(&mut self, line: &str) -> io::Result<()> {
        self.lines.push(line.to_string());
        Ok(())
    }

    fn replace_lines(&mut self, lines: &[String]) -> io::Result<()> {
        self.lines = lines.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn setup() -> (TempDir, LineFile) {
        let tmp = TempDir::new().expect("failed to create temp dir");
        let ledger = LineFile::new(tmp.path().join("persons.txt"));
        (tmp, ledger)
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let (_tmp, ledger) = setup();
        assert!(ledger.read_lines().unwrap().is_empty());
        assert!(!ledger.path().exists());
    }

    #[test]
    fn append_creates_and_terminates_lines() {
        let (_tmp, mut ledger) = setup();
        ledger.append_line("one").unwrap();
        ledger.append_line("two").unwrap();

        assert_eq!(fs::read_to_string(ledger.path()).unwrap(), "one\ntwo\n");
        assert_eq!(ledger.read_lines().unwrap(), vec!["one", "two"]);
    }

    #[test]
    fn replace_swaps_content_and_cleans_up() {
        let (tmp, mut ledger) = setup();
        ledger.append_line("old").unwrap();

        ledger
            .replace_lines(&["new".to_string(), "lines".to_string()])
            .unwrap();

        assert_eq!(fs::read_to_string(ledger.path()).unwrap(), "new\nlines\n");
        assert!(!tmp.path().join("persons.txt.tmp").exists());
    }

    #[test]
    fn failed_replace_keeps_original() {
        let (tmp, mut ledger) = setup();
        ledger.append_line("keep me").unwrap();

        // A directory where the staging file should go makes the write fail.
        fs::create_dir(tmp.path().join("persons.txt.tmp")).unwrap();

        assert!(ledger.replace_lines(&["lost".to_string()]).is_err());
        assert_eq!(fs::read_to_string(ledger.path()).unwrap(), "keep me\n");
    }

    #[test]
    fn append_terminates_hand_edited_last_line() {
        let (_tmp, mut ledger) = setup();
        fs::write(ledger.path(), "edited").unwrap();

        ledger.append_line("added").unwrap();

        assert_eq!(fs::read_to_string(ledger.path()).unwrap(), "edited\nadded\n");
        assert_eq!(ledger.read_lines().unwrap(), vec!["edited", "added"]);
    }

    #[test]
    fn reads_crlf_lines() {
        let (_tmp, ledger) = setup();
        fs::write(ledger.path(), "a\r\nb\r\n").unwrap();
        assert_eq!(ledger.read_lines().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn memory_ledger_behaves_like_a_file() {
        let mut ledger = MemoryLedger::with_lines(["a"]);
        ledger.append_line("b").unwrap();
        assert_eq!(ledger.read_lines().unwrap(), vec!["a", "b"]);

        ledger.replace_lines(&["c".to_string()]).unwrap();
        assert_eq!(ledger.lines(), ["c".to_string()]);
    }
}
