//! Settings file: parse/write `library.conf`.
//!
//! The format is `key = value` per line; blank lines and `#` comments are
//! ignored, as are unknown keys. Recognised keys:
//! - `books_file`: catalog file (default `books.txt`)
//! - `borrowers_file`: borrower log (default `borrowers.txt`)
//! - `log_file`: tracing output (default `library-staff-tool.log`)
//! - `currency`: label shown next to fines (default `RM`)

use std::path::{Path, PathBuf};

use crate::store::DataFiles;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LibraryConfig {
    pub books_file: PathBuf,
    pub borrowers_file: PathBuf,
    pub log_file: PathBuf,
    pub currency: String,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            books_file: PathBuf::from("books.txt"),
            borrowers_file: PathBuf::from("borrowers.txt"),
            log_file: PathBuf::from("library-staff-tool.log"),
            currency: "RM".to_string(),
        }
    }
}

impl LibraryConfig {
    /// Load settings from `path`, or write the defaults there if it is missing.
    pub fn load_or_init<P: AsRef<Path>>(path: P) -> Self {
        let p = path.as_ref();
        if p.exists() {
            return Self::from_file(p).unwrap_or_default();
        }
        let cfg = Self::default();
        let _ = cfg.write_file(p);
        cfg
    }

    /// Read settings, starting from defaults. `None` if the file is unreadable.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut cfg = Self::default();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let lhs = parts.next().map(|s| s.trim()).unwrap_or("");
            let rhs = parts.next().map(|s| s.trim()).unwrap_or("");
            if lhs.is_empty() || rhs.is_empty() {
                continue;
            }
            match lhs {
                "books_file" => cfg.books_file = PathBuf::from(rhs),
                "borrowers_file" => cfg.borrowers_file = PathBuf::from(rhs),
                "log_file" => cfg.log_file = PathBuf::from(rhs),
                "currency" => cfg.currency = rhs.to_string(),
                _ => {}
            }
        }
        Some(cfg)
    }

    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# library-staff-tool settings\n");
        buf.push_str("# Paths are relative to the working directory.\n\n");

        let mut kv = |k: &str, v: &str| {
            let _ = writeln!(&mut buf, "{} = {}", k, v);
        };
        kv("books_file", &self.books_file.to_string_lossy());
        kv("borrowers_file", &self.borrowers_file.to_string_lossy());
        kv("log_file", &self.log_file.to_string_lossy());
        kv("currency", &self.currency);

        std::fs::write(path, buf)
    }

    pub fn data_files(&self) -> DataFiles {
        DataFiles::new(&self.books_file, &self.borrowers_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn unknown_keys_and_comments_are_ignored() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("library.conf");
        std::fs::write(
            &path,
            "# comment\nbooks_file = /srv/books.txt\ncolour = blue\ncurrency=USD\nlog_file =\n",
        )
        .unwrap();
        let cfg = LibraryConfig::from_file(&path).unwrap();
        assert_eq!(cfg.books_file, PathBuf::from("/srv/books.txt"));
        assert_eq!(cfg.borrowers_file, PathBuf::from("borrowers.txt"));
        assert_eq!(cfg.currency, "USD");
        assert_eq!(cfg.log_file, PathBuf::from("library-staff-tool.log"));
    }

    #[test]
    fn load_or_init_writes_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("library.conf");
        let cfg = LibraryConfig::load_or_init(&path);
        assert!(path.exists());
        assert_eq!(cfg, LibraryConfig::default());
        assert_eq!(LibraryConfig::from_file(&path).unwrap(), cfg);
    }
}
