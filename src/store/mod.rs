//! Flat-file persistence for the catalog and the borrower log.
//!
//! `books.txt` starts with a record count followed by one
//! `id,title,author,status,borrowedName,borrowedDate` line per book.
//! `borrowers.txt` holds one `name,id1;id2;...,date` line per borrower.
//! Fields are not escaped: a comma inside a value breaks its line.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::catalog::{Book, DATE_FORMAT, Loan, SENTINEL};
use crate::error::{Result, StoreError};

/// Locations of the two data files.
#[derive(Clone, Debug)]
pub struct DataFiles {
    pub books: PathBuf,
    pub borrowers: PathBuf,
}

impl DataFiles {
    pub fn new(books: impl Into<PathBuf>, borrowers: impl Into<PathBuf>) -> Self {
        Self {
            books: books.into(),
            borrowers: borrowers.into(),
        }
    }
}

/// One parsed line of the borrower log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BorrowerRecord {
    pub name: String,
    pub book_ids: Vec<String>,
    pub date: String,
}

impl BorrowerRecord {
    fn parse(line: &str) -> Option<Self> {
        let parts: Vec<&str> = line.trim().split(',').collect();
        if parts.len() < 3 {
            return None;
        }
        let book_ids = parts[1]
            .split(';')
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect();
        Some(Self {
            name: parts[0].to_string(),
            book_ids,
            date: parts[2].to_string(),
        })
    }

    pub fn to_line(&self) -> String {
        format!("{},{},{}", self.name, self.book_ids.join(";"), self.date)
    }
}

/// A borrower record together with its line position in the log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BorrowerEntry {
    pub index: usize,
    pub record: BorrowerRecord,
}

fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(s) => Ok(Some(s)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StoreError::io(path, e)),
    }
}

fn format_book(book: &Book) -> String {
    format!(
        "{},{},{},{},{},{}",
        book.id,
        book.title,
        book.author,
        book.status().code(),
        book.borrowed_name(),
        book.borrowed_date()
    )
}

fn parse_book(path: &Path, line_no: usize, line: &str) -> Result<Book> {
    let parts: Vec<&str> = line.split(',').collect();
    if parts.len() != 6 {
        return Err(StoreError::malformed(
            path,
            line_no,
            format!("expected 6 fields, found {}", parts.len()),
        ));
    }
    let loan = match parts[3].trim() {
        "0" => None,
        "1" => {
            let borrower = parts[4];
            if borrower.is_empty() || borrower == SENTINEL {
                return Err(StoreError::malformed(path, line_no, "borrowed book has no borrower"));
            }
            let date = NaiveDate::parse_from_str(parts[5].trim(), DATE_FORMAT).map_err(|e| {
                StoreError::malformed(path, line_no, format!("bad borrowed date '{}': {e}", parts[5]))
            })?;
            Some(Loan {
                borrower: borrower.to_string(),
                date,
            })
        }
        other => {
            return Err(StoreError::malformed(path, line_no, format!("unknown status '{other}'")));
        }
    };
    Ok(Book {
        id: parts[0].to_string(),
        title: parts[1].to_string(),
        author: parts[2].to_string(),
        loan,
    })
}

/// Load the catalog file. A missing file is an empty catalog.
pub fn load_books<P: AsRef<Path>>(path: P) -> Result<Vec<Book>> {
    let path = path.as_ref();
    let Some(contents) = read_optional(path)? else {
        return Ok(Vec::new());
    };
    let mut lines = contents.lines();
    let count = match lines.next() {
        None => return Ok(Vec::new()),
        Some(header) => header.trim().parse::<usize>().map_err(|_| {
            StoreError::malformed(path, 1, format!("bad record count '{}'", header.trim()))
        })?,
    };
    let mut books = Vec::with_capacity(count);
    for i in 0..count {
        let line_no = i + 2;
        let line = lines.next().ok_or_else(|| {
            StoreError::malformed(path, line_no, format!("header announces {count} records, found {i}"))
        })?;
        books.push(parse_book(path, line_no, line.trim_end_matches('\r'))?);
    }
    Ok(books)
}

/// Overwrite the catalog file with a count header and one line per book.
pub fn save_books<P: AsRef<Path>>(path: P, books: &[Book]) -> Result<()> {
    let path = path.as_ref();
    let mut buf = format!("{}\n", books.len());
    for book in books {
        buf.push_str(&format_book(book));
        buf.push('\n');
    }
    fs::write(path, buf).map_err(|e| StoreError::io(path, e))
}

/// Append new records after the existing ones, rewriting the leading count.
pub fn append_books<P: AsRef<Path>>(path: P, new_books: &[Book]) -> Result<()> {
    let path = path.as_ref();
    let existing = read_optional(path)?.unwrap_or_default();
    let mut lines = existing.lines();
    let current = match lines.next() {
        None => 0,
        Some(header) => header.trim().parse::<usize>().map_err(|_| {
            StoreError::malformed(path, 1, format!("bad record count '{}'", header.trim()))
        })?,
    };
    let mut records: Vec<String> = lines
        .map(|l| l.trim_end_matches('\r'))
        .filter(|l| !l.trim().is_empty())
        .take(current)
        .map(|l| l.to_string())
        .collect();
    records.extend(new_books.iter().map(format_book));

    let mut buf = format!("{}\n", records.len());
    for rec in &records {
        buf.push_str(rec);
        buf.push('\n');
    }
    fs::write(path, buf).map_err(|e| StoreError::io(path, e))
}

/// Raw borrower-log lines in file order. A missing file is an empty log.
pub fn read_borrower_log<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    Ok(read_optional(path)?
        .map(|s| s.lines().map(|l| l.trim().to_string()).collect())
        .unwrap_or_default())
}

/// First entry whose name matches case-insensitively. Short lines are skipped.
pub fn find_borrower(lines: &[String], name: &str) -> Option<BorrowerEntry> {
    let needle = name.trim().to_lowercase();
    lines.iter().enumerate().find_map(|(index, line)| {
        BorrowerRecord::parse(line)
            .filter(|r| r.name.to_lowercase() == needle)
            .map(|record| BorrowerEntry { index, record })
    })
}

pub fn append_borrower_record<P: AsRef<Path>>(
    path: P,
    name: &str,
    book_ids: &[String],
    date: NaiveDate,
) -> Result<()> {
    let path = path.as_ref();
    let record = BorrowerRecord {
        name: name.to_string(),
        book_ids: book_ids.to_vec(),
        date: date.format(DATE_FORMAT).to_string(),
    };
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| StoreError::io(path, e))?;
    writeln!(file, "{}", record.to_line()).map_err(|e| StoreError::io(path, e))
}

pub fn rewrite_borrower_log<P: AsRef<Path>>(path: P, lines: &[String]) -> Result<()> {
    let path = path.as_ref();
    let mut buf = String::new();
    for line in lines {
        buf.push_str(line.trim());
        buf.push('\n');
    }
    fs::write(path, buf).map_err(|e| StoreError::io(path, e))
}

/// Remove `returned` ids from the entry's line. The line is dropped when no
/// ids remain; otherwise it keeps the original date.
pub fn settle_return(lines: &mut Vec<String>, entry: &BorrowerEntry, returned: &[String]) {
    let remaining: Vec<String> = entry
        .record
        .book_ids
        .iter()
        .filter(|id| !returned.contains(id))
        .cloned()
        .collect();
    let index = lines
        .get(entry.index)
        .and_then(|l| BorrowerRecord::parse(l))
        .filter(|r| r.name == entry.record.name)
        .map(|_| entry.index)
        .or_else(|| find_borrower(lines, &entry.record.name).map(|e| e.index));
    let Some(index) = index else {
        return;
    };
    if remaining.is_empty() {
        lines.remove(index);
    } else {
        let record = BorrowerRecord {
            name: entry.record.name.clone(),
            book_ids: remaining,
            date: entry.record.date.clone(),
        };
        lines[index] = record.to_line();
    }
}
