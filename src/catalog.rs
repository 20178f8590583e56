//! In-memory book catalog.
//!
//! Books keep their loan as `Option<Loan>`, so a book is borrowed exactly
//! when it has a borrower and a date. The flat-file view with the `"none"`
//! sentinel is produced by the accessors.

use chrono::NaiveDate;
use thiserror::Error;

/// Placeholder written for borrower name and date when a book is on the shelf.
pub const SENTINEL: &str = "none";

/// Date format used in both data files.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BookStatus {
    Available,
    Borrowed,
}

impl BookStatus {
    pub fn label(self) -> &'static str {
        match self {
            BookStatus::Available => "Available",
            BookStatus::Borrowed => "Borrowed",
        }
    }

    /// Numeric code stored in `books.txt`.
    pub fn code(self) -> u8 {
        match self {
            BookStatus::Available => 0,
            BookStatus::Borrowed => 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Loan {
    pub borrower: String,
    pub date: NaiveDate,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    pub loan: Option<Loan>,
}

impl Book {
    /// A new book on the shelf.
    pub fn available(id: impl Into<String>, title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            author: author.into(),
            loan: None,
        }
    }

    pub fn status(&self) -> BookStatus {
        if self.loan.is_some() {
            BookStatus::Borrowed
        } else {
            BookStatus::Available
        }
    }

    pub fn borrowed_name(&self) -> &str {
        self.loan.as_ref().map(|l| l.borrower.as_str()).unwrap_or(SENTINEL)
    }

    pub fn borrowed_date(&self) -> String {
        match &self.loan {
            Some(l) => l.date.format(DATE_FORMAT).to_string(),
            None => SENTINEL.to_string(),
        }
    }

    pub fn is_borrowed(&self) -> bool {
        self.loan.is_some()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("This book does not exist or invalid Book ID (4 characters)")]
    UnknownBook(String),
    #[error("This book is already borrowed")]
    AlreadyBorrowed(String),
    #[error("A book with ID '{0}' already exists")]
    DuplicateId(String),
    #[error("A book titled '{0}' already exists")]
    DuplicateTitle(String),
}

/// Book ids are exactly four ASCII letters or digits.
pub fn is_valid_book_id(id: &str) -> bool {
    id.len() == 4 && id.chars().all(|c| c.is_ascii_alphanumeric())
}

#[derive(Clone, Debug, Default)]
pub struct Catalog {
    books: Vec<Book>,
}

impl Catalog {
    pub fn new(books: Vec<Book>) -> Self {
        Self { books }
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn replace(&mut self, books: Vec<Book>) {
        self.books = books;
    }

    fn position_by_id(&self, id: &str) -> Option<usize> {
        let needle = id.trim().to_lowercase();
        self.books
            .iter()
            .position(|b| b.id.trim().to_lowercase() == needle)
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Book> {
        self.position_by_id(id).map(|i| &self.books[i])
    }

    pub fn find_by_title(&self, title: &str) -> Option<&Book> {
        let needle = title.trim().to_lowercase();
        self.books
            .iter()
            .find(|b| b.title.trim().to_lowercase() == needle)
    }

    /// Case-insensitive substring match on id, title or author, in catalog order.
    pub fn search(&self, keyword: &str) -> Vec<&Book> {
        let q = keyword.trim().to_lowercase();
        self.books
            .iter()
            .filter(|b| {
                b.id.to_lowercase().contains(&q)
                    || b.title.to_lowercase().contains(&q)
                    || b.author.to_lowercase().contains(&q)
            })
            .collect()
    }

    pub fn add(&mut self, book: Book) -> Result<(), CatalogError> {
        if self.find_by_id(&book.id).is_some() {
            return Err(CatalogError::DuplicateId(book.id));
        }
        if self.find_by_title(&book.title).is_some() {
            return Err(CatalogError::DuplicateTitle(book.title));
        }
        self.books.push(book);
        Ok(())
    }

    /// Record a loan and return the catalog's copy of the book id.
    pub fn mark_borrowed(
        &mut self,
        id: &str,
        borrower: &str,
        date: NaiveDate,
    ) -> Result<String, CatalogError> {
        let idx = self
            .position_by_id(id)
            .ok_or_else(|| CatalogError::UnknownBook(id.to_string()))?;
        let book = &mut self.books[idx];
        if book.is_borrowed() {
            return Err(CatalogError::AlreadyBorrowed(book.id.clone()));
        }
        book.loan = Some(Loan {
            borrower: borrower.to_string(),
            date,
        });
        Ok(book.id.clone())
    }

    pub fn mark_returned(&mut self, id: &str) -> Result<(), CatalogError> {
        let idx = self
            .position_by_id(id)
            .ok_or_else(|| CatalogError::UnknownBook(id.to_string()))?;
        self.books[idx].loan = None;
        Ok(())
    }
}
