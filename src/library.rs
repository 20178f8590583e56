//! The live catalog paired with its backing files.
//!
//! Workflows mutate the catalog in memory and call the `commit_*` methods at
//! their commit points.

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::catalog::{Book, Catalog};
use crate::error::{Result, StoreError};
use crate::store::{self, BorrowerEntry, DataFiles};

#[derive(Clone, Debug)]
pub struct Library {
    pub catalog: Catalog,
    pub files: DataFiles,
    /// Whether the last reload succeeded. Saving is refused until it does.
    loaded: bool,
}

impl Library {
    /// An empty catalog bound to `files`; call [`Library::reload`] to read it.
    pub fn new(files: DataFiles) -> Self {
        Self {
            catalog: Catalog::default(),
            files,
            loaded: false,
        }
    }

    /// Open `files` and load the catalog.
    pub fn open(files: DataFiles) -> Result<Self> {
        let mut lib = Self::new(files);
        lib.reload()?;
        Ok(lib)
    }

    /// Replace the in-memory catalog with the file contents. On failure the
    /// current catalog is kept.
    pub fn reload(&mut self) -> Result<()> {
        match store::load_books(&self.files.books) {
            Ok(books) => {
                info!(count = books.len(), path = %self.files.books.display(), "catalog loaded");
                self.catalog.replace(books);
                self.loaded = true;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "catalog load failed");
                self.loaded = false;
                Err(e)
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Overwrite the books file with the catalog. Refused after a failed load.
    pub fn save(&self) -> Result<()> {
        if !self.loaded {
            warn!(path = %self.files.books.display(), "save refused, catalog not loaded");
            return Err(StoreError::NotLoaded {
                path: self.files.books.clone(),
            });
        }
        store::save_books(&self.files.books, self.catalog.books())?;
        info!(count = self.catalog.len(), path = %self.files.books.display(), "catalog saved");
        Ok(())
    }

    pub fn find_borrower(&self, name: &str) -> Result<Option<BorrowerEntry>> {
        let lines = store::read_borrower_log(&self.files.borrowers)?;
        Ok(store::find_borrower(&lines, name))
    }

    /// End of a borrow batch: log the loan, then flush the catalog. A log line
    /// listing books still available on disk can be settled by a later return.
    pub fn commit_borrow(&self, name: &str, book_ids: &[String], date: NaiveDate) -> Result<()> {
        store::append_borrower_record(&self.files.borrowers, name, book_ids, date)?;
        self.save()?;
        info!(borrower = name, books = ?book_ids, "borrow committed");
        Ok(())
    }

    /// Confirmed return: flush the catalog, then settle the borrower's log line.
    pub fn commit_return(&self, entry: &BorrowerEntry, returned: &[String]) -> Result<()> {
        let mut lines = store::read_borrower_log(&self.files.borrowers)?;
        store::settle_return(&mut lines, entry, returned);
        self.save()?;
        store::rewrite_borrower_log(&self.files.borrowers, &lines)?;
        info!(borrower = %entry.record.name, books = ?returned, "return committed");
        Ok(())
    }

    /// End of an add batch: merge the new records into the books file.
    pub fn commit_new_books(&self, books: &[Book]) -> Result<()> {
        store::append_books(&self.files.books, books)?;
        info!(count = books.len(), "new books committed");
        Ok(())
    }
}
