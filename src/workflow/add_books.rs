//! Add-books screen: a count, then id, title and author for each book. The
//! batch is merged into the books file once the last author is entered.

use anyhow::{Context, Result};

use super::{Flow, MAX_ADD, edit_buffer, has_separator, is_leave, is_retry, parse_count};
use crate::app::InputEvent;
use crate::catalog::{Book, CatalogError, is_valid_book_id};
use crate::library::Library;

/// Books entered so far in this session and how many were requested.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Batch {
    pub total: usize,
    pub added: Vec<Book>,
}

impl Batch {
    /// 1-based number of the book being entered.
    pub fn current(&self) -> usize {
        self.added.len() + 1
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AddBooksStep {
    EnterCount,
    EnterId {
        batch: Batch,
    },
    EnterTitle {
        batch: Batch,
        id: String,
    },
    EnterAuthor {
        batch: Batch,
        id: String,
        title: String,
    },
    Duplicate {
        batch: Batch,
        message: String,
    },
    Done {
        added: Vec<Book>,
    },
}

#[derive(Clone, Debug)]
pub struct AddBooksWorkflow {
    pub step: AddBooksStep,
    pub input: String,
}

impl Default for AddBooksWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl AddBooksWorkflow {
    pub fn new() -> Self {
        Self {
            step: AddBooksStep::EnterCount,
            input: String::new(),
        }
    }

    pub fn message(&self) -> Option<&str> {
        match &self.step {
            AddBooksStep::Duplicate { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn handle(mut self, event: InputEvent, library: &mut Library) -> Result<Flow<Self>> {
        use AddBooksStep::*;

        let step = std::mem::replace(&mut self.step, EnterCount);
        self.step = match (step, event) {
            (EnterCount | EnterId { .. } | EnterTitle { .. } | EnterAuthor { .. }, InputEvent::Cancel) => {
                return Ok(Flow::Exit);
            }
            (EnterCount, InputEvent::Confirm) => {
                let n = parse_count(&self.input);
                self.input.clear();
                if (1..=MAX_ADD).contains(&n) {
                    EnterId {
                        batch: Batch {
                            total: n as usize,
                            added: Vec::new(),
                        },
                    }
                } else {
                    EnterCount
                }
            }
            (EnterId { batch }, InputEvent::Confirm) => {
                let id = self.take_input();
                match check_id(library, &id) {
                    Some(message) => Duplicate { batch, message },
                    None => EnterTitle { batch, id },
                }
            }
            (EnterTitle { batch, id }, InputEvent::Confirm) => {
                let title = self.take_input();
                match check_title(library, &title) {
                    Some(message) => Duplicate { batch, message },
                    None => EnterAuthor { batch, id, title },
                }
            }
            (EnterAuthor { batch, id, title }, InputEvent::Confirm) => {
                let author = self.take_input();
                finish_book(library, batch, id, title, author)?
            }
            (step @ (EnterCount | EnterId { .. } | EnterTitle { .. } | EnterAuthor { .. }), ev) => {
                edit_buffer(&mut self.input, &ev);
                step
            }

            (Duplicate { batch, .. }, ev) if is_retry(&ev) => {
                self.input.clear();
                EnterId { batch }
            }
            (Done { .. }, InputEvent::Confirm) => return Ok(Flow::Exit),
            (_, ev) if is_leave(&ev) => return Ok(Flow::Exit),
            (step, _) => step,
        };
        Ok(Flow::Continue(self))
    }

    fn take_input(&mut self) -> String {
        let s = self.input.trim().to_string();
        self.input.clear();
        s
    }
}

fn check_id(library: &Library, id: &str) -> Option<String> {
    if !is_valid_book_id(id) {
        return Some("Book ID must be exactly 4 letters or digits".to_string());
    }
    library
        .catalog
        .find_by_id(id)
        .map(|_| CatalogError::DuplicateId(id.to_string()).to_string())
}

fn check_title(library: &Library, title: &str) -> Option<String> {
    if title.is_empty() {
        return Some("Title cannot be empty".to_string());
    }
    if has_separator(title) {
        return Some("Title cannot contain ',' or ';'".to_string());
    }
    library
        .catalog
        .find_by_title(title)
        .map(|_| CatalogError::DuplicateTitle(title.to_string()).to_string())
}

fn finish_book(
    library: &mut Library,
    mut batch: Batch,
    id: String,
    title: String,
    author: String,
) -> Result<AddBooksStep> {
    if has_separator(&author) {
        return Ok(AddBooksStep::Duplicate {
            batch,
            message: "Author cannot contain ',' or ';'".to_string(),
        });
    }
    let book = Book::available(id, title, author);
    if let Err(e) = library.catalog.add(book.clone()) {
        return Ok(AddBooksStep::Duplicate {
            batch,
            message: e.to_string(),
        });
    }
    batch.added.push(book);
    if batch.added.len() < batch.total {
        return Ok(AddBooksStep::EnterId { batch });
    }
    library
        .commit_new_books(&batch.added)
        .context("saving new books")?;
    Ok(AddBooksStep::Done { added: batch.added })
}
