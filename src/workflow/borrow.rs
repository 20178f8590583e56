//! Borrow screen: name, optional outstanding-loan check, count, then one
//! book id per requested book. Disk is touched only once the whole batch
//! has been borrowed.

use anyhow::{Context, Result};
use chrono::NaiveDate;

use super::{
    Flow, MAX_BORROW, edit_buffer, has_separator, is_leave, is_no, is_retry, is_yes, parse_count,
};
use crate::app::InputEvent;
use crate::library::Library;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BorrowStep {
    EnterName,
    NameError {
        message: String,
    },
    /// The name already has a line in the borrower log.
    ConfirmExistingName {
        name: String,
        message: String,
    },
    HasOutstandingBooks {
        message: String,
    },
    EnterCount {
        name: String,
    },
    CountError {
        name: String,
        message: String,
    },
    EnterBookId {
        name: String,
        count: usize,
        borrowed: Vec<String>,
    },
    BookError {
        name: String,
        count: usize,
        borrowed: Vec<String>,
        message: String,
    },
    Done {
        name: String,
        borrowed: Vec<String>,
    },
}

#[derive(Clone, Debug)]
pub struct BorrowWorkflow {
    pub step: BorrowStep,
    pub input: String,
}

impl Default for BorrowWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl BorrowWorkflow {
    pub fn new() -> Self {
        Self {
            step: BorrowStep::EnterName,
            input: String::new(),
        }
    }

    pub fn message(&self) -> Option<&str> {
        match &self.step {
            BorrowStep::NameError { message }
            | BorrowStep::ConfirmExistingName { message, .. }
            | BorrowStep::HasOutstandingBooks { message }
            | BorrowStep::CountError { message, .. }
            | BorrowStep::BookError { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn handle(mut self, event: InputEvent, library: &mut Library, today: NaiveDate) -> Result<Flow<Self>> {
        use BorrowStep::*;

        let step = std::mem::replace(&mut self.step, EnterName);
        self.step = match (step, event) {
            (EnterName | EnterCount { .. } | EnterBookId { .. }, InputEvent::Cancel) => {
                return Ok(Flow::Exit);
            }
            (EnterName, InputEvent::Confirm) => self.submit_name(library)?,
            (EnterCount { name }, InputEvent::Confirm) => self.submit_count(name),
            (EnterBookId { name, count, borrowed }, InputEvent::Confirm) => {
                self.submit_book_id(library, today, name, count, borrowed)?
            }
            (step @ (EnterName | EnterCount { .. } | EnterBookId { .. }), ev) => {
                edit_buffer(&mut self.input, &ev);
                step
            }

            (ConfirmExistingName { .. }, ev) if is_yes(&ev) => HasOutstandingBooks {
                message: "You must return previous books first.".to_string(),
            },
            (ConfirmExistingName { .. }, ev) if is_no(&ev) => NameError {
                message: "Please enter a different name.".to_string(),
            },

            (NameError { .. }, ev) if is_retry(&ev) => {
                self.input.clear();
                EnterName
            }
            (CountError { name, .. }, ev) if is_retry(&ev) => {
                self.input.clear();
                EnterCount { name }
            }
            (BookError { name, count, borrowed, .. }, ev) if is_retry(&ev) => {
                self.input.clear();
                EnterBookId { name, count, borrowed }
            }

            (Done { .. } | HasOutstandingBooks { .. }, InputEvent::Confirm) => return Ok(Flow::Exit),
            (_, ev) if is_leave(&ev) => return Ok(Flow::Exit),
            (step, _) => step,
        };
        Ok(Flow::Continue(self))
    }

    fn submit_name(&mut self, library: &Library) -> Result<BorrowStep> {
        let name = self.input.trim().to_string();
        self.input.clear();
        if name.is_empty() {
            return Ok(BorrowStep::NameError {
                message: "Name cannot be empty".to_string(),
            });
        }
        if has_separator(&name) {
            return Ok(BorrowStep::NameError {
                message: "Name cannot contain ',' or ';'".to_string(),
            });
        }
        let existing = library
            .find_borrower(&name)
            .context("reading borrower log")?;
        Ok(match existing {
            Some(entry) => BorrowStep::ConfirmExistingName {
                message: format!(
                    "Are you {} who borrowed {} on {}?",
                    entry.record.name,
                    entry.record.book_ids.join(", "),
                    entry.record.date
                ),
                name,
            },
            None => BorrowStep::EnterCount { name },
        })
    }

    fn submit_count(&mut self, name: String) -> BorrowStep {
        let count = parse_count(&self.input);
        self.input.clear();
        if count <= 0 {
            BorrowStep::CountError {
                name,
                message: "Number must be greater than 0".to_string(),
            }
        } else if count > MAX_BORROW {
            BorrowStep::CountError {
                name,
                message: format!("You can only borrow up to {MAX_BORROW} books"),
            }
        } else {
            BorrowStep::EnterBookId {
                name,
                count: count as usize,
                borrowed: Vec::new(),
            }
        }
    }

    fn submit_book_id(
        &mut self,
        library: &mut Library,
        today: NaiveDate,
        name: String,
        count: usize,
        mut borrowed: Vec<String>,
    ) -> Result<BorrowStep> {
        let id = self.input.trim().to_string();
        self.input.clear();
        match library.catalog.mark_borrowed(&id, &name, today) {
            Err(e) => Ok(BorrowStep::BookError {
                name,
                count,
                borrowed,
                message: e.to_string(),
            }),
            Ok(book_id) => {
                borrowed.push(book_id);
                if borrowed.len() < count {
                    return Ok(BorrowStep::EnterBookId { name, count, borrowed });
                }
                library
                    .commit_borrow(&name, &borrowed, today)
                    .context("saving borrowed books")?;
                Ok(BorrowStep::Done { name, borrowed })
            }
        }
    }
}
