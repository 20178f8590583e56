//! Return screen: find the borrower's outstanding loans, pick one book or
//! all of them, confirm, then settle the borrower log and the catalog.

use anyhow::{Context, Result};
use chrono::NaiveDate;

use super::{FINE_PER_DAY, Flow, LOAN_PERIOD_DAYS, edit_buffer, is_leave, is_no, is_retry, is_yes};
use crate::app::InputEvent;
use crate::catalog::Book;
use crate::library::Library;
use crate::store::BorrowerEntry;

/// Whole days between the loan date and `today`; zero for a loan dated later.
pub fn days_borrowed(borrowed_on: NaiveDate, today: NaiveDate) -> i64 {
    (today - borrowed_on).num_days().max(0)
}

/// Fine owed for a book held `days` days.
pub fn late_fee(days: i64) -> i64 {
    (days - LOAN_PERIOD_DAYS).max(0) * FINE_PER_DAY
}

/// A book on the select list with its fee as of today.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outstanding {
    pub book: Book,
    pub days: i64,
    pub fee: i64,
}

impl Outstanding {
    fn new(book: &Book, today: NaiveDate) -> Self {
        let days = book
            .loan
            .as_ref()
            .map(|l| days_borrowed(l.date, today))
            .unwrap_or(0);
        Self {
            book: book.clone(),
            days,
            fee: late_fee(days),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReturnStep {
    EnterName,
    NotFound,
    SelectBooks {
        entry: BorrowerEntry,
        books: Vec<Outstanding>,
    },
    ConfirmReturn {
        entry: BorrowerEntry,
        books: Vec<Outstanding>,
        selected: Vec<Outstanding>,
        message: String,
    },
    Done {
        returned: Vec<String>,
        fee: i64,
    },
}

#[derive(Clone, Debug)]
pub struct ReturnWorkflow {
    pub step: ReturnStep,
    pub input: String,
}

impl Default for ReturnWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl ReturnWorkflow {
    pub fn new() -> Self {
        Self {
            step: ReturnStep::EnterName,
            input: String::new(),
        }
    }

    pub fn message(&self) -> Option<&str> {
        match &self.step {
            ReturnStep::ConfirmReturn { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn handle(mut self, event: InputEvent, library: &mut Library, today: NaiveDate) -> Result<Flow<Self>> {
        use ReturnStep::*;

        let step = std::mem::replace(&mut self.step, EnterName);
        self.step = match (step, event) {
            (EnterName, InputEvent::Cancel) => return Ok(Flow::Exit),
            (EnterName, InputEvent::Confirm) => self.submit_name(library, today)?,
            (EnterName, ev) => {
                edit_buffer(&mut self.input, &ev);
                EnterName
            }

            (NotFound, ev) if is_retry(&ev) => {
                self.input.clear();
                EnterName
            }

            (SelectBooks { entry, books }, ev) => match pick(&books, &ev) {
                Some(selected) => {
                    let message = if selected.len() == books.len() && books.len() > 1 {
                        "Confirm return all books?".to_string()
                    } else {
                        format!("Return '{}'?", selected[0].book.title)
                    };
                    ConfirmReturn {
                        entry,
                        books,
                        selected,
                        message,
                    }
                }
                None if is_leave(&ev) => return Ok(Flow::Exit),
                None => SelectBooks { entry, books },
            },

            (ConfirmReturn { entry, selected, .. }, ev) if is_yes(&ev) => {
                apply_return(library, &entry, &selected)?
            }
            (ConfirmReturn { entry, books, .. }, ev) if is_no(&ev) => SelectBooks { entry, books },

            (Done { .. }, InputEvent::Confirm) => return Ok(Flow::Exit),
            (_, ev) if is_leave(&ev) => return Ok(Flow::Exit),
            (step, _) => step,
        };
        Ok(Flow::Continue(self))
    }

    fn submit_name(&mut self, library: &Library, today: NaiveDate) -> Result<ReturnStep> {
        let name = self.input.trim().to_string();
        self.input.clear();
        let Some(entry) = library
            .find_borrower(&name)
            .context("reading borrower log")?
        else {
            return Ok(ReturnStep::NotFound);
        };
        let books = library
            .catalog
            .books()
            .iter()
            .filter(|b| entry.record.book_ids.contains(&b.id))
            .map(|b| Outstanding::new(b, today))
            .collect();
        Ok(ReturnStep::SelectBooks { entry, books })
    }
}

/// Selection on the book list: `a` for all, `1..=9` or `Select(i)` for one.
fn pick(books: &[Outstanding], event: &InputEvent) -> Option<Vec<Outstanding>> {
    let index = match event {
        InputEvent::Char('a' | 'A') if !books.is_empty() => return Some(books.to_vec()),
        InputEvent::Char(c @ '1'..='9') => c.to_digit(10)? as usize - 1,
        InputEvent::Select(i) => *i,
        _ => return None,
    };
    books.get(index).map(|b| vec![b.clone()])
}

fn apply_return(library: &mut Library, entry: &BorrowerEntry, selected: &[Outstanding]) -> Result<ReturnStep> {
    let mut returned = Vec::with_capacity(selected.len());
    for item in selected {
        library
            .catalog
            .mark_returned(&item.book.id)
            .with_context(|| format!("returning {}", item.book.id))?;
        returned.push(item.book.id.clone());
    }
    library
        .commit_return(entry, &returned)
        .context("saving returned books")?;
    let fee = selected.iter().map(|o| o.fee).sum();
    Ok(ReturnStep::Done { returned, fee })
}
