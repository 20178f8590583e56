//! Guided multi-step screens.
//!
//! Each workflow is a step enum plus an input buffer. `handle` consumes the
//! workflow and returns either the next state or [`Flow::Exit`], which sends
//! the controller back to the main menu.

pub mod add_books;
pub mod borrow;
pub mod returns;

pub use add_books::{AddBooksStep, AddBooksWorkflow};
pub use borrow::{BorrowStep, BorrowWorkflow};
pub use returns::{ReturnStep, ReturnWorkflow};

use crate::app::InputEvent;

/// Return within this many days to avoid a fine.
pub const LOAN_PERIOD_DAYS: i64 = 14;
/// Fine per day past the loan period, in currency units.
pub const FINE_PER_DAY: i64 = 5;
pub const MAX_BORROW: i64 = 3;
pub const MAX_ADD: i64 = 10;

#[derive(Debug)]
pub enum Flow<W> {
    Continue(W),
    Exit,
}

/// Apply a typing event to `buf`. Returns false for events that are not edits.
pub(crate) fn edit_buffer(buf: &mut String, event: &InputEvent) -> bool {
    match event {
        InputEvent::Char(c) => {
            buf.push(*c);
            true
        }
        InputEvent::Space => {
            buf.push(' ');
            true
        }
        InputEvent::Backspace => {
            buf.pop();
            true
        }
        _ => false,
    }
}

/// Loose integer parse: unparsable input counts as zero.
pub(crate) fn parse_count(input: &str) -> i64 {
    input.trim().parse::<i64>().unwrap_or(0)
}

/// Separators of the data files cannot appear inside a field.
pub(crate) fn has_separator(s: &str) -> bool {
    s.contains(',') || s.contains(';')
}

/// "Retry" answer on error steps.
pub(crate) fn is_retry(event: &InputEvent) -> bool {
    matches!(event, InputEvent::Confirm | InputEvent::Char('c' | 'C'))
}

/// "Back to main menu" answer on error and final steps.
pub(crate) fn is_leave(event: &InputEvent) -> bool {
    matches!(event, InputEvent::Cancel | InputEvent::Char('0'))
}

pub(crate) fn is_yes(event: &InputEvent) -> bool {
    matches!(event, InputEvent::Confirm | InputEvent::Char('y' | 'Y'))
}

pub(crate) fn is_no(event: &InputEvent) -> bool {
    matches!(event, InputEvent::Char('n' | 'N'))
}
