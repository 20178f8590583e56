//! Prompts for the borrow, return and add-books screens.
//!
//! Each step renders as a short block of text: what has been entered so far,
//! the current prompt with its input buffer, and the keys that apply.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::workflow::returns::Outstanding;
use crate::workflow::{
    AddBooksStep, AddBooksWorkflow, BorrowStep, BorrowWorkflow, FINE_PER_DAY, LOAN_PERIOD_DAYS, MAX_ADD,
    MAX_BORROW, ReturnStep, ReturnWorkflow,
};

fn prompt(label: &str, input: &str) -> Line<'static> {
    Line::from(vec![
        Span::raw(format!("{label}: ")),
        Span::styled(format!("{input}_"), Style::default().fg(Color::Yellow)),
    ])
}

fn error(message: &str) -> Line<'static> {
    Line::from(Span::styled(message.to_string(), Style::default().fg(Color::Red)))
}

fn hint(text: &str) -> Line<'static> {
    Line::from(Span::styled(text.to_string(), Style::default().add_modifier(Modifier::ITALIC)))
}

fn draw(f: &mut Frame, area: Rect, title: &str, lines: Vec<Line<'static>>) {
    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().title(title.to_string()).borders(Borders::ALL));
    f.render_widget(p, area);
}

pub fn render_borrow(f: &mut Frame, area: Rect, wf: &BorrowWorkflow, currency: &str) {
    let mut lines = vec![
        Line::raw(format!(
            "Return within {LOAN_PERIOD_DAYS} days. Late return fine: {FINE_PER_DAY}{currency}/day"
        )),
        Line::raw(""),
    ];
    match &wf.step {
        BorrowStep::EnterName => {
            lines.push(prompt("Enter your name", &wf.input));
            lines.push(hint("Enter: continue  Esc: back"));
        }
        BorrowStep::NameError { message } => {
            lines.push(error(message));
            lines.push(hint("c/Enter: try again  0/Esc: back to menu"));
        }
        BorrowStep::ConfirmExistingName { message, .. } => {
            lines.push(Line::raw(message.clone()));
            lines.push(hint("y/Enter: yes  n: no  0/Esc: back to menu"));
        }
        BorrowStep::HasOutstandingBooks { message } => {
            lines.push(error(message));
            lines.push(hint("Enter/0/Esc: back to menu"));
        }
        BorrowStep::EnterCount { name } => {
            lines.push(Line::raw(format!("Borrower: {name}")));
            lines.push(prompt(&format!("How many books (max {MAX_BORROW})"), &wf.input));
        }
        BorrowStep::CountError { message, .. } => {
            lines.push(error(message));
            lines.push(hint("c/Enter: try again  0/Esc: back to menu"));
        }
        BorrowStep::EnterBookId { name, count, borrowed } => {
            lines.push(Line::raw(format!("Borrower: {name}")));
            if !borrowed.is_empty() {
                lines.push(Line::raw(format!("Borrowed so far: {}", borrowed.join(", "))));
            }
            lines.push(prompt(
                &format!("Book ID ({} of {count})", borrowed.len() + 1),
                &wf.input,
            ));
        }
        BorrowStep::BookError { message, .. } => {
            lines.push(error(message));
            lines.push(hint("c/Enter: try again  0/Esc: back to menu"));
        }
        BorrowStep::Done { name, borrowed } => {
            lines.push(Line::from(Span::styled(
                format!("{name} borrowed {} successfully!", borrowed.join(", ")),
                Style::default().fg(Color::Green),
            )));
            lines.push(hint("Enter/0/Esc: back to menu"));
        }
    }
    draw(f, area, "Borrow a Book", lines);
}

fn outstanding_lines(books: &[Outstanding], currency: &str) -> Vec<Line<'static>> {
    books
        .iter()
        .enumerate()
        .map(|(i, o)| {
            Line::raw(format!(
                "{}. {} (Borrowed on {}, {} days ago, Fine: {currency}{})",
                i + 1,
                o.book.title,
                o.book.borrowed_date(),
                o.days,
                o.fee
            ))
        })
        .collect()
}

pub fn render_return(f: &mut Frame, area: Rect, wf: &ReturnWorkflow, currency: &str) {
    let mut lines = Vec::new();
    match &wf.step {
        ReturnStep::EnterName => {
            lines.push(prompt("Enter your name", &wf.input));
            lines.push(hint("Enter: continue  Esc: back"));
        }
        ReturnStep::NotFound => {
            lines.push(error("No borrowing record found for this name"));
            lines.push(hint("c/Enter: try again  0/Esc: back to menu"));
        }
        ReturnStep::SelectBooks { entry, books } => {
            lines.push(Line::raw(format!("Books borrowed by {}:", entry.record.name)));
            lines.extend(outstanding_lines(books, currency));
            lines.push(Line::raw(""));
            if books.len() > 1 {
                lines.push(hint("1-9: return one book  a: return all  0/Esc: back to menu"));
            } else {
                lines.push(hint("1: return this book  0/Esc: back to menu"));
            }
        }
        ReturnStep::ConfirmReturn { selected, message, .. } => {
            lines.extend(outstanding_lines(selected, currency));
            lines.push(Line::raw(""));
            lines.push(Line::raw(message.clone()));
            lines.push(hint("y/Enter: yes  n: choose again  0/Esc: back to menu"));
        }
        ReturnStep::Done { returned, fee } => {
            lines.push(Line::from(Span::styled(
                format!("Returned {} successfully!", returned.join(", ")),
                Style::default().fg(Color::Green),
            )));
            if *fee > 0 {
                lines.push(Line::raw(format!("Total fine: {currency}{fee}")));
            } else {
                lines.push(Line::raw("No fine to pay."));
            }
            lines.push(hint("Enter/0/Esc: back to menu"));
        }
    }
    draw(f, area, "Return a Book", lines);
}

pub fn render_add_books(f: &mut Frame, area: Rect, wf: &AddBooksWorkflow) {
    let mut lines = Vec::new();
    match &wf.step {
        AddBooksStep::EnterCount => {
            lines.push(prompt(&format!("How many books to add (1-{MAX_ADD})"), &wf.input));
            lines.push(hint("Enter: continue  Esc: back"));
        }
        AddBooksStep::EnterId { batch } => {
            lines.push(Line::raw(format!("Book {} of {}", batch.current(), batch.total)));
            lines.push(prompt("Book ID (4 characters)", &wf.input));
        }
        AddBooksStep::EnterTitle { batch, id } => {
            lines.push(Line::raw(format!("Book {} of {}  ID: {id}", batch.current(), batch.total)));
            lines.push(prompt("Title", &wf.input));
        }
        AddBooksStep::EnterAuthor { batch, id, title } => {
            lines.push(Line::raw(format!(
                "Book {} of {}  ID: {id}  Title: {title}",
                batch.current(),
                batch.total
            )));
            lines.push(prompt("Author", &wf.input));
        }
        AddBooksStep::Duplicate { message, .. } => {
            lines.push(error(message));
            lines.push(hint("c/Enter: try again  0/Esc: back to menu"));
        }
        AddBooksStep::Done { added } => {
            lines.push(Line::from(Span::styled(
                format!("Added {} book(s) successfully!", added.len()),
                Style::default().fg(Color::Green),
            )));
            for b in added {
                lines.push(Line::raw(format!("  {} {} by {}", b.id, b.title, b.author)));
            }
            lines.push(hint("Enter/0/Esc: back to menu"));
        }
    }
    draw(f, area, "Add New Books", lines);
}
