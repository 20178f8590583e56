use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use crate::app::{AppState, BOOKS_PER_PAGE};
use crate::catalog::{Book, BookStatus};
use crate::search::SearchState;

/// Rows of `books` shown on `page`, clamped to the last page.
fn page_slice(books: &[Book], page: usize) -> (&[Book], usize, usize) {
    let pages = AppState::page_count(books.len());
    let page = page.min(pages - 1);
    let start = (page * BOOKS_PER_PAGE).min(books.len());
    let end = (start + BOOKS_PER_PAGE).min(books.len());
    (&books[start..end], page, pages)
}

fn books_table<'a>(books: &'a [Book], title: String) -> Table<'a> {
    let rows = books.iter().map(|b| {
        let style = match b.status() {
            BookStatus::Available => Style::default(),
            BookStatus::Borrowed => Style::default().fg(Color::Yellow),
        };
        Row::new(vec![
            Cell::from(b.id.clone()),
            Cell::from(b.title.clone()),
            Cell::from(b.author.clone()),
            Cell::from(b.status().label()),
            Cell::from(b.borrowed_name().to_string()),
            Cell::from(b.borrowed_date()),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Length(6),
        Constraint::Percentage(30),
        Constraint::Percentage(20),
        Constraint::Length(10),
        Constraint::Percentage(20),
        Constraint::Length(11),
    ];
    let header = Row::new(vec!["ID", "TITLE", "AUTHOR", "STATUS", "BORROWER", "DATE"])
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    Table::new(rows, widths)
        .header(header)
        .block(Block::default().title(title).borders(Borders::ALL))
        .column_spacing(1)
}

pub fn render_books_page(f: &mut Frame, area: Rect, app: &AppState, page: usize) {
    let books = app.library.catalog.books();
    if books.is_empty() {
        let p = Paragraph::new("No books in the catalog.\n\n0/Esc: back")
            .block(Block::default().title("All Books").borders(Borders::ALL));
        f.render_widget(p, area);
        return;
    }
    let (slice, page, pages) = page_slice(books, page);
    let title = format!("All Books (page {}/{}) n: next  p: prev  s: search  0: back", page + 1, pages);
    f.render_widget(books_table(slice, title), area);
}

pub fn render_search(f: &mut Frame, area: Rect, search: &SearchState) {
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)].as_ref())
        .split(area);

    let (prompt, hint) = if search.editing {
        (format!("{}_", search.query), "Enter: search  Esc: back")
    } else {
        (search.query.clone(), "s: new search  n/p: page  0: back")
    };
    let input = Paragraph::new(prompt).block(
        Block::default()
            .title(format!("Search by ID, title or author ({hint})"))
            .borders(Borders::ALL),
    );
    f.render_widget(input, parts[0]);

    match &search.last_query {
        None if search.editing => {}
        Some(q) if !search.results.is_empty() => {
            let (slice, page, pages) = page_slice(&search.results, search.page);
            let title = format!(
                "{} result(s) for '{q}' (page {}/{})",
                search.results.len(),
                page + 1,
                pages
            );
            f.render_widget(books_table(slice, title), parts[1]);
        }
        _ => {
            let p = Paragraph::new("No matching books found.")
                .block(Block::default().title("Results").borders(Borders::ALL));
            f.render_widget(p, parts[1]);
        }
    }
}
