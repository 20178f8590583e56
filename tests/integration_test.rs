// Integration tests for library-staff-tool
// Full flows through the screen controller against temporary data files

use chrono::NaiveDate;
use std::fs;
use tempfile::TempDir;

use library_staff_tool::app::update::handle_event;
use library_staff_tool::app::{AppState, InputEvent, ModalState, Screen};
use library_staff_tool::catalog::{Book, BookStatus};
use library_staff_tool::store::{self, DataFiles};
use library_staff_tool::workflow::{AddBooksStep, BorrowStep, ReturnStep};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn seeded() -> (TempDir, DataFiles) {
    let dir = TempDir::new().unwrap();
    let files = DataFiles::new(dir.path().join("books.txt"), dir.path().join("borrowers.txt"));
    store::save_books(
        &files.books,
        &[
            Book::available("0001", "Catcher in the Rye", "Salinger"),
            Book::available("AB12", "The Hobbit", "Tolkien"),
            Book::available("0003", "Silmarillion", "Tolkien"),
        ],
    )
    .unwrap();
    (dir, files)
}

fn send(app: &mut AppState, ev: InputEvent, today: NaiveDate) {
    handle_event(app, ev, today);
}

fn type_text(app: &mut AppState, text: &str, today: NaiveDate) {
    for c in text.chars() {
        let ev = if c == ' ' { InputEvent::Space } else { InputEvent::Char(c) };
        handle_event(app, ev, today);
    }
}

fn submit(app: &mut AppState, text: &str, today: NaiveDate) {
    type_text(app, text, today);
    send(app, InputEvent::Confirm, today);
}

fn borrow(app: &mut AppState, name: &str, ids: &[&str], today: NaiveDate) {
    send(app, InputEvent::Char('2'), today);
    submit(app, name, today);
    submit(app, &ids.len().to_string(), today);
    for id in ids {
        submit(app, id, today);
    }
}

// 1) Borrow a batch, then return part of it and the rest later
#[test]
fn borrow_then_return_in_two_steps() {
    let (_dir, files) = seeded();
    let mut app = AppState::open(files.clone(), "RM");
    assert!(app.modal.is_none());

    let lent_on = day(2024, 6, 1);
    borrow(&mut app, "Alice", &["0001", "ab12", "0003"], lent_on);
    match &app.screen {
        Screen::Borrow(wf) => assert!(matches!(&wf.step, BorrowStep::Done { borrowed, .. } if borrowed.len() == 3)),
        other => panic!("unexpected screen {}", other.name()),
    }
    send(&mut app, InputEvent::Confirm, lent_on);
    assert!(matches!(app.screen, Screen::MainMenu));

    let books = store::load_books(&files.books).unwrap();
    assert!(books.iter().all(|b| b.status() == BookStatus::Borrowed && b.borrowed_name() == "Alice"));
    assert_eq!(books[1].id, "AB12");
    assert_eq!(
        fs::read_to_string(&files.borrowers).unwrap(),
        "Alice,0001;AB12;0003,2024-06-01\n"
    );

    // Return the second book 19 days later
    let today = day(2024, 6, 20);
    send(&mut app, InputEvent::Char('3'), today);
    submit(&mut app, "alice", today);
    match &app.screen {
        Screen::Return(wf) => match &wf.step {
            ReturnStep::SelectBooks { books, .. } => {
                assert_eq!(books.len(), 3);
                assert_eq!(books[1].days, 19);
                assert_eq!(books[1].fee, 25);
            }
            other => panic!("unexpected step {other:?}"),
        },
        other => panic!("unexpected screen {}", other.name()),
    }
    send(&mut app, InputEvent::Char('2'), today);
    send(&mut app, InputEvent::Char('y'), today);
    match &app.screen {
        Screen::Return(wf) => {
            assert_eq!(wf.step, ReturnStep::Done { returned: vec!["AB12".into()], fee: 25 })
        }
        other => panic!("unexpected screen {}", other.name()),
    }
    send(&mut app, InputEvent::Confirm, today);

    assert_eq!(
        fs::read_to_string(&files.borrowers).unwrap(),
        "Alice,0001;0003,2024-06-01\n"
    );
    let books = store::load_books(&files.books).unwrap();
    assert_eq!(books[1].status(), BookStatus::Available);
    assert_eq!(books[1].borrowed_name(), "none");
    assert_eq!(books[1].borrowed_date(), "none");

    // Return everything that is left
    send(&mut app, InputEvent::Char('3'), today);
    submit(&mut app, "Alice", today);
    send(&mut app, InputEvent::Char('a'), today);
    send(&mut app, InputEvent::Confirm, today);
    send(&mut app, InputEvent::Confirm, today);
    assert_eq!(fs::read_to_string(&files.borrowers).unwrap(), "");
    assert!(store::load_books(&files.books).unwrap().iter().all(|b| !b.is_borrowed()));
}

// 2) A borrower with an open log line is turned away
#[test]
fn returning_borrower_must_return_first() {
    let (_dir, files) = seeded();
    let mut app = AppState::open(files.clone(), "RM");
    let today = day(2024, 6, 1);
    borrow(&mut app, "Alice", &["0001"], today);
    send(&mut app, InputEvent::Confirm, today);

    send(&mut app, InputEvent::Char('2'), today);
    submit(&mut app, "ALICE", today);
    let Screen::Borrow(wf) = &app.screen else { panic!("not borrowing") };
    assert_eq!(wf.message(), Some("Are you Alice who borrowed 0001 on 2024-06-01?"));
    send(&mut app, InputEvent::Char('y'), today);
    let Screen::Borrow(wf) = &app.screen else { panic!("not borrowing") };
    assert_eq!(wf.message(), Some("You must return previous books first."));
    send(&mut app, InputEvent::Confirm, today);
    assert!(matches!(app.screen, Screen::MainMenu));
}

// 3) Leaving a borrow half-way leaves disk untouched and memory reloaded
#[test]
fn abandoned_borrow_is_not_saved() {
    let (_dir, files) = seeded();
    let mut app = AppState::open(files.clone(), "RM");
    let today = day(2024, 6, 1);
    send(&mut app, InputEvent::Char('2'), today);
    submit(&mut app, "Bob", today);
    submit(&mut app, "2", today);
    submit(&mut app, "0001", today);
    assert!(app.library.catalog.find_by_id("0001").unwrap().is_borrowed());
    send(&mut app, InputEvent::Cancel, today);

    assert!(matches!(app.screen, Screen::MainMenu));
    assert!(!app.library.catalog.find_by_id("0001").unwrap().is_borrowed());
    assert!(!files.borrowers.exists());
    assert!(store::load_books(&files.books).unwrap().iter().all(|b| !b.is_borrowed()));
}

// 4) Add a batch of books and find them again after a reload
#[test]
fn added_books_survive_reload() {
    let (_dir, files) = seeded();
    let mut app = AppState::open(files.clone(), "RM");
    let today = day(2024, 6, 1);
    send(&mut app, InputEvent::Char('4'), today);
    submit(&mut app, "2", today);
    submit(&mut app, "ZZ99", today);
    submit(&mut app, "Dune", today);
    submit(&mut app, "Herbert", today);
    // Duplicate id is refused and the entry can be retried
    submit(&mut app, "zz99", today);
    let Screen::AddBooks(wf) = &app.screen else { panic!("not adding") };
    assert!(matches!(wf.step, AddBooksStep::Duplicate { .. }));
    send(&mut app, InputEvent::Char('c'), today);
    submit(&mut app, "ZZ98", today);
    submit(&mut app, "Emma", today);
    submit(&mut app, "Austen", today);
    let Screen::AddBooks(wf) = &app.screen else { panic!("not adding") };
    assert!(matches!(&wf.step, AddBooksStep::Done { added } if added.len() == 2));
    send(&mut app, InputEvent::Confirm, today);

    let books = store::load_books(&files.books).unwrap();
    assert_eq!(books.len(), 5);
    assert_eq!(fs::read_to_string(&files.books).unwrap().lines().next(), Some("5"));
    let dune = books.iter().find(|b| b.id == "ZZ99").unwrap();
    assert_eq!(dune.status(), BookStatus::Available);
    assert_eq!(app.library.catalog.len(), 5);
}

// 5) A malformed catalog is reported and leaves the menu in place
#[test]
fn malformed_catalog_shows_info_modal() {
    let (_dir, files) = seeded();
    fs::write(&files.books, "three\n").unwrap();
    let mut app = AppState::open(files.clone(), "RM");
    assert!(matches!(app.modal, Some(ModalState::Info { .. })));
    assert!(app.library.catalog.is_empty());
    send(&mut app, InputEvent::Confirm, day(2024, 6, 1));
    assert!(app.modal.is_none());

    send(&mut app, InputEvent::Char('1'), day(2024, 6, 1));
    assert!(matches!(app.screen, Screen::MainMenu));
    assert!(matches!(app.modal, Some(ModalState::Info { .. })));
}

// 6) Save/Load screen writes and reads the catalog
#[test]
fn save_load_round_trip() {
    let (_dir, files) = seeded();
    let mut app = AppState::open(files.clone(), "RM");
    let today = day(2024, 6, 1);
    fs::remove_file(&files.books).unwrap();
    send(&mut app, InputEvent::Char('5'), today);
    send(&mut app, InputEvent::Char('1'), today);
    assert_eq!(store::load_books(&files.books).unwrap().len(), 3);
    send(&mut app, InputEvent::Char('0'), today);
    assert!(matches!(app.screen, Screen::MainMenu));
}

// 7) Saving after a failed load leaves the broken file alone
#[test]
fn save_after_failed_load_keeps_file_bytes() {
    let (_dir, files) = seeded();
    let broken = "2\n0001,Catcher,Salinger,0,none,none\n0002,Eats, Shoots,Truss,0,none,none\n";
    fs::write(&files.books, broken).unwrap();
    let mut app = AppState::open(files.clone(), "RM");
    assert!(!app.library.is_loaded());
    let today = day(2024, 6, 1);
    send(&mut app, InputEvent::Confirm, today);

    send(&mut app, InputEvent::Char('5'), today);
    send(&mut app, InputEvent::Char('1'), today);
    let Screen::SaveLoad { message: Some(m) } = &app.screen else { panic!("no message") };
    assert!(m.contains("Load failed"), "{m}");
    assert_eq!(fs::read_to_string(&files.books).unwrap(), broken);

    // Fixing the file and loading it again allows saving
    fs::write(&files.books, "1\n0001,Catcher,Salinger,0,none,none\n").unwrap();
    send(&mut app, InputEvent::Char('2'), today);
    send(&mut app, InputEvent::Char('1'), today);
    let Screen::SaveLoad { message: Some(m) } = &app.screen else { panic!("no message") };
    assert!(m.starts_with("Saved to"), "{m}");
}
