use anyhow::Result;
use chrono::{Local, NaiveDate};
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::time::Duration;
use tracing::{debug, warn};

use crate::app::keymap::Keymap;
use crate::app::{AppState, BOOKS_PER_PAGE, InputEvent, MenuOption, Screen};
use crate::search::{SearchState, apply_search};
use crate::ui;
use crate::workflow::{AddBooksWorkflow, BorrowWorkflow, Flow, ReturnWorkflow, edit_buffer};

pub fn run_app(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, mut app: AppState) -> Result<()> {
    let keymap = Keymap::default();

    while !app.should_quit {
        terminal.draw(|f| {
            ui::render(f, &app);
        })?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if Keymap::is_force_quit(&key) {
                    break;
                }
                if let Some(ev) = keymap.resolve(&key) {
                    handle_event(&mut app, ev, Local::now().date_naive());
                }
            }
        }
    }

    Ok(())
}

/// Route one logical event to the active screen. `today` dates new loans
/// and prices late returns.
pub fn handle_event(app: &mut AppState, event: InputEvent, today: NaiveDate) {
    if app.modal.is_some() {
        if matches!(event, InputEvent::Confirm | InputEvent::Cancel) {
            app.modal = None;
        }
        return;
    }

    let before = app.screen.name();
    let screen = std::mem::replace(&mut app.screen, Screen::MainMenu);
    app.screen = match screen {
        Screen::MainMenu => main_menu(app, event),
        Screen::ViewBooks { page } => view_books(app, page, event),
        Screen::Search(search) => search_screen(app, search, event),
        Screen::SaveLoad { message } => save_load(app, message, event),
        Screen::Borrow(wf) => {
            let res = wf.handle(event, &mut app.library, today);
            drive(app, res, Screen::Borrow)
        }
        Screen::Return(wf) => {
            let res = wf.handle(event, &mut app.library, today);
            drive(app, res, Screen::Return)
        }
        Screen::AddBooks(wf) => {
            let res = wf.handle(event, &mut app.library);
            drive(app, res, Screen::AddBooks)
        }
    };
    if app.screen.name() != before {
        debug!(from = before, to = app.screen.name(), "screen changed");
    }
}

/// Fold a workflow result back into a screen. Leaving a workflow, normally
/// or on error, reloads the catalog so uncommitted changes are dropped.
fn drive<W>(app: &mut AppState, res: Result<Flow<W>>, wrap: fn(W) -> Screen) -> Screen {
    match res {
        Ok(Flow::Continue(wf)) => wrap(wf),
        Ok(Flow::Exit) => {
            reload_catalog(app);
            Screen::MainMenu
        }
        Err(e) => {
            warn!(error = %format!("{e:#}"), "workflow aborted");
            app.show_info(format!("{e:#}"));
            reload_catalog(app);
            Screen::MainMenu
        }
    }
}

fn reload_catalog(app: &mut AppState) -> bool {
    match app.library.reload() {
        Ok(()) => true,
        Err(e) => {
            if app.modal.is_none() {
                app.show_info(format!("Could not load books: {e}"));
            }
            false
        }
    }
}

fn main_menu(app: &mut AppState, event: InputEvent) -> Screen {
    let n = MenuOption::ALL.len();
    match event {
        InputEvent::Up => {
            app.selected_menu_index = (app.selected_menu_index + n - 1) % n;
            Screen::MainMenu
        }
        InputEvent::Down => {
            app.selected_menu_index = (app.selected_menu_index + 1) % n;
            Screen::MainMenu
        }
        InputEvent::Confirm => activate(app, MenuOption::ALL[app.selected_menu_index]),
        InputEvent::Select(i) if i < n => {
            app.selected_menu_index = i;
            activate(app, MenuOption::ALL[i])
        }
        InputEvent::Char(c @ '1'..='6') => {
            let i = c as usize - '1' as usize;
            app.selected_menu_index = i;
            activate(app, MenuOption::ALL[i])
        }
        InputEvent::Char('q') => {
            app.should_quit = true;
            Screen::MainMenu
        }
        _ => Screen::MainMenu,
    }
}

fn activate(app: &mut AppState, option: MenuOption) -> Screen {
    let needs_catalog = !matches!(option, MenuOption::SaveLoad | MenuOption::Exit);
    if needs_catalog && !reload_catalog(app) {
        return Screen::MainMenu;
    }
    match option {
        MenuOption::ViewBooks => Screen::ViewBooks { page: 0 },
        MenuOption::Borrow => Screen::Borrow(BorrowWorkflow::new()),
        MenuOption::Return => Screen::Return(ReturnWorkflow::new()),
        MenuOption::AddBooks => Screen::AddBooks(AddBooksWorkflow::new()),
        MenuOption::SaveLoad => Screen::SaveLoad { message: None },
        MenuOption::Exit => {
            app.should_quit = true;
            Screen::MainMenu
        }
    }
}

fn next_page(page: usize, len: usize) -> usize {
    if (page + 1) * BOOKS_PER_PAGE < len { page + 1 } else { page }
}

fn view_books(app: &mut AppState, page: usize, event: InputEvent) -> Screen {
    match event {
        InputEvent::Cancel | InputEvent::Char('0') => Screen::MainMenu,
        InputEvent::Char('n' | 'N') | InputEvent::Down => Screen::ViewBooks {
            page: next_page(page, app.library.catalog.len()),
        },
        InputEvent::Char('p' | 'P') | InputEvent::Up => Screen::ViewBooks {
            page: page.saturating_sub(1),
        },
        InputEvent::Char('s' | 'S') => Screen::Search(SearchState::new()),
        _ => Screen::ViewBooks { page },
    }
}

fn search_screen(app: &mut AppState, mut search: SearchState, event: InputEvent) -> Screen {
    if search.editing {
        match event {
            InputEvent::Cancel => return Screen::ViewBooks { page: 0 },
            InputEvent::Confirm => apply_search(&mut search, &app.library.catalog),
            ev => {
                edit_buffer(&mut search.query, &ev);
            }
        }
        return Screen::Search(search);
    }
    match event {
        InputEvent::Cancel | InputEvent::Char('0') => Screen::ViewBooks { page: 0 },
        InputEvent::Char('s' | 'S') => Screen::Search(SearchState::new()),
        InputEvent::Char('n' | 'N') | InputEvent::Down => {
            search.page = next_page(search.page, search.results.len());
            Screen::Search(search)
        }
        InputEvent::Char('p' | 'P') | InputEvent::Up => {
            search.page = search.page.saturating_sub(1);
            Screen::Search(search)
        }
        _ => Screen::Search(search),
    }
}

fn save_load(app: &mut AppState, message: Option<String>, event: InputEvent) -> Screen {
    let books = app.library.files.books.display().to_string();
    match event {
        InputEvent::Char('1') => {
            let message = match app.library.save() {
                Ok(()) => format!("Saved to {books} successfully!"),
                Err(e) => format!("Save failed: {e}"),
            };
            Screen::SaveLoad { message: Some(message) }
        }
        InputEvent::Char('2') => {
            let message = match app.library.reload() {
                Ok(()) => format!("Loaded {} books from {books} successfully!", app.library.catalog.len()),
                Err(e) => format!("Load failed: {e}"),
            };
            Screen::SaveLoad { message: Some(message) }
        }
        InputEvent::Cancel | InputEvent::Char('0') => Screen::MainMenu,
        _ => Screen::SaveLoad { message },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Book;
    use crate::library::Library;
    use crate::store::{self, DataFiles};
    use tempfile::TempDir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn app_with(books: usize) -> (TempDir, AppState) {
        let dir = TempDir::new().unwrap();
        let files = DataFiles::new(dir.path().join("books.txt"), dir.path().join("borrowers.txt"));
        let list: Vec<Book> = (0..books)
            .map(|i| Book::available(format!("{i:04}"), format!("Title {i}"), "Author"))
            .collect();
        store::save_books(&files.books, &list).unwrap();
        let app = AppState::new(Library::open(files).unwrap(), "RM");
        (dir, app)
    }

    #[test]
    fn menu_navigation_wraps() {
        let (_dir, mut app) = app_with(0);
        handle_event(&mut app, InputEvent::Up, today());
        assert_eq!(app.selected_menu_index, 5);
        handle_event(&mut app, InputEvent::Down, today());
        assert_eq!(app.selected_menu_index, 0);
    }

    #[test]
    fn digit_selects_menu_entry() {
        let (_dir, mut app) = app_with(0);
        handle_event(&mut app, InputEvent::Char('2'), today());
        assert!(matches!(app.screen, Screen::Borrow(_)));
        handle_event(&mut app, InputEvent::Cancel, today());
        assert!(matches!(app.screen, Screen::MainMenu));
        handle_event(&mut app, InputEvent::Char('6'), today());
        assert!(app.should_quit);
    }

    #[test]
    fn view_pages_stop_at_the_ends() {
        let (_dir, mut app) = app_with(15);
        handle_event(&mut app, InputEvent::Char('1'), today());
        handle_event(&mut app, InputEvent::Char('n'), today());
        handle_event(&mut app, InputEvent::Char('n'), today());
        assert!(matches!(app.screen, Screen::ViewBooks { page: 1 }));
        handle_event(&mut app, InputEvent::Char('p'), today());
        handle_event(&mut app, InputEvent::Char('p'), today());
        assert!(matches!(app.screen, Screen::ViewBooks { page: 0 }));
    }

    #[test]
    fn search_from_view_and_back() {
        let (_dir, mut app) = app_with(12);
        handle_event(&mut app, InputEvent::Char('1'), today());
        handle_event(&mut app, InputEvent::Char('s'), today());
        for c in "title 1".chars() {
            let ev = if c == ' ' { InputEvent::Space } else { InputEvent::Char(c) };
            handle_event(&mut app, ev, today());
        }
        handle_event(&mut app, InputEvent::Confirm, today());
        let Screen::Search(s) = &app.screen else { panic!("not on search") };
        // "Title 1", "Title 10", "Title 11"
        assert_eq!(s.results.len(), 3);
        assert!(!s.editing);
        handle_event(&mut app, InputEvent::Char('0'), today());
        assert!(matches!(app.screen, Screen::ViewBooks { page: 0 }));
    }

    #[test]
    fn modal_swallows_input_until_dismissed() {
        let (_dir, mut app) = app_with(0);
        app.show_info("hello");
        handle_event(&mut app, InputEvent::Char('2'), today());
        assert!(matches!(app.screen, Screen::MainMenu));
        handle_event(&mut app, InputEvent::Confirm, today());
        assert!(app.modal.is_none());
        handle_event(&mut app, InputEvent::Char('2'), today());
        assert!(matches!(app.screen, Screen::Borrow(_)));
    }

    #[test]
    fn save_load_reports_outcome() {
        let (_dir, mut app) = app_with(2);
        handle_event(&mut app, InputEvent::Char('5'), today());
        handle_event(&mut app, InputEvent::Char('2'), today());
        let Screen::SaveLoad { message: Some(m) } = &app.screen else { panic!("no message") };
        assert!(m.starts_with("Loaded 2 books"), "{m}");
        handle_event(&mut app, InputEvent::Char('1'), today());
        let Screen::SaveLoad { message: Some(m) } = &app.screen else { panic!("no message") };
        assert!(m.starts_with("Saved to"), "{m}");
    }
}
