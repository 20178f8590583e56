//! Application state types and entry glue.
//!
//! `AppState` is the single value the event loop mutates and the renderer
//! reads. Workflow screens carry their own state inside [`Screen`], so
//! leaving a screen drops it.
//!
pub mod config;
pub mod keymap;
pub mod update;

use tracing::warn;

use crate::library::Library;
use crate::search::SearchState;
use crate::store::DataFiles;
use crate::workflow::{AddBooksWorkflow, BorrowWorkflow, ReturnWorkflow};

/// Books shown per page in the catalog and search views.
pub const BOOKS_PER_PAGE: usize = 10;

/// Logical input reported by the front end. Screens only ever see these.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Up,
    Down,
    /// Pick the n-th entry (0-based) of the list on screen.
    Select(usize),
    Confirm,
    Cancel,
    Char(char),
    Backspace,
    Space,
}

/// Main menu entries, in display order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MenuOption {
    ViewBooks,
    Borrow,
    Return,
    AddBooks,
    SaveLoad,
    Exit,
}

impl MenuOption {
    pub const ALL: [MenuOption; 6] = [
        MenuOption::ViewBooks,
        MenuOption::Borrow,
        MenuOption::Return,
        MenuOption::AddBooks,
        MenuOption::SaveLoad,
        MenuOption::Exit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuOption::ViewBooks => "View All Books",
            MenuOption::Borrow => "Borrow a Book",
            MenuOption::Return => "Return a Book",
            MenuOption::AddBooks => "Add New Books",
            MenuOption::SaveLoad => "Save / Load Data",
            MenuOption::Exit => "Exit",
        }
    }
}

#[derive(Clone, Debug)]
pub enum Screen {
    MainMenu,
    ViewBooks { page: usize },
    Search(SearchState),
    Borrow(BorrowWorkflow),
    Return(ReturnWorkflow),
    AddBooks(AddBooksWorkflow),
    SaveLoad { message: Option<String> },
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::MainMenu => "main menu",
            Screen::ViewBooks { .. } => "view books",
            Screen::Search(_) => "search",
            Screen::Borrow(_) => "borrow",
            Screen::Return(_) => "return",
            Screen::AddBooks(_) => "add books",
            Screen::SaveLoad { .. } => "save/load",
        }
    }
}

/// Overlay dialogs drawn above the current screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModalState {
    Info { message: String },
}

pub struct AppState {
    pub library: Library,
    pub screen: Screen,
    pub selected_menu_index: usize,
    pub modal: Option<ModalState>,
    /// Label printed next to fines.
    pub currency: String,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(library: Library, currency: impl Into<String>) -> Self {
        Self {
            library,
            screen: Screen::MainMenu,
            selected_menu_index: 0,
            modal: None,
            currency: currency.into(),
            should_quit: false,
        }
    }

    /// Open the data files. A catalog that fails to load starts empty and the
    /// failure is shown in an info dialog.
    pub fn open(files: DataFiles, currency: impl Into<String>) -> Self {
        let mut library = Library::new(files);
        let failure = library.reload().err();
        let mut app = Self::new(library, currency);
        if let Some(e) = failure {
            warn!(error = %e, "starting with an empty catalog");
            app.show_info(format!("Could not load books: {e}"));
        }
        app
    }

    pub fn show_info(&mut self, message: impl Into<String>) {
        self.modal = Some(ModalState::Info {
            message: message.into(),
        });
    }

    /// Number of pages needed for `len` books (at least one).
    pub fn page_count(len: usize) -> usize {
        len.div_ceil(BOOKS_PER_PAGE).max(1)
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
