// Unit tests for library-staff-tool
// These tests work with the public API without touching the terminal

#[cfg(test)]
mod fee_tests {
    use chrono::NaiveDate;
    use library_staff_tool::workflow::returns::{days_borrowed, late_fee};

    #[test]
    fn no_fine_within_loan_period() {
        assert_eq!(late_fee(0), 0);
        assert_eq!(late_fee(14), 0);
    }

    #[test]
    fn five_per_day_after_loan_period() {
        assert_eq!(late_fee(15), 5);
        assert_eq!(late_fee(29), 75);
    }

    #[test]
    fn days_are_counted_between_dates() {
        let from = NaiveDate::from_ymd_opt(2024, 2, 20).unwrap();
        let to = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(days_borrowed(from, to), 10);
    }
}

#[cfg(test)]
mod catalog_tests {
    use chrono::NaiveDate;
    use library_staff_tool::catalog::{Book, BookStatus, Catalog, CatalogError, is_valid_book_id};

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Book::available("0001", "Catcher in the Rye", "Salinger"),
            Book::available("AB12", "The Hobbit", "Tolkien"),
        ])
    }

    #[test]
    fn borrow_and_return_flip_status_and_sentinels() {
        let mut cat = catalog();
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(cat.mark_borrowed(" ab12 ", "Carol", date).unwrap(), "AB12");
        let b = cat.find_by_id("AB12").unwrap();
        assert_eq!(b.status(), BookStatus::Borrowed);
        assert_eq!(b.borrowed_name(), "Carol");
        assert_eq!(b.borrowed_date(), "2024-06-01");
        assert!(matches!(cat.mark_borrowed("AB12", "Dan", date), Err(CatalogError::AlreadyBorrowed(_))));

        cat.mark_returned("AB12").unwrap();
        let b = cat.find_by_id("AB12").unwrap();
        assert_eq!(b.status(), BookStatus::Available);
        assert_eq!((b.borrowed_name(), b.borrowed_date().as_str()), ("none", "none"));
    }

    #[test]
    fn unknown_id_is_rejected() {
        let mut cat = catalog();
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert!(matches!(cat.mark_borrowed("9999", "Carol", date), Err(CatalogError::UnknownBook(_))));
    }

    #[test]
    fn book_ids_are_four_alphanumerics() {
        assert!(is_valid_book_id("AB12"));
        assert!(!is_valid_book_id("AB1"));
        assert!(!is_valid_book_id("AB-1"));
        assert!(!is_valid_book_id("AB123"));
    }
}

#[cfg(test)]
mod search_tests {
    use library_staff_tool::catalog::{Book, Catalog};
    use library_staff_tool::search::search_books;

    #[test]
    fn substring_search_ignores_case() {
        let cat = Catalog::new(vec![
            Book::available("0001", "Catcher in the Rye", "Salinger"),
            Book::available("AB12", "The Hobbit", "Tolkien"),
        ]);
        assert_eq!(search_books(&cat, "catch").len(), 1);
        assert_eq!(search_books(&cat, "TOLKIEN")[0].id, "AB12");
        assert!(search_books(&cat, "xyz").is_empty());
    }
}

#[cfg(test)]
mod config_tests {
    use library_staff_tool::app::config::LibraryConfig;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn settings_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("library.conf");
        std::fs::write(&path, "borrowers_file = loans.txt\ncurrency = EUR\n").unwrap();
        let cfg = LibraryConfig::load_or_init(&path);
        assert_eq!(cfg.books_file, PathBuf::from("books.txt"));
        assert_eq!(cfg.currency, "EUR");
        assert_eq!(cfg.data_files().borrowers, PathBuf::from("loans.txt"));
    }
}

#[cfg(test)]
mod keymap_tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use library_staff_tool::app::InputEvent;
    use library_staff_tool::app::keymap::Keymap;

    #[test]
    fn arrows_and_backspace_resolve() {
        let km = Keymap::default();
        let up = KeyEvent::new(KeyCode::Up, KeyModifiers::NONE);
        let bs = KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!(km.resolve(&up), Some(InputEvent::Up));
        assert_eq!(km.resolve(&bs), Some(InputEvent::Backspace));
    }
}
