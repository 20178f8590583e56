pub mod books;
pub mod components;
pub mod workflows;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::{AppState, MenuOption, ModalState, Screen};

pub fn render(f: &mut Frame, app: &AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(1)].as_ref())
        .split(f.area());

    let p = Paragraph::new(format!(
        "Library Management System  books:{}  borrowed:{}  | Enter: confirm; Esc: back; Ctrl+C: quit",
        app.library.catalog.len(),
        app.library.catalog.books().iter().filter(|b| b.is_borrowed()).count(),
    ))
    .block(
        Block::default()
            .title("library-staff-tool")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(p, root[0]);

    match &app.screen {
        Screen::MainMenu => render_main_menu(f, root[1], app),
        Screen::ViewBooks { page } => books::render_books_page(f, root[1], app, *page),
        Screen::Search(search) => books::render_search(f, root[1], search),
        Screen::Borrow(wf) => workflows::render_borrow(f, root[1], wf, &app.currency),
        Screen::Return(wf) => workflows::render_return(f, root[1], wf, &app.currency),
        Screen::AddBooks(wf) => workflows::render_add_books(f, root[1], wf),
        Screen::SaveLoad { message } => render_save_load(f, root[1], message.as_deref()),
    }

    components::render_status_bar(f, root[2], app);

    if let Some(ModalState::Info { message }) = &app.modal {
        components::render_info_modal(f, f.area(), message);
    }
}

fn render_main_menu(f: &mut Frame, area: Rect, app: &AppState) {
    let mut lines = vec![
        Line::from(Span::styled("Main Menu", Style::default().add_modifier(Modifier::BOLD))),
        Line::raw(""),
    ];
    for (idx, option) in MenuOption::ALL.iter().enumerate() {
        let text = format!("{}. {}", idx + 1, option.label());
        if idx == app.selected_menu_index {
            lines.push(Line::from(Span::styled(
                format!("▶ {text}"),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )));
        } else {
            lines.push(Line::raw(format!("  {text}")));
        }
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "Up/Down to move, Enter or 1-6 to choose, q to quit",
        Style::default().add_modifier(Modifier::ITALIC),
    )));
    let p = Paragraph::new(lines).block(Block::default().title("Menu").borders(Borders::ALL));
    f.render_widget(p, area);
}

fn render_save_load(f: &mut Frame, area: Rect, message: Option<&str>) {
    let mut lines = vec![
        Line::raw("1. Save books to file"),
        Line::raw("2. Load books from file"),
        Line::raw("0. Back to main menu"),
    ];
    if let Some(m) = message {
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(m.to_string(), Style::default().fg(Color::Green))));
    }
    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().title("Save / Load Data").borders(Borders::ALL));
    f.render_widget(p, area);
}
