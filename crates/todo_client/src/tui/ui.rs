use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::{
    app::{App, BannerKind, DeleteTarget, Screen},
    forms::{Form, TodoField, TodoForm},
};
use crate::api::types::{Category, Priority, Status, Todo};

pub fn draw(frame: &mut Frame<'_>, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(6),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    frame.render_widget(header(app), chunks[0]);

    match app.screen {
        Screen::Login => frame.render_widget(form_lines("Login", &app.login, &[]), chunks[1]),
        Screen::Register => frame.render_widget(
            form_lines("Register", &app.register, &app.register_errors),
            chunks[1],
        ),
        Screen::Home => draw_board(frame, app, chunks[1]),
        Screen::TodoForm => {
            frame.render_widget(todo_form_lines(&app.todo_form, &app.categories), chunks[1])
        }
        Screen::AddCategory => {
            let lines = vec![
                Line::from("New category"),
                Line::from(format!("> {}", app.category_name.rendered(true, false))),
            ];
            frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), chunks[1]);
        }
        Screen::ConfirmDelete(target) => {
            frame.render_widget(confirm_lines(app, target), chunks[1]);
        }
    }

    frame.render_widget(banner(app), chunks[2]);

    let footer = Paragraph::new(footer_text(app)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[3]);
}

fn header(app: &App) -> Paragraph<'_> {
    let mut spans = vec![Span::styled(
        "Todo Board",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];
    if let Some(user) = app.user.as_ref() {
        let role = if user.is_admin { "admin" } else { "reader" };
        spans.push(Span::raw(format!(
            "  -  Welcome {} ({role})",
            user.display_name()
        )));
    }
    Paragraph::new(Line::from(spans))
}

fn banner(app: &App) -> Paragraph<'_> {
    if app.loading {
        return Paragraph::new("Working...").style(Style::default().fg(Color::Yellow));
    }
    match app.banner.as_ref() {
        Some(banner) => {
            let color = match banner.kind {
                BannerKind::Info => Color::Green,
                BannerKind::Error => Color::Red,
            };
            Paragraph::new(banner.text.as_str()).style(Style::default().fg(color))
        }
        None => Paragraph::new(""),
    }
}

fn footer_text(app: &App) -> &'static str {
    match app.screen {
        Screen::Login => "Enter log in  |  Tab next field  |  Ctrl+R register  |  Esc quit",
        Screen::Register => "Enter submit  |  Tab next field  |  Esc back to login",
        Screen::Home if app.is_admin() => {
            "Up/Down move  Enter select  c category  f status  r refresh  n new  e edit  d delete  a add category  x delete category  l logout  q quit"
        }
        Screen::Home => {
            "Up/Down move  Enter select  c category  f status  r refresh  l logout  q quit"
        }
        Screen::TodoForm => "Enter save  |  Tab next field  |  Left/Right change choice  |  Esc cancel",
        Screen::AddCategory => "Enter add  |  Esc cancel",
        Screen::ConfirmDelete(_) => "y confirm  |  n cancel",
    }
}

fn form_lines<'a>(title: &'a str, form: &'a Form, errors: &'a [String]) -> Paragraph<'a> {
    let mut lines = vec![
        Line::from(Span::styled(title, Style::default().add_modifier(Modifier::BOLD))),
        Line::from(""),
    ];
    for (idx, field) in form.fields.iter().enumerate() {
        let focused = idx == form.focus;
        let label_style = if focused {
            Style::default().fg(Color::Green)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{:<18}", field.label), label_style),
            Span::raw(format!("> {}", field.input.rendered(focused, field.secret))),
        ]));
    }
    if !errors.is_empty() {
        lines.push(Line::from(""));
        for err in errors {
            lines.push(Line::from(Span::styled(
                err.as_str(),
                Style::default().fg(Color::Red),
            )));
        }
    }
    Paragraph::new(lines).wrap(Wrap { trim: true })
}

fn draw_board(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let filter = app.category_name(app.category_filter).unwrap_or("All categories");
    let list_title = format!(" Tasks: {filter} / {} ", app.status_filter.label());
    let visible = app.visible_todos();

    let mut lines = Vec::with_capacity(visible.len().max(1));
    if visible.is_empty() {
        lines.push(Line::from(Span::styled(
            "No tasks here yet",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for (idx, todo) in visible.iter().enumerate() {
        let check = if todo.status == Status::Completed { "[x]" } else { "[ ]" };
        let marker = if app.selected == Some(todo.id) { "*" } else { " " };
        let mut style = Style::default().fg(priority_color(todo.priority));
        if idx == app.cursor {
            style = style.add_modifier(Modifier::REVERSED);
        }
        lines.push(Line::from(Span::styled(
            format!("{marker}{check} {}", todo.title),
            style,
        )));
    }

    let list = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(list_title));
    frame.render_widget(list, columns[0]);

    let detail = match app.selected_todo() {
        Some(todo) => detail_lines(todo, &app.categories),
        None => vec![Line::from(Span::styled(
            "Select a task to see its details",
            Style::default().fg(Color::DarkGray),
        ))],
    };
    let detail = Paragraph::new(detail)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Details "));
    frame.render_widget(detail, columns[1]);
}

fn detail_lines<'a>(todo: &'a Todo, categories: &'a [Category]) -> Vec<Line<'a>> {
    let category = todo
        .category_id
        .and_then(|id| categories.iter().find(|category| category.id == id))
        .map(|category| category.name.as_str())
        .unwrap_or("None");
    let due = todo
        .due_date
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "None".to_string());

    vec![
        Line::from(Span::styled(
            todo.title.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(todo.description.as_deref().unwrap_or("No description")),
        Line::from(""),
        Line::from(format!("Due:      {due}")),
        Line::from(vec![
            Span::raw("Priority: "),
            Span::styled(
                todo.priority.label(),
                Style::default().fg(priority_color(todo.priority)),
            ),
        ]),
        Line::from(format!("Status:   {}", todo.status)),
        Line::from(format!("Category: {category}")),
    ]
}

fn todo_form_lines<'a>(form: &'a TodoForm, categories: &'a [Category]) -> Paragraph<'a> {
    let title = if form.editing.is_some() {
        "Edit task"
    } else {
        "New task"
    };
    let mut lines = vec![
        Line::from(Span::styled(title, Style::default().add_modifier(Modifier::BOLD))),
        Line::from(""),
    ];
    for field in TodoField::ALL {
        let focused = form.focus == field;
        let value = match field {
            TodoField::Title => form.title.rendered(focused, false),
            TodoField::Description => form.description.rendered(focused, false),
            TodoField::DueDate => form.due_date.rendered(focused, false),
            TodoField::Priority => format!("< {} >", form.priority),
            TodoField::Status => format!("< {} >", form.status),
            TodoField::Category => {
                let name = form
                    .category_id
                    .and_then(|id| categories.iter().find(|category| category.id == id))
                    .map(|category| category.name.as_str())
                    .unwrap_or("None");
                format!("< {name} >")
            }
        };
        let label_style = if focused {
            Style::default().fg(Color::Green)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{:<22}", field.label()), label_style),
            Span::raw(format!("> {value}")),
        ]));
    }
    Paragraph::new(lines).wrap(Wrap { trim: true })
}

fn confirm_lines(app: &App, target: DeleteTarget) -> Paragraph<'_> {
    let question = match target {
        DeleteTarget::Todo(id) => {
            let title = app
                .todos
                .iter()
                .find(|todo| todo.id == id)
                .map(|todo| todo.title.as_str())
                .unwrap_or("this task");
            format!("Delete \"{title}\"?")
        }
        DeleteTarget::Category(id) => {
            let name = app.category_name(Some(id)).unwrap_or("this category");
            format!("Delete category \"{name}\"? Its tasks are kept without a category.")
        }
    };
    Paragraph::new(vec![
        Line::from(Span::styled(question, Style::default().fg(Color::Red))),
        Line::from(""),
        Line::from("Press y to delete or n to cancel."),
    ])
    .wrap(Wrap { trim: true })
}

fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::Low => Color::Green,
        Priority::Medium => Color::Yellow,
        Priority::High => Color::Red,
    }
}
