use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent};
use uuid::Uuid;

use super::input::TextInput;
use crate::api::types::{Category, Priority, Registration, Status, Todo, TodoInput};

#[derive(Debug, Clone)]
pub struct Field {
    pub label: &'static str,
    pub input: TextInput,
    pub secret: bool,
}

/// A vertical list of text fields; Tab and the arrow keys move focus.
#[derive(Debug, Clone)]
pub struct Form {
    pub fields: Vec<Field>,
    pub focus: usize,
}

impl Form {
    fn new(specs: &[(&'static str, bool)]) -> Self {
        Self {
            fields: specs
                .iter()
                .map(|&(label, secret)| Field {
                    label,
                    input: TextInput::default(),
                    secret,
                })
                .collect(),
            focus: 0,
        }
    }

    pub fn login() -> Self {
        Self::new(&[("Username or email", false), ("Password", true)])
    }

    pub fn register() -> Self {
        Self::new(&[
            ("First name", false),
            ("Last name", false),
            ("Email", false),
            ("City", false),
            ("Zip code", false),
            ("Username", false),
            ("Password", true),
        ])
    }

    pub fn value(&self, idx: usize) -> &str {
        self.fields
            .get(idx)
            .map(|field| field.input.value())
            .unwrap_or_default()
    }

    pub fn set_value(&mut self, idx: usize, value: &str) {
        if let Some(field) = self.fields.get_mut(idx) {
            field.input = TextInput::with_value(value);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab | KeyCode::Down => self.focus = (self.focus + 1) % self.fields.len(),
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = (self.focus + self.fields.len() - 1) % self.fields.len()
            }
            _ => {
                if let Some(field) = self.fields.get_mut(self.focus) {
                    field.input.handle_key(key);
                }
            }
        }
    }

    pub fn registration(&self) -> Registration {
        Registration {
            first_name: self.value(0).trim().to_string(),
            last_name: self.value(1).trim().to_string(),
            email: self.value(2).trim().to_string(),
            city: self.value(3).trim().to_string(),
            zip_code: self.value(4).trim().to_string(),
            username: self.value(5).trim().to_string(),
            password: self.value(6).to_string(),
            is_admin: false,
        }
    }
}

/// Every problem with a registration, in form order. Empty means valid.
pub fn validate_registration(reg: &Registration) -> Vec<String> {
    let mut errors = Vec::new();
    errors.extend(check_name("First name", &reg.first_name));
    errors.extend(check_name("Last name", &reg.last_name));
    errors.extend(check_email(&reg.email));
    if reg.city.is_empty() {
        errors.push("City is required".to_string());
    }
    errors.extend(check_zip(&reg.zip_code));
    errors.extend(check_username(&reg.username));
    errors.extend(check_password(&reg.password));
    errors
}

fn check_name(label: &str, value: &str) -> Option<String> {
    if value.is_empty() {
        Some(format!("{label} is required"))
    } else if value.chars().any(|ch| ch.is_ascii_digit()) {
        Some(format!("{label} should not contain numbers"))
    } else {
        None
    }
}

fn check_email(email: &str) -> Option<String> {
    if email.is_empty() {
        return Some("Email is required".to_string());
    }
    match (email.find('@'), email.rfind('.')) {
        (Some(at), Some(dot)) if at < dot => None,
        _ => Some("Invalid email format".to_string()),
    }
}

fn check_zip(zip: &str) -> Option<String> {
    if zip.is_empty() {
        Some("Zip code is required".to_string())
    } else if !zip.chars().all(|ch| ch.is_ascii_digit()) {
        Some("Zip code must be numeric only".to_string())
    } else {
        None
    }
}

fn check_username(username: &str) -> Option<String> {
    let message = match username.chars().next() {
        None => "Username is required",
        Some(_) if username.contains(' ') => "Username must not contain spaces",
        Some(first) if first.is_ascii_digit() || !(first.is_alphanumeric() || first == '_') => {
            "Username must not start with a number or special character"
        }
        Some(_) => return None,
    };
    Some(message.to_string())
}

fn check_password(password: &str) -> Option<String> {
    let message = if password.is_empty() {
        "Password is required"
    } else if password.chars().count() < 10 {
        "Password must be at least 10 characters long"
    } else if !password.chars().any(|ch| ch.is_ascii_uppercase()) {
        "Password must contain at least one uppercase letter"
    } else if !password.chars().any(|ch| ch.is_ascii_lowercase()) {
        "Password must contain at least one lowercase letter"
    } else if !password.chars().any(|ch| ch.is_ascii_digit()) {
        "Password must contain at least one digit"
    } else {
        return None;
    };
    Some(message.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoField {
    Title,
    Description,
    DueDate,
    Priority,
    Status,
    Category,
}

impl TodoField {
    pub const ALL: [TodoField; 6] = [
        Self::Title,
        Self::Description,
        Self::DueDate,
        Self::Priority,
        Self::Status,
        Self::Category,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Description => "Description",
            Self::DueDate => "Due date (YYYY-MM-DD)",
            Self::Priority => "Priority",
            Self::Status => "Status",
            Self::Category => "Category",
        }
    }

    fn shifted(self, delta: isize) -> Self {
        let idx = Self::ALL.iter().position(|field| *field == self).unwrap_or(0);
        Self::ALL[shift_index(idx, Self::ALL.len(), delta)]
    }
}

/// Create/edit form for a todo. `editing` holds the id being replaced.
#[derive(Debug, Clone)]
pub struct TodoForm {
    pub editing: Option<Uuid>,
    pub title: TextInput,
    pub description: TextInput,
    pub due_date: TextInput,
    pub priority: Priority,
    pub status: Status,
    pub category_id: Option<Uuid>,
    pub focus: TodoField,
}

impl Default for TodoForm {
    fn default() -> Self {
        Self {
            editing: None,
            title: TextInput::default(),
            description: TextInput::default(),
            due_date: TextInput::default(),
            priority: Priority::default(),
            status: Status::default(),
            category_id: None,
            focus: TodoField::Title,
        }
    }
}

impl TodoForm {
    /// A blank form, preset to the category currently filtered on.
    pub fn create(category_id: Option<Uuid>) -> Self {
        Self {
            category_id,
            ..Self::default()
        }
    }

    pub fn edit(todo: &Todo) -> Self {
        Self {
            editing: Some(todo.id),
            title: TextInput::with_value(todo.title.clone()),
            description: TextInput::with_value(todo.description.clone().unwrap_or_default()),
            due_date: TextInput::with_value(
                todo.due_date.map(|date| date.to_string()).unwrap_or_default(),
            ),
            priority: todo.priority,
            status: todo.status,
            category_id: todo.category_id,
            focus: TodoField::Title,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, categories: &[Category]) {
        match key.code {
            KeyCode::Tab | KeyCode::Down => self.focus = self.focus.shifted(1),
            KeyCode::BackTab | KeyCode::Up => self.focus = self.focus.shifted(-1),
            KeyCode::Left | KeyCode::Right if self.is_choice_focused() => {
                let delta = if key.code == KeyCode::Left { -1 } else { 1 };
                self.cycle_choice(delta, categories);
            }
            _ => {
                if let Some(input) = self.focused_input() {
                    input.handle_key(key);
                }
            }
        }
    }

    pub fn to_input(&self) -> Result<TodoInput, String> {
        let title = self.title.value().trim();
        if title.is_empty() {
            return Err("Please enter a title for the task".to_string());
        }
        let due_date = match self.due_date.value().trim() {
            "" => None,
            raw => Some(
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .map_err(|_| "Due date must look like 2026-01-31".to_string())?,
            ),
        };
        let description = Some(self.description.value().trim())
            .filter(|text| !text.is_empty())
            .map(str::to_string);

        Ok(TodoInput {
            title: title.to_string(),
            description,
            due_date,
            priority: self.priority,
            status: self.status,
            category_id: self.category_id,
        })
    }

    fn is_choice_focused(&self) -> bool {
        matches!(
            self.focus,
            TodoField::Priority | TodoField::Status | TodoField::Category
        )
    }

    fn focused_input(&mut self) -> Option<&mut TextInput> {
        match self.focus {
            TodoField::Title => Some(&mut self.title),
            TodoField::Description => Some(&mut self.description),
            TodoField::DueDate => Some(&mut self.due_date),
            _ => None,
        }
    }

    fn cycle_choice(&mut self, delta: isize, categories: &[Category]) {
        match self.focus {
            TodoField::Priority => self.priority = cycle(&Priority::ALL, self.priority, delta),
            TodoField::Status => self.status = cycle(&Status::ALL, self.status, delta),
            TodoField::Category => {
                // None sits in front of the category list
                let options: Vec<Option<Uuid>> = std::iter::once(None)
                    .chain(categories.iter().map(|category| Some(category.id)))
                    .collect();
                self.category_id = cycle(&options, self.category_id, delta);
            }
            _ => {}
        }
    }
}

fn cycle<T: Copy + PartialEq>(options: &[T], current: T, delta: isize) -> T {
    let idx = options.iter().position(|option| *option == current).unwrap_or(0);
    options
        .get(shift_index(idx, options.len(), delta))
        .copied()
        .unwrap_or(current)
}

fn shift_index(current: usize, len: usize, delta: isize) -> usize {
    if len == 0 {
        return 0;
    }
    (current as isize + delta).rem_euclid(len as isize) as usize
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use uuid::Uuid;

    use super::{TodoField, TodoForm, validate_registration};
    use crate::api::types::{Category, Priority, Registration};

    fn valid() -> Registration {
        Registration {
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            email: "grace@example.com".to_string(),
            city: "Arlington".to_string(),
            zip_code: "22201".to_string(),
            username: "grace".to_string(),
            password: "Compiler1952".to_string(),
            is_admin: false,
        }
    }

    #[test]
    fn a_complete_registration_passes() {
        assert!(validate_registration(&valid()).is_empty());
    }

    #[test]
    fn weak_passwords_are_rejected() {
        for (password, expected) in [
            ("Short1", "Password must be at least 10 characters long"),
            ("alllowercase1", "Password must contain at least one uppercase letter"),
            ("ALLUPPERCASE1", "Password must contain at least one lowercase letter"),
            ("NoDigitsHere", "Password must contain at least one digit"),
        ] {
            let reg = Registration {
                password: password.to_string(),
                ..valid()
            };
            assert_eq!(validate_registration(&reg), vec![expected.to_string()]);
        }
    }

    #[test]
    fn malformed_emails_are_rejected() {
        for email in ["grace.example.com", "grace@example", "first.last@example"] {
            let reg = Registration {
                email: email.to_string(),
                ..valid()
            };
            assert_eq!(
                validate_registration(&reg),
                vec!["Invalid email format".to_string()],
                "{email}"
            );
        }
    }

    #[test]
    fn names_zip_and_username_rules() {
        let reg = Registration {
            first_name: "Gr4ce".to_string(),
            zip_code: "22-201".to_string(),
            username: "9lives".to_string(),
            ..valid()
        };
        assert_eq!(
            validate_registration(&reg),
            vec![
                "First name should not contain numbers".to_string(),
                "Zip code must be numeric only".to_string(),
                "Username must not start with a number or special character".to_string(),
            ]
        );

        let spaced = Registration {
            username: "grace hopper".to_string(),
            ..valid()
        };
        assert_eq!(
            validate_registration(&spaced),
            vec!["Username must not contain spaces".to_string()]
        );
    }

    #[test]
    fn category_choice_cycles_through_none() {
        let categories = vec![Category {
            id: Uuid::new_v4(),
            name: "Work".to_string(),
            user_id: None,
        }];
        let mut form = TodoForm {
            focus: TodoField::Category,
            ..TodoForm::default()
        };
        let right = KeyEvent::new(KeyCode::Right, KeyModifiers::NONE);

        form.handle_key(right, &categories);
        assert_eq!(form.category_id, Some(categories[0].id));
        form.handle_key(right, &categories);
        assert_eq!(form.category_id, None);
    }

    #[test]
    fn form_requires_a_title_and_a_real_date() {
        let mut form = TodoForm::default();
        assert_eq!(
            form.to_input(),
            Err("Please enter a title for the task".to_string())
        );

        form.title = super::TextInput::with_value("Taxes");
        form.due_date = super::TextInput::with_value("April 15");
        assert!(form.to_input().is_err());

        form.due_date = super::TextInput::with_value("2026-04-15");
        form.priority = Priority::High;
        let input = form.to_input().expect("form should be valid");
        assert_eq!(input.due_date.map(|d| d.to_string()).as_deref(), Some("2026-04-15"));
        assert_eq!(input.description, None);
    }
}
