use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use uuid::Uuid;

use super::{
    forms::{Form, TodoForm, validate_registration},
    input::TextInput,
};
use crate::api::types::{Category, NewCategory, Registration, Status, Todo, TodoInput, User};

const LOGIN_USERNAME: usize = 0;
const LOGIN_PASSWORD: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Register,
    Home,
    TodoForm,
    AddCategory,
    ConfirmDelete(DeleteTarget),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteTarget {
    Todo(Uuid),
    Category(Uuid),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl StatusFilter {
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Active => "Active",
            Self::Completed => "Completed",
        }
    }

    fn next(self) -> Self {
        match self {
            Self::All => Self::Active,
            Self::Active => Self::Completed,
            Self::Completed => Self::All,
        }
    }

    fn matches(self, todo: &Todo) -> bool {
        match self {
            Self::All => true,
            Self::Active => todo.status != Status::Completed,
            Self::Completed => todo.status == Status::Completed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BannerKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub text: String,
}

/// Work the app asks the runner to do against the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login { identifier: String, password: String },
    Register(Registration),
    LoadBoard,
    /// Fetches one todo so the detail pane shows the stored copy.
    LoadTodo(Uuid),
    SaveTodo { id: Option<Uuid>, input: TodoInput },
    DeleteTodo(Uuid),
    CreateCategory(NewCategory),
    DeleteCategory(Uuid),
    Logout,
    Quit,
}

/// What came back from running a [`Command`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    LoggedIn(User),
    Registered { username: String },
    BoardLoaded { todos: Vec<Todo>, categories: Vec<Category> },
    TodoLoaded(Todo),
    TodoSaved(Todo),
    TodoDeleted { id: Uuid, message: String },
    CategoryCreated(Category),
    CategoryDeleted(Uuid),
    LoggedOut,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct App {
    pub screen: Screen,
    pub user: Option<User>,
    pub todos: Vec<Todo>,
    pub categories: Vec<Category>,
    /// Todo shown in the detail pane.
    pub selected: Option<Uuid>,
    /// Highlighted row of the visible list.
    pub cursor: usize,
    pub category_filter: Option<Uuid>,
    pub status_filter: StatusFilter,
    pub login: Form,
    pub register: Form,
    pub register_errors: Vec<String>,
    pub todo_form: TodoForm,
    pub category_name: TextInput,
    pub banner: Option<Banner>,
    pub loading: bool,
}

impl App {
    /// Starts on the board when a session was restored.
    pub fn new(user: Option<User>) -> Self {
        let screen = if user.is_some() {
            Screen::Home
        } else {
            Screen::Login
        };
        Self {
            screen,
            user,
            todos: Vec::new(),
            categories: Vec::new(),
            selected: None,
            cursor: 0,
            category_filter: None,
            status_filter: StatusFilter::default(),
            login: Form::login(),
            register: Form::register(),
            register_errors: Vec::new(),
            todo_form: TodoForm::default(),
            category_name: TextInput::default(),
            banner: None,
            loading: false,
        }
    }

    pub fn startup_command(&self) -> Option<Command> {
        self.user.as_ref().map(|_| Command::LoadBoard)
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|user| user.is_admin)
    }

    pub fn visible_todos(&self) -> Vec<&Todo> {
        self.todos
            .iter()
            .filter(|todo| {
                self.category_filter
                    .is_none_or(|category_id| todo.category_id == Some(category_id))
            })
            .filter(|todo| self.status_filter.matches(todo))
            .collect()
    }

    pub fn selected_todo(&self) -> Option<&Todo> {
        let id = self.selected?;
        self.todos.iter().find(|todo| todo.id == id)
    }

    pub fn category_name(&self, id: Option<Uuid>) -> Option<&str> {
        let id = id?;
        self.categories
            .iter()
            .find(|category| category.id == id)
            .map(|category| category.name.as_str())
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Command> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(Command::Quit);
        }
        if self.loading {
            return None;
        }

        match self.screen {
            Screen::Login => self.login_key(key),
            Screen::Register => self.register_key(key),
            Screen::Home => self.home_key(key),
            Screen::TodoForm => self.todo_form_key(key),
            Screen::AddCategory => self.add_category_key(key),
            Screen::ConfirmDelete(target) => self.confirm_key(key, target),
        }
    }

    /// Folds a finished command back into the state. May ask for a follow-up.
    pub fn apply(&mut self, outcome: Outcome) -> Option<Command> {
        self.loading = false;
        match outcome {
            Outcome::LoggedIn(user) => {
                self.info(format!("Welcome {}! Login successful.", user.display_name()));
                self.user = Some(user);
                self.login = Form::login();
                self.screen = Screen::Home;
                return Some(Command::LoadBoard);
            }
            Outcome::Registered { username } => {
                self.register = Form::register();
                self.register_errors.clear();
                self.login = Form::login();
                self.login.set_value(LOGIN_USERNAME, &username);
                self.login.focus = LOGIN_PASSWORD;
                self.screen = Screen::Login;
                self.info("Registration successful! Please log in.");
            }
            Outcome::BoardLoaded { todos, categories } => {
                self.todos = todos;
                self.categories = categories;
                if self.selected_todo().is_none() {
                    self.selected = None;
                }
                if self.category_name(self.category_filter).is_none() {
                    self.category_filter = None;
                }
                self.clamp_cursor();
            }
            Outcome::TodoLoaded(todo) => self.upsert_todo(todo),
            Outcome::TodoSaved(todo) => {
                self.selected = Some(todo.id);
                self.upsert_todo(todo);
                self.screen = Screen::Home;
                self.info("Task saved");
            }
            Outcome::TodoDeleted { id, message } => {
                self.todos.retain(|todo| todo.id != id);
                if self.selected == Some(id) {
                    self.selected = None;
                }
                self.screen = Screen::Home;
                self.clamp_cursor();
                self.info(message);
            }
            Outcome::CategoryCreated(category) => {
                self.category_filter = Some(category.id);
                self.categories.push(category);
                self.category_name.clear();
                self.screen = Screen::Home;
                self.clamp_cursor();
                self.info("Category added");
            }
            Outcome::CategoryDeleted(id) => {
                self.categories.retain(|category| category.id != id);
                for todo in self.todos.iter_mut().filter(|todo| todo.category_id == Some(id)) {
                    todo.category_id = None;
                }
                if self.category_filter == Some(id) {
                    self.category_filter = None;
                }
                self.screen = Screen::Home;
                self.clamp_cursor();
                self.info("Category deleted");
            }
            Outcome::LoggedOut => {
                *self = Self::new(None);
                self.info("Logged out");
            }
            Outcome::Failed(message) => {
                if matches!(self.screen, Screen::ConfirmDelete(_)) {
                    self.screen = Screen::Home;
                }
                self.error(message);
            }
        }
        None
    }

    fn login_key(&mut self, key: KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Esc => Some(Command::Quit),
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.banner = None;
                self.screen = Screen::Register;
                None
            }
            KeyCode::Enter => {
                let identifier = self.login.value(LOGIN_USERNAME).trim().to_string();
                let password = self.login.value(LOGIN_PASSWORD).to_string();
                if identifier.is_empty() || password.is_empty() {
                    self.error("Username and password are required!");
                    return None;
                }
                self.begin();
                Some(Command::Login {
                    identifier,
                    password,
                })
            }
            _ => {
                self.login.handle_key(key);
                None
            }
        }
    }

    fn register_key(&mut self, key: KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Esc => {
                self.register_errors.clear();
                self.screen = Screen::Login;
                None
            }
            KeyCode::Enter => {
                let registration = self.register.registration();
                self.register_errors = validate_registration(&registration);
                if !self.register_errors.is_empty() {
                    return None;
                }
                self.begin();
                Some(Command::Register(registration))
            }
            _ => {
                self.register.handle_key(key);
                None
            }
        }
    }

    fn home_key(&mut self, key: KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor = self.cursor.saturating_sub(1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.cursor = (self.cursor + 1).min(self.visible_todos().len().saturating_sub(1));
                None
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.toggle_selection(),
            KeyCode::Char('c') => {
                self.cycle_category_filter();
                None
            }
            KeyCode::Char('f') => {
                self.status_filter = self.status_filter.next();
                self.clamp_cursor();
                None
            }
            KeyCode::Char('r') => {
                self.begin();
                Some(Command::LoadBoard)
            }
            KeyCode::Char('l') => {
                self.begin();
                Some(Command::Logout)
            }
            KeyCode::Char(ch @ ('n' | 'e' | 'd' | 'a' | 'x')) => {
                if !self.is_admin() {
                    self.error("Only admins can change tasks and categories");
                    return None;
                }
                self.admin_action(ch);
                None
            }
            _ => None,
        }
    }

    fn admin_action(&mut self, action: char) {
        self.banner = None;
        match action {
            'n' => {
                self.todo_form = TodoForm::create(self.category_filter);
                self.screen = Screen::TodoForm;
            }
            'e' => match self.selected_todo() {
                Some(todo) => {
                    self.todo_form = TodoForm::edit(todo);
                    self.screen = Screen::TodoForm;
                }
                None => self.error("Please select a task to edit"),
            },
            'd' => match self.selected {
                Some(id) => self.screen = Screen::ConfirmDelete(DeleteTarget::Todo(id)),
                None => self.error("Please select a task to delete"),
            },
            'a' => {
                self.category_name.clear();
                self.screen = Screen::AddCategory;
            }
            'x' => match self.category_filter {
                Some(id) => self.screen = Screen::ConfirmDelete(DeleteTarget::Category(id)),
                None => self.error("Filter on a category to delete it"),
            },
            _ => {}
        }
    }

    fn todo_form_key(&mut self, key: KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Esc => {
                self.screen = Screen::Home;
                None
            }
            KeyCode::Enter => match self.todo_form.to_input() {
                Ok(input) => {
                    self.begin();
                    Some(Command::SaveTodo {
                        id: self.todo_form.editing,
                        input,
                    })
                }
                Err(message) => {
                    self.error(message);
                    None
                }
            },
            _ => {
                self.todo_form.handle_key(key, &self.categories);
                None
            }
        }
    }

    fn add_category_key(&mut self, key: KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Esc => {
                self.screen = Screen::Home;
                None
            }
            KeyCode::Enter => {
                if self.category_name.is_blank() {
                    self.error("Category name is required");
                    return None;
                }
                let category = NewCategory {
                    name: self.category_name.value().trim().to_string(),
                    user_id: self.user.as_ref().map(|user| user.id),
                };
                self.begin();
                Some(Command::CreateCategory(category))
            }
            _ => {
                self.category_name.handle_key(key);
                None
            }
        }
    }

    fn confirm_key(&mut self, key: KeyEvent, target: DeleteTarget) -> Option<Command> {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                self.begin();
                Some(match target {
                    DeleteTarget::Todo(id) => Command::DeleteTodo(id),
                    DeleteTarget::Category(id) => Command::DeleteCategory(id),
                })
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                self.screen = Screen::Home;
                None
            }
            _ => None,
        }
    }

    /// Opening a todo refreshes it in the background; the list stays usable.
    fn toggle_selection(&mut self) -> Option<Command> {
        let id = self.visible_todos().get(self.cursor).map(|todo| todo.id)?;
        if self.selected == Some(id) {
            self.selected = None;
            return None;
        }
        self.selected = Some(id);
        Some(Command::LoadTodo(id))
    }

    fn upsert_todo(&mut self, todo: Todo) {
        match self.todos.iter_mut().find(|existing| existing.id == todo.id) {
            Some(existing) => *existing = todo,
            None => self.todos.push(todo),
        }
    }

    fn cycle_category_filter(&mut self) {
        let ids: Vec<Option<Uuid>> = std::iter::once(None)
            .chain(self.categories.iter().map(|category| Some(category.id)))
            .collect();
        let idx = ids
            .iter()
            .position(|id| *id == self.category_filter)
            .unwrap_or(0);
        self.category_filter = ids[(idx + 1) % ids.len()];
        self.clamp_cursor();
    }

    fn clamp_cursor(&mut self) {
        let len = self.visible_todos().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    fn begin(&mut self) {
        self.loading = true;
        self.banner = None;
    }

    fn info(&mut self, text: impl Into<String>) {
        self.banner = Some(Banner {
            kind: BannerKind::Info,
            text: text.into(),
        });
    }

    fn error(&mut self, text: impl Into<String>) {
        self.banner = Some(Banner {
            kind: BannerKind::Error,
            text: text.into(),
        });
    }
}
