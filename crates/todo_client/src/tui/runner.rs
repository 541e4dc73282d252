use std::{io, time::Duration};

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use tracing::{info, warn};

use super::{
    app::{App, Command, Outcome},
    ui,
};
use crate::{
    api::{ApiClient, ClientError},
    session::SessionStore,
};

const POLL_INTERVAL: Duration = Duration::from_millis(120);

struct TuiCleanup;

impl Drop for TuiCleanup {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen, cursor::Show);
    }
}

/// Runs one command against the API. Session bookkeeping happens here so
/// the app state stays free of IO. Returns `None` for [`Command::Quit`].
pub async fn perform(
    api: &ApiClient,
    session: &SessionStore,
    command: Command,
) -> Option<Outcome> {
    let result = match command {
        Command::Login {
            identifier,
            password,
        } => login(api, session, &identifier, &password).await,
        Command::Register(registration) => api
            .register(&registration)
            .await
            .map(|user_id| {
                info!(%user_id, "registered");
                Outcome::Registered {
                    username: registration.username.trim().to_string(),
                }
            }),
        Command::LoadBoard => tokio::try_join!(api.list_todos(), api.list_categories())
            .map(|(todos, categories)| Outcome::BoardLoaded { todos, categories }),
        Command::LoadTodo(id) => api.get_todo(id).await.map(Outcome::TodoLoaded),
        Command::SaveTodo { id: Some(id), input } => {
            api.update_todo(id, &input).await.map(Outcome::TodoSaved)
        }
        Command::SaveTodo { id: None, input } => {
            api.create_todo(&input).await.map(Outcome::TodoSaved)
        }
        Command::DeleteTodo(id) => api
            .delete_todo(id)
            .await
            .map(|message| Outcome::TodoDeleted { id, message }),
        Command::CreateCategory(category) => api
            .create_category(&category)
            .await
            .map(Outcome::CategoryCreated),
        Command::DeleteCategory(id) => api
            .delete_category(id)
            .await
            .map(|()| Outcome::CategoryDeleted(id)),
        Command::Logout => session.clear().map(|()| Outcome::LoggedOut),
        Command::Quit => return None,
    };

    Some(result.unwrap_or_else(|err| {
        warn!(error = %err, "request failed");
        Outcome::Failed(err.to_string())
    }))
}

async fn login(
    api: &ApiClient,
    session: &SessionStore,
    identifier: &str,
    password: &str,
) -> Result<Outcome, ClientError> {
    let user = api.login(identifier, password).await?;
    if let Err(err) = session.save(&user) {
        warn!(error = %err, "could not persist session");
    }
    info!(user_id = %user.id, "logged in");
    Ok(Outcome::LoggedIn(user))
}

/// Drives the terminal until the user quits.
pub async fn run(api: ApiClient, session: SessionStore) -> Result<()> {
    let user = session.load().context("failed to read session file")?;
    let mut app = App::new(user);

    let mut stdout = io::stdout();
    enable_raw_mode().context("failed to enable raw mode")?;
    execute!(stdout, EnterAlternateScreen, cursor::Hide).context("failed to init tui")?;
    let _cleanup = TuiCleanup;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
    terminal.clear().ok();

    let mut pending = app.startup_command();
    if pending.is_some() {
        app.loading = true;
    }

    loop {
        terminal.draw(|frame| ui::draw(frame, &app))?;

        if let Some(command) = pending.take() {
            let Some(outcome) = perform(&api, &session, command).await else {
                break;
            };
            pending = app.apply(outcome);
            if pending.is_some() {
                app.loading = true;
            }
            continue;
        }

        if event::poll(POLL_INTERVAL)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            pending = app.handle_key(key);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tempfile::TempDir;
    use uuid::Uuid;

    use super::perform;
    use crate::api::{ApiClient, ClientConfig};
    use crate::session::SessionStore;
    use crate::tui::app::{Command, Outcome};

    #[tokio::test]
    async fn logout_clears_the_session_without_the_network() {
        let dir = TempDir::new().expect("temp dir should be created");
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{}").expect("session file should be written");
        let session = SessionStore::new(&path);
        let api = ApiClient::new(&ClientConfig::new("http://127.0.0.1:9", Duration::from_secs(1)))
            .expect("client should build");

        let outcome = perform(&api, &session, Command::Logout).await;
        assert_eq!(outcome, Some(Outcome::LoggedOut));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn quit_needs_no_request() {
        let dir = TempDir::new().expect("temp dir should be created");
        let session = SessionStore::new(dir.path().join("session.json"));
        let api = ApiClient::new(&ClientConfig::new("http://127.0.0.1:9", Duration::from_secs(1)))
            .expect("client should build");

        assert_eq!(perform(&api, &session, Command::Quit).await, None);
    }

    #[tokio::test]
    async fn unreachable_server_is_reported_as_failure() {
        let dir = TempDir::new().expect("temp dir should be created");
        let session = SessionStore::new(dir.path().join("session.json"));
        let api = ApiClient::new(&ClientConfig::new("http://127.0.0.1:9", Duration::from_secs(1)))
            .expect("client should build");

        let outcome = perform(&api, &session, Command::DeleteTodo(Uuid::new_v4())).await;
        assert!(matches!(outcome, Some(Outcome::Failed(_))));
    }
}
