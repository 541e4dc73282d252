use std::{
    fs, io,
    path::{Path, PathBuf},
};

use tracing::warn;

use crate::api::{ClientError, ClientResult, types::User};

/// The logged-in user, kept in a JSON file between runs.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is no session. A file that does not parse is removed
    /// and also treated as no session.
    pub fn load(&self) -> ClientResult<Option<User>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(self.session_error(err)),
        };

        match serde_json::from_str::<User>(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "discarding corrupt session file");
                self.clear()?;
                Ok(None)
            }
        }
    }

    pub fn save(&self, user: &User) -> ClientResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|err| self.session_error(err))?;
        }
        let json = serde_json::to_string_pretty(user)
            .map_err(|err| self.session_error(io::Error::other(err)))?;
        fs::write(&self.path, json).map_err(|err| self.session_error(err))
    }

    pub fn clear(&self) -> ClientResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(self.session_error(err)),
        }
    }

    fn session_error(&self, source: io::Error) -> ClientError {
        ClientError::Session {
            path: self.path.clone(),
            source,
        }
    }
}
