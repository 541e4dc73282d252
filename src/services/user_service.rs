use sea_orm::Set;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::{hash_password, verify_password},
    db::dao::{DaoBase, Registration, UserDao},
    db::entities::user,
    error::AppError,
    services::crud_service::{CrudErrors, CrudOp, CrudService},
};

const INVALID_CREDENTIALS: &str = "Invalid credentials";
const USER_EXISTS: &str = "User already exists";
const IDENTITY_IN_USE: &str = "Email or username already in use";

/// Profile columns shared by registration and updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub city: String,
    pub zip_code: String,
    pub username: String,
    pub is_admin: bool,
}

impl UserProfile {
    /// Trims every field and checks the ones that identify a person.
    pub fn normalized(self) -> Result<Self, AppError> {
        let profile = Self {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            city: self.city.trim().to_string(),
            zip_code: self.zip_code.trim().to_string(),
            username: self.username.trim().to_string(),
            is_admin: self.is_admin,
        };

        if profile.first_name.is_empty() || profile.last_name.is_empty() {
            return Err(AppError::bad_request("First and last name are required"));
        }
        if !looks_like_email(&profile.email) {
            return Err(AppError::bad_request("A valid email is required"));
        }
        if profile.username.is_empty() || profile.username.chars().any(char::is_whitespace) {
            return Err(AppError::bad_request(
                "Username is required and must not contain spaces",
            ));
        }
        Ok(profile)
    }

    fn write_to(self, active: &mut user::ActiveModel) {
        active.first_name = Set(self.first_name);
        active.last_name = Set(self.last_name);
        active.email = Set(self.email);
        active.city = Set(self.city);
        active.zip_code = Set(self.zip_code);
        active.username = Set(self.username);
        active.is_admin = Set(self.is_admin);
    }
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    }
}

#[derive(Clone, Copy, Debug)]
enum Lookup {
    Username,
    Email,
}

#[derive(Clone)]
pub struct UserService {
    user_dao: UserDao,
}

impl UserService {
    pub fn new(user_dao: UserDao) -> Self {
        Self { user_dao }
    }

    pub async fn list(&self) -> Result<Vec<user::Model>, AppError> {
        CrudService::list_all(self).await
    }

    pub async fn get(&self, id: Uuid) -> Result<user::Model, AppError> {
        CrudService::find_by_id(self, id).await
    }

    /// Creates the user unless the email or username is taken.
    pub async fn register(
        &self,
        profile: UserProfile,
        password: &str,
    ) -> Result<user::Model, AppError> {
        let profile = profile.normalized()?;
        let password_hash = hash_password(password)?;

        let mut active = user::ActiveModel {
            password_hash: Set(password_hash),
            ..Default::default()
        };
        profile.write_to(&mut active);

        match self.user_dao.register(active).await {
            Ok(Registration::Created(user)) => {
                info!(user_id = %user.id, username = %user.username, "user registered");
                Ok(user)
            }
            Ok(Registration::AlreadyExists) => {
                warn!("registration rejected: email or username taken");
                Err(AppError::conflict(USER_EXISTS))
            }
            Err(err) => Err(self.map_error(CrudOp::Create, err)),
        }
    }

    /// Accepts a username or an email. Identifiers without `@` are tried as
    /// a username first and then as an email.
    pub async fn login(&self, identifier: &str, password: &str) -> Result<user::Model, AppError> {
        let identifier = identifier.trim();
        let lookups: &[Lookup] = if identifier.contains('@') {
            &[Lookup::Email]
        } else {
            &[Lookup::Username, Lookup::Email]
        };

        for lookup in lookups {
            let found = match lookup {
                Lookup::Username => self.user_dao.find_by_username(identifier).await,
                Lookup::Email => self.user_dao.find_by_email(identifier).await,
            }
            .map_err(|err| self.map_error(CrudOp::Find, err))?;

            if let Some(user) = found
                && verify_password(password, &user.password_hash)?
            {
                info!(user_id = %user.id, ?lookup, "login succeeded");
                return Ok(user);
            }
        }

        warn!("login failed for supplied identifier");
        Err(AppError::unauthorized(INVALID_CREDENTIALS))
    }

    /// Replaces the profile; a `Some` password is re-hashed.
    pub async fn update(
        &self,
        id: Uuid,
        profile: UserProfile,
        password: Option<&str>,
    ) -> Result<user::Model, AppError> {
        let profile = profile.normalized()?;
        self.get(id).await?;

        let conflict = self
            .user_dao
            .find_conflicting(&profile.email, &profile.username, Some(id))
            .await
            .map_err(|err| self.map_error(CrudOp::Find, err))?;
        if conflict.is_some() {
            return Err(AppError::conflict(IDENTITY_IN_USE));
        }

        let password_hash = password.map(hash_password).transpose()?;
        self.user_dao
            .update(id, move |active| {
                profile.write_to(active);
                if let Some(hash) = password_hash {
                    active.password_hash = Set(hash);
                }
            })
            .await
            .map_err(|err| self.map_error(CrudOp::Update, err))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.user_dao
            .delete_detaching_categories(id)
            .await
            .map(|_| ())
            .map_err(|err| self.map_error(CrudOp::Delete, err))
    }
}

impl CrudService for UserService {
    type Dao = UserDao;

    fn dao(&self) -> &Self::Dao {
        &self.user_dao
    }

    fn errors(&self) -> CrudErrors {
        CrudErrors {
            create_failed: "Error creating user",
            find_failed: "Error fetching users",
            not_found: "User not found",
            conflict: USER_EXISTS,
            update_failed: "Error updating user",
            delete_failed: "Error deleting user",
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use uuid::Uuid;

    use super::{UserProfile, UserService};
    use crate::auth::hash_password;
    use crate::db::dao::DaoContext;
    use crate::db::entities::user;
    use crate::error::AppError;

    fn ts() -> chrono::DateTime<chrono::FixedOffset> {
        FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid")
    }

    fn stored_user(username: &str, email: &str, password: &str) -> user::Model {
        let now = ts();
        user::Model {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            email: email.to_string(),
            city: "Arlington".to_string(),
            zip_code: "22201".to_string(),
            username: username.to_string(),
            password_hash: hash_password(password).expect("hash should succeed"),
            is_admin: true,
        }
    }

    fn profile() -> UserProfile {
        UserProfile {
            first_name: " Grace ".to_string(),
            last_name: "Hopper".to_string(),
            email: "grace@example.com".to_string(),
            city: "Arlington".to_string(),
            zip_code: "22201".to_string(),
            username: "grace".to_string(),
            is_admin: false,
        }
    }

    fn service(db: MockDatabase) -> UserService {
        UserService::new(DaoContext::new(&db.into_connection()).user())
    }

    #[tokio::test]
    async fn login_by_username() {
        let user = stored_user("grace", "grace@example.com", "Compiler1952");
        let id = user.id;
        let svc = service(MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[user]]));

        let logged_in = svc
            .login("grace", "Compiler1952")
            .await
            .expect("login should succeed");
        assert_eq!(logged_in.id, id);
    }

    #[tokio::test]
    async fn login_falls_back_to_email_lookup() {
        let user = stored_user("grace", "hopper", "Compiler1952");
        let id = user.id;
        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .append_query_results([[user]]),
        );

        let logged_in = svc
            .login("hopper", "Compiler1952")
            .await
            .expect("fallback should find the email row");
        assert_eq!(logged_in.id, id);
    }

    #[tokio::test]
    async fn login_with_email_skips_username_lookup() {
        let user = stored_user("grace", "grace@example.com", "Compiler1952");
        let svc = service(MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[user]]));

        svc.login("grace@example.com", "Compiler1952")
            .await
            .expect("email login should succeed");
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let user = stored_user("grace", "grace@example.com", "Compiler1952");
        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user]])
                .append_query_results([Vec::<user::Model>::new()]),
        );

        let err = svc
            .login("grace", "wrong-password")
            .await
            .expect_err("login should fail");
        assert_eq!(err, AppError::unauthorized("Invalid credentials"));
    }

    #[tokio::test]
    async fn register_conflict_maps_to_409() {
        let existing = stored_user("grace", "grace@example.com", "Compiler1952");
        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[existing]]),
        );

        let err = svc
            .register(profile(), "Compiler1952")
            .await
            .expect_err("duplicate should be rejected");
        assert_eq!(err, AppError::conflict("User already exists"));
    }

    #[tokio::test]
    async fn register_validates_before_touching_the_database() {
        let svc = service(MockDatabase::new(DatabaseBackend::Postgres));
        let mut bad = profile();
        bad.email = "not-an-email".to_string();

        let err = svc
            .register(bad, "Compiler1952")
            .await
            .expect_err("invalid email should be rejected");
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn profile_is_trimmed() {
        let normalized = profile().normalized().expect("profile should be valid");
        assert_eq!(normalized.first_name, "Grace");
    }

    #[tokio::test]
    async fn update_missing_user_is_not_found() {
        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()]),
        );

        let err = svc
            .update(Uuid::new_v4(), profile(), None)
            .await
            .expect_err("update should fail");
        assert_eq!(err, AppError::not_found("User not found"));
    }
}
