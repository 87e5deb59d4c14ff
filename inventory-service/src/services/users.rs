//! User, role and login operations.

use crate::models::{Role, User};
use crate::services::database::Database;
use crate::services::metrics::{DB_QUERY_DURATION, LOGINS_TOTAL};
use crate::utils::{hash_password, verify_password, Password};
use service_core::error::AppError;
use tracing::{info, instrument, warn};

const USER_COLUMNS: &str = r#"
    u.usercode, u.username, u.password AS password_hash, u.role_id,
    COALESCE(r.name, '') AS role_name
"#;

impl Database {
    /// Look up a user by name and check the password. `None` when the user
    /// is unknown or the password does not match.
    #[instrument(skip(self, password))]
    pub async fn verify_login(
        &self,
        username: &str,
        password: &Password,
    ) -> Result<Option<User>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["verify_login"])
            .start_timer();

        let query = format!(
            "SELECT {USER_COLUMNS} FROM users u LEFT JOIN roles r ON r.id = u.role_id WHERE u.username = $1"
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(username.trim())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to load user: {}", e)))?;

        timer.observe_duration();

        let verified = user.filter(|u| verify_password(password, &u.password_hash));
        match &verified {
            Some(u) => {
                LOGINS_TOTAL.with_label_values(&["success"]).inc();
                info!(usercode = u.usercode, "Login verified");
            }
            None => {
                LOGINS_TOTAL.with_label_values(&["failure"]).inc();
                warn!("Login rejected");
            }
        }

        Ok(verified)
    }

    /// All users ordered by name.
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_users"])
            .start_timer();

        let query = format!(
            "SELECT {USER_COLUMNS} FROM users u LEFT JOIN roles r ON r.id = u.role_id ORDER BY u.username"
        );
        let users = sqlx::query_as::<_, User>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list users: {}", e)))?;

        timer.observe_duration();

        Ok(users)
    }

    /// Get a user by usercode.
    #[instrument(skip(self), fields(usercode = usercode))]
    pub async fn get_user(&self, usercode: i32) -> Result<Option<User>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_user"])
            .start_timer();

        let query = format!(
            "SELECT {USER_COLUMNS} FROM users u LEFT JOIN roles r ON r.id = u.role_id WHERE u.usercode = $1"
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(usercode)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get user: {}", e)))?;

        timer.observe_duration();

        Ok(user)
    }

    /// Create a user with a hashed password.
    #[instrument(skip(self, password))]
    pub async fn create_user(
        &self,
        username: &str,
        password: &Password,
        role_id: i32,
    ) -> Result<bool, AppError> {
        let username = username.trim();
        let password_hash = hash_password(password).map_err(AppError::InternalError)?;

        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_user"])
            .start_timer();

        let result = sqlx::query("INSERT INTO users (username, password, role_id) VALUES ($1, $2, $3)")
            .bind(username)
            .bind(&password_hash)
            .bind(role_id)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                    AppError::Conflict(anyhow::anyhow!("User '{}' already exists", username))
                }
                _ => AppError::DatabaseError(anyhow::anyhow!("Failed to create user: {}", e)),
            })?;

        timer.observe_duration();

        info!(username = %username, role_id = role_id, "User created");

        Ok(result.rows_affected() > 0)
    }

    /// Rename a user and change the role. The password is left alone.
    #[instrument(skip(self), fields(usercode = usercode))]
    pub async fn update_user(
        &self,
        usercode: i32,
        username: &str,
        role_id: i32,
    ) -> Result<bool, AppError> {
        let username = username.trim();

        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_user"])
            .start_timer();

        let result = sqlx::query("UPDATE users SET username = $2, role_id = $3 WHERE usercode = $1")
            .bind(usercode)
            .bind(username)
            .bind(role_id)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                    AppError::Conflict(anyhow::anyhow!("User '{}' already exists", username))
                }
                _ => AppError::DatabaseError(anyhow::anyhow!("Failed to update user: {}", e)),
            })?;

        timer.observe_duration();

        let updated = result.rows_affected() > 0;
        if updated {
            info!(usercode = usercode, "User updated");
        }

        Ok(updated)
    }

    /// Delete a user. Audit entries written by the user are kept.
    #[instrument(skip(self), fields(usercode = usercode))]
    pub async fn delete_user(&self, usercode: i32) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["delete_user"])
            .start_timer();

        let result = sqlx::query("DELETE FROM users WHERE usercode = $1")
            .bind(usercode)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to delete user: {}", e)))?;

        timer.observe_duration();

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!(usercode = usercode, "User deleted");
        }

        Ok(deleted)
    }

    #[instrument(skip(self))]
    pub async fn list_roles(&self) -> Result<Vec<Role>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_roles"])
            .start_timer();

        let roles = sqlx::query_as::<_, Role>("SELECT id, name FROM roles ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list roles: {}", e)))?;

        timer.observe_duration();

        Ok(roles)
    }
}
