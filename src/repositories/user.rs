//! UserRepository - Repository per la gestione degli utenti e dei loro ruoli

use super::Read;
use crate::dtos::{CreateUserDTO, UpdateUserDTO};
use crate::entities::{Role, User};
use chrono::Utc;
use sqlx::{Error, SqlitePool};
use tracing::{debug, info, instrument};

pub const BOOTSTRAP_ADMIN: &str = "admin";

// USER REPO
pub struct UserRepository {
    connection_pool: SqlitePool,
}

impl UserRepository {
    pub fn new(connection_pool: SqlitePool) -> UserRepository {
        Self { connection_pool }
    }

    /// Find user by exact username match
    #[instrument(skip(self))]
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.connection_pool)
            .await
    }

    /// Login accepts either the username or the email
    #[instrument(skip(self))]
    pub async fn find_by_login(&self, login: &str) -> Result<Option<User>, Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ? OR email = ? LIMIT 1")
            .bind(login)
            .bind(login)
            .fetch_optional(&self.connection_pool)
            .await
    }

    #[instrument(skip(self))]
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.connection_pool)
            .await
    }

    /// Inserts a user whose username is its email, with the given roles.
    #[instrument(skip(self, data, password_hash), fields(email = %data.email))]
    pub async fn create(
        &self,
        data: &CreateUserDTO,
        password_hash: &str,
        roles: &[Role],
    ) -> Result<User, Error> {
        debug!("Creating new user");
        let mut tx = self.connection_pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO users (username, email, password, full_name, phone_number,
                               organization_unit_id, is_active, created_at)
            VALUES (?, ?, ?, ?, ?, ?, 1, ?)
            "#,
        )
        .bind(&data.email)
        .bind(&data.email)
        .bind(password_hash)
        .bind(&data.full_name)
        .bind(&data.phone_number)
        .bind(data.organization_unit_id)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        let new_id = result.last_insert_rowid() as i32;

        for role in roles {
            sqlx::query("INSERT INTO user_roles (user_id, role) VALUES (?, ?)")
                .bind(new_id)
                .bind(role)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        info!("User created with id {}", new_id);

        self.read(&new_id).await?.ok_or(Error::RowNotFound)
    }

    #[instrument(skip(self, data))]
    pub async fn update_profile(&self, id: &i32, data: &UpdateUserDTO) -> Result<User, Error> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET full_name = ?, phone_number = ?, organization_unit_id = ?, is_active = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&data.full_name)
        .bind(&data.phone_number)
        .bind(data.organization_unit_id)
        .bind(data.is_active)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.connection_pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::RowNotFound);
        }

        info!("User profile updated");
        self.read(id).await?.ok_or(Error::RowNotFound)
    }

    #[instrument(skip(self, password_hash))]
    pub async fn update_password(&self, id: &i32, password_hash: &str) -> Result<(), Error> {
        let result = sqlx::query("UPDATE users SET password = ?, updated_at = ? WHERE id = ?")
            .bind(password_hash)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.connection_pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::RowNotFound);
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn touch_last_login(&self, id: &i32) -> Result<(), Error> {
        sqlx::query("UPDATE users SET last_login_date = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(id)
            .execute(&self.connection_pool)
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn find_roles(&self, user_id: &i32) -> Result<Vec<Role>, Error> {
        sqlx::query_scalar::<_, Role>("SELECT role FROM user_roles WHERE user_id = ? ORDER BY role")
            .bind(user_id)
            .fetch_all(&self.connection_pool)
            .await
    }

    /// Replaces the role set of a user atomically
    #[instrument(skip(self))]
    pub async fn set_roles(&self, user_id: &i32, roles: &[Role]) -> Result<(), Error> {
        let mut tx = self.connection_pool.begin().await?;

        sqlx::query("DELETE FROM user_roles WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        for role in roles {
            sqlx::query("INSERT INTO user_roles (user_id, role) VALUES (?, ?)")
                .bind(user_id)
                .bind(role)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        debug!("Roles replaced with {:?}", roles);
        Ok(())
    }

    /// Page of users ordered by id, optionally restricted to a role
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        role: Option<Role>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<User>, Error> {
        match role {
            Some(role) => {
                sqlx::query_as::<_, User>(
                    r#"
                    SELECT u.* FROM users u
                    INNER JOIN user_roles ur ON ur.user_id = u.id
                    WHERE ur.role = ?
                    ORDER BY u.id
                    LIMIT ? OFFSET ?
                    "#,
                )
                .bind(role)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.connection_pool)
                .await
            }
            None => {
                sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY id LIMIT ? OFFSET ?")
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(&self.connection_pool)
                    .await
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn count(&self) -> Result<i64, Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.connection_pool)
            .await
    }

    /// Creates the `admin` account with the Admin role unless it already exists.
    /// Returns the new user, or `None` when there was nothing to do.
    #[instrument(skip(self, password_hash))]
    pub async fn bootstrap_admin(&self, password_hash: &str) -> Result<Option<User>, Error> {
        if self.find_by_username(BOOTSTRAP_ADMIN).await?.is_some() {
            debug!("Bootstrap administrator already present");
            return Ok(None);
        }

        let mut tx = self.connection_pool.begin().await?;
        let result = sqlx::query(
            r#"
            INSERT INTO users (username, email, password, full_name, is_active, created_at)
            VALUES (?, ?, ?, ?, 1, ?)
            "#,
        )
        .bind(BOOTSTRAP_ADMIN)
        .bind("admin@events.local")
        .bind(password_hash)
        .bind("System Administrator")
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        let new_id = result.last_insert_rowid() as i32;
        sqlx::query("INSERT INTO user_roles (user_id, role) VALUES (?, ?)")
            .bind(new_id)
            .bind(Role::Admin)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        info!("Bootstrap administrator created with id {}", new_id);
        self.read(&new_id).await
    }
}

impl Read<User, i32> for UserRepository {
    #[instrument(skip(self), fields(user_id = %id))]
    async fn read(&self, id: &i32) -> Result<Option<User>, Error> {
        debug!("Reading user by id");
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::SqlitePool;

    fn new_user(email: &str) -> CreateUserDTO {
        CreateUserDTO {
            email: email.to_string(),
            full_name: "Test User".to_string(),
            password: "Password123".to_string(),
            phone_number: None,
            organization_unit_id: None,
            roles: vec![],
        }
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users")))]
    async fn test_find_by_login_matches_username_and_email(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = UserRepository::new(pool);

        let by_username = repo.find_by_login("admin").await?;
        assert!(by_username.is_some());

        let by_email = repo.find_by_login("operator@example.com").await?;
        assert_eq!(by_email.map(|u| u.id), Some(3));

        assert!(repo.find_by_login("nobody").await?.is_none());
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users")))]
    async fn test_find_roles(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = UserRepository::new(pool);

        assert_eq!(repo.find_roles(&1).await?, vec![Role::Admin]);
        assert_eq!(repo.find_roles(&3).await?, vec![Role::Operator]);
        Ok(())
    }

    #[sqlx::test]
    async fn test_create_assigns_roles(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = UserRepository::new(pool);

        let user = repo
            .create(&new_user("new@example.com"), "hash", &[Role::Manager, Role::Viewer])
            .await?;

        assert_eq!(user.username, "new@example.com");
        assert!(user.is_active);
        assert_eq!(repo.find_roles(&user.id).await?, vec![Role::Manager, Role::Viewer]);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users")))]
    async fn test_set_roles_replaces_previous(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = UserRepository::new(pool);

        repo.set_roles(&3, &[Role::Viewer]).await?;
        assert_eq!(repo.find_roles(&3).await?, vec![Role::Viewer]);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users")))]
    async fn test_list_filters_by_role(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = UserRepository::new(pool);

        let operators = repo.list(Some(Role::Operator), 10, 0).await?;
        assert_eq!(operators.len(), 1);
        assert_eq!(operators[0].id, 3);

        let page = repo.list(None, 2, 0).await?;
        assert_eq!(page.len(), 2);
        assert_eq!(repo.count().await?, 5);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users")))]
    async fn test_update_missing_user_fails(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = UserRepository::new(pool);

        let result = repo.update_password(&999, "hash").await;
        assert!(matches!(result, Err(Error::RowNotFound)));
        Ok(())
    }

    #[sqlx::test]
    async fn test_bootstrap_admin_runs_once(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = UserRepository::new(pool);

        let admin = repo.bootstrap_admin("hash").await?.expect("admin created");
        assert_eq!(admin.username, BOOTSTRAP_ADMIN);
        assert_eq!(repo.find_roles(&admin.id).await?, vec![Role::Admin]);

        assert!(repo.bootstrap_admin("other").await?.is_none());
        assert_eq!(repo.count().await?, 1);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users")))]
    async fn test_bootstrap_admin_skips_existing(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = UserRepository::new(pool);

        assert!(repo.bootstrap_admin("hash").await?.is_none());
        assert_eq!(repo.count().await?, 5);
        Ok(())
    }
}
