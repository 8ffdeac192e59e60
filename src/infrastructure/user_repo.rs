use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::UserRepository;
use crate::domain::user::{NewUser, Role, User};
use crate::schema::users;

use super::models::{NewUserRow, UserRow};

pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl UserRepository for DieselUserRepository {
    fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::insert_into(users::table)
            .values(&NewUserRow {
                name: user.name,
                email: user.email,
                password_hash: user.password_hash,
                role: user.role.as_str().to_string(),
            })
            .returning(UserRow::as_returning())
            .get_result::<UserRow>(&mut conn)
            .map_err(|e| match DomainError::from(e) {
                DomainError::Conflict(_) => DomainError::Conflict("Email already used".to_string()),
                other => other,
            })?;

        row.try_into()
    }

    fn find_by_id(&self, id: i32) -> Result<Option<User>, DomainError> {
        let mut conn = self.pool.get()?;

        users::table
            .find(id)
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .optional()?
            .map(User::try_from)
            .transpose()
    }

    fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let mut conn = self.pool.get()?;

        users::table
            .filter(users::email.eq(email))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .optional()?
            .map(User::try_from)
            .transpose()
    }

    fn set_role(&self, id: i32, role: Role) -> Result<User, DomainError> {
        let mut conn = self.pool.get()?;

        diesel::update(users::table.find(id))
            .set(users::role.eq(role.as_str()))
            .returning(UserRow::as_returning())
            .get_result::<UserRow>(&mut conn)
            .optional()?
            .ok_or(DomainError::NotFound("User"))?
            .try_into()
    }

    fn list(&self) -> Result<Vec<User>, DomainError> {
        let mut conn = self.pool.get()?;

        users::table
            .select(UserRow::as_select())
            .order(users::id.asc())
            .load::<UserRow>(&mut conn)?
            .into_iter()
            .map(User::try_from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::DieselUserRepository;
    use crate::domain::errors::DomainError;
    use crate::domain::ports::UserRepository;
    use crate::domain::user::{NewUser, Role};
    use crate::infrastructure::test_db::setup_db;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Alice".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            role: Role::Client,
        }
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon for the Postgres testcontainer"]
    async fn create_and_find_by_email() {
        let (_container, pool) = setup_db().await;
        let repo = DieselUserRepository::new(pool);

        let created = repo.create(new_user("alice@example.com")).expect("create failed");
        assert_eq!(created.role, Role::Client);

        let found = repo
            .find_by_email("alice@example.com")
            .expect("find failed")
            .expect("user should exist");
        assert_eq!(found.id, created.id);
        assert!(repo.find_by_email("bob@example.com").unwrap().is_none());
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon for the Postgres testcontainer"]
    async fn duplicate_email_is_a_conflict() {
        let (_container, pool) = setup_db().await;
        let repo = DieselUserRepository::new(pool);

        repo.create(new_user("alice@example.com")).expect("create failed");
        let err = repo.create(new_user("alice@example.com")).unwrap_err();

        assert!(matches!(err, DomainError::Conflict(m) if m == "Email already used"));
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon for the Postgres testcontainer"]
    async fn set_role_promotes_user() {
        let (_container, pool) = setup_db().await;
        let repo = DieselUserRepository::new(pool);

        let user = repo.create(new_user("alice@example.com")).unwrap();
        let promoted = repo.set_role(user.id, Role::Admin).expect("set_role failed");
        assert_eq!(promoted.role, Role::Admin);

        assert!(matches!(
            repo.set_role(user.id + 1000, Role::Admin),
            Err(DomainError::NotFound("User"))
        ));
    }
}
