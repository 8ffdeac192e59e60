use crate::domain::errors::DomainError;
use crate::domain::ports::{Stats, StatsRepository, UserRepository};
use crate::domain::user::User;

/// Read-only back-office views.
pub struct AdminService<U, S> {
    users: U,
    stats: S,
}

impl<U: UserRepository, S: StatsRepository> AdminService<U, S> {
    pub fn new(users: U, stats: S) -> Self {
        Self { users, stats }
    }

    pub fn users(&self) -> Result<Vec<User>, DomainError> {
        self.users.list()
    }

    pub fn stats(&self) -> Result<Stats, DomainError> {
        self.stats.stats()
    }
}
