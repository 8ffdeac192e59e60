use crate::auth::{PasswordHasher, TokenService};
use crate::domain::errors::DomainError;
use crate::domain::ports::UserRepository;
use crate::domain::user::{normalize_email, NewUser, Role, User};

fn display_name(name: &str) -> Result<String, DomainError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::InvalidInput("Name must not be empty".to_string()));
    }
    Ok(name.to_string())
}

/// A freshly issued access token and the account it belongs to.
#[derive(Debug, Clone)]
pub struct Session {
    pub access_token: String,
    pub user: User,
}

pub struct AuthService<R> {
    repo: R,
    hasher: PasswordHasher,
    tokens: TokenService,
}

impl<R: UserRepository> AuthService<R> {
    pub fn new(repo: R, hasher: PasswordHasher, tokens: TokenService) -> Self {
        Self {
            repo,
            hasher,
            tokens,
        }
    }

    /// Registers a client account. Self-service signup never grants admin.
    pub fn signup(&self, name: &str, email: &str, password: &str) -> Result<Session, DomainError> {
        let name = display_name(name)?;
        let email = normalize_email(email);
        if self.repo.find_by_email(&email)?.is_some() {
            return Err(DomainError::Conflict("Email already used".to_string()));
        }

        let user = self.repo.create(NewUser {
            name,
            email,
            password_hash: self.hasher.hash(password)?,
            role: Role::Client,
        })?;
        log::info!("registered user {} ({})", user.id, user.email);

        self.session_for(user)
    }

    pub fn login(&self, email: &str, password: &str) -> Result<Session, DomainError> {
        let invalid = || DomainError::Unauthenticated("Invalid credentials".to_string());

        let user = self
            .repo
            .find_by_email(&normalize_email(email))?
            .ok_or_else(invalid)?;
        if !self.hasher.verify(password, &user.password_hash) {
            return Err(invalid());
        }

        self.session_for(user)
    }

    pub fn me(&self, user_id: i32) -> Result<User, DomainError> {
        self.repo
            .find_by_id(user_id)?
            .ok_or(DomainError::NotFound("User"))
    }

    /// Creates the configured admin account, or promotes it if it already exists.
    pub fn ensure_admin(&self, name: &str, email: &str, password: &str) -> Result<User, DomainError> {
        let email = normalize_email(email);
        match self.repo.find_by_email(&email)? {
            Some(user) if user.role.is_admin() => Ok(user),
            Some(user) => {
                log::info!("promoting {} to admin", user.email);
                self.repo.set_role(user.id, Role::Admin)
            }
            None => {
                log::info!("creating admin account {}", email);
                self.repo.create(NewUser {
                    name: display_name(name)?,
                    email,
                    password_hash: self.hasher.hash(password)?,
                    role: Role::Admin,
                })
            }
        }
    }

    fn session_for(&self, user: User) -> Result<Session, DomainError> {
        Ok(Session {
            access_token: self.tokens.issue(user.id, user.role)?,
            user,
        })
    }
}
