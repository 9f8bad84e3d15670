//! Registration and login over a [`UserStore`].

use super::{
    AuthError, PasswordHasher, PublicUser, User, UserStore, default_name,
    hasher::digest_matches,
};
use std::{fmt, str::FromStr, sync::Arc};
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument};

const MISSING_CREDENTIALS: &str = "Email and password are required";
const MISSING_FIELDS: &str = "All fields are required";

/// Which fields a registration request must carry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RegistrationProfile {
    /// `email` and `password`; `name` is optional and defaults to the email local part.
    #[default]
    Basic,
    /// `name`, `email`, `password`, and `confirmPassword`, all required and the
    /// two passwords equal.
    Extended,
}

impl RegistrationProfile {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Extended => "extended",
        }
    }
}

impl fmt::Display for RegistrationProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegistrationProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "extended" => Ok(Self::Extended),
            other => Err(format!("unknown registration profile: {other}")),
        }
    }
}

/// Raw registration fields. `None` and `""` both count as missing.
#[derive(Clone, Default)]
pub struct RegistrationInput {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub confirm_password: Option<String>,
}

impl fmt::Debug for RegistrationInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationInput")
            .field("email", &self.email)
            .field("password", &"***")
            .field("name", &self.name)
            .field("confirm_password", &"***")
            .finish()
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

pub struct UserService {
    store: Arc<dyn UserStore>,
    hasher: Arc<dyn PasswordHasher>,
    profile: RegistrationProfile,
    // Serializes load-check-append-save so two registrations cannot both pass
    // the uniqueness check.
    write_lock: Mutex<()>,
}

impl fmt::Debug for UserService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserService")
            .field("profile", &self.profile)
            .finish_non_exhaustive()
    }
}

impl UserService {
    #[must_use]
    pub fn new(store: Arc<dyn UserStore>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self {
            store,
            hasher,
            profile: RegistrationProfile::default(),
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn with_profile(mut self, profile: RegistrationProfile) -> Self {
        self.profile = profile;
        self
    }

    #[must_use]
    pub const fn profile(&self) -> RegistrationProfile {
        self.profile
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn UserStore> {
        &self.store
    }

    /// Message returned when required registration fields are absent.
    #[must_use]
    pub const fn missing_fields_message(&self) -> &'static str {
        match self.profile {
            RegistrationProfile::Basic => MISSING_CREDENTIALS,
            RegistrationProfile::Extended => MISSING_FIELDS,
        }
    }

    /// Create a user and persist the whole store.
    ///
    /// # Errors
    /// Returns `MissingField`, `PasswordMismatch`, `DuplicateEmail`, or
    /// `PersistenceFailure` when the store could not be written.
    #[instrument(skip(self, input), fields(profile = %self.profile))]
    pub async fn register(&self, input: &RegistrationInput) -> Result<PublicUser, AuthError> {
        let missing = AuthError::MissingField(self.missing_fields_message());

        let (Some(email), Some(password)) = (
            present(input.email.as_deref()),
            present(input.password.as_deref()),
        ) else {
            return Err(missing);
        };

        let name = match self.profile {
            RegistrationProfile::Basic => present(input.name.as_deref())
                .map_or_else(|| default_name(email), str::to_string),
            RegistrationProfile::Extended => {
                let (Some(name), Some(confirm)) = (
                    present(input.name.as_deref()),
                    present(input.confirm_password.as_deref()),
                ) else {
                    return Err(missing);
                };
                if confirm != password {
                    debug!("password confirmation mismatch");
                    return Err(AuthError::PasswordMismatch);
                }
                name.to_string()
            }
        };

        let _guard = self.write_lock.lock().await;

        let mut users = self.store.load_all().await;
        if users.iter().any(|u| u.email == email) {
            debug!("email already registered");
            return Err(AuthError::DuplicateEmail);
        }

        let user = User {
            email: email.to_string(),
            password_digest: self.hasher.hash(password),
            name,
        };
        let public = user.public_view();
        users.push(user);

        if let Err(err) = self.store.save_all(&users).await {
            error!("Error saving users: {}", err);
            return Err(AuthError::PersistenceFailure(err));
        }

        info!("user registered");
        Ok(public)
    }

    /// Check credentials against the stored digests.
    ///
    /// Unknown email and wrong password are reported the same way.
    ///
    /// # Errors
    /// Returns `MissingField` or `InvalidCredentials`.
    #[instrument(skip(self, email, password))]
    pub async fn login(
        &self,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<PublicUser, AuthError> {
        let (Some(email), Some(password)) = (present(email), present(password)) else {
            return Err(AuthError::MissingField(MISSING_CREDENTIALS));
        };

        let users = self.store.load_all().await;
        let digest = self.hasher.hash(password);

        users
            .iter()
            .find(|u| u.email == email && digest_matches(&u.password_digest, &digest))
            .map(User::public_view)
            .ok_or_else(|| {
                debug!("login rejected");
                AuthError::InvalidCredentials
            })
    }
}
