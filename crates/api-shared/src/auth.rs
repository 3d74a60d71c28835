//! Session and identity provider.
//!
//! Verifies credentials, keeps server-side sessions and resolves a session token to the caller's
//! [`Identity`]. The access control table in `clinic-core` trusts whatever identity this module
//! attaches to a request.
//!
//! Passwords are stored as `hex(pbkdf2_sha256(password, salt)).hex(salt)` in the user's
//! `password` field. Sessions live in memory and are lost on restart, like the rest of the data.

use clinic_core::validation::validate_new_user;
use clinic_core::{ClinicError, Id, NewUser, Role, Storage, User};
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use subtle::ConstantTimeEq;

use crate::types::{LoginReq, RegisterReq};

pub const SALT_LENGTH: usize = 16;
pub const HASH_LENGTH: usize = 32;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "clinic.sid";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Username already exists")]
    UsernameTaken,
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Passwords don't match")]
    PasswordMismatch,
    #[error("session store lock poisoned")]
    LockPoisoned,
    #[error(transparent)]
    Clinic(#[from] ClinicError),
}

pub type AuthResult<T> = std::result::Result<T, AuthError>;

/// The verified caller attached to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Id,
    pub role: Role,
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            role: user.role,
        }
    }
}

/// PBKDF2-HMAC-SHA256 password hashing with a random per-password salt.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    iterations: u32,
}

impl PasswordHasher {
    pub fn new(iterations: u32) -> Self {
        Self { iterations }
    }

    /// Hash `password` with a fresh salt, returning the stored form.
    pub fn hash(&self, password: &str) -> String {
        let mut salt = [0u8; SALT_LENGTH];
        rand::thread_rng().fill_bytes(&mut salt);
        let hash = self.derive(password, &salt);
        format!("{}.{}", hex::encode(hash), hex::encode(salt))
    }

    /// Check `password` against a stored hash. Malformed stored values never verify.
    pub fn verify(&self, password: &str, stored: &str) -> bool {
        let Some((hash_hex, salt_hex)) = stored.split_once('.') else {
            return false;
        };
        let (Ok(expected), Ok(salt)) = (hex::decode(hash_hex), hex::decode(salt_hex)) else {
            return false;
        };
        if expected.len() != HASH_LENGTH {
            return false;
        }

        let actual = self.derive(password, &salt);
        actual[..].ct_eq(&expected[..]).into()
    }

    fn derive(&self, password: &str, salt: &[u8]) -> [u8; HASH_LENGTH] {
        let mut out = [0u8; HASH_LENGTH];
        pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, self.iterations, &mut out);
        out
    }
}

/// Server-side sessions: opaque token to user id, each valid for a fixed lifetime.
///
/// Expired sessions resolve to nothing and are pruned whenever a new session is opened.
#[derive(Debug)]
pub struct SessionStore {
    ttl: Duration,
    sessions: RwLock<HashMap<String, Session>>,
}

#[derive(Debug, Clone, Copy)]
struct Session {
    user_id: Id,
    expires_at: Instant,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Opens a session for `user_id` and returns its token.
    pub fn open(&self, user_id: Id) -> AuthResult<String> {
        let token = uuid::Uuid::new_v4().simple().to_string();
        let now = Instant::now();
        let mut sessions = self.sessions.write().map_err(|_| AuthError::LockPoisoned)?;

        let before = sessions.len();
        sessions.retain(|_, session| session.expires_at > now);
        let pruned = before - sessions.len();
        if pruned > 0 {
            tracing::debug!(pruned, "pruned expired sessions");
        }

        sessions.insert(
            token.clone(),
            Session {
                user_id,
                expires_at: now + self.ttl,
            },
        );
        Ok(token)
    }

    /// The user behind a live session. Unknown and expired tokens resolve to `None`.
    pub fn resolve(&self, token: &str) -> AuthResult<Option<Id>> {
        let now = Instant::now();
        Ok(self
            .sessions
            .read()
            .map_err(|_| AuthError::LockPoisoned)?
            .get(token)
            .filter(|session| session.expires_at > now)
            .map(|session| session.user_id))
    }

    /// Ends the session. Returns whether it existed.
    pub fn close(&self, token: &str) -> AuthResult<bool> {
        Ok(self
            .sessions
            .write()
            .map_err(|_| AuthError::LockPoisoned)?
            .remove(token)
            .is_some())
    }

    #[cfg(test)]
    fn len(&self) -> AuthResult<usize> {
        Ok(self
            .sessions
            .read()
            .map_err(|_| AuthError::LockPoisoned)?
            .len())
    }
}

/// Registration, login and per-request identity resolution over a [`Storage`].
#[derive(Clone)]
pub struct AuthService {
    storage: Arc<dyn Storage>,
    sessions: Arc<SessionStore>,
    hasher: PasswordHasher,
}

impl AuthService {
    pub fn new(storage: Arc<dyn Storage>, hasher: PasswordHasher, session_ttl: Duration) -> Self {
        Self {
            storage,
            sessions: Arc::new(SessionStore::new(session_ttl)),
            hasher,
        }
    }

    /// Lifetime of the sessions this service opens.
    pub fn session_ttl(&self) -> Duration {
        self.sessions.ttl()
    }

    /// Creates a user from a registration form and signs them in.
    ///
    /// `role` defaults to patient.
    ///
    /// # Errors
    ///
    /// - [`AuthError::PasswordMismatch`] if `confirmPassword` differs from `password`.
    /// - [`AuthError::UsernameTaken`] if a user with this username exists.
    /// - [`AuthError::Clinic`] for blank fields or store failures.
    pub fn register(&self, req: RegisterReq) -> AuthResult<(User, String)> {
        if req.password != req.confirm_password {
            return Err(AuthError::PasswordMismatch);
        }

        let new = NewUser {
            username: req.username,
            password: req.password,
            email: req.email,
            role: req.role.unwrap_or(Role::Patient),
            name: req.name,
            phone: req.phone,
            specialization: req.specialization,
            medical_history: req.medical_history,
        };
        let user = self.create_user(new)?;
        let token = self.sessions.open(user.id)?;
        tracing::info!(user_id = user.id, role = %user.role, "registered user");
        Ok((user, token))
    }

    /// Validates, hashes the password and stores the user if the username is free.
    pub fn create_user(&self, mut new: NewUser) -> AuthResult<User> {
        validate_new_user(&new)?;
        new.password = self.hasher.hash(&new.password);
        match self.storage.create_user_unique(new) {
            Ok(user) => Ok(user),
            Err(ClinicError::Duplicate { .. }) => Err(AuthError::UsernameTaken),
            Err(err) => Err(err.into()),
        }
    }

    /// Verifies credentials and opens a session.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for an unknown username or a wrong password,
    /// without saying which.
    pub fn login(&self, req: LoginReq) -> AuthResult<(User, String)> {
        let user = match self.storage.get_user_by_username(&req.username)? {
            Some(user) if self.hasher.verify(&req.password, &user.password) => user,
            _ => {
                tracing::warn!(username = %req.username, "failed login");
                return Err(AuthError::InvalidCredentials);
            }
        };
        let token = self.sessions.open(user.id)?;
        tracing::info!(user_id = user.id, "user logged in");
        Ok((user, token))
    }

    pub fn logout(&self, token: &str) -> AuthResult<()> {
        if self.sessions.close(token)? {
            tracing::info!("session closed");
        }
        Ok(())
    }

    /// Resolves a session token to the stored user.
    ///
    /// Unknown tokens, and tokens whose user no longer exists, resolve to `None`.
    pub fn current_user(&self, token: &str) -> AuthResult<Option<User>> {
        match self.sessions.resolve(token)? {
            Some(user_id) => Ok(self.storage.get_user(user_id)?),
            None => Ok(None),
        }
    }

    pub fn identify(&self, token: &str) -> AuthResult<Option<Identity>> {
        Ok(self.current_user(token)?.as_ref().map(Identity::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinic_core::MemStorage;

    const TEST_ITERATIONS: u32 = 10;
    const TEST_TTL: Duration = Duration::from_secs(3600);

    fn service() -> AuthService {
        AuthService::new(
            Arc::new(MemStorage::new()),
            PasswordHasher::new(TEST_ITERATIONS),
            TEST_TTL,
        )
    }

    fn register_req(username: &str, role: Option<Role>) -> RegisterReq {
        RegisterReq {
            username: username.into(),
            password: "correct horse".into(),
            confirm_password: "correct horse".into(),
            email: format!("{username}@example.com"),
            role,
            name: username.into(),
            phone: None,
            specialization: None,
            medical_history: None,
        }
    }

    #[test]
    fn hash_verifies_only_the_original_password() {
        let hasher = PasswordHasher::new(TEST_ITERATIONS);
        let stored = hasher.hash("s3cret");

        assert!(hasher.verify("s3cret", &stored));
        assert!(!hasher.verify("S3cret", &stored));
    }

    #[test]
    fn hash_uses_fresh_salt() {
        let hasher = PasswordHasher::new(TEST_ITERATIONS);
        assert_ne!(hasher.hash("same"), hasher.hash("same"));
    }

    #[test]
    fn malformed_stored_hash_never_verifies() {
        let hasher = PasswordHasher::new(TEST_ITERATIONS);
        for stored in ["", "plaintext", "zz.zz", "abcd.0011"] {
            assert!(!hasher.verify("plaintext", stored), "{stored}");
        }
    }

    #[test]
    fn register_defaults_to_patient_and_hashes_password() {
        let auth = service();
        let (user, token) = auth.register(register_req("alice", None)).unwrap();

        assert_eq!(user.role, Role::Patient);
        assert_ne!(user.password, "correct horse");
        assert_eq!(
            auth.identify(&token).unwrap(),
            Some(Identity {
                user_id: user.id,
                role: Role::Patient
            })
        );
    }

    #[test]
    fn register_rejects_taken_username() {
        let auth = service();
        auth.register(register_req("alice", None)).unwrap();

        let err = auth
            .register(register_req("alice", Some(Role::Doctor)))
            .unwrap_err();
        assert!(matches!(err, AuthError::UsernameTaken));
    }

    #[test]
    fn register_rejects_mismatched_confirmation() {
        let auth = service();
        let mut req = register_req("alice", None);
        req.confirm_password = "something else".into();

        assert!(matches!(
            auth.register(req),
            Err(AuthError::PasswordMismatch)
        ));
    }

    #[test]
    fn login_checks_password() {
        let auth = service();
        let (registered, _) = auth
            .register(register_req("bob", Some(Role::Doctor)))
            .unwrap();

        let (user, token) = auth
            .login(LoginReq {
                username: "bob".into(),
                password: "correct horse".into(),
            })
            .unwrap();
        assert_eq!(user, registered);
        assert_eq!(auth.current_user(&token).unwrap(), Some(registered));

        let err = auth
            .login(LoginReq {
                username: "bob".into(),
                password: "wrong".into(),
            })
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));

        let err = auth
            .login(LoginReq {
                username: "nobody".into(),
                password: "correct horse".into(),
            })
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[test]
    fn logout_ends_session() {
        let auth = service();
        let (_, token) = auth.register(register_req("carol", None)).unwrap();

        auth.logout(&token).unwrap();

        assert_eq!(auth.identify(&token).unwrap(), None);
        // closing twice is harmless
        auth.logout(&token).unwrap();
    }

    #[test]
    fn concurrent_registrations_keep_usernames_unique() {
        let storage: Arc<dyn Storage> = Arc::new(MemStorage::new());
        let auth = AuthService::new(storage.clone(), PasswordHasher::new(1_000), TEST_TTL);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let auth = auth.clone();
                std::thread::spawn(move || auth.register(register_req("alice", None)))
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        let winners = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(winners, 1);
        assert!(results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|err| matches!(err, AuthError::UsernameTaken)));
        assert_eq!(storage.get_user_by_username("alice").unwrap().unwrap().id, 1);
    }

    #[test]
    fn expired_session_has_no_identity() {
        let auth = AuthService::new(
            Arc::new(MemStorage::new()),
            PasswordHasher::new(TEST_ITERATIONS),
            Duration::from_millis(20),
        );
        let (_, token) = auth.register(register_req("dave", None)).unwrap();
        assert!(auth.identify(&token).unwrap().is_some());

        std::thread::sleep(Duration::from_millis(50));

        assert_eq!(auth.identify(&token).unwrap(), None);
    }

    #[test]
    fn opening_a_session_prunes_expired_ones() {
        let sessions = SessionStore::new(Duration::from_millis(20));
        sessions.open(1).unwrap();
        sessions.open(2).unwrap();
        assert_eq!(sessions.len().unwrap(), 2);

        std::thread::sleep(Duration::from_millis(50));
        let live = sessions.open(3).unwrap();

        assert_eq!(sessions.len().unwrap(), 1);
        assert_eq!(sessions.resolve(&live).unwrap(), Some(3));
    }

    #[test]
    fn unknown_token_has_no_identity() {
        let auth = service();
        assert_eq!(auth.identify("not-a-session").unwrap(), None);
    }
}
