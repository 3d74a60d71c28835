//! Start-up seeding of users from a YAML file.
//!
//! The file is a list of users:
//!
//! ```yaml
//! - username: drsmith
//!   password: change-me
//!   email: smith@clinic.example
//!   role: doctor
//!   name: Dr. Jane Smith
//!   specialization: Cardiology
//! - username: frontdesk
//!   password: change-me
//!   email: desk@clinic.example
//!   role: receptionist
//!   name: Front Desk
//! ```
//!
//! Seeded users go through the same validation and hashing as registration.

use clinic_core::{NewUser, User};
use std::path::Path;

use crate::auth::{AuthError, AuthService};

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("failed to read seed file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse seed file: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("seed user '{username}' rejected: {source}")]
    Rejected {
        username: String,
        #[source]
        source: AuthError,
    },
}

/// Parses a YAML seed document into users ready for storage.
pub fn parse_seed(yaml: &str) -> Result<Vec<NewUser>, SeedError> {
    // an empty document is an empty list
    if yaml.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_yaml::from_str(yaml)?)
}

pub fn load_seed_file(path: &Path) -> Result<Vec<NewUser>, SeedError> {
    let yaml = std::fs::read_to_string(path).map_err(|source| SeedError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_seed(&yaml)
}

/// Creates every user in order, stopping at the first rejection.
///
/// A username that already exists (including one earlier in the same file) is a rejection.
pub fn seed_users(auth: &AuthService, users: Vec<NewUser>) -> Result<Vec<User>, SeedError> {
    let mut created = Vec::with_capacity(users.len());
    for new in users {
        let username = new.username.clone();
        let user = auth
            .create_user(new)
            .map_err(|source| SeedError::Rejected { username, source })?;
        tracing::info!(user_id = user.id, username = %user.username, role = %user.role, "seeded user");
        created.push(user);
    }
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::PasswordHasher;
    use crate::types::LoginReq;
    use clinic_core::{MemStorage, Role, Storage};
    use std::io::Write;
    use std::sync::Arc;
    use std::time::Duration;

    const SEED: &str = r#"
- username: drsmith
  password: change-me
  email: smith@clinic.example
  role: doctor
  name: Dr. Jane Smith
  specialization: Cardiology
- username: frontdesk
  password: change-me
  email: desk@clinic.example
  role: receptionist
  name: Front Desk
"#;

    fn auth_over(storage: Arc<MemStorage>) -> AuthService {
        AuthService::new(storage, PasswordHasher::new(10), Duration::from_secs(60))
    }

    #[test]
    fn parses_users_with_optional_fields() {
        let users = parse_seed(SEED).unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].role, Role::Doctor);
        assert_eq!(users[0].specialization.as_deref(), Some("Cardiology"));
        assert_eq!(users[1].phone, None);
    }

    #[test]
    fn empty_document_seeds_nothing() {
        assert!(parse_seed("  \n").unwrap().is_empty());
    }

    #[test]
    fn unknown_role_is_a_parse_error() {
        let err = parse_seed("- {username: x, password: y, email: e, role: nurse, name: n}")
            .unwrap_err();
        assert!(matches!(err, SeedError::Parse(_)));
    }

    #[test]
    fn seeded_users_can_log_in() {
        let storage = Arc::new(MemStorage::new());
        let auth = auth_over(storage.clone());

        let created = seed_users(&auth, parse_seed(SEED).unwrap()).unwrap();
        assert_eq!(created.iter().map(|u| u.id).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(storage.list_doctors().unwrap().len(), 1);

        auth.login(LoginReq {
            username: "drsmith".into(),
            password: "change-me".into(),
        })
        .expect("seeded password should verify");
    }

    #[test]
    fn duplicate_username_in_file_is_rejected() {
        let auth = auth_over(Arc::new(MemStorage::new()));
        let mut users = parse_seed(SEED).unwrap();
        users.push(users[0].clone());

        let err = seed_users(&auth, users).unwrap_err();
        assert!(matches!(
            err,
            SeedError::Rejected { ref username, source: AuthError::UsernameTaken } if username == "drsmith"
        ));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SEED.as_bytes()).unwrap();

        let users = load_seed_file(file.path()).unwrap();
        assert_eq!(users[1].username, "frontdesk");
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_seed_file(&dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, SeedError::Read { .. }));
    }
}
