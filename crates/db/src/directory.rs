use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use dispatch_core::errors::DispatchResult;
use dispatch_core::models::user::DirectoryUser;

/// Read-only lookup into one of the user directories (clients, staff or
/// admins). The engine resolves display names and account-existence checks
/// through this seam; writing the records belongs to the user-management
/// collaborator outside this core.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find(&self, email: &str) -> DispatchResult<Option<DirectoryUser>>;

    async fn all(&self) -> DispatchResult<Vec<DirectoryUser>>;

    async fn exists(&self, email: &str) -> DispatchResult<bool> {
        Ok(self.find(email).await?.is_some())
    }
}

/// Directory backed by a JSON-lines file, one user record per line. A line
/// that is not JSON falls back to the legacy `email|password` format still
/// found in older admin files.
pub struct FileDirectory {
    path: PathBuf,
}

impl FileDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn parse_line(line: &str) -> Option<DirectoryUser> {
        match serde_json::from_str::<DirectoryUser>(line) {
            Ok(user) => Some(user),
            Err(_) => {
                let email = line.split('|').next()?.trim();
                if email.is_empty() {
                    None
                } else {
                    Some(DirectoryUser {
                        email: email.to_string(),
                        first_name: None,
                        last_name: None,
                        phone: None,
                        location: None,
                    })
                }
            }
        }
    }
}

#[async_trait]
impl UserDirectory for FileDirectory {
    async fn find(&self, email: &str) -> DispatchResult<Option<DirectoryUser>> {
        Ok(self.all().await?.into_iter().find(|user| user.email == email))
    }

    async fn all(&self) -> DispatchResult<Vec<DirectoryUser>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        let users: Vec<DirectoryUser> = content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(Self::parse_line)
            .collect();
        debug!(path = %self.path.display(), count = users.len(), "directory loaded");
        Ok(users)
    }
}
