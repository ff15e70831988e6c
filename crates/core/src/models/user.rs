use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Client,
    Staff,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Role::Client => "client",
            Role::Staff => "staff",
            Role::Admin => "admin",
        };
        f.write_str(label)
    }
}

/// Caller identity as established by the session layer outside this core.
#[derive(Debug, Clone)]
pub struct Actor {
    pub email: String,
    pub role: Role,
}

impl Actor {
    pub fn new(email: impl Into<String>, role: Role) -> Self {
        Self {
            email: email.into(),
            role,
        }
    }
}

/// One entry of a user directory (clients, staff or admins). These records
/// are owned by the user-management side of the system; this core only reads
/// them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryUser {
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    #[serde(alias = "city")]
    pub location: Option<String>,
}

impl DirectoryUser {
    /// "First Last" when both names are on record, the bare email otherwise.
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(first), None) => first.clone(),
            _ => self.email.clone(),
        }
    }
}
