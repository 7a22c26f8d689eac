use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::record::RecordId;

/// Role of an authenticated user. Decides which views the shell offers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Faculty,
    Admin,
}

impl Role {
    /// Only faculty may start attendance sessions.
    pub fn can_take_attendance(self) -> bool {
        matches!(self, Self::Faculty)
    }

    /// Only admins may edit collections through the CRM.
    pub fn can_edit(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Student => "student",
            Self::Faculty => "faculty",
            Self::Admin => "admin",
        };
        f.write_str(s)
    }
}

impl FromStr for Role {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "student" => Ok(Self::Student),
            "faculty" => Ok(Self::Faculty),
            "admin" => Ok(Self::Admin),
            other => Err(TypeError::UnknownRole(other.to_string())),
        }
    }
}

/// Identity record produced by the login boundary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl User {
    /// Build a user from a login email, deriving a display name from the
    /// local part (`jane.doe@uni.edu` becomes `Jane Doe`).
    pub fn from_email(email: &str, role: Role) -> Self {
        let local = email.split('@').next().unwrap_or(email);
        let name = local
            .split(['.', '_', '-'])
            .filter(|p| !p.is_empty())
            .map(|part| {
                let mut chars = part.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            id: RecordId::generate(),
            name: if name.is_empty() { email.to_string() } else { name },
            email: email.to_string(),
            role,
        }
    }
}
