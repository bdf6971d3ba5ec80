use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a user known to the actor directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(pub i64);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role an actor holds in the testing workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Tester,
    Doctor,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tester => "TESTER",
            Self::Doctor => "DOCTOR",
            Self::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TESTER" => Ok(Self::Tester),
            "DOCTOR" => Ok(Self::Doctor),
            "ADMIN" => Ok(Self::Admin),
            _ => Err(format!("Invalid role: {s}")),
        }
    }
}

/// A role-bearing identity. Read-only from the workflow's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub name: String,
    pub role: Role,
}

impl Actor {
    pub fn new(id: i64, name: impl Into<String>, role: Role) -> Self {
        Self {
            id: ActorId(id),
            name: name.into(),
            role,
        }
    }

    pub fn tester(id: i64, name: impl Into<String>) -> Self {
        Self::new(id, name, Role::Tester)
    }

    pub fn doctor(id: i64, name: impl Into<String>) -> Self {
        Self::new(id, name, Role::Doctor)
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }
}
