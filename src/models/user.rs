use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Papel do usuário na plataforma
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Tutor,
    #[default]
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Tutor => "tutor",
            Role::Student => "student",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "tutor" => Ok(Role::Tutor),
            "student" => Ok(Role::Student),
            other => Err(format!("Invalid role: {}. Supported: admin, tutor, student", other)),
        }
    }
}

/// Usuário (armazenado no MongoDB, coleção `users`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// Identificador único
    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "photoURL", default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,

    /// Documentos sem `role`, com `null` ou com papel desconhecido são tratados como student
    #[serde(default, deserialize_with = "lenient_role")]
    pub role: Role,
}

fn lenient_role<'de, D>(deserializer: D) -> Result<Role, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(match raw {
        None => Role::Student,
        Some(value) => value.parse().unwrap_or_else(|_| {
            log::warn!("⚠️  Unknown stored role {:?}, treating as student", value);
            Role::Student
        }),
    })
}

/// Forma pública do usuário nas respostas JSON
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct UserView {
    pub id: Option<String>,
    pub email: String,
    pub name: Option<String>,
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
    pub role: Role,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id.map(|oid| oid.to_hex()),
            email: user.email,
            name: user.name,
            photo_url: user.photo_url,
            role: user.role,
        }
    }
}

/// Filtro de seleção para update/delete
#[derive(Debug, Clone, PartialEq)]
pub enum UserFilter {
    Email(String),
    Id(ObjectId),
}

impl UserFilter {
    /// Parses a hex ObjectId coming from a path segment
    pub fn by_id(id: &str) -> Result<Self, String> {
        ObjectId::parse_str(id)
            .map(UserFilter::Id)
            .map_err(|_| format!("Invalid user id: {}", id))
    }
}

/// Campos alteráveis de um usuário (`$set`)
#[derive(Debug, Clone, Default, PartialEq, Deserialize, utoipa::ToSchema)]
pub struct UserPatch {
    pub name: Option<String>,
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
    pub role: Option<Role>,
}

impl UserPatch {
    pub fn role(role: Role) -> Self {
        Self {
            role: Some(role),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.photo_url.is_none() && self.role.is_none()
    }

    /// Applies the patch in place, reporting whether anything changed
    pub fn apply(&self, user: &mut User) -> bool {
        let before = user.clone();
        if let Some(name) = &self.name {
            user.name = Some(name.clone());
        }
        if let Some(photo_url) = &self.photo_url {
            user.photo_url = Some(photo_url.clone());
        }
        if let Some(role) = self.role {
            user.role = role;
        }
        *user != before
    }
}

/// Resultado de `update_one`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
}
