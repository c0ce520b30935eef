//! `SeaORM` Entity for platform accounts (admins and web users)

use super::sea_orm_active_enums::{Gender, UserStatus};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "Text", nullable)]
    pub first_name: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub middle_name: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub last_name: Option<String>,
    #[sea_orm(column_type = "Text", nullable, unique)]
    pub username: Option<String>,
    #[sea_orm(column_type = "Text", unique)]
    pub email: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub country_code: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub contact_number: Option<String>,
    /// bcrypt hash, never serialized back to clients
    #[sea_orm(column_type = "Text")]
    #[serde(skip_serializing)]
    pub password: String,
    pub gender: Gender,
    #[sea_orm(column_type = "Text")]
    pub role: String,
    pub status: UserStatus,
    #[sea_orm(nullable)]
    pub first_login_at: Option<DateTime>,
    #[sea_orm(nullable)]
    pub last_login_at: Option<DateTime>,
    #[sea_orm(column_type = "Text", nullable)]
    #[serde(skip_serializing)]
    pub forgot_password_code: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    #[serde(skip_serializing)]
    pub email_verify_code: Option<String>,
    #[sea_orm(column_name = "createdAt")]
    pub created_at: DateTime,
    #[sea_orm(column_name = "deletedAt", nullable)]
    pub deleted_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_token::Entity")]
    UserToken,
}

impl Related<super::user_token::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserToken.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Full name the way it is embedded into token claims.
    pub fn full_name(&self) -> String {
        [
            self.first_name.as_deref(),
            self.middle_name.as_deref(),
            self.last_name.as_deref(),
        ]
        .iter()
        .flatten()
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
    }

    pub fn contact(&self) -> String {
        [self.country_code.as_deref(), self.contact_number.as_deref()]
            .iter()
            .flatten()
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::sea_orm_active_enums::{Gender, UserStatus};

    fn user() -> Model {
        Model {
            id: 1,
            first_name: Some("Aya".into()),
            middle_name: None,
            last_name: Some("Hassan".into()),
            username: None,
            email: "aya@example.com".into(),
            country_code: Some("+971".into()),
            contact_number: Some("501234567".into()),
            password: "hash".into(),
            gender: Gender::Female,
            role: "user".into(),
            status: UserStatus::Active,
            first_login_at: None,
            last_login_at: None,
            forgot_password_code: None,
            email_verify_code: None,
            created_at: chrono::NaiveDateTime::default(),
            deleted_at: None,
        }
    }

    #[test]
    fn full_name_skips_missing_parts() {
        assert_eq!(user().full_name(), "Aya Hassan");
    }

    #[test]
    fn serialization_hides_credentials() {
        let json = serde_json::to_value(user()).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("forgot_password_code").is_none());
        assert_eq!(json["email"], "aya@example.com");
    }
}
