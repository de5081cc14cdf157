use sea_orm::entity::prelude::*;

/// Represents a user of the system.
/// Base account columns plus the role, genre and currency extension.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    pub email: String,
    /// bcrypt hash, or an unusable marker starting with `!`
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
    pub is_active: bool,
    pub is_superuser: bool,
    pub last_login: Option<DateTimeUtc>,
    pub date_joined: DateTimeUtc,
    /// Role classification. Not a foreign key.
    pub role_id: Option<i32>,
    #[sea_orm(column_type = "String(StringLen::N(50))", nullable)]
    pub genre: Option<String>,
    /// Currency classification. Not a foreign key.
    pub currency_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
