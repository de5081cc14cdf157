//! This file serves as the root for all SeaORM entity modules.

pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::user::Entity as User;
}

#[cfg(test)]
mod test {
    use chrono::Utc;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, DbErr, EntityTrait, Set};

    use super::*;
    use prelude::*;

    async fn setup_db() -> Result<DatabaseConnection, DbErr> {
        let db = Database::connect("sqlite::memory:").await?;
        Migrator::up(&db, None).await.expect("Migrations failed.");
        Ok(db)
    }

    fn new_user(username: &str) -> user::ActiveModel {
        user::ActiveModel {
            username: Set(username.to_string()),
            email: Set(String::new()),
            password: Set("!".to_string()),
            first_name: Set(String::new()),
            last_name: Set(String::new()),
            is_staff: Set(false),
            is_active: Set(true),
            is_superuser: Set(false),
            last_login: Set(None),
            date_joined: Set(Utc::now()),
            role_id: Set(None),
            genre: Set(None),
            currency_id: Set(None),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_entity_integration() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let mut artist = new_user("artist");
        artist.role_id = Set(Some(4));
        artist.genre = Set(Some("Shoegaze".to_string()));
        artist.currency_id = Set(Some(2));
        let artist = artist.insert(&db).await?;

        new_user("customer").insert(&db).await?;

        let users = User::find().all(&db).await?;
        assert_eq!(users.len(), 2);

        let stored = User::find_by_id(artist.id).one(&db).await?.unwrap();
        assert_eq!(stored.role_id, Some(4));
        assert_eq!(stored.genre.as_deref(), Some("Shoegaze"));
        assert_eq!(stored.currency_id, Some(2));

        let customer = users.iter().find(|u| u.username == "customer").unwrap();
        assert_eq!(customer.role_id, None);
        assert_eq!(customer.genre, None);
        assert_eq!(customer.currency_id, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_username_unique_index() -> Result<(), DbErr> {
        let db = setup_db().await?;

        new_user("taken").insert(&db).await?;
        let duplicate = new_user("taken").insert(&db).await;

        assert!(duplicate.is_err());
        assert_eq!(User::find().all(&db).await?.len(), 1);
        Ok(())
    }
}
