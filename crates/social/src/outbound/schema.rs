use app_core::error::AppError;
use app_orm::prelude::{Profiles, Users};
use sea_orm::{ConnectionTrait, DatabaseConnection, Schema};

/// Creates the `users` and `profiles` tables when they do not exist yet.
pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), AppError> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    for mut statement in [schema.create_table_from_entity(Users), schema.create_table_from_entity(Profiles)] {
        statement.if_not_exists();
        db.execute(backend.build(&statement)).await?;
    }

    tracing::info!("Database schema is up to date");

    Ok(())
}
