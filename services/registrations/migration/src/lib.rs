use sea_orm_migration::prelude::*;

mod m20250901_000001_create_registrations;
mod m20250901_000002_add_created_at_index;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000001_create_registrations::Migration),
            Box::new(m20250901_000002_add_created_at_index::Migration),
        ]
    }
}
