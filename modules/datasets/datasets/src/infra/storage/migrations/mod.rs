use sea_orm_migration::prelude::*;

mod initial_001;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(initial_001::Migration)]
    }

    // Own history table so the accounts module can migrate independently.
    fn migration_table_name() -> DynIden {
        Alias::new("seaql_migrations_datasets").into_iden()
    }
}
