use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Employees {
    Table,
    Id,
    FirstName,
    LastName,
    Email,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Employees::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Employees::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Employees::FirstName).text().not_null())
                    .col(ColumnDef::new(Employees::LastName).text().not_null())
                    .col(ColumnDef::new(Employees::Email).text().not_null())
                    .to_owned(),
            )
            .await?;

        // Uniqueness is checked by the service on create, not by the table.
        manager
            .create_index(
                Index::create()
                    .name("idx_employees_email")
                    .table(Employees::Table)
                    .col(Employees::Email)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Employees::Table).if_exists().to_owned())
            .await
    }
}
