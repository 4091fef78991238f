use entity::employees::{ActiveModel, Column, EmployeeFields, Entity as Employees, Model};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Unchanged, ColumnTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use crate::{DbError, DbPool, DbResult};

/// Persistence for the `employees` table.
///
/// The store performs no uniqueness checks; callers that need them look up
/// by email before inserting.
#[derive(Clone, Debug)]
pub struct EmployeeStore {
    pool: DbPool,
}

impl EmployeeStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Persist a new record; the database assigns the id.
    pub async fn insert(&self, fields: EmployeeFields) -> DbResult<Model> {
        let model = ActiveModel {
            id: NotSet,
            first_name: Set(fields.first_name),
            last_name: Set(fields.last_name),
            email: Set(fields.email),
        };
        Ok(model.insert(&self.pool).await?)
    }

    /// All records, ordered by id.
    pub async fn find_all(&self) -> DbResult<Vec<Model>> {
        Ok(Employees::find()
            .order_by_asc(Column::Id)
            .all(&self.pool)
            .await?)
    }

    pub async fn find_by_id(&self, id: i64) -> DbResult<Option<Model>> {
        Ok(Employees::find_by_id(id).one(&self.pool).await?)
    }

    /// Exact, case-sensitive match.
    pub async fn find_by_email(&self, email: &str) -> DbResult<Option<Model>> {
        Ok(Employees::find()
            .filter(Column::Email.eq(email))
            .one(&self.pool)
            .await?)
    }

    pub async fn find_by_name(&self, first_name: &str, last_name: &str) -> DbResult<Option<Model>> {
        Ok(Employees::find()
            .filter(Column::FirstName.eq(first_name))
            .filter(Column::LastName.eq(last_name))
            .order_by_asc(Column::Id)
            .one(&self.pool)
            .await?)
    }

    /// Overwrite every mutable field of an existing record.
    pub async fn save(&self, model: Model) -> DbResult<Model> {
        let id = model.id;
        let active = ActiveModel {
            id: Unchanged(id),
            first_name: Set(model.first_name),
            last_name: Set(model.last_name),
            email: Set(model.email),
        };
        active.update(&self.pool).await.map_err(|err| match err {
            DbErr::RecordNotUpdated | DbErr::RecordNotFound(_) => DbError::NotFound(id),
            other => DbError::Query(other),
        })
    }

    /// Idempotent: deleting a missing id is not an error.
    pub async fn delete_by_id(&self, id: i64) -> DbResult<()> {
        let result = Employees::delete_by_id(id).exec(&self.pool).await?;
        if result.rows_affected == 0 {
            tracing::debug!(id, "delete matched no employee");
        }
        Ok(())
    }

    pub async fn count(&self) -> DbResult<u64> {
        Ok(Employees::find().count(&self.pool).await?)
    }
}
