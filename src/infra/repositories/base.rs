//! Query helpers shared by every repository.
//!
//! Functions here are generic over [`ConnectionTrait`] so the same code runs
//! against the pooled connection and inside a unit-of-work transaction.

use sea_orm::{
    ConnectionTrait, DeleteResult, EntityTrait, FromQueryResult, PaginatorTrait,
    PrimaryKeyTrait, Select,
};

use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

/// Fetch one page of `select` together with the total row count.
///
/// The offset is checked before the paginator multiplies it out.
pub(crate) async fn fetch_page<E, C>(
    select: Select<E>,
    db: &C,
    params: &PaginationParams,
) -> AppResult<(Vec<E::Model>, u64)>
where
    E: EntityTrait,
    E::Model: FromQueryResult + Send + Sync,
    C: ConnectionTrait,
{
    params.offset()?;
    let paginator = select.paginate(db, params.limit());
    let total = paginator.num_items().await?;
    let data = paginator.fetch_page(params.page_index()).await?;
    Ok((data, total))
}

/// Count rows matched by `select`.
pub(crate) async fn count<E, C>(select: Select<E>, db: &C) -> AppResult<u64>
where
    E: EntityTrait,
    E::Model: FromQueryResult + Send + Sync,
    C: ConnectionTrait,
{
    select.count(db).await.map_err(Into::into)
}

/// Delete a row by primary key; a missing row is `NotFound`.
pub(crate) async fn delete_by_id<E, C>(
    id: <E::PrimaryKey as PrimaryKeyTrait>::ValueType,
    db: &C,
) -> AppResult<()>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    let result: DeleteResult = E::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}

/// The one row a write just produced, read back with its relations.
pub(crate) fn single<T>(mut rows: Vec<T>) -> AppResult<T> {
    rows.pop()
        .ok_or_else(|| AppError::internal("written row could not be read back"))
}
