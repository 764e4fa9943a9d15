//! Common repository traits
//!
//! Uniform CRUD signatures so services can treat repositories alike. Errors are
//! always `sqlx::Error`; the conversion to HTTP codes happens in `AppError`.

/// Inserts a row described by `CreateDTO` and returns it with its generated key
pub trait Create<Entity, CreateDTO> {
    async fn create(&self, data: &CreateDTO) -> Result<Entity, sqlx::Error>;
}

/// Reads a single row by primary key, `Ok(None)` when absent
pub trait Read<Entity, Id> {
    async fn read(&self, id: &Id) -> Result<Option<Entity>, sqlx::Error>;
}

/// Partial update: only `Some(_)` fields of `UpdateDTO` change.
/// Fails with `RowNotFound` when the row does not exist.
pub trait Update<Entity, UpdateDTO, Id> {
    async fn update(&self, id: &Id, data: &UpdateDTO) -> Result<Entity, sqlx::Error>;
}

/// Deletes a row by primary key. Returns whether a row was removed.
pub trait Delete<Id> {
    async fn delete(&self, id: &Id) -> Result<bool, sqlx::Error>;
}
