use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use uuid::Uuid;

use crate::error::AppError;

/// A record kept in a [`Collection`], addressed by its immutable identifier.
pub trait Document: Clone {
    fn id(&self) -> Uuid;
}

/// In-process collection preserving insertion order.
#[derive(Debug)]
pub struct Collection<T> {
    docs: RwLock<Vec<T>>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            docs: RwLock::new(Vec::new()),
        }
    }
}

impl<T: Document> Collection<T> {
    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<T>>, AppError> {
        self.docs
            .read()
            .map_err(|_| AppError::StoreUnavailable("memory collection poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<T>>, AppError> {
        self.docs
            .write()
            .map_err(|_| AppError::StoreUnavailable("memory collection poisoned".into()))
    }

    pub fn find_all(&self) -> Result<Vec<T>, AppError> {
        Ok(self.read()?.clone())
    }

    pub fn find_by_id(&self, id: Uuid) -> Result<Option<T>, AppError> {
        Ok(self.read()?.iter().find(|doc| doc.id() == id).cloned())
    }

    pub fn insert(&self, doc: T) -> Result<T, AppError> {
        let mut docs = self.write()?;
        if docs.iter().any(|d| d.id() == doc.id()) {
            return Err(AppError::StoreUnavailable(format!(
                "duplicate identifier {}",
                doc.id()
            )));
        }
        docs.push(doc.clone());
        Ok(doc)
    }

    /// Applies `change` to the matching document and returns its new state.
    pub fn update_by_id<F>(&self, id: Uuid, change: F) -> Result<Option<T>, AppError>
    where
        F: FnOnce(&mut T),
    {
        let mut docs = self.write()?;
        Ok(docs.iter_mut().find(|doc| doc.id() == id).map(|doc| {
            change(doc);
            doc.clone()
        }))
    }

    pub fn delete_by_id(&self, id: Uuid) -> Result<Option<T>, AppError> {
        let mut docs = self.write()?;
        Ok(docs
            .iter()
            .position(|doc| doc.id() == id)
            .map(|idx| docs.remove(idx)))
    }
}
