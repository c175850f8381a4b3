use thiserror::Error;

use crate::api::ApiError;
use crate::storage::StorageError;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session storage failed: {0}")]
    Storage(#[from] StorageError),

    #[error("Auth service request failed: {0}")]
    Api(#[from] ApiError),
}
