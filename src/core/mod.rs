// Record types, storage and shared errors
pub mod models {
    pub use crate::models::*;
}

pub mod storage {
    pub use crate::db_storage::*;
}

pub mod uploads {
    pub use crate::uploads::*;
}

pub mod errors {
    pub use crate::errors::*;
}
