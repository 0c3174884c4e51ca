// Thin namespace wrapper for HTTP-facing components
pub mod fleet {
    pub use crate::handlers::*;
}

pub mod intake {
    pub use crate::intake_handler::*;
}

pub mod routes {
    pub use crate::routes::*;
}
