// Domain-layer workflows and shared errors/models
pub mod search {
    pub use crate::search::*;
}

pub mod prediction {
    pub use crate::prediction::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod errors {
    pub use crate::errors::*;
}
