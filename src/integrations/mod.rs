//! Remote service and platform integrations.

pub mod facility_client {
    pub use crate::facility_client::*;
}

pub mod prediction_client {
    pub use crate::prediction_client::*;
}

pub mod recommendation_client {
    pub use crate::recommendation_client::*;
}

pub mod health_probe {
    pub use crate::health_probe::*;
}

pub mod geolocation {
    pub use crate::geolocation::*;
}
