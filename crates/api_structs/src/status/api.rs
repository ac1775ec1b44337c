use serde::{Deserialize, Serialize};

pub mod get_service_health {
    use super::*;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub message: String,
        pub version: String,
    }
}

pub mod get_service_liveness {
    use super::*;

    #[derive(Deserialize, Serialize)]
    pub struct APIResponse {
        pub status: String,
    }
}
