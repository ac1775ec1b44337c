mod reminder;
mod shared;
mod status;

pub mod dtos {
    pub use crate::reminder::dtos::*;
}

pub use crate::reminder::api::*;
pub use crate::status::api::*;
