use serde::{Deserialize, Serialize};

mod contact;
mod health_check;
mod repos;
mod sitemap;
mod subscriptions;

pub use contact::*;
pub use health_check::*;
pub use repos::*;
pub use sitemap::*;
pub use subscriptions::*;

/// JSON body of every successful call that has nothing else to return.
#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

impl SuccessResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
