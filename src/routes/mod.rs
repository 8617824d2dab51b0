mod health_check;
mod sessions;
mod sign_check;
mod subscriptions;

pub use health_check::*;
pub use sessions::*;
pub use sign_check::*;
pub use subscriptions::*;
