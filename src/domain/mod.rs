pub mod content;
pub mod payment;
pub mod stats;
pub mod user;

pub use content::*;
pub use payment::*;
pub use stats::*;
pub use user::*;
