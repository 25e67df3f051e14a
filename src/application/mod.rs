pub mod content;
pub mod ledger;
pub mod ops;
pub mod payments;

pub use content::*;
pub use ledger::*;
pub use ops::*;
pub use payments::*;
