pub mod complaint;
pub mod contact;
pub mod user;

pub use complaint::*;
pub use contact::*;
pub use user::*;
