mod subscription;
mod token;
mod user;

pub use subscription::*;
pub use token::*;
pub use user::*;
