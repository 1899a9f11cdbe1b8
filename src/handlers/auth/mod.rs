pub mod login;
pub mod logout;
pub mod me;

pub use login::login;
pub use logout::logout;
pub use me::me;
