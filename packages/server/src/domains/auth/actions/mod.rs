//! Auth domain actions - business logic functions

mod login;
mod register;

pub use login::{admin_login, login};
pub use register::{register, AuthSession};
