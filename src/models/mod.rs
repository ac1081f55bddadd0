pub mod conversation;
pub mod enums;
pub mod patient;
pub mod user;

pub use conversation::{ChatRole, ChatTurn};
pub use enums::Gender;
pub use patient::{NewPatient, Patient};
pub use user::User;
