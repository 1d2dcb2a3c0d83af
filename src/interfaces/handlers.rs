pub mod contact;
pub mod projects;
pub mod system;
