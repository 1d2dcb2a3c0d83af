pub mod contact;
pub mod pagination;
pub mod project;
pub mod technology;
pub mod validators;
