pub mod seed;
pub mod student;
pub mod validation;
