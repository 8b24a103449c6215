pub mod compare;
pub mod health;
pub mod instruments;
pub mod safety;
pub mod scoring;
