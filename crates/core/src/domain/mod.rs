pub mod package;
pub mod wizard;
