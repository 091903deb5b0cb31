pub mod domain;
pub mod program;
