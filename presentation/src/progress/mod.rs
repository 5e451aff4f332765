//! Progress reporting while providers answer

pub mod reporter;
