//! Turn output rendering

pub mod console;
