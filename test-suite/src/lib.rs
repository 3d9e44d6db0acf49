pub mod common_setup;

mod borrowing;
mod lending;
