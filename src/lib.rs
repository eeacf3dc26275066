#![crate_name = "ts2c"]

#[macro_use]
extern crate lazy_static;

pub mod expr_compiler;
