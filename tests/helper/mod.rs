#![allow(dead_code)]

pub mod manifest;

pub use manifest::*;
