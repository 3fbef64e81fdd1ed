#![allow(dead_code)]

pub mod boards;
