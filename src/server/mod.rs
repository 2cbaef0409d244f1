// src/server/mod.rs

pub mod db;
