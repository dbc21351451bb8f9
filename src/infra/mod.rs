//! Concrete provider clients.

pub mod amap;
