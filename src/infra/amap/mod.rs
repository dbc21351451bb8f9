mod client;

pub use client::AmapClient;
