//! Provider abstractions for the road catalog and traffic status lookups.

pub mod road_catalog;
pub mod traffic_status;
