//! Trondheim bus departure server.
//!
//! A JSON API over AtB's InfoTransit service: lists bus stops and the
//! upcoming departures from each, caching both so AtB is not asked for the
//! same data on every request.

pub mod atb;
pub mod cache;
pub mod config;
pub mod domain;
pub mod store;
pub mod web;
