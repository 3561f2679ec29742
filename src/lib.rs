pub mod config;
pub mod constants;
pub mod download;
pub mod ephemeris;
pub mod epoch;
pub mod errors;
pub mod kepler;
pub mod mpcorb;
pub mod night;
pub mod observer;
pub mod query;
pub mod store;
pub mod transforms;
pub mod visibility;
