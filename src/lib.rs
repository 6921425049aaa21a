//! ADIF contact logs to plottable stations.
//!
//! Raw text goes through [`adif::parse_adif`], repeated contacts are folded
//! by [`aggregate::aggregate`], and [`pipeline::LoadedLog::map_view`]
//! resolves positions ([`resolve`], [`locator`]) and path geometry
//! ([`geodesy`]) against an optional [`model::HomeLocation`].

pub mod adif;
pub mod aggregate;
pub mod csv_out;
pub mod errors;
pub mod filter;
pub mod geodesy;
pub mod locator;
pub mod model;
pub mod pipeline;
pub mod resolve;

pub use errors::AppError;
pub use model::{AggregateRecord, GeoPoint, HomeLocation, RawRecord};
pub use pipeline::{LoadedLog, MapView};
