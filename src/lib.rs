//! This crate provides forward– and reverse-geocoding against the
//! [OpenCage Geocoding API](https://opencagedata.com/api).
//!
//! The [`Opencage`](struct.Opencage.html) client implements the `Forward` and
//! `Reverse` traits, which return plain points and addresses, and offers
//! `forward_full` / `reverse_full` for the complete decoded
//! [`OpencageResponse`](opencage/struct.OpencageResponse.html): status, quota,
//! ranked results with their address components and annotations.
//!
//! Fields the typed model does not cover can still be read from the parsed
//! document with a dotted [path](path/index.html), e.g.
//! `annotations.currency.alternate_symbols.0`.
//!
//! ### A note on Coordinate Order
//! OpenCage specifies coordinates in `[Latitude, Longitude]` order, which is what
//! [`LatLng`](coords/struct.LatLng.html) holds. The `Forward` and `Reverse` traits
//! follow the `Geocoding` convention and use [`Point`](struct.Point.html) data in
//! `[Longitude, Latitude]` (`x, y`) order.
//!
//! ### Usage of rustls
//!
//! If you like to use [rustls](https://github.com/ctz/rustls) instead of OpenSSL
//! you can enable the `rustls-tls` feature in your `Cargo.toml`:
//!
//!```toml
//![dependencies]
//!ocgeo = { version = "*", default-features = false, features = ["blocking", "rustls-tls"] }
//!```

static UA_STRING: &str = concat!("Rust-Opencage/", env!("CARGO_PKG_VERSION"));

pub use geo_types::{Coordinate, Point};
use serde::{Deserialize, Serialize};

mod error;
pub use crate::error::GeocodingError;

#[cfg(feature = "blocking")]
pub mod blocking;
#[cfg(feature = "blocking")]
pub use crate::blocking::{Forward, Reverse, Transport};

// Latitude/longitude primitives
pub mod coords;

// Dotted-path access to the raw JSON
pub mod path;

// The OpenCage request and response model
pub mod opencage;
#[cfg(feature = "blocking")]
pub use crate::blocking::opencage::Opencage;
