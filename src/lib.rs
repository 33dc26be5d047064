//! # livemap
//!
//! Live user location on a map, split into small platform-agnostic pieces.
//!
//! The platform services (map SDK, location provider, settings client,
//! permission dialog) stay behind traits; livemap supplies the logic between
//! them:
//!
//! - `location`: the availability state machine (`LocationStream`)
//!   and the settings resolution flow.
//! - `permission`: the runtime permission gate.
//! - `map`: the marker, status icon and deferred camera move.
//! - `screen`: everything above wired to a screen lifecycle.
//!
//! Use the `full` feature to enable everything.
//!
//! ## Example
//!
//! ```toml
//! [dependencies]
//! livemap = { version = "0.1", features = ["screen"] }
//! ```
//!
//! ```rust,ignore
//! use livemap::location::LocationUpdate;
//!
//! let _subscription = stream.observe(|update| match update {
//!     LocationUpdate::Available(fix) => println!("{}, {}", fix.latitude, fix.longitude),
//!     LocationUpdate::Searching => println!("searching"),
//!     LocationUpdate::Unavailable => println!("location off"),
//! });
//! ```

#[cfg(feature = "location")]
pub use livemap_location as location;

#[cfg(feature = "map")]
pub use livemap_map as map;

#[cfg(feature = "permission")]
pub use livemap_permission as permission;

#[cfg(feature = "screen")]
pub use livemap_screen as screen;
