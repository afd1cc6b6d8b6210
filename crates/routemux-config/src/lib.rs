//! Route files and factory routes for routemux components.
//!
//! A route file is the offline, human-editable form of a routing
//! configuration. It converts to the validated core model and to the binary
//! blob a component accepts through its set-data command.
//!
//! # Example
//!
//! ```rust,no_run
//! use routemux_config::{RouteFile, Role, StreamEntry, get_factory_route};
//!
//! let route = RouteFile::load("split.toml").unwrap();
//! let blob = route.to_blob().unwrap();
//!
//! let custom = RouteFile::new("swap", Role::Demux, 2)
//!     .with_description("Swap left and right")
//!     .with_stream(StreamEntry::new(1, [0b10, 0b01]));
//! custom.save("routes/swap.toml").unwrap();
//!
//! let join = get_factory_route("stereo-join").unwrap();
//! assert_eq!(join.role, Role::Mux);
//! ```

mod error;
mod route_file;

/// Factory routes bundled with the library.
pub mod factory_routes;

pub use error::ConfigError;
pub use factory_routes::{
    FACTORY_ROUTE_NAMES, factory_route_names, factory_routes, find_route, get_factory_route,
    is_factory_route,
};
pub use route_file::{Role, RouteFile, StreamEntry};
