//! Template compilation, route registration and request dispatch.
//!
//! - [`Pattern`] compiles `{name}` templates into anchored regular expressions.
//! - [`Route`] pairs a verb and a pattern with a handler.
//! - [`Router`] keeps routes in registration order and dispatches to the first match.
//! - [`Params`] carries the merged path and query parameters of one request.

mod handler;
mod method;
mod params;
mod pattern;
mod route;
mod router;

pub use method::parse_verb;
pub use params::{Params, get_params};
pub use pattern::{LiteralMode, Pattern};
pub use route::Route;
pub use router::{Router, RouterService};

#[cfg(test)]
mod tests;
