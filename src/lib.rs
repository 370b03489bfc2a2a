//! Replaces a selection of paths with a single straight line joining the two
//! nodes that lie furthest apart.
//!
//! The geometry lives in [`furthest_pair`]. The editor it runs against is the
//! [`host::Host`] trait; [`svg::SvgDocument`] implements it for SVG files and
//! [`effect`] runs it the way the command line does.

pub mod effect;
pub mod furthest_pair;
pub mod host;
pub mod path_util;
pub mod style;
pub mod svg;
pub mod transform;
