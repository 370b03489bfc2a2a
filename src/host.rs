use crate::{
    furthest_pair::{furthest_pair, FurthestPairError},
    path_util::ParseNodesError,
    style::Style,
    transform::ParseTransformError,
};
use lyon_path::math::{Point, Transform};
use std::fmt::{Display, Error, Formatter};

/// The editor capabilities the replace operation needs.
pub trait Host {
    type Shape;

    /// Selected shapes that are paths, in selection order.
    fn selected_paths(&self) -> Vec<Self::Shape>;

    /// The transform from a shape's own coordinates to document coordinates.
    fn composed_transform(&self, shape: &Self::Shape) -> Result<Transform, HostError>;

    /// The nodes of a shape's path with `transform` applied.
    fn nodes(&self, shape: &Self::Shape, transform: &Transform) -> Result<Vec<Point>, HostError>;

    fn style(&self, shape: &Self::Shape) -> Style;

    /// Adds a line to the active layer, or to the document root when there is
    /// no layer. The line's endpoints are in document coordinates.
    fn insert_line(&mut self, line: &ResultLine) -> Result<(), HostError>;

    fn remove(&mut self, shape: &Self::Shape) -> Result<(), HostError>;
}

/// A straight two-point path.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultLine {
    pub from: Point,
    pub to: Point,
    pub style: Style,
}

impl ResultLine {
    pub fn length(&self) -> f32 {
        (self.to - self.from).length()
    }
}

/// Replaces the selected paths with one line between the two nodes that lie
/// furthest apart. Nothing in the document changes unless this succeeds.
pub fn replace_with_line<H: Host>(host: &mut H) -> Result<ResultLine, ReplaceError> {
    let paths = host.selected_paths();
    if paths.is_empty() {
        return Err(ReplaceError::NoPathsSelected);
    }

    let mut nodes = vec![];
    for path in paths.iter() {
        let transform = host.composed_transform(path)?;
        nodes.extend(host.nodes(path, &transform)?);
    }

    log::debug!(
        "Collected {} nodes from {} selected paths",
        nodes.len(),
        paths.len()
    );

    let pair = furthest_pair(&nodes)?;

    log::info!(
        "Furthest nodes are #{} ({}, {}) and #{} ({}, {}), {} apart",
        pair.first_index,
        pair.first.x,
        pair.first.y,
        pair.second_index,
        pair.second.x,
        pair.second.y,
        pair.distance()
    );

    let line = ResultLine {
        from: pair.first,
        to: pair.second,
        style: host.style(&paths[0]),
    };

    log::debug!(
        "New line takes stroke '{}' from the first selected path",
        line.style.get("stroke").unwrap_or("none")
    );

    host.insert_line(&line)?;

    for path in paths.iter() {
        host.remove(path)?;
    }

    Ok(line)
}

#[derive(Debug, Clone)]
pub enum HostError {
    InvalidTransform {
        element: String,
        cause: ParseTransformError,
    },
    InvalidPathData {
        element: String,
        cause: ParseNodesError,
    },
    NonInvertibleLayer(String),
    UnknownShape,
}

#[derive(Debug, Clone)]
pub enum ReplaceError {
    NoPathsSelected,
    InsufficientPoints,
    NoPairFound,
    Host(HostError),
}

impl From<HostError> for ReplaceError {
    fn from(e: HostError) -> Self {
        ReplaceError::Host(e)
    }
}

impl From<FurthestPairError> for ReplaceError {
    fn from(e: FurthestPairError) -> Self {
        match e {
            FurthestPairError::InsufficientPoints(_) => ReplaceError::InsufficientPoints,
            FurthestPairError::NoPairFound => ReplaceError::NoPairFound,
        }
    }
}

impl Display for HostError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            HostError::InvalidTransform { element, cause } => {
                f.write_fmt(format_args!("Bad transform on '{}': {}", element, cause))
            }
            HostError::InvalidPathData { element, cause } => {
                f.write_fmt(format_args!("Bad path data on '{}': {}", element, cause))
            }
            HostError::NonInvertibleLayer(layer) => f.write_fmt(format_args!(
                "The transform of layer '{}' cannot be inverted",
                layer
            )),
            HostError::UnknownShape => f.write_str("The shape is not in the document"),
        }
    }
}

impl Display for ReplaceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            ReplaceError::NoPathsSelected => f.write_str("Please select at least one path."),
            ReplaceError::InsufficientPoints => {
                f.write_str("Need at least two nodes to create a line.")
            }
            ReplaceError::NoPairFound => f.write_str("Could not find the furthest nodes."),
            ReplaceError::Host(e) => e.fmt(f),
        }
    }
}
