use lyon_path::{
    math::{Point, Transform},
    Event, Path,
};
use std::fmt::{Display, Error, Formatter};

/// Parses SVG path data.
fn parse_path(path_data: &str) -> Result<Path, ParseNodesError> {
    let svg_builder = Path::builder().with_svg();
    let path = lyon_svg::path_utils::build_path(svg_builder, path_data)?;

    Ok(path)
}

/// Collects the on-curve nodes of a path: the start of each subpath and the
/// end of every segment. Control points are skipped.
fn path_nodes(path: &Path) -> Vec<Point> {
    let mut nodes = vec![];

    for event in path.iter() {
        match event {
            Event::Begin { at } => nodes.push(at),
            Event::Line { to, .. } => nodes.push(to),
            Event::Quadratic { to, .. } => nodes.push(to),
            Event::Cubic { to, .. } => nodes.push(to),
            Event::End { .. } => {}
        }
    }

    nodes
}

/// Parses path data and returns its nodes mapped through `transform`.
pub fn transformed_nodes(
    path_data: &str,
    transform: &Transform,
) -> Result<Vec<Point>, ParseNodesError> {
    let path = parse_path(path_data)?;

    Ok(path_nodes(&path)
        .into_iter()
        .map(|node| transform.transform_point(node))
        .collect())
}

/// Writes the path data of a single straight segment.
pub fn line_path_data(from: Point, to: Point) -> String {
    // adding zero turns -0 into 0
    format!(
        "M {},{} L {},{}",
        from.x + 0.0,
        from.y + 0.0,
        to.x + 0.0,
        to.y + 0.0
    )
}

#[derive(Debug, Clone)]
pub enum ParseNodesError {
    ParsePathError(lyon_svg::path_utils::ParseError),
}

impl From<lyon_svg::path_utils::ParseError> for ParseNodesError {
    fn from(e: lyon_svg::path_utils::ParseError) -> Self {
        ParseNodesError::ParsePathError(e)
    }
}

impl Display for ParseNodesError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            ParseNodesError::ParsePathError(e) => {
                f.write_fmt(format_args!("Unable to parse path data: {:?}", e))
            }
        }
    }
}
