use lyon_path::math::Transform;
use regex::Regex;
use std::fmt::{Display, Error, Formatter};

lazy_static::lazy_static! {
    static ref FUNCTION_REGEX: Regex =
        Regex::new(r"([A-Za-z]+)\s*\(([^)]*)\)").unwrap();
    static ref SEPARATOR_REGEX: Regex = Regex::new(r"^[\s,]*$").unwrap();
    static ref NUMBER_REGEX: Regex =
        Regex::new(r"[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?").unwrap();
}

/// Parses an SVG `transform` attribute into a single affine transform.
///
/// The functions of a list apply right to left, so `translate(5) scale(2)`
/// scales first and translates second.
pub fn parse_transform(string: &str) -> Result<Transform, ParseTransformError> {
    let mut functions = vec![];
    let mut last_end = 0;

    for captures in FUNCTION_REGEX.captures_iter(string) {
        let whole = captures.get(0).unwrap();
        if !SEPARATOR_REGEX.is_match(&string[last_end..whole.start()]) {
            return Err(ParseTransformError::UnexpectedText(
                string[last_end..whole.start()].trim().to_owned(),
            ));
        }
        last_end = whole.end();

        let arguments = parse_arguments(&captures[2])?;
        functions.push(build_function(&captures[1], &arguments)?);
    }

    if !SEPARATOR_REGEX.is_match(&string[last_end..]) {
        return Err(ParseTransformError::UnexpectedText(
            string[last_end..].trim().to_owned(),
        ));
    }

    Ok(functions
        .iter()
        .rev()
        .fold(Transform::identity(), |acc, function| acc.post_transform(function)))
}

/// Splits an argument list into numbers. A sign starts a new number, so
/// `10-5` is two arguments.
fn parse_arguments(string: &str) -> Result<Vec<f32>, ParseTransformError> {
    let mut arguments = vec![];
    let mut last_end = 0;

    for number in NUMBER_REGEX.find_iter(string) {
        let gap = &string[last_end..number.start()];
        if !SEPARATOR_REGEX.is_match(gap) {
            return Err(ParseTransformError::InvalidNumber(gap.trim().to_owned()));
        }
        last_end = number.end();

        let value = number
            .as_str()
            .parse::<f32>()
            .map_err(|_| ParseTransformError::InvalidNumber(number.as_str().to_owned()))?;
        arguments.push(value);
    }

    let rest = &string[last_end..];
    if !SEPARATOR_REGEX.is_match(rest) {
        return Err(ParseTransformError::InvalidNumber(rest.trim().to_owned()));
    }

    Ok(arguments)
}

fn build_function(name: &str, args: &[f32]) -> Result<Transform, ParseTransformError> {
    let transform = match (name, args) {
        ("matrix", &[a, b, c, d, e, f]) => Transform::row_major(a, b, c, d, e, f),
        ("translate", &[tx]) => Transform::create_translation(tx, 0.0),
        ("translate", &[tx, ty]) => Transform::create_translation(tx, ty),
        ("scale", &[s]) => Transform::create_scale(s, s),
        ("scale", &[sx, sy]) => Transform::create_scale(sx, sy),
        ("rotate", &[angle]) => rotation(angle),
        ("rotate", &[angle, cx, cy]) => Transform::create_translation(-cx, -cy)
            .post_transform(&rotation(angle))
            .post_transform(&Transform::create_translation(cx, cy)),
        ("skewX", &[angle]) => {
            Transform::row_major(1.0, 0.0, angle.to_radians().tan(), 1.0, 0.0, 0.0)
        }
        ("skewY", &[angle]) => {
            Transform::row_major(1.0, angle.to_radians().tan(), 0.0, 1.0, 0.0, 0.0)
        }
        ("matrix", _) | ("translate", _) | ("scale", _) | ("rotate", _) | ("skewX", _)
        | ("skewY", _) => {
            return Err(ParseTransformError::WrongArgumentCount {
                function: name.to_owned(),
                count: args.len(),
            })
        }
        _ => return Err(ParseTransformError::UnknownFunction(name.to_owned())),
    };

    Ok(transform)
}

// positive angles turn +x towards +y, as SVG's rotate() does
fn rotation(degrees: f32) -> Transform {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Transform::row_major(cos, sin, -sin, cos, 0.0, 0.0)
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParseTransformError {
    UnknownFunction(String),
    WrongArgumentCount { function: String, count: usize },
    InvalidNumber(String),
    UnexpectedText(String),
}

impl Display for ParseTransformError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            ParseTransformError::UnknownFunction(name) => {
                f.write_fmt(format_args!("Unknown transform function '{}'", name))
            }
            ParseTransformError::WrongArgumentCount { function, count } => f.write_fmt(
                format_args!("Transform function '{}' cannot take {} arguments", function, count),
            ),
            ParseTransformError::InvalidNumber(text) => {
                f.write_fmt(format_args!("Invalid number '{}' in transform", text))
            }
            ParseTransformError::UnexpectedText(text) => {
                f.write_fmt(format_args!("Unexpected text '{}' in transform", text))
            }
        }
    }
}
