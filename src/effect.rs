use crate::{
    host::{self, HostError, ReplaceError, ResultLine},
    svg::SvgDocument,
};
use std::{
    fmt::{Display, Error, Formatter},
    fs::create_dir_all,
    io,
    io::{Read, Write},
    path::{Path, PathBuf},
};

/// The input file named on the command line. A missing input or `-` means
/// stdin.
pub fn input_path(argument: Option<&str>) -> Option<PathBuf> {
    argument.filter(|input| *input != "-").map(PathBuf::from)
}

/// Reads the whole document from `input`, or from `stdin` when there is no
/// input file.
pub fn read_document<R: Read>(input: Option<&Path>, mut stdin: R) -> io::Result<String> {
    match input {
        Some(input) => std::fs::read_to_string(input),
        None => {
            let mut source = String::new();
            stdin.read_to_string(&mut source)?;
            Ok(source)
        }
    }
}

/// Creates the parent directories of an output file if they do not exist yet.
pub fn create_parent_dirs(output: &Path) -> io::Result<()> {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            create_dir_all(parent)?;
        }
    }

    Ok(())
}

/// Runs the replacement and writes the resulting document to `output`.
///
/// When the selection cannot be turned into a line, the reason goes to
/// `messages` and the document is written unchanged. Host failures write
/// nothing.
pub fn apply_effect<W: Write, M: Write>(
    document: &mut SvgDocument,
    output: &mut W,
    messages: &mut M,
) -> Result<Option<ResultLine>, EffectError> {
    let line = match host::replace_with_line(document) {
        Ok(line) => Some(line),
        Err(ReplaceError::Host(e)) => return Err(EffectError::HostError(e)),
        Err(e) => {
            writeln!(messages, "{}", e)?;
            None
        }
    };

    output.write_all(document.to_svg().as_bytes())?;
    output.flush()?;

    Ok(line)
}

#[derive(Debug)]
pub enum EffectError {
    IOError(io::Error),
    HostError(HostError),
}

impl From<io::Error> for EffectError {
    fn from(e: io::Error) -> Self {
        EffectError::IOError(e)
    }
}

impl Display for EffectError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            EffectError::IOError(e) => f.write_fmt(format_args!("IO Error: {}", e)),
            EffectError::HostError(e) => e.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"<svg xmlns="http://www.w3.org/2000/svg"><path id="p" style="stroke:red" d="M 0 0 L 3 4"/><path id="bad" d="M 0 0 Lx"/><rect id="r"/></svg>"#;

    fn document(selection: &[&str]) -> SvgDocument {
        SvgDocument::parse(
            SOURCE.to_owned(),
            selection.iter().map(|s| s.to_string()).collect(),
            None,
        )
        .unwrap()
    }

    #[test]
    fn success_writes_edited_document() {
        let mut output = vec![];
        let mut messages = vec![];

        let line = apply_effect(&mut document(&["p"]), &mut output, &mut messages).unwrap();

        assert_eq!(line.map(|line| line.length()), Some(5.0));
        assert!(messages.is_empty());
        assert_eq!(
            String::from_utf8(output).unwrap(),
            r#"<svg xmlns="http://www.w3.org/2000/svg"><path id="bad" d="M 0 0 Lx"/><rect id="r"/><path id="furthest-line" style="stroke:red" d="M 0,0 L 3,4"/></svg>"#
        );
    }

    #[test]
    fn guard_error_writes_message_and_unchanged_document() {
        let mut output = vec![];
        let mut messages = vec![];

        let line = apply_effect(&mut document(&["r"]), &mut output, &mut messages).unwrap();

        assert!(line.is_none());
        assert_eq!(
            String::from_utf8(messages).unwrap(),
            "Please select at least one path.\n"
        );
        assert_eq!(String::from_utf8(output).unwrap(), SOURCE);
    }

    #[test]
    fn host_error_writes_nothing() {
        let mut output = vec![];
        let mut messages = vec![];

        let result = apply_effect(&mut document(&["p", "bad"]), &mut output, &mut messages);

        assert!(matches!(
            result,
            Err(EffectError::HostError(HostError::InvalidPathData { .. }))
        ));
        assert!(output.is_empty());
        assert!(messages.is_empty());
    }

    #[test]
    fn dash_and_missing_input_mean_stdin() {
        assert_eq!(input_path(None), None);
        assert_eq!(input_path(Some("-")), None);
        assert_eq!(input_path(Some("in.svg")), Some(PathBuf::from("in.svg")));

        let source = read_document(None, SOURCE.as_bytes()).unwrap();
        assert_eq!(source, SOURCE);
    }

    #[test]
    fn output_parents_are_created() {
        let root = std::env::temp_dir().join(format!("furthest-line-parents-{}", std::process::id()));
        let output = root.join("nested").join("deeper").join("out.svg");

        create_parent_dirs(&output).unwrap();

        assert!(output.parent().unwrap().is_dir());
        create_parent_dirs(Path::new("out.svg")).unwrap();
        std::fs::remove_dir_all(&root).unwrap();
    }
}
