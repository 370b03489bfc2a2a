use furthest_line::effect;
use std::{
    fmt::{Display, Error, Formatter},
    io,
    path::{Path, PathBuf},
};

pub struct CmdArgs {
    pub input: Option<PathBuf>,
    pub selection: Vec<String>,
    pub layer: Option<String>,
    pub output: Option<PathBuf>,
    pub verbosity: u64,
}

impl CmdArgs {
    pub fn load() -> Result<CmdArgs, CmdArgsLoadError> {
        // load up option parser
        let options_yaml = clap::load_yaml!("options.yml");
        let matches = clap::App::from_yaml(options_yaml)
            .version(clap::crate_version!())
            .get_matches();

        // a missing input or '-' means stdin
        let input = effect::input_path(matches.value_of("input"));

        // selected ids keep their command line order
        let selection = matches
            .values_of("id")
            .map(|ids| ids.map(|id| id.to_owned()).collect())
            .unwrap_or_default();

        let layer = matches.value_of("layer").map(|layer| layer.to_owned());

        // parse the output file and create its parent directories if needed
        let output = match matches.value_of("output") {
            Some(output) => {
                let output = Path::new(output);
                effect::create_parent_dirs(output)?;
                Some(output.to_path_buf())
            }
            None => None,
        };

        let verbosity = matches.occurrences_of("verbose");

        Ok(CmdArgs {
            input,
            selection,
            layer,
            output,
            verbosity,
        })
    }

    /// The log filter implied by the verbosity flags.
    pub fn log_filter(&self) -> &'static str {
        match self.verbosity {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

#[derive(Debug)]
pub enum CmdArgsLoadError {
    IOError(io::Error),
}

impl Display for CmdArgsLoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            CmdArgsLoadError::IOError(e) => {
                f.write_fmt(format_args!("Unable to create output directory: {}", e))
            }
        }
    }
}

impl From<io::Error> for CmdArgsLoadError {
    fn from(e: io::Error) -> Self {
        CmdArgsLoadError::IOError(e)
    }
}
