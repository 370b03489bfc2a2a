use furthest_line::{
    effect::{self, EffectError},
    svg::{LoadDocumentError, SvgDocument},
};
use std::{
    fmt::{Display, Error, Formatter},
    fs, io,
    io::Write,
    path::PathBuf,
    process,
};

mod args;

fn main() {
    let cmd_args = match args::CmdArgs::load() {
        Ok(cmd_args) => cmd_args,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    let log_env = env_logger::Env::default().default_filter_or(cmd_args.log_filter());
    env_logger::Builder::from_env(log_env).init();

    let result = Application::new(cmd_args).and_then(|mut app| app.run());

    if let Err(e) = result {
        log::error!("{}", e);
        process::exit(1);
    }
}

struct Application {
    document: SvgDocument,
    output: Option<PathBuf>,
}

impl Application {
    pub fn new(args: args::CmdArgs) -> Result<Application, ApplicationError> {
        // read the whole document, from stdin if no file was given
        let source = effect::read_document(args.input.as_deref(), io::stdin())?;

        let document = SvgDocument::parse(source, args.selection, args.layer.as_deref())?;

        Ok(Application {
            document,
            output: args.output,
        })
    }

    pub fn run(&mut self) -> Result<(), ApplicationError> {
        // buffered so a failed run leaves the output file alone
        let mut svg = vec![];
        let line = effect::apply_effect(&mut self.document, &mut svg, &mut io::stderr())?;

        if let Some(line) = line {
            log::info!("Replaced selection with a line {} long", line.length());
        }

        match &self.output {
            Some(output) => fs::write(output, svg)?,
            None => {
                let stdout = io::stdout();
                let mut handle = stdout.lock();
                handle.write_all(&svg)?;
                handle.flush()?;
            }
        }

        Ok(())
    }
}

#[derive(Debug)]
enum ApplicationError {
    IOError(io::Error),
    LoadDocumentError(LoadDocumentError),
    EffectError(EffectError),
}

impl From<io::Error> for ApplicationError {
    fn from(e: io::Error) -> Self {
        ApplicationError::IOError(e)
    }
}

impl From<LoadDocumentError> for ApplicationError {
    fn from(e: LoadDocumentError) -> Self {
        ApplicationError::LoadDocumentError(e)
    }
}

impl From<EffectError> for ApplicationError {
    fn from(e: EffectError) -> Self {
        ApplicationError::EffectError(e)
    }
}

impl Display for ApplicationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            ApplicationError::IOError(e) => f.write_fmt(format_args!("IO Error: {}", e)),
            ApplicationError::LoadDocumentError(e) => e.fmt(f),
            ApplicationError::EffectError(e) => e.fmt(f),
        }
    }
}
