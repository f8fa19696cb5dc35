use std::path::PathBuf;

use clap::Parser;
use refasm::refgen::{GeneratorConfig, ReferenceJob, StubKind};

/// refasm - generate reference modules from .NET metadata images
#[derive(Debug, Parser)]
#[command(name = "refasm", version, about, long_about = None)]
pub struct Cli {
    /// Path to the input module.
    #[arg(value_name = "ASSEMBLY")]
    pub path: PathBuf,

    /// Output file (default: "<name>-reference.<ext>" next to the input).
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Overwrite the output if it already exists.
    #[arg(short, long)]
    pub force: bool,

    /// Keep non-public types and members; only purge bodies and cascade removals.
    #[arg(long)]
    pub keep_non_public: bool,

    /// Replace method bodies with `ret` instead of `ldnull; throw`.
    #[arg(long)]
    pub use_ret: bool,

    /// Also remove methods whose return type references a removed type.
    #[arg(long)]
    pub cascade_return_types: bool,

    /// Enable verbose (debug-level) logging output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Generator configuration selected by the flags
    pub fn config(&self) -> GeneratorConfig {
        GeneratorConfig {
            keep_non_public: self.keep_non_public,
            stub: if self.use_ret {
                StubKind::Return
            } else {
                StubKind::Throw
            },
            cascade_return_types: self.cascade_return_types,
        }
    }

    /// The job described by the command line
    pub fn job(&self) -> ReferenceJob {
        ReferenceJob {
            input: self.path.clone(),
            output: self.output.clone(),
            force: self.force,
            config: self.config(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use clap::{error::ErrorKind, CommandFactory};

    use super::*;

    #[test]
    fn command_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["refasm", "Lib.dll"]).unwrap();

        assert_eq!(cli.config(), GeneratorConfig::default());

        let job = cli.job();
        assert!(!job.force);
        assert_eq!(job.output_path(), Path::new("Lib-reference.dll"));
    }

    #[test]
    fn flags() {
        let cli = Cli::try_parse_from([
            "refasm",
            "in/Lib.dll",
            "-o",
            "out/Lib.dll",
            "-f",
            "--keep-non-public",
            "--use-ret",
            "--cascade-return-types",
            "-v",
        ])
        .unwrap();

        let config = cli.config();
        assert!(config.keep_non_public);
        assert!(config.cascade_return_types);
        assert_eq!(config.stub, StubKind::Return);
        assert!(cli.verbose);

        let job = cli.job();
        assert!(job.force);
        assert_eq!(job.output_path(), Path::new("out/Lib.dll"));
    }

    #[test]
    fn parse_errors() {
        let missing = Cli::try_parse_from(["refasm"]).unwrap_err();
        assert_eq!(missing.kind(), ErrorKind::MissingRequiredArgument);

        let unknown = Cli::try_parse_from(["refasm", "Lib.dll", "--bogus"]).unwrap_err();
        assert_eq!(unknown.kind(), ErrorKind::UnknownArgument);

        let help = Cli::try_parse_from(["refasm", "--help"]).unwrap_err();
        assert_eq!(help.kind(), ErrorKind::DisplayHelp);
    }
}
