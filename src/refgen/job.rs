//! Single file generation: path handling, existence checks, load, generate and write.

use std::{
    ffi::{OsStr, OsString},
    path::{Path, PathBuf},
};

use log::info;

use crate::{
    metadata::module::Module,
    refgen::{GenerationStats, GeneratorConfig, ReferenceGenerator},
    Error, Result,
};

/// Suffix appended to the input file stem when no output path is given
pub const REFERENCE_SUFFIX: &str = "-reference";

/// Output path used when none is given: the input's file name with [`REFERENCE_SUFFIX`]
/// inserted before the extension, in the same directory.
///
/// ```rust
/// use refasm::refgen::default_output_path;
/// use std::path::Path;
///
/// assert_eq!(
///     default_output_path(Path::new("lib/Foo.dll")),
///     Path::new("lib/Foo-reference.dll")
/// );
/// assert_eq!(default_output_path(Path::new("Foo")), Path::new("Foo-reference"));
/// ```
#[must_use]
pub fn default_output_path(input: &Path) -> PathBuf {
    let mut name = input
        .file_stem()
        .map_or_else(|| OsString::from("output"), OsStr::to_os_string);
    name.push(REFERENCE_SUFFIX);
    if let Some(ext) = input.extension() {
        name.push(".");
        name.push(ext);
    }

    input.parent().unwrap_or(Path::new("")).join(name)
}

/// Outcome of a successful [`ReferenceJob::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSummary {
    /// Path the reference module was written to
    pub output: PathBuf,
    /// Counters of the generation run
    pub stats: GenerationStats,
}

/// Generate one reference module from an input file.
///
/// # Examples
///
/// ```rust,no_run
/// use refasm::refgen::{GeneratorConfig, ReferenceJob};
/// use std::path::PathBuf;
///
/// let mut job = ReferenceJob::new(PathBuf::from("Library.dll"), GeneratorConfig::default());
/// job.force = true;
///
/// let summary = job.run()?;
/// println!("{} ({})", summary.output.display(), summary.stats);
/// # Ok::<(), refasm::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct ReferenceJob {
    /// Input module
    pub input: PathBuf,
    /// Explicit output path, [`default_output_path`] otherwise
    pub output: Option<PathBuf>,
    /// Overwrite an existing output
    pub force: bool,
    /// Generator configuration
    pub config: GeneratorConfig,
}

impl ReferenceJob {
    /// Create a job writing to the default output path without overwriting
    #[must_use]
    pub fn new(input: PathBuf, config: GeneratorConfig) -> Self {
        ReferenceJob {
            input,
            output: None,
            force: false,
            config,
        }
    }

    /// Resolved output path
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| default_output_path(&self.input))
    }

    /// Run the job.
    ///
    /// Nothing is written unless the whole module was loaded and serialized; the output
    /// appears atomically.
    ///
    /// # Errors
    /// - [`Error::InputNotFound`] if the input is not a file
    /// - [`Error::OutputExists`] if the output exists and `force` is not set
    /// - codec errors from loading or serializing the module
    /// - [`Error::WriteFailed`] if the output cannot be written
    pub fn run(&self) -> Result<JobSummary> {
        if !self.input.is_file() {
            return Err(Error::InputNotFound(self.input.clone()));
        }

        let output = self.output_path();
        if output.exists() && !self.force {
            return Err(Error::OutputExists(output));
        }

        let mut module = Module::from_file(&self.input)?;
        let stats = ReferenceGenerator::new(self.config).generate(&mut module);
        module.write_to(&output)?;

        info!(
            "Wrote reference module {} -> {}",
            self.input.display(),
            output.display()
        );

        Ok(JobSummary { output, stats })
    }
}
