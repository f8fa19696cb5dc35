use std::path::PathBuf;

use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// # Error Categories
///
/// ## Image Parsing Errors
/// - [`Error::Malformed`] - Corrupted or invalid image structure
/// - [`Error::OutOfBounds`] - Attempted to read beyond the image boundaries
/// - [`Error::Empty`] - Empty input provided
/// - [`Error::RecursionLimit`] - Signature nesting exceeded the supported depth
///
/// ## Job Errors
/// - [`Error::InputNotFound`] - The input module does not exist
/// - [`Error::OutputExists`] - The output exists and overwriting was not requested
/// - [`Error::WriteFailed`] - The output could not be created, flushed or moved into place
///
/// ## I/O Errors
/// - [`Error::FileError`] - Filesystem I/O errors
///
/// # Examples
///
/// ```rust,no_run
/// use refasm::{Error, metadata::module::Module};
/// use std::path::Path;
///
/// match Module::from_file(Path::new("library.refmd")) {
///     Ok(module) => println!("Loaded {} types", module.types.len()),
///     Err(Error::Malformed { message, file, line }) => {
///         eprintln!("Malformed image: {} ({}:{})", message, file, line);
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The image is damaged and could not be parsed.
    ///
    /// The error includes the source location where the malformation was detected.
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound access was attempted while parsing the image.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,

    /// Provided input was empty.
    #[error("Provided input was empty")]
    Empty,

    /// File I/O error.
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// Signature decoding exceeded the maximum nesting depth.
    ///
    /// Protects the recursive signature parser against crafted blobs that nest
    /// element types without bound.
    #[error("Reached the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),

    /// The input module could not be found.
    ///
    /// Checked before any other work is done.
    #[error("Input module not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// The output path already exists and overwriting was not requested.
    #[error("Output already exists: {} (use --force to overwrite)", .0.display())]
    OutputExists(PathBuf),

    /// Writing the output module failed.
    ///
    /// Covers creating the temporary file, mapping it, flushing it, and moving it onto the
    /// target path. The target is left untouched when this is returned.
    #[error("Failed to write output - {message}")]
    WriteFailed {
        /// Description of the failing step
        message: String,
    },
}
