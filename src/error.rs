//! The crate error type and the macros that build it.

use thiserror::Error;

macro_rules! invalid_argument_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::InvalidArgument {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::InvalidArgument {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

macro_rules! encoding_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Encoding {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Encoding {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Every public operation validates its arguments before it mutates anything, so an `Err` always
/// means that caller-visible state (index cursors, destination buffers, handle contents) is
/// exactly what it was before the call.
///
/// # Error Categories
///
/// ## Argument Errors
/// - [`Error::InvalidArgument`] - Unsupported size, width, flag word, index or format
/// - [`Error::NotSupported`] - Operation is meaningless for the given codepage or type
///
/// ## Bounds Errors
/// - [`Error::OutOfBounds`] - An offset/size pair exceeds the buffer it refers to
/// - [`Error::BufferTooSmall`] - A destination buffer cannot hold the produced output
///
/// ## Memory Errors
/// - [`Error::AllocationFailure`] - A buffer could not be allocated
/// - [`Error::CopyFailure`] - A copy or zero-fill primitive failed
///
/// ## Encoding Errors
/// - [`Error::Encoding`] - Malformed source bytes for a codepage, or unrepresentable characters
///
/// # Examples
///
/// ```rust
/// use fvalue::{Error, Integer, Endianness};
///
/// let mut integer = Integer::new(32)?;
/// match integer.copy_from_byte_stream(&[0x01, 0x02], Endianness::Little) {
///     Err(Error::InvalidArgument { message, .. }) => println!("rejected: {}", message),
///     Err(e) => println!("other error: {}", e),
///     Ok(()) => unreachable!(),
/// }
/// # Ok::<(), fvalue::Error>(())
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// An argument was rejected before any work was done.
    ///
    /// Covers entry indices outside `[0, count)`, sizes above `isize::MAX`, unsupported
    /// integer or floating-point widths, unknown flag bits and malformed numeric text.
    ///
    /// # Fields
    ///
    /// * `message` - Description of the rejected argument
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Invalid argument - {file}:{line}: {message}")]
    InvalidArgument {
        /// The message to be printed for the InvalidArgument error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An offset and size pair does not fit inside the buffer it refers to.
    #[error("Out of Bound access would have occurred!")]
    OutOfBounds,

    /// The destination buffer is too small for the output.
    ///
    /// The caller may retry with a buffer of at least `required` code units, which is the
    /// same figure the matching `*_size` query returns.
    #[error("Destination buffer too small - required {required}, available {available}")]
    BufferTooSmall {
        /// Number of code units the output needs, terminator included
        required: usize,
        /// Number of code units available from the starting index
        available: usize,
    },

    /// A buffer of the given size could not be allocated.
    #[error("Unable to allocate {0} bytes")]
    AllocationFailure(usize),

    /// A copy or zero-fill primitive reported failure.
    #[error("Unable to copy or fill memory")]
    CopyFailure,

    /// Source data is malformed for its encoding, or a character cannot be represented in the
    /// target codepage.
    ///
    /// Examples are an unpaired UTF-16 surrogate, an invalid UTF-8 continuation byte, or a
    /// UTF-32 stream whose length is not a multiple of four.
    #[error("Encoding - {file}:{line}: {message}")]
    Encoding {
        /// The message to be printed for the Encoding error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// The requested operation is not supported for this codepage or value type.
    #[error("This operation is not supported")]
    NotSupported,
}
