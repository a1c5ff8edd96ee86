//! Test harness for Streamlock.
//!
//! Tools shared by the integration tests and fuzz targets:
//!
//! - `vectors`: parser and checker for keystream known-answer files under
//!   `testdata/`
//! - `ops`: replay of extract/XOR/skip sequences against raw chunk output
//! - `pipe`: in-memory `Read`/`Write` pipes for running both ends of a
//!   channel on separate threads
//! - `workload`: seeded message batches around the protocol's size edges

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod ops;
pub mod pipe;
pub mod vectors;
pub mod workload;

pub use ops::{BufferedOp, Divergence, ReplayError, check, reference_stream, replay};
pub use pipe::{Endpoint, PipeReader, PipeWriter, duplex, pipe, pipe_with_max_read};
pub use vectors::{Segment, VectorError, VectorRecord, load, parse};
