//! # qexec
//!
//! Client-side execution model for small quantum programs.
//!
//! A program is compiled once into an [`Executable`], which then carries a
//! shot count, parameter bindings and the set of registers to read back.
//! Every [`Executable::execute`] call validates those against the program,
//! runs the shots on a [`Backend`] and returns an [`ExecutionResult`]:
//! either an [`Error`] or a [`ResultStore`] of typed per-register rows.
//!
//! ## Quick Start
//!
//! ```rust
//! use qexec::{backend::Qvm, Executable};
//!
//! let mut exe = Executable::from_quil(
//!     "DECLARE ro BIT\n\
//!      DECLARE theta REAL\n\
//!      RX(pi/2) 0\n\
//!      RZ(theta) 0\n\
//!      RX(-pi/2) 0\n\
//!      MEASURE 0 ro[0]",
//! )?;
//! exe.set_shots(10).read_from("ro");
//!
//! // Sweep the angle; the same executable is dispatched each time.
//! for theta in [0.0, std::f64::consts::PI] {
//!     exe.set_param("theta", 0, theta);
//!     let result = exe.execute_on(&Qvm::new().with_seed(7));
//!     let rows = result.get_data("ro").and_then(|d| d.as_byte()).unwrap_or_default();
//!     println!("theta = {theta:.3}: {rows:?}");
//! }
//! # Ok::<(), qexec::Error>(())
//! ```

pub mod backend;
pub mod compiler;
pub mod config;
pub mod core;
pub mod error;
pub mod executable;
pub mod parameters;
pub mod result;
pub mod runtime;

pub use backend::{Backend, BackendError, Qvm, RawValues, RunRequest, ShotMemory};
pub use compiler::{compile, CompileError, Program};
pub use config::{Config, ConfigError, QvmConfig};
pub use error::{Error, ErrorKind};
pub use executable::Executable;
pub use parameters::{BoundParameters, ReadSet};
pub use result::{ElementType, ExecutionResult, RegisterData, ResultStore};
