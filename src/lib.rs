//! A `protoc` code-generator plugin: reads a `CodeGeneratorRequest` describing
//! a set of `.proto` files and emits the four C/C++ source files upb-style
//! runtimes expect — a compact `.upb.h`/`.upb.c` pair carrying dual-ABI
//! message layouts and fast-decode dispatch tables, and a `.upbdefs.h`/
//! `.upbdefs.c` pair carrying full reflective descriptors.

pub mod accessors;
pub mod descriptor;
pub mod emit;
pub mod error;
pub mod fasttable;
pub mod layout;
pub mod metadata;
pub mod names;
pub mod options;
pub mod pb;
pub mod plugin;
pub mod sink;
pub mod size;
pub mod submsg;

pub use error::GenError;
pub use plugin::run;
