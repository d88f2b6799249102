//! Generated plugin-protocol types plus the descriptor types they embed.
//!
//! `CodeGeneratorRequest`/`CodeGeneratorResponse` are compiled from the vendored
//! `proto/plugin.proto` at build time. Every `google.protobuf.*` message they
//! reference (`FileDescriptorProto` and everything under it) is *not*
//! regenerated — `build.rs` maps that package to `prost_types` so we share the
//! same types the rest of the Rust protobuf ecosystem uses.

include!(concat!(env!("OUT_DIR"), "/google.protobuf.compiler.rs"));

pub use prost_types::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
    FieldOptions, FileDescriptorProto, MessageOptions, OneofDescriptorProto,
};

pub use prost_types::field_descriptor_proto::{Label, Type};
