//! Emits `X.upbdefs.c`: the serialized `FileDescriptorProto` bytes and the
//! `_upb_DefPool_Init` registration struct that lets a process rebuild full
//! reflective descriptors for this file (and its dependencies) on demand,
//! without linking the `descriptor.proto` parser into every binary that
//! only needs the compact `upb_MiniTable`s.

use crate::descriptor::FileView;
use crate::metadata::{dependency_index_list, serialize_file_descriptor};
use crate::names::def_init_symbol;

pub fn emit(file: &FileView, names: &crate::names::OutputFileNames, sink: &mut crate::sink::Sink) {
    let sym = def_init_symbol(file.name());
    let mut out = sink.open(names.defs_source.clone());

    out.write_line(&format!("#include \"{}\"", names.defs_header));
    out.write_line("#include \"upb/def.h\"");
    out.write_line("");

    let bytes = serialize_file_descriptor(file.proto);
    out.write_line(&format!("static const char {sym}_descriptor[] = {{"));
    for chunk in bytes.chunks(16) {
        let line: String = chunk.iter().map(|b| format!("{b}, ")).collect();
        out.write_line(&format!("  {line}"));
    }
    out.write_line("};");
    out.write_line("");

    let deps: Vec<String> = file.dependencies().map(str::to_string).collect();
    let dep_indices = dependency_index_list(file.proto, &deps);
    out.write_line(&format!("static const int32_t {sym}_deps[] = {{"));
    for idx in &dep_indices {
        out.write_line(&format!("  {idx},"));
    }
    out.write_line("};");
    out.write_line("");

    out.write_line(&format!(
        "_upb_DefPool_Init {sym} = {{ .deps = {sym}_deps, .layout = NULL, .filename = \"{name}\", .descriptor = {{{sym}_descriptor, sizeof({sym}_descriptor)}} }};",
        name = file.name(),
    ));
}
