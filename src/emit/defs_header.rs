//! Emits `X.upbdefs.h`: the small header declaring the one symbol the defs
//! source file defines — the lazily-initialized `upb_DefPool` accessor for
//! this file, used by reflection-heavy callers (text format, JSON, debug
//! printing) that need full descriptors rather than just the compact
//! `upb_MiniTable`s in `X.upb.h`.

use crate::descriptor::FileView;
use crate::names::{def_init_symbol, to_preproc};

pub fn emit(file: &FileView, names: &crate::names::OutputFileNames, sink: &mut crate::sink::Sink) {
    let guard = to_preproc(file.name(), "upbdefs_h");
    let sym = def_init_symbol(file.name());
    let mut out = sink.open(names.defs_header.clone());

    out.write_line(&format!("#ifndef {guard}"));
    out.write_line(&format!("#define {guard}"));
    out.write_line("");
    out.write_line("#include \"upb/def.h\"");
    out.write_line("");
    out.write_line("#ifdef __cplusplus");
    out.write_line("extern \"C\" {");
    out.write_line("#endif");
    out.write_line("");
    out.write_line(&format!("extern _upb_DefPool_Init {sym};"));
    out.write_line("");
    out.write_line("#ifdef __cplusplus");
    out.write_line("}  /* extern \"C\" */");
    out.write_line("#endif");
    out.write_line("");
    out.write_line(&format!("#endif  /* {guard} */"));
}
