//! Emission: turns one file's already-computed layouts, submessage indexes,
//! fast tables, and metadata into the four generated C/C++-facing text
//! files. Each submodule owns exactly one of the four outputs; this module
//! just sequences them into a single `Sink`.

mod defs_header;
mod defs_source;
mod header;
mod source;

use std::collections::BTreeMap;

use crate::descriptor::FileView;
use crate::fasttable::FastTable;
use crate::layout::Layout;
use crate::names::output_file_names;
use crate::sink::Sink;
use crate::submsg::SubmsgIndex;

/// Everything the four emitters need about one message, precomputed once so
/// none of them has to recompute a layout or rebuild a submessage index.
pub struct MessagePlan<'a> {
    pub full_name: String,
    pub layout: Layout,
    pub submsgs: SubmsgIndex,
    pub fast_table: FastTable,
    pub is_map_entry: bool,
    pub proto: &'a crate::pb::DescriptorProto,
}

pub fn generate_file(file: &FileView, plans: &[MessagePlan<'_>]) -> BTreeMap<String, Vec<u8>> {
    let names = output_file_names(file.name());
    let mut sink = Sink::new();

    header::emit(file, plans, &mut sink, &names);
    source::emit(file, plans, &mut sink, &names);
    defs_header::emit(file, &names, &mut sink);
    defs_source::emit(file, &names, &mut sink);

    sink.into_files().into_iter().map(|(name, text)| (name, text.into_bytes())).collect()
}
