//! Emits `X.upb.c`: the `upb_MiniTable` definitions the header's `extern`
//! declarations point at, each one carrying its per-field metadata array and
//! (where the field layout was fast-table-eligible) its dispatch table.

use crate::descriptor::FileView;
use crate::metadata::{build_field_metadata, field_presence, Presence};
use crate::names::message_init;

use super::MessagePlan;

pub fn emit(file: &FileView, plans: &[MessagePlan<'_>], sink: &mut crate::sink::Sink, names: &crate::names::OutputFileNames) {
    let mut out = sink.open(names.source.clone());

    out.write_line(&format!("#include \"{}\"", names.header));
    out.write_line("#include \"upb/msg_internal.h\"");
    out.write_line("");

    for plan in plans {
        let init_sym = message_init(&plan.full_name);
        let fields = build_field_metadata(plan.proto_as_view(), file.is_proto3(), &plan.layout, &plan.submsgs);

        out.write_line(&format!("static const upb_MiniTable_Field {init_sym}__fields[] = {{"));
        for (field, meta) in plan.proto.field.iter().zip(&fields) {
            let presence = field_presence(field, file.is_proto3(), &plan.layout);
            let presence_comment = match presence {
                Presence::None => "no presence tracking",
                Presence::HasBit(_) => "has-bit presence",
                Presence::OneofCase(_) => "oneof case presence",
            };
            out.write_line(&format!(
                "  {{{number}, {offset}, {presence}, {submsg_index}}},  /* {presence_comment} */",
                number = meta.number,
                offset = plan.layout.field_offset(meta.number).s64,
                presence = meta.presence,
                submsg_index = meta.submsg_slot.map(|s| s as i64).unwrap_or(-1),
            ));
        }
        out.write_line("};");
        out.write_line("");

        out.write_line(&format!("static const uint64_t {init_sym}__fasttable[{size}] = {{", size = plan.fast_table.size));
        let mut row = vec!["0".to_string(); plan.fast_table.size as usize];
        for entry in &plan.fast_table.entries {
            row[entry.slot as usize] = format!("0x{:016x}ULL /* {} */", entry.data_word, entry.handler);
        }
        for value in row {
            out.write_line(&format!("  {value},"));
        }
        out.write_line("};");
        out.write_line("");

        out.write_line(&format!(
            "const upb_MiniTable {init_sym} = {{ .size = {size32}, .size64 = {size64}, .field_count = {field_count}, .fields = {init_sym}__fields, .fasttable = {init_sym}__fasttable }};",
            size32 = plan.layout.message_size().s32,
            size64 = plan.layout.message_size().s64,
            field_count = plan.proto.field.len(),
        ));
        out.write_line("");
    }
}

impl MessagePlan<'_> {
    fn proto_as_view(&self) -> crate::descriptor::MessageView<'_> {
        crate::descriptor::MessageView {
            proto: self.proto,
            full_name: self.full_name.clone(),
        }
    }
}
