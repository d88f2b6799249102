//! Emits `X.upb.h`: struct forward-declarations, the accessor function
//! bodies (all `UPB_INLINE`, matching upb's header-only accessor style), and
//! a guard/include scaffold around them.

use crate::accessors::build_field_accessors;
use crate::descriptor::FileView;
use crate::names::{message_init, message_name, to_preproc};

use super::MessagePlan;

pub fn emit(file: &FileView, plans: &[MessagePlan<'_>], sink: &mut crate::sink::Sink, names: &crate::names::OutputFileNames) {
    let guard = to_preproc(file.name(), "upb_h");
    let mut out = sink.open(names.header.clone());

    out.write_line(&format!("#ifndef {guard}"));
    out.write_line(&format!("#define {guard}"));
    out.write_line("");
    out.write_line("#include \"upb/msg_internal.h\"");
    out.write_line("#include \"upb/decode.h\"");
    out.write_line("#include \"upb/encode.h\"");
    out.write_line("");
    out.write_line("#ifdef __cplusplus");
    out.write_line("extern \"C\" {");
    out.write_line("#endif");
    out.write_line("");

    for plan in plans {
        let c_name = message_name(&plan.full_name);
        out.write_line(&format!("typedef struct {c_name} {c_name};"));
    }
    out.write_line("");

    for plan in plans {
        let c_name = message_name(&plan.full_name);
        let init_sym = message_init(&plan.full_name);
        out.write_line(&format!("extern const upb_MiniTable {init_sym};"));

        if !plan.is_map_entry {
            out.write_line(&format!(
                "UPB_INLINE {c_name}* {c_name}_new(upb_Arena *arena) {{ return ({c_name}*)_upb_Message_New(&{init_sym}, arena); }}"
            ));
            out.write_line(&format!(
                "UPB_INLINE {c_name}* {c_name}_parse(const char *buf, size_t size, upb_Arena *arena) {{ return ({c_name}*)_upb_Decode(buf, size, &{init_sym}, arena); }}"
            ));
            out.write_line(&format!(
                "UPB_INLINE char* {c_name}_serialize(const {c_name} *msg, upb_Arena *arena, size_t *len) {{ return _upb_Encode(msg, &{init_sym}, arena, len); }}"
            ));
        }

        for field in plan.proto.field.iter() {
            let target = if matches!(field.r#type(), crate::pb::Type::Message | crate::pb::Type::Group) {
                Some(message_name(crate::descriptor::target_full_name(field)))
            } else {
                None
            };
            let acc = build_field_accessors(&c_name, field, file.is_proto3(), &plan.layout, target.as_deref());
            if let Some(hazzer) = &acc.hazzer {
                out.write_line(hazzer);
            }
            out.write_line(&acc.getter);
            out.write_line(&acc.setter);
            if let Some(mutable) = &acc.mutable_getter {
                out.write_line(mutable);
            }
        }
        out.write_line("");
    }

    out.write_line("#ifdef __cplusplus");
    out.write_line("}  /* extern \"C\" */");
    out.write_line("#endif");
    out.write_line("");
    out.write_line(&format!("#endif  /* {guard} */"));
}
