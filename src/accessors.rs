//! Renders the per-field accessor functions (`_has`, getter, setter,
//! mutable-getter) that make up the bulk of a generated `.upb.h`. One field
//! produces one `FieldAccessors` value; map-entry messages suppress the
//! whole-message `_new`/`_parse`/`_serialize` trio instead (handled by the
//! header emitter, not here — this module only ever speaks in terms of a
//! single field).

use crate::descriptor::{is_in_real_oneof, requires_has_bit};
use crate::layout::Layout;
use crate::names::to_c_ident;
use crate::pb::{FieldDescriptorProto, Label, Type};

pub struct FieldAccessors {
    pub hazzer: Option<String>,
    pub getter: String,
    pub setter: String,
    pub mutable_getter: Option<String>,
}

fn c_scalar_type(ty: Type) -> &'static str {
    match ty {
        Type::Bool => "bool",
        Type::Int32 | Type::Sint32 | Type::Sfixed32 => "int32_t",
        Type::Uint32 | Type::Fixed32 => "uint32_t",
        Type::Int64 | Type::Sint64 | Type::Sfixed64 => "int64_t",
        Type::Uint64 | Type::Fixed64 => "uint64_t",
        Type::Float => "float",
        Type::Double => "double",
        Type::Enum => "int32_t",
        Type::String | Type::Bytes => "upb_StringView",
        Type::Message | Type::Group => "void*",
    }
}

fn field_c_type(field: &FieldDescriptorProto, message_target: Option<&str>) -> String {
    if field.label() == Label::Repeated {
        return match field.r#type() {
            Type::Message | Type::Group => format!("struct {}*", message_target.unwrap_or("upb_Message")),
            other => c_scalar_type(other).to_string(),
        };
    }
    match field.r#type() {
        Type::Message | Type::Group => format!("struct {}*", message_target.unwrap_or("upb_Message")),
        other => c_scalar_type(other).to_string(),
    }
}

pub fn build_field_accessors(
    message_c_name: &str,
    field: &FieldDescriptorProto,
    is_proto3: bool,
    layout: &Layout,
    message_target: Option<&str>,
) -> FieldAccessors {
    let field_ident = to_c_ident(field.name());
    let ty = field_c_type(field, message_target);
    let is_repeated = field.label() == Label::Repeated;

    let hazzer = if is_repeated {
        None
    } else if is_in_real_oneof(field) {
        Some(format!(
            "UPB_INLINE bool {message_c_name}_has_{field_ident}(const {message_c_name} *msg) {{ return _upb_getoneofcase_field(msg, {case_offset}) == {number}; }}",
            case_offset = layout.oneof_case_offset(field.oneof_index()).s64,
            number = field.number(),
        ))
    } else if requires_has_bit(field, is_proto3) {
        Some(format!(
            "UPB_INLINE bool {message_c_name}_has_{field_ident}(const {message_c_name} *msg) {{ return _upb_hasbit(msg, {hasbit}); }}",
            hasbit = layout.has_bit_index(field.number()).unwrap_or(0),
        ))
    } else if matches!(field.r#type(), Type::Message | Type::Group) {
        Some(format!(
            "UPB_INLINE bool {message_c_name}_has_{field_ident}(const {message_c_name} *msg) {{ return _upb_has_submsg_nohasbit(msg, {offset}); }}",
            offset = layout.field_offset(field.number()).s64,
        ))
    } else {
        None
    };

    let offset = layout.field_offset(field.number()).s64;
    let getter = if is_repeated {
        format!(
            "UPB_INLINE const {ty}* {message_c_name}_{field_ident}(const {message_c_name} *msg, size_t *len) {{ return ({ty}*)_upb_array_accessor(msg, {offset}, len); }}"
        )
    } else {
        format!(
            "UPB_INLINE {ty} {message_c_name}_{field_ident}(const {message_c_name} *msg) {{ return *UPB_PTR_AT(msg, {offset}, {ty}); }}"
        )
    };

    let setter = if is_repeated {
        format!(
            "UPB_INLINE bool {message_c_name}_set_{field_ident}(const {message_c_name} *msg, {ty} val, size_t *len) {{ return _upb_array_setter(msg, {offset}, val, len); }}"
        )
    } else if is_in_real_oneof(field) {
        format!(
            "UPB_INLINE void {message_c_name}_set_{field_ident}({message_c_name} *msg, {ty} value) {{ _upb_setoneofcase_field(msg, {case_offset}, {number}); *UPB_PTR_AT(msg, {offset}, {ty}) = value; }}",
            case_offset = layout.oneof_case_offset(field.oneof_index()).s64,
            number = field.number(),
        )
    } else {
        let set_hasbit = if requires_has_bit(field, is_proto3) {
            format!(" _upb_sethasbit(msg, {});", layout.has_bit_index(field.number()).unwrap_or(0))
        } else {
            String::new()
        };
        format!(
            "UPB_INLINE void {message_c_name}_set_{field_ident}({message_c_name} *msg, {ty} value) {{ *UPB_PTR_AT(msg, {offset}, {ty}) = value;{set_hasbit} }}"
        )
    };

    let mutable_getter = if is_repeated || matches!(field.r#type(), Type::Message | Type::Group) {
        Some(format!(
            "UPB_INLINE struct {target}* {message_c_name}_mutable_{field_ident}({message_c_name} *msg, upb_Arena *arena) {{ return ({target}*)_upb_message_mutable_submsg(msg, {offset}, arena); }}",
            target = message_target.unwrap_or("upb_Message"),
        ))
    } else {
        None
    };

    FieldAccessors {
        hazzer,
        getter,
        setter,
        mutable_getter,
    }
}
