//! Wraps the `prost_types` descriptor graph with the queries the rest of the
//! generator needs: field declaration order, oneof membership (real vs. the
//! synthetic oneof every `proto3_optional` field sits inside), nested-type
//! traversal, and map-entry detection. Nothing here parses bytes — the
//! descriptors already arrived fully decoded inside a `CodeGeneratorRequest`.

use crate::pb::{DescriptorProto, EnumDescriptorProto, FieldDescriptorProto, FileDescriptorProto, Label, Type};
use std::collections::HashSet;

pub struct FileView<'a> {
    pub proto: &'a FileDescriptorProto,
}

impl<'a> FileView<'a> {
    pub fn new(proto: &'a FileDescriptorProto) -> Self {
        FileView { proto }
    }

    pub fn name(&self) -> &'a str {
        self.proto.name()
    }

    pub fn package(&self) -> &'a str {
        self.proto.package()
    }

    pub fn is_proto3(&self) -> bool {
        self.proto.syntax() == "proto3"
    }

    pub fn dependencies(&self) -> impl Iterator<Item = &'a str> {
        self.proto.dependency.iter().map(String::as_str)
    }

    /// Every message in the file, top-level first then each one's nested
    /// types recursively — pre-order, matching the order messages are
    /// emitted in.
    pub fn messages_preorder(&self) -> Vec<MessageView<'a>> {
        let mut out = Vec::new();
        for m in &self.proto.message_type {
            push_message_preorder(m, self.package(), &mut out);
        }
        out
    }

    /// Every enum in the file (top-level and nested), sorted by full name —
    /// unlike messages, enums are not emitted in traversal order.
    pub fn enums_sorted(&self) -> Vec<EnumView<'a>> {
        let mut out = Vec::new();
        for e in &self.proto.enum_type {
            out.push(EnumView {
                proto: e,
                full_name: qualify(self.package(), e.name()),
            });
        }
        for m in &self.proto.message_type {
            collect_nested_enums(m, self.package(), &mut out);
        }
        out.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        out
    }

    /// Full names of every map-entry synthetic message in the file, used to
    /// tell a true repeated-message field apart from a map field (both are
    /// `LABEL_REPEATED` + `TYPE_MESSAGE` pointing at an auto-generated
    /// `FooEntry` message with `options.map_entry = true`).
    pub fn map_entry_names(&self) -> HashSet<String> {
        self.messages_preorder()
            .into_iter()
            .filter(|m| m.is_map_entry())
            .map(|m| m.full_name)
            .collect()
    }
}

fn qualify(package: &str, name: &str) -> String {
    if package.is_empty() {
        name.to_string()
    } else {
        format!("{package}.{name}")
    }
}

fn push_message_preorder<'a>(proto: &'a DescriptorProto, parent_full_name: &str, out: &mut Vec<MessageView<'a>>) {
    let full_name = qualify(parent_full_name, proto.name());
    out.push(MessageView {
        proto,
        full_name: full_name.clone(),
    });
    for nested in &proto.nested_type {
        push_message_preorder(nested, &full_name, out);
    }
}

fn collect_nested_enums<'a>(proto: &'a DescriptorProto, parent_full_name: &str, out: &mut Vec<EnumView<'a>>) {
    let full_name = qualify(parent_full_name, proto.name());
    for e in &proto.enum_type {
        out.push(EnumView {
            proto: e,
            full_name: qualify(&full_name, e.name()),
        });
    }
    for nested in &proto.nested_type {
        collect_nested_enums(nested, &full_name, out);
    }
}

#[derive(Clone)]
pub struct MessageView<'a> {
    pub proto: &'a DescriptorProto,
    pub full_name: String,
}

impl<'a> MessageView<'a> {
    pub fn name(&self) -> &'a str {
        self.proto.name()
    }

    pub fn fields(&self) -> &'a [FieldDescriptorProto] {
        &self.proto.field
    }

    pub fn oneof_decls(&self) -> &'a [crate::pb::OneofDescriptorProto] {
        &self.proto.oneof_decl
    }

    pub fn is_map_entry(&self) -> bool {
        self.proto.options.as_ref().is_some_and(|o| o.map_entry())
    }

    /// Real (non-synthetic) member fields of the oneof at `oneof_index`, in
    /// declaration order.
    pub fn oneof_members(&self, oneof_index: i32) -> Vec<&'a FieldDescriptorProto> {
        self.proto
            .field
            .iter()
            .filter(|f| is_real_oneof_member(f, oneof_index))
            .collect()
    }

    pub fn nested_messages(&self) -> Vec<MessageView<'a>> {
        let mut out = Vec::new();
        for nested in &self.proto.nested_type {
            push_message_preorder(nested, &self.full_name, &mut out);
        }
        out
    }
}

#[derive(Clone)]
pub struct EnumView<'a> {
    pub proto: &'a EnumDescriptorProto,
    pub full_name: String,
}

impl<'a> EnumView<'a> {
    pub fn name(&self) -> &'a str {
        self.proto.name()
    }

    pub fn values_sorted(&self) -> Vec<&'a crate::pb::EnumValueDescriptorProto> {
        let mut values: Vec<_> = self.proto.value.iter().collect();
        values.sort_by_key(|v| v.number());
        values
    }
}

/// A field is a *real* member of the oneof at `oneof_index` iff it actually
/// participates in the oneof's case tag — a `proto3_optional` field sits
/// inside a synthetic one-member oneof that the layout engine must ignore
/// (it gets a has-bit instead, per the has-bit rule).
pub fn is_real_oneof_member(field: &FieldDescriptorProto, oneof_index: i32) -> bool {
    field.oneof_index == Some(oneof_index) && !field.proto3_optional()
}

pub fn is_in_real_oneof(field: &FieldDescriptorProto) -> bool {
    field.oneof_index.is_some() && !field.proto3_optional()
}

pub fn requires_has_bit(field: &FieldDescriptorProto, is_proto3: bool) -> bool {
    if is_in_real_oneof(field) {
        return false;
    }
    if field.label() == Label::Repeated {
        return false;
    }
    if matches!(field.r#type(), Type::Message | Type::Group) {
        return false;
    }
    if field.proto3_optional() {
        return true;
    }
    !is_proto3
}

/// Strips the leading `.` that descriptor type names carry
/// (`.package.Message` -> `package.Message`).
pub fn target_full_name(field: &FieldDescriptorProto) -> &str {
    field.type_name().trim_start_matches('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pb::{DescriptorProto, FieldDescriptorProto as Field};

    fn scalar_field(name: &str, number: i32) -> Field {
        Field {
            name: Some(name.to_string()),
            number: Some(number),
            label: Some(Label::Optional as i32),
            r#type: Some(Type::Int32 as i32),
            ..Default::default()
        }
    }

    #[test]
    fn proto3_optional_field_is_not_in_a_real_oneof() {
        let mut f = scalar_field("x", 1);
        f.oneof_index = Some(0);
        f.proto3_optional = Some(true);
        assert!(!is_in_real_oneof(&f));
        assert!(requires_has_bit(&f, true));
    }

    #[test]
    fn proto2_singular_scalar_requires_has_bit() {
        let f = scalar_field("x", 1);
        assert!(requires_has_bit(&f, false));
    }

    #[test]
    fn proto3_plain_scalar_does_not_require_has_bit() {
        let f = scalar_field("x", 1);
        assert!(!requires_has_bit(&f, true));
    }

    #[test]
    fn repeated_field_never_requires_has_bit() {
        let mut f = scalar_field("xs", 1);
        f.label = Some(Label::Repeated as i32);
        assert!(!requires_has_bit(&f, false));
    }

    #[test]
    fn messages_preorder_visits_nested_types_depth_first() {
        let inner = DescriptorProto {
            name: Some("Inner".to_string()),
            ..Default::default()
        };
        let outer = DescriptorProto {
            name: Some("Outer".to_string()),
            nested_type: vec![inner],
            ..Default::default()
        };
        let file = FileDescriptorProto {
            name: Some("f.proto".to_string()),
            package: Some("pkg".to_string()),
            message_type: vec![outer],
            ..Default::default()
        };
        let view = FileView::new(&file);
        let names: Vec<_> = view.messages_preorder().iter().map(|m| m.full_name.clone()).collect();
        assert_eq!(names, vec!["pkg.Outer".to_string(), "pkg.Outer.Inner".to_string()]);
    }
}
