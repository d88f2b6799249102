//! Builds each message's submessage index: the deduplicated, sorted list of
//! distinct submessage/map-value/group targets a message's fields point at,
//! in the order they will be laid down in the generated `submsgs[]` array.
//!
//! Multiple fields that target the same message type (or the same map's
//! value message) share a single slot — the index maps a field to *which*
//! slot, not which field owns it.

use std::collections::BTreeMap;

use crate::descriptor::{MessageView, target_full_name};
use crate::pb::Type;

pub struct SubmsgIndex {
    /// Target full names, in the order they appear in the generated array.
    targets: Vec<String>,
    /// field number -> slot index into `targets`.
    field_slot: BTreeMap<i32, u32>,
}

impl SubmsgIndex {
    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    pub fn slot_of(&self, field_number: i32) -> Option<u32> {
        self.field_slot.get(&field_number).copied()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// `target_full_name` for a field that owns a submessage/group/enum-with-closed-range
/// target, or `None` for fields that don't reference another type (plain scalars).
fn submsg_target(field: &crate::pb::FieldDescriptorProto) -> Option<&str> {
    match field.r#type() {
        Type::Message | Type::Group => Some(target_full_name(field)),
        _ => None,
    }
}

pub fn build_submsg_index(message: &MessageView) -> SubmsgIndex {
    let mut slot_of_target: BTreeMap<String, u32> = BTreeMap::new();
    let mut targets = Vec::new();
    let mut field_slot = BTreeMap::new();

    let mut referenced: Vec<&str> = message.fields().iter().filter_map(submsg_target).collect();
    referenced.sort_unstable();
    referenced.dedup();

    for name in referenced {
        let slot = targets.len() as u32;
        targets.push(name.to_string());
        slot_of_target.insert(name.to_string(), slot);
    }

    for field in message.fields() {
        if let Some(target) = submsg_target(field) {
            let slot = slot_of_target[target];
            field_slot.insert(field.number(), slot);
        }
    }

    SubmsgIndex { targets, field_slot }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pb::{DescriptorProto, FieldDescriptorProto as Field, Label};

    fn msg_field(name: &str, number: i32, type_name: &str) -> Field {
        Field {
            name: Some(name.to_string()),
            number: Some(number),
            label: Some(Label::Optional as i32),
            r#type: Some(Type::Message as i32),
            type_name: Some(type_name.to_string()),
            ..Default::default()
        }
    }

    fn view(desc: &DescriptorProto) -> MessageView<'_> {
        MessageView {
            proto: desc,
            full_name: format!("pkg.{}", desc.name()),
        }
    }

    #[test]
    fn two_fields_sharing_a_target_share_a_slot() {
        let desc = DescriptorProto {
            name: Some("M".to_string()),
            field: vec![
                msg_field("a", 1, ".pkg.Foo"),
                msg_field("b", 2, ".pkg.Bar"),
                msg_field("c", 3, ".pkg.Foo"),
            ],
            ..Default::default()
        };
        let idx = build_submsg_index(&view(&desc));
        assert_eq!(idx.len(), 2);
        assert_eq!(idx.slot_of(1), idx.slot_of(3));
        assert_ne!(idx.slot_of(1), idx.slot_of(2));
    }

    #[test]
    fn targets_are_sorted_by_full_name() {
        let desc = DescriptorProto {
            name: Some("M".to_string()),
            field: vec![msg_field("a", 1, ".pkg.Zed"), msg_field("b", 2, ".pkg.Alpha")],
            ..Default::default()
        };
        let idx = build_submsg_index(&view(&desc));
        assert_eq!(idx.targets(), &["pkg.Alpha".to_string(), "pkg.Zed".to_string()]);
    }

    #[test]
    fn scalar_fields_have_no_slot() {
        let desc = DescriptorProto {
            name: Some("M".to_string()),
            field: vec![Field {
                name: Some("n".to_string()),
                number: Some(1),
                label: Some(Label::Optional as i32),
                r#type: Some(Type::Int32 as i32),
                ..Default::default()
            }],
            ..Default::default()
        };
        let idx = build_submsg_index(&view(&desc));
        assert!(idx.is_empty());
        assert_eq!(idx.slot_of(1), None);
    }
}
