//! End-to-end scenario tests built from synthetic descriptors, exercising
//! the plugin driver the same way `protoc` would: a `CodeGeneratorRequest`
//! in, a `CodeGeneratorResponse` out.

use upbc::pb::{
    CodeGeneratorRequest, DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto,
    FieldDescriptorProto, FileDescriptorProto, Label, MessageOptions, OneofDescriptorProto, Type,
};

fn field(name: &str, number: i32, label: Label, ty: Type) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        label: Some(label as i32),
        r#type: Some(ty as i32),
        ..Default::default()
    }
}

fn msg_field(name: &str, number: i32, type_name: &str) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        label: Some(Label::Optional as i32),
        r#type: Some(Type::Message as i32),
        type_name: Some(type_name.to_string()),
        ..Default::default()
    }
}

fn request_for(file: FileDescriptorProto) -> CodeGeneratorRequest {
    CodeGeneratorRequest {
        file_to_generate: vec![file.name().to_string()],
        proto_file: vec![file],
        ..Default::default()
    }
}

#[test]
fn s1_empty_message_generates_cleanly() {
    let file = FileDescriptorProto {
        name: Some("empty.proto".to_string()),
        package: Some("scenarios".to_string()),
        syntax: Some("proto3".to_string()),
        message_type: vec![DescriptorProto {
            name: Some("Empty".to_string()),
            ..Default::default()
        }],
        ..Default::default()
    };
    let response = upbc::run(&request_for(file));
    assert!(response.error.is_none(), "{:?}", response.error);
    assert_eq!(response.file.len(), 4);
}

#[test]
fn s2_proto2_message_gets_a_hasbit_accessor() {
    let file = FileDescriptorProto {
        name: Some("s2.proto".to_string()),
        package: Some("scenarios".to_string()),
        syntax: Some("proto2".to_string()),
        message_type: vec![DescriptorProto {
            name: Some("M".to_string()),
            field: vec![field("x", 1, Label::Optional, Type::Int32)],
            ..Default::default()
        }],
        ..Default::default()
    };
    let response = upbc::run(&request_for(file));
    assert!(response.error.is_none());
    let header = response
        .file
        .iter()
        .find(|f| f.name() == "s2.upb.h")
        .expect("header emitted");
    assert!(header.content().contains("scenarios_M_has_x"));
    assert!(header.content().contains("_upb_sethasbit"));
}

#[test]
fn s4_oneof_members_share_one_case_tag() {
    let mut a = field("a", 1, Label::Optional, Type::Int32);
    a.oneof_index = Some(0);
    let mut b = field("b", 2, Label::Optional, Type::String);
    b.oneof_index = Some(0);
    let file = FileDescriptorProto {
        name: Some("s4.proto".to_string()),
        package: Some("scenarios".to_string()),
        syntax: Some("proto3".to_string()),
        message_type: vec![DescriptorProto {
            name: Some("M".to_string()),
            field: vec![a, b],
            oneof_decl: vec![OneofDescriptorProto {
                name: Some("pick".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        }],
        ..Default::default()
    };
    let response = upbc::run(&request_for(file));
    assert!(response.error.is_none());
    let header = response.file.iter().find(|f| f.name() == "s4.upb.h").unwrap();
    assert!(header.content().contains("_upb_getoneofcase_field"));
}

#[test]
fn s6_field_number_twenty_gets_a_32_entry_fast_table() {
    let file = FileDescriptorProto {
        name: Some("s6.proto".to_string()),
        package: Some("scenarios".to_string()),
        syntax: Some("proto3".to_string()),
        message_type: vec![DescriptorProto {
            name: Some("M".to_string()),
            field: vec![field("x", 20, Label::Optional, Type::Int32)],
            ..Default::default()
        }],
        ..Default::default()
    };
    let response = upbc::run(&request_for(file));
    assert!(response.error.is_none());
    let source = response.file.iter().find(|f| f.name() == "s6.upb.c").unwrap();
    assert!(source.content().contains("fasttable[32]"));
}

#[test]
fn map_field_reuses_the_repeated_layout_shape() {
    let entry = DescriptorProto {
        name: Some("TagsEntry".to_string()),
        field: vec![
            field("key", 1, Label::Optional, Type::String),
            field("value", 2, Label::Optional, Type::String),
        ],
        options: Some(MessageOptions {
            map_entry: Some(true),
            ..Default::default()
        }),
        ..Default::default()
    };
    let map_field = {
        let mut f = msg_field("tags", 1, ".scenarios.M.TagsEntry");
        f.label = Some(Label::Repeated as i32);
        f
    };
    let file = FileDescriptorProto {
        name: Some("map.proto".to_string()),
        package: Some("scenarios".to_string()),
        syntax: Some("proto3".to_string()),
        message_type: vec![DescriptorProto {
            name: Some("M".to_string()),
            field: vec![map_field],
            nested_type: vec![entry],
            ..Default::default()
        }],
        ..Default::default()
    };
    let response = upbc::run(&request_for(file));
    assert!(response.error.is_none(), "{:?}", response.error);
}

#[test]
fn enum_values_are_emitted_sorted_by_full_name_not_declaration_order() {
    let file = FileDescriptorProto {
        name: Some("enums.proto".to_string()),
        package: Some("scenarios".to_string()),
        syntax: Some("proto3".to_string()),
        enum_type: vec![
            EnumDescriptorProto {
                name: Some("Zeta".to_string()),
                value: vec![EnumValueDescriptorProto {
                    name: Some("ZETA_UNKNOWN".to_string()),
                    number: Some(0),
                    ..Default::default()
                }],
                ..Default::default()
            },
            EnumDescriptorProto {
                name: Some("Alpha".to_string()),
                value: vec![EnumValueDescriptorProto {
                    name: Some("ALPHA_UNKNOWN".to_string()),
                    number: Some(0),
                    ..Default::default()
                }],
                ..Default::default()
            },
        ],
        ..Default::default()
    };
    let view = upbc::descriptor::FileView::new(&file);
    let names: Vec<_> = view.enums_sorted().iter().map(|e| e.name().to_string()).collect();
    assert_eq!(names, vec!["Alpha".to_string(), "Zeta".to_string()]);
}

#[test]
fn unsupported_field_number_is_reported_as_a_generation_error() {
    let file = FileDescriptorProto {
        name: Some("bad.proto".to_string()),
        package: Some("scenarios".to_string()),
        syntax: Some("proto3".to_string()),
        message_type: vec![DescriptorProto {
            name: Some("M".to_string()),
            field: vec![field("x", 0, Label::Optional, Type::Int32)],
            ..Default::default()
        }],
        ..Default::default()
    };
    let response = upbc::run(&request_for(file));
    assert!(response.error.is_some());
}
