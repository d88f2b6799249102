//! The `protoc` plugin driver: turns one `CodeGeneratorRequest` into one
//! `CodeGeneratorResponse`, generating the four output files for every
//! member of `file_to_generate` (never for a file that only appears as a
//! transitive dependency).

use std::collections::BTreeMap;

use crate::descriptor::FileView;
use crate::emit::{generate_file, MessagePlan};
use crate::error::{GenError, Result};
use crate::fasttable::build_fast_table;
use crate::layout::compute_layout;
use crate::options::PluginOptions;
use crate::pb::code_generator_response::{Feature, File as ResponseFile};
use crate::pb::{CodeGeneratorRequest, CodeGeneratorResponse, FileDescriptorProto};
use crate::submsg::build_submsg_index;

pub fn run(request: &CodeGeneratorRequest) -> CodeGeneratorResponse {
    let _options = PluginOptions::parse(request.parameter());

    let mut response = CodeGeneratorResponse {
        supported_features: Some(Feature::Proto3Optional as u64),
        ..Default::default()
    };

    let mut errors = Vec::new();

    for target_name in &request.file_to_generate {
        let Some(proto) = request.proto_file.iter().find(|f| f.name() == target_name) else {
            errors.push(format!("{target_name}: not present in CodeGeneratorRequest.proto_file"));
            continue;
        };

        match generate_one_file(proto) {
            Ok(files) => {
                for (name, content) in files {
                    response.file.push(ResponseFile {
                        name: Some(name),
                        content: Some(String::from_utf8_lossy(&content).into_owned()),
                        ..Default::default()
                    });
                }
            }
            Err(err) => errors.push(format!("{target_name}: {err}")),
        }
    }

    if !errors.is_empty() {
        response.error = Some(errors.join("\n"));
    }

    response
}

fn generate_one_file(proto: &FileDescriptorProto) -> Result<BTreeMap<String, Vec<u8>>> {
    let view = FileView::new(proto);
    let messages = view.messages_preorder();

    let mut layouts = BTreeMap::new();
    for message in &messages {
        let layout = compute_layout(message, view.is_proto3());
        layouts.insert(message.full_name.clone(), layout);
    }

    let same_file_sizes: BTreeMap<String, u32> = layouts
        .iter()
        .map(|(name, layout)| (name.clone(), layout.message_size().s64))
        .collect();

    let map_entries = view.map_entry_names();

    let mut plans = Vec::with_capacity(messages.len());
    for message in &messages {
        for field in message.fields() {
            if field.number() < 1 || field.number() > 536_870_911 {
                return Err(GenError::FieldNumberOutOfRange {
                    message: message.full_name.clone(),
                    field: field.name().to_string(),
                    field_number: field.number(),
                });
            }
        }

        let layout = layouts.get(&message.full_name).expect("layout computed above").clone();
        let submsgs = build_submsg_index(message);
        let fast_table = build_fast_table(message, view.is_proto3(), &layout, &submsgs, &same_file_sizes, &map_entries);

        plans.push(MessagePlan {
            full_name: message.full_name.clone(),
            layout,
            submsgs,
            fast_table,
            is_map_entry: map_entries.contains(&message.full_name),
            proto: message.proto,
        });
    }

    Ok(generate_file(&view, &plans))
}
