use std::io::Result;

fn main() -> Result<()> {
    prost_build::Config::new()
        .extern_path(".google.protobuf", "::prost_types")
        .compile_protos(&["proto/plugin.proto"], &["proto/"])?;

    println!("cargo:rerun-if-changed=proto/plugin.proto");
    Ok(())
}
