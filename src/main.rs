//! `protoc-gen-upbc`: the binary `protoc` invokes as a plugin. Normally
//! `protoc` pipes a serialized `CodeGeneratorRequest` on stdin and reads the
//! `CodeGeneratorResponse` back from stdout; for debugging without `protoc`
//! in the loop, a path to a file holding that same serialized request can be
//! passed as the sole argument instead.

use std::io::{self, Read, Write};

use anyhow::{Context, Result};
use prost::Message;

use upbc::pb::CodeGeneratorRequest;

fn main() -> Result<()> {
    let request_bytes = read_request()?;
    let request = CodeGeneratorRequest::decode(request_bytes.as_slice())
        .context("decoding CodeGeneratorRequest from protoc")?;

    let response = upbc::run(&request);

    let mut out = Vec::new();
    response.encode(&mut out).context("encoding CodeGeneratorResponse")?;
    io::stdout().write_all(&out).context("writing CodeGeneratorResponse to stdout")?;
    Ok(())
}

fn read_request() -> Result<Vec<u8>> {
    let mut args = std::env::args().skip(1);
    match args.next() {
        Some(path) => std::fs::read(&path).with_context(|| format!("reading request from {path}")),
        None => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf).context("reading CodeGeneratorRequest from stdin")?;
            Ok(buf)
        }
    }
}
