//! An in-memory stand-in for the `Output` file abstraction: a named buffer
//! that accumulates text as it's written, committed back into the owning
//! `Sink` when the handle drops — including on an early `?` return, so a
//! partially-written file never gets silently lost or left half-registered.

use std::collections::BTreeMap;
use std::fmt::Write as _;

#[derive(Debug, Default)]
pub struct Sink {
    files: BTreeMap<String, String>,
}

impl Sink {
    pub fn new() -> Self {
        Sink::default()
    }

    /// Opens a scoped handle for `name`. Any existing content under that
    /// name is discarded up front; the handle's `Drop` impl re-commits
    /// whatever was written to it, even if the caller returns early.
    pub fn open(&mut self, name: impl Into<String>) -> FileHandle<'_> {
        FileHandle {
            sink: self,
            name: name.into(),
            buf: String::new(),
        }
    }

    pub fn into_files(self) -> BTreeMap<String, String> {
        self.files
    }
}

pub struct FileHandle<'a> {
    sink: &'a mut Sink,
    name: String,
    buf: String,
}

impl FileHandle<'_> {
    pub fn write_str(&mut self, s: &str) {
        self.buf.push_str(s);
    }

    pub fn write_line(&mut self, s: &str) {
        self.buf.push_str(s);
        self.buf.push('\n');
    }

    pub fn write_fmt_args(&mut self, args: std::fmt::Arguments<'_>) {
        let _ = self.buf.write_fmt(args);
    }
}

impl Drop for FileHandle<'_> {
    fn drop(&mut self) {
        self.sink.files.insert(std::mem::take(&mut self.name), std::mem::take(&mut self.buf));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commits_on_drop() {
        let mut sink = Sink::new();
        {
            let mut h = sink.open("a.upb.h");
            h.write_line("line one");
            h.write_line("line two");
        }
        let files = sink.into_files();
        assert_eq!(files["a.upb.h"], "line one\nline two\n");
    }

    #[test]
    fn commits_even_on_early_return() {
        fn write_partial(sink: &mut Sink) -> Result<(), ()> {
            let mut h = sink.open("partial.upb.c");
            h.write_str("before the bail");
            Err(())
        }

        let mut sink = Sink::new();
        let _ = write_partial(&mut sink);
        let files = sink.into_files();
        assert_eq!(files["partial.upb.c"], "before the bail");
    }

    #[test]
    fn reopening_a_name_replaces_prior_content() {
        let mut sink = Sink::new();
        {
            sink.open("x").write_str("first");
        }
        {
            sink.open("x").write_str("second");
        }
        let files = sink.into_files();
        assert_eq!(files["x"], "second");
    }
}
