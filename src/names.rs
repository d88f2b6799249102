//! C identifier and filename formation.
//!
//! Every routine here takes a fully-qualified proto name (`pkg.Outer.Inner`)
//! and produces the matching C-land spelling. None of it inspects field
//! contents — it is pure string transformation, kept in one place so the
//! header/source/defs emitters stay consistent with each other.

/// `pkg.Outer.Inner` -> `pkg_Outer_Inner`.
pub fn to_c_ident(full_name: &str) -> String {
    full_name.replace('.', "_")
}

/// The C struct name for a message: `pkg_Outer_Inner`.
pub fn message_name(full_name: &str) -> String {
    to_c_ident(full_name)
}

/// The zero-initialized static template symbol for a message:
/// `pkg_Outer_Inner_msginit`.
pub fn message_init(full_name: &str) -> String {
    format!("{}_msginit", to_c_ident(full_name))
}

/// The `upb_MiniTable_File*` / def-init symbol emitted into the `upbdefs`
/// pair for a whole `.proto` file: derived from the file path, not a message
/// name, since one symbol covers every message/enum the file declares.
pub fn def_init_symbol(file_name: &str) -> String {
    format!("{}_proto_upbdefinit", file_path_ident(file_name))
}

/// `EnumName_VALUE` for an enum value symbol, matching protoc's own C++
/// enum-value naming (the enum's own name prefixes every value so values
/// from different enums in the same file never collide).
pub fn enum_value_symbol(enum_full_name: &str, value_name: &str) -> String {
    format!("{}_{}", to_c_ident(enum_full_name), value_name)
}

/// `path/to/file.proto` -> `path_2fto_2ffile_2eproto`-free, plain identifier
/// form used as a prefix for the file-scoped def-init symbol:
/// slashes and dots become underscores, like `to_c_ident` but also covering
/// the `/` path separator and the `.proto` suffix.
fn file_path_ident(file_name: &str) -> String {
    file_name
        .trim_end_matches(".proto")
        .chars()
        .map(|c| if c == '/' || c == '.' || c == '-' { '_' } else { c })
        .collect()
}

/// `path/to/file.proto` -> `PATH_TO_FILE_PROTO_UPB_H_`, the header guard for
/// the generated `.upb.h`. `suffix` distinguishes the four generated headers
/// (`upb_h`, `upbdefs_h`) sharing this helper.
pub fn to_preproc(file_name: &str, suffix: &str) -> String {
    let mut out = String::new();
    for c in file_name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push('_');
        }
    }
    out.push('_');
    out.push_str(&suffix.to_ascii_uppercase());
    out.push('_');
    out
}

/// The four filenames this generator emits per input `.proto` file.
pub struct OutputFileNames {
    pub header: String,
    pub source: String,
    pub defs_header: String,
    pub defs_source: String,
}

pub fn output_file_names(file_name: &str) -> OutputFileNames {
    let stem = file_name.trim_end_matches(".proto");
    OutputFileNames {
        header: format!("{stem}.upb.h"),
        source: format!("{stem}.upb.c"),
        defs_header: format!("{stem}.upbdefs.h"),
        defs_source: format!("{stem}.upbdefs.c"),
    }
}

/// Neutralizes `??` trigraph sequences a literal `.proto` comment or string
/// could introduce into emitted C source, by splitting the pair with an
/// empty string concatenation escape: `"??"` -> `"?" "?"`. Only relevant
/// inside emitted string/comment text, never identifiers.
pub fn escape_trigraphs(text: &str) -> String {
    text.replace("??", "?\" \"?")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dots_become_underscores() {
        assert_eq!(to_c_ident("pkg.Outer.Inner"), "pkg_Outer_Inner");
    }

    #[test]
    fn msginit_suffix() {
        assert_eq!(message_init("pkg.Foo"), "pkg_Foo_msginit");
    }

    #[test]
    fn enum_value_symbol_prefixes_with_enum_name() {
        assert_eq!(enum_value_symbol("pkg.Color", "RED"), "pkg_Color_RED");
    }

    #[test]
    fn output_file_names_swap_proto_extension() {
        let names = output_file_names("a/b/c.proto");
        assert_eq!(names.header, "a/b/c.upb.h");
        assert_eq!(names.source, "a/b/c.upb.c");
        assert_eq!(names.defs_header, "a/b/c.upbdefs.h");
        assert_eq!(names.defs_source, "a/b/c.upbdefs.c");
    }

    #[test]
    fn preproc_guard_upcases_and_replaces_punctuation() {
        let guard = to_preproc("a/b.proto", "upb_h");
        assert_eq!(guard, "A_B_PROTO_UPB_H_");
    }

    #[test]
    fn trigraphs_are_split() {
        assert_eq!(escape_trigraphs("What??!"), "What?\" \"?!");
    }
}
