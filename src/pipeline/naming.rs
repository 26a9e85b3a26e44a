use std::path::Path;

const DEFAULT_STEM: &str = "markdown";
const DEFAULT_EXTENSION: &str = "md";

/// Output file name for one language: `<stem>_<lang>.<ext>`.
///
/// A name without an extension gets `.md`; stdin input is named `markdown_<lang>.md`.
pub fn output_name(source: Option<&Path>, language: &str) -> String {
    let file_name = source
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    if file_name.is_empty() {
        return format!("{DEFAULT_STEM}_{language}.{DEFAULT_EXTENSION}");
    }

    match file_name.rfind('.') {
        Some(dot) if dot > 0 && dot + 1 < file_name.len() => {
            let (stem, extension) = (&file_name[..dot], &file_name[dot + 1..]);
            format!("{stem}_{language}.{}", extension.to_lowercase())
        }
        _ => format!(
            "{}_{language}.{DEFAULT_EXTENSION}",
            file_name.trim_end_matches('.')
        ),
    }
}
