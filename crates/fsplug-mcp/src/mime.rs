use std::path::Path;

pub const DEFAULT_MIME: &str = "text/plain";

/// Lower-cased extension → MIME type for file resources.
const MIME_TYPES: &[(&str, &str)] = &[
    ("txt", "text/plain"),
    ("json", "application/json"),
    ("js", "application/javascript"),
    ("ts", "application/typescript"),
    ("jsx", "application/javascript"),
    ("tsx", "application/typescript"),
    ("md", "text/markdown"),
    ("html", "text/html"),
    ("htm", "text/html"),
    ("css", "text/css"),
    ("xml", "application/xml"),
    ("yml", "text/yaml"),
    ("yaml", "text/yaml"),
    ("py", "text/x-python"),
    ("java", "text/x-java"),
    ("cpp", "text/x-c++src"),
    ("c", "text/x-csrc"),
    ("h", "text/x-chdr"),
    ("go", "text/x-go"),
    ("rs", "text/x-rust"),
    ("php", "text/x-php"),
    ("rb", "text/x-ruby"),
    ("sql", "text/x-sql"),
    ("sh", "text/x-shellscript"),
    ("bat", "text/x-msdos-batch"),
    ("ps1", "text/x-powershell"),
];

pub fn mime_type_for(path: &Path) -> &'static str {
    let Some(ext) = path.extension() else {
        return DEFAULT_MIME;
    };
    let ext = ext.to_string_lossy().to_ascii_lowercase();
    MIME_TYPES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
        .unwrap_or(DEFAULT_MIME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions() {
        assert_eq!(mime_type_for(Path::new("a/b/lib.rs")), "text/x-rust");
        assert_eq!(mime_type_for(Path::new("Index.HTML")), "text/html");
        assert_eq!(mime_type_for(Path::new("conf.yml")), "text/yaml");
    }

    #[test]
    fn unknown_or_missing_extension_is_plain_text() {
        assert_eq!(mime_type_for(Path::new("image.png")), DEFAULT_MIME);
        assert_eq!(mime_type_for(Path::new("Makefile")), DEFAULT_MIME);
        assert_eq!(mime_type_for(Path::new(".bashrc")), DEFAULT_MIME);
    }
}
