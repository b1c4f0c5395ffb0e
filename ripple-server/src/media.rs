use uuid::Uuid;

/// Derive the storage key for an uploaded image. The binary itself lives in
/// the external media store; this service only records the opaque key:
/// `<root>/<kind>/<owner-slug>-<uuid>.<ext>`.
pub fn image_key(upload_root: &str, kind: &str, owner_name: &str, filename: &str) -> String {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty());

    let stem = format!("{}-{}", slugify(owner_name), Uuid::new_v4());
    match extension {
        Some(ext) => format!("{upload_root}/{kind}/{stem}.{ext}"),
        None => format!("{upload_root}/{kind}/{stem}"),
    }
}

fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    for ch in value.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if matches!(ch, ' ' | '-' | '_') && !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}
