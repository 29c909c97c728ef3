use crate::error::CoreError;
use url::Url;

/// Maximum accepted URL length, after trimming and scheme completion.
pub const MAX_URL_LENGTH: usize = 2048;

/// The service's own domain. Hosts containing it are rejected to
/// prevent redirect loops.
pub const SERVICE_DOMAIN: &str = "amtinyurl.com";

/// Canonicalizes an arbitrary input string into the stored URL form.
///
/// Rules, applied in order: reject blank input; trim; prepend `https://`
/// when no scheme is given; reject anything that is not `https` (an
/// explicit `http://` fails); reject lengths over [`MAX_URL_LENGTH`];
/// parse; reject self-referential hosts; emit lowercase scheme and host,
/// an explicit non-default port, the path, and any non-empty query and
/// fragment.
///
/// Two inputs that normalize to the same string map to the same short
/// link. Host and scheme casing never matter; path casing does. The bare
/// root path is omitted, so `example.com` and `example.com/` coincide.
pub fn normalize_url(raw: &str) -> Result<String, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoreError::InvalidUrl(
            "URL cannot be empty or blank".to_string(),
        ));
    }

    let candidate = if trimmed.starts_with("https://") || trimmed.starts_with("http://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    if !candidate.starts_with("https://") {
        return Err(CoreError::InvalidUrl(
            "only HTTPS URLs are allowed".to_string(),
        ));
    }

    if candidate.len() > MAX_URL_LENGTH {
        return Err(CoreError::InvalidUrl(format!(
            "URL length exceeds maximum allowed length of {MAX_URL_LENGTH}"
        )));
    }

    let parsed = Url::parse(&candidate)
        .map_err(|e| CoreError::InvalidUrl(format!("invalid URL format: {e}")))?;

    let host = parsed
        .host_str()
        .ok_or_else(|| CoreError::InvalidUrl("URL must have a host".to_string()))?;

    // The url crate lowercases registered domain names during parsing.
    if host.to_ascii_lowercase().contains(SERVICE_DOMAIN) {
        return Err(CoreError::InvalidUrl(format!(
            "URLs pointing to {SERVICE_DOMAIN} are not allowed to prevent loops"
        )));
    }

    let mut normalized = format!("{}://{}", parsed.scheme(), host);

    if let Some(port) = parsed.port() {
        normalized.push(':');
        normalized.push_str(&port.to_string());
    }

    let path = parsed.path();
    if !path.is_empty() && path != "/" {
        normalized.push_str(path);
    }

    if let Some(query) = parsed.query() {
        if !query.is_empty() {
            normalized.push('?');
            normalized.push_str(query);
        }
    }

    if let Some(fragment) = parsed.fragment() {
        if !fragment.is_empty() {
            normalized.push('#');
            normalized.push_str(fragment);
        }
    }

    Ok(normalized)
}
