use crate::error::ChromePrepError;

/// Oldest Chromium major version the consumers of `chrome.json` work with.
pub const MIN_CHROMIUM_MAJOR_VERSION: u32 = 75;

const PRODUCT_NAME: &str = "chromium ";

/// Version reported by a Chromium executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChromiumVersion {
    pub major: u32,
    /// Full version text, e.g. `90.0.4430.0`.
    pub full: String,
}

/// Extracts the version from `--version` output such as `Chromium 90.0.4430.0`.
///
/// The product name is matched case-insensitively and the major component must
/// be followed by a dot. The first occurrence that carries a version wins.
pub fn parse_chromium_version(output: &str) -> Result<ChromiumVersion, ChromePrepError> {
    let parse_error = || ChromePrepError::VersionParse {
        output: output.trim().to_string(),
    };

    let lowercase = output.to_ascii_lowercase();
    let (rest, digits) = lowercase
        .match_indices(PRODUCT_NAME)
        .map(|(index, _)| &output[index + PRODUCT_NAME.len()..])
        .find_map(|rest| {
            let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
            (digits > 0 && rest.as_bytes().get(digits) == Some(&b'.')).then_some((rest, digits))
        })
        .ok_or_else(parse_error)?;

    let major = rest[..digits].parse().map_err(|_| parse_error())?;
    let full = rest
        .split_whitespace()
        .next()
        .unwrap_or(&rest[..digits])
        .to_string();

    Ok(ChromiumVersion { major, full })
}

/// Accept/reject decision for a probe output.
pub fn check_version(output: &str, min_major: u32) -> Result<ChromiumVersion, ChromePrepError> {
    let version = parse_chromium_version(output)?;
    if version.major < min_major {
        return Err(ChromePrepError::VersionTooOld {
            found: version.major,
            minimum: min_major,
        });
    }
    Ok(version)
}
