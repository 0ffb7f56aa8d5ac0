use anyhow::Result;
use reqwest::Client;

pub const DEFAULT_SPDX_URL: &str = "https://spdx.org/licenses";

/// Fetch the canonical text of a license (or license exception) from the SPDX license list.
pub async fn fetch_license_text(client: &Client, base_url: &str, id: &str) -> Result<Option<String>> {
    let url = format!("{}/{}.json", base_url.trim_end_matches('/'), id);

    let response = client
        .get(&url)
        .header("User-Agent", concat!("license-builder/", env!("CARGO_PKG_VERSION")))
        .header("Accept", "application/json")
        .send()
        .await?;

    if !response.status().is_success() {
        return Ok(None);
    }

    let data: serde_json::Value = response.json().await?;
    Ok(license_text_field(&data))
}

/// Licenses carry `licenseText`, exceptions carry `licenseExceptionText`.
fn license_text_field(data: &serde_json::Value) -> Option<String> {
    ["licenseText", "licenseExceptionText"]
        .iter()
        .find_map(|field| data.get(*field).and_then(|t| t.as_str()))
        .filter(|t| !t.trim().is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_license_text_field() {
        let license = json!({ "licenseId": "MIT", "licenseText": "MIT License\n..." });
        assert_eq!(license_text_field(&license).as_deref(), Some("MIT License\n..."));

        let exception = json!({ "licenseExceptionId": "LLVM-exception", "licenseExceptionText": "LLVM Exceptions" });
        assert_eq!(license_text_field(&exception).as_deref(), Some("LLVM Exceptions"));

        assert_eq!(license_text_field(&json!({ "licenseText": "  " })), None);
        assert_eq!(license_text_field(&json!({})), None);
    }
}
