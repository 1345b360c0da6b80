use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Deserialise piped JSON from stdin into a typed struct.
/// Returns None when stdin is a TTY or nothing was piped.
pub fn read_stdin<T: DeserializeOwned>() -> Result<Option<T>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_piped(&buffer)
}

fn parse_piped<T: DeserializeOwned>(buffer: &str) -> Result<Option<T>, Box<dyn std::error::Error>> {
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value: T = serde_json::from_str(trimmed)
        .map_err(|e| format!("Failed to parse stdin: {}", e))?;
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmbs_core::analysis::PoolAnalysisInput;

    #[test]
    fn test_blank_input_is_none() {
        let parsed: Option<PoolAnalysisInput> = parse_piped("  \n").unwrap();
        assert!(parsed.is_none());
    }

    #[test]
    fn test_piped_pool_input() {
        let json = r#"{"pool":{"principal":"1000000","annual_rate":"0.05","term_months":120,"psa_speed":"2"}}"#;
        let parsed: PoolAnalysisInput = parse_piped(json).unwrap().unwrap();
        assert_eq!(parsed.pool.term_months, 120);
    }

    #[test]
    fn test_malformed_input_reports_stdin() {
        let err = parse_piped::<PoolAnalysisInput>("{not json").unwrap_err();
        assert!(err.to_string().contains("stdin"));
    }
}
