use serde::de::DeserializeOwned;
use thiserror::Error;

/// A deserialization failure together with the JSON path it happened at.
#[derive(Error, Debug)]
#[error("at JSON path {at} → {source}")]
pub struct PathedError {
    pub at: String,
    #[source]
    pub source: serde_json::Error,
}

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, PathedError> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(into_pathed)
}

fn into_pathed(err: serde_path_to_error::Error<serde_json::Error>) -> PathedError {
    PathedError {
        at: err.path().to_string(),
        source: err.into_inner(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, Debug)]
    #[allow(dead_code)]
    struct Outer { inner: Inner }

    #[derive(Deserialize, Debug)]
    #[allow(dead_code)]
    struct Inner { flags: Vec<bool> }

    #[test]
    fn error_names_the_failing_path() {
        let err = from_str_with_path::<Outer>(r#"{"inner": {"flags": [true, 3]}}"#).unwrap_err();
        assert_eq!(err.at, "inner.flags[1]");
    }
}
