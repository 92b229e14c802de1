//! Request body decoding and response encoding.
//!
//! Requests may arrive as JSON or YAML, picked by a substring match on the
//! declared content type. Responses are always JSON.

use serde::Serialize;

use crate::error::Error;
use crate::model::Application;

/// A request body format this service understands.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// Picks the format for a `Content-Type` header value.
    ///
    /// Parameters and surrounding text are tolerated
    /// (`application/json; charset=utf-8` is JSON). JSON wins if both
    /// substrings appear.
    pub fn from_content_type(content_type: &str) -> Result<Self, Error> {
        if content_type.contains("application/json") {
            Ok(Self::Json)
        } else if content_type.contains("application/x-yaml") {
            Ok(Self::Yaml)
        } else {
            Err(Error::UnsupportedMediaType)
        }
    }

    pub fn decode(self, body: &[u8]) -> Result<Application, Error> {
        match self {
            Self::Json => serde_json::from_slice(body).map_err(Error::Json),
            Self::Yaml => serde_yaml::from_slice(body).map_err(Error::Yaml),
        }
    }
}

/// Decodes `body` according to `content_type`.
pub fn decode(body: &[u8], content_type: &str) -> Result<Application, Error> {
    Format::from_content_type(content_type)?.decode(body)
}

/// Encodes a record, or a slice of records, as JSON.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, Error> {
    serde_json::to_vec(value).map_err(Error::Encode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Maintainer;

    const YAML: &str = "\
title: Valid App 2
version: 1.0.1
maintainers:
  - name: AppTwo Maintainer
    email: apptwo@hotmail.com
company: Upbound Inc.
website: https://upbound.io
source: https://github.com/upbound/repo
license: Apache-2.0
description: |
  ### Why app 2 is the best
  Because it simply is...
";

    #[test]
    fn content_type_selection() {
        let pick = Format::from_content_type;
        assert!(matches!(pick("application/json"), Ok(Format::Json)));
        assert!(matches!(pick("application/json; charset=utf-8"), Ok(Format::Json)));
        assert!(matches!(pick("application/x-yaml"), Ok(Format::Yaml)));
        assert!(matches!(pick("text/plain"), Err(Error::UnsupportedMediaType)));
        assert!(matches!(pick(""), Err(Error::UnsupportedMediaType)));
    }

    #[test]
    fn decodes_yaml_block_scalars() {
        let app = decode(YAML.as_bytes(), "application/x-yaml").unwrap();
        assert_eq!(app.title, "Valid App 2");
        assert_eq!(app.version, "1.0.1");
        assert_eq!(
            app.maintainers,
            vec![Maintainer::new("AppTwo Maintainer", "apptwo@hotmail.com")]
        );
        assert_eq!(app.description, "### Why app 2 is the best\nBecause it simply is...\n");
    }

    #[test]
    fn decodes_json_ignoring_unknown_fields() {
        let body = br#"{"title":"t","version":"1","extra":{"nested":true}}"#;
        let app = decode(body, "application/json").unwrap();
        assert_eq!(app.title, "t");
        assert!(app.maintainers.is_empty());
    }

    #[test]
    fn json_null_decodes_like_a_missing_field() {
        let body = br#"{"title":null,"version":"1.0","maintainers":[{"name":"A","email":"a@x.co"}],
            "company":"C","website":"W","source":"S","license":"L","description":"D"}"#;
        let app = decode(body, "application/json").unwrap();
        assert!(app.title.is_empty());
        assert_eq!(
            crate::validate::validate(&app, false),
            Err(crate::validate::ValidationError::TitleRequired)
        );

        let yaml = decode(b"title: null\nversion: \"1.0\"\n", "application/x-yaml").unwrap();
        let json = decode(br#"{"title":null,"version":"1.0"}"#, "application/json").unwrap();
        assert_eq!(yaml, json);
    }

    #[test]
    fn malformed_body_carries_parser_message() {
        let err = decode(b"{\"title\":", "application/json").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
        assert!(err.to_string().contains("EOF"), "{err}");

        let err = decode(b"title: [unclosed", "application/x-yaml").unwrap_err();
        assert!(matches!(err, Error::Yaml(_)));
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn json_round_trip_keeps_non_empty_fields() {
        let app = decode(YAML.as_bytes(), "application/x-yaml").unwrap();
        let app = Application { id: "3".into(), ..app };
        let back = decode(&encode(&app).unwrap(), "application/json").unwrap();
        assert_eq!(back, app);
    }
}
