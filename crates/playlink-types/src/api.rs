use serde::{Deserialize, Deserializer, Serialize};

// -- Link codes --

/// Body of POST /api/link, sent by the game client when a player requests a
/// link code. Roblox HTTP payloads carry `userId` as a JSON number or a
/// string depending on the client script, so the id is coerced to its string
/// form on the way in.
#[derive(Debug, Deserialize)]
pub struct LinkCodeRequest {
    #[serde(rename = "userId", default, deserialize_with = "opt_string_coerce")]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "opt_string_coerce")]
    pub username: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

// -- Playtime --

/// Body of POST /api/playtime, one report per play session.
#[derive(Debug, Deserialize)]
pub struct PlaytimeRequest {
    #[serde(rename = "userId", default, deserialize_with = "opt_string_coerce")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub playtime: Option<i64>,
}

// -- Link form --

/// Fields of the website's POST /link form.
#[derive(Debug, Deserialize)]
pub struct LinkForm {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(rename = "websiteUserId", default)]
    pub website_user_id: Option<String>,
}

// -- Responses --

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Accepts a JSON string or number and yields its string form.
fn opt_string_coerce<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Float(n) => n.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_user_id_coerces_to_string() {
        let req: LinkCodeRequest =
            serde_json::from_str(r#"{"userId": 99, "username": "Bob", "code": "ABC123"}"#)
                .unwrap();
        assert_eq!(req.user_id.as_deref(), Some("99"));
        assert_eq!(req.username.as_deref(), Some("Bob"));
        assert_eq!(req.code.as_deref(), Some("ABC123"));
    }

    #[test]
    fn string_user_id_passes_through() {
        let req: PlaytimeRequest =
            serde_json::from_str(r#"{"userId": "99", "playtime": 120}"#).unwrap();
        assert_eq!(req.user_id.as_deref(), Some("99"));
        assert_eq!(req.playtime, Some(120));
    }

    #[test]
    fn missing_fields_deserialize_as_none() {
        let req: PlaytimeRequest = serde_json::from_str(r#"{"userId": "99"}"#).unwrap();
        assert_eq!(req.playtime, None);

        let req: LinkCodeRequest = serde_json::from_str("{}").unwrap();
        assert!(req.user_id.is_none());
        assert!(req.code.is_none());
    }
}
