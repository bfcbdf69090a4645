use crate::api::{success_body, transport};
use crate::error::{ClientError, Result};

pub fn login_endpoint(base_url: &str) -> String {
    let base_url = base_url.trim_end_matches('/');
    format!("{base_url}/api/authRoutes/login")
}

pub fn signup_endpoint(base_url: &str) -> String {
    let base_url = base_url.trim_end_matches('/');
    format!("{base_url}/api/authRoutes/signup")
}

/// Exchanges credentials for a bearer token. Storing the token is the
/// caller's concern.
pub async fn login(
    client: &reqwest::Client,
    base_url: &str,
    username: &str,
    password: &str,
) -> Result<String> {
    let body = serde_json::json!({
        "username": username,
        "password": password,
    });
    let response = client
        .post(login_endpoint(base_url))
        .json(&body)
        .send()
        .await
        .map_err(transport)?;
    let raw = success_body(response).await?;

    let value: serde_json::Value = serde_json::from_str(&raw)
        .map_err(|err| ClientError::Transport(format!("malformed login response: {err}")))?;
    value
        .get("token")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .ok_or_else(|| ClientError::Transport("login response had no token".to_owned()))
}

pub async fn signup(
    client: &reqwest::Client,
    base_url: &str,
    username: &str,
    email: &str,
    password: &str,
) -> Result<()> {
    let body = serde_json::json!({
        "username": username,
        "email": email,
        "password": password,
    });
    let response = client
        .post(signup_endpoint(base_url))
        .json(&body)
        .send()
        .await
        .map_err(transport)?;
    success_body(response).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_tolerate_trailing_slashes() {
        assert_eq!(
            login_endpoint("https://club.example/"),
            "https://club.example/api/authRoutes/login"
        );
        assert_eq!(
            signup_endpoint("https://club.example"),
            "https://club.example/api/authRoutes/signup"
        );
    }
}
