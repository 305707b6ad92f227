//! HTTP-клиент админки поверх `gloo-net`
//!
//! Every request carries `Authorization: Bearer <token>` when the session has
//! a token and no such header otherwise. Non-2xx answers become
//! [`ApiError::Server`] with the `message` of the body, when there is one.

use contracts::shared::error::ApiError;
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::Serialize;
use serde_json::Value;
use web_sys::FormData;

use crate::shared::api_utils::api_url;
use crate::system::auth::session::AdminSession;

#[derive(Clone, Copy)]
pub struct ApiClient {
    session: AdminSession,
}

impl ApiClient {
    pub fn new(session: AdminSession) -> Self {
        Self { session }
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.session.bearer() {
            Some(header) => builder.header("Authorization", &header),
            None => builder,
        }
    }

    pub async fn get(&self, path: &str) -> Result<Value, ApiError> {
        log::debug!("GET {}", path);
        let response = self
            .authorize(Request::get(&api_url(path)))
            .send()
            .await
            .map_err(transport)?;
        read_json(response).await
    }

    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Value, ApiError> {
        log::debug!("POST {}", path);
        self.send_json(Request::post(&api_url(path)), body).await
    }

    pub async fn put<T: Serialize>(&self, path: &str, body: &T) -> Result<Value, ApiError> {
        log::debug!("PUT {}", path);
        self.send_json(Request::put(&api_url(path)), body).await
    }

    pub async fn patch<T: Serialize>(&self, path: &str, body: &T) -> Result<Value, ApiError> {
        log::debug!("PATCH {}", path);
        self.send_json(Request::patch(&api_url(path)), body).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        log::debug!("DELETE {}", path);
        let response = self
            .authorize(Request::delete(&api_url(path)))
            .send()
            .await
            .map_err(transport)?;
        read_json(response).await
    }

    /// `multipart/form-data`; the browser sets the boundary header itself.
    pub async fn post_form(&self, path: &str, form: FormData) -> Result<Value, ApiError> {
        log::debug!("POST (multipart) {}", path);
        self.send_form(Request::post(&api_url(path)), form).await
    }

    pub async fn put_form(&self, path: &str, form: FormData) -> Result<Value, ApiError> {
        log::debug!("PUT (multipart) {}", path);
        self.send_form(Request::put(&api_url(path)), form).await
    }

    /// Raw body of a file endpoint (templates, exports)
    pub async fn download(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        log::debug!("GET (binary) {}", path);
        let response = self
            .authorize(Request::get(&api_url(path)))
            .send()
            .await
            .map_err(transport)?;

        if !response.ok() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_response(status, &body));
        }
        response
            .binary()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn send_json<T: Serialize>(
        &self,
        builder: RequestBuilder,
        body: &T,
    ) -> Result<Value, ApiError> {
        let request = self
            .authorize(builder)
            .json(body)
            .map_err(|e| ApiError::Decode(format!("failed to serialize request: {}", e)))?;
        let response = request.send().await.map_err(transport)?;
        read_json(response).await
    }

    async fn send_form(&self, builder: RequestBuilder, form: FormData) -> Result<Value, ApiError> {
        let request = self
            .authorize(builder)
            .body(form)
            .map_err(|e| ApiError::Decode(format!("failed to build request: {}", e)))?;
        let response = request.send().await.map_err(transport)?;
        read_json(response).await
    }
}

fn transport(e: gloo_net::Error) -> ApiError {
    log::warn!("request failed: {}", e);
    ApiError::Transport(e.to_string())
}

/// Body as JSON; an empty 2xx body reads as `null`.
async fn read_json(response: Response) -> Result<Value, ApiError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))?;

    if !response.ok() {
        log::warn!("{} {} -> {}", response.url(), status, body);
        return Err(ApiError::from_response(status, &body));
    }
    parse_body(&body)
}

fn parse_body(body: &str) -> Result<Value, ApiError> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}
