use std::fmt::Debug;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use url::Url;

use crate::serde::{SerdePathError, SerdeResponseParse};

#[derive(Debug)]
pub enum ReqwestStage {
    Send,
    Status,
    DecodeText,
    Deserialise,
}

pub(crate) fn parse_url<U: ToString>(url: U) -> crate::Result<Url> {
    url.to_string()
        .parse::<Url>()
        .map_err(|_| crate::Error::InvalidUrl(url.to_string()))
}

#[derive(Debug)]
#[allow(dead_code)]
pub struct ReqwestErrorContext {
    pub url: Url,
    json_body: String,
}

#[derive(Debug)]
pub enum ReqwestInnerError {
    Reqwest(reqwest::Error),
    SerdePath(SerdePathError),
}

/// A POST request that reports which stage of the round trip failed.
pub struct Reqwest {
    builder: RequestBuilder,
    error_context: Option<ReqwestErrorContext>,
}

impl Reqwest {
    pub fn post(client: &Client, url: &Url) -> Self {
        Self {
            builder: client.post(url.clone()),
            error_context: Some(ReqwestErrorContext {
                url: url.clone(),
                json_body: String::new(),
            }),
        }
    }

    pub fn json_body<T: serde::Serialize + Debug>(mut self, json_body: &T) -> Self {
        if let Some(context) = self.error_context.as_mut() {
            context.json_body = format!("{json_body:?}");
        }
        self.builder = self.builder.json(json_body);
        self
    }

    async fn receive_text_internal(mut self) -> crate::Result<(String, Box<ReqwestErrorContext>)> {
        let error_context = Box::new(
            self.error_context
                .take()
                .ok_or(crate::Error::ReqwestErrorContextMissing)?,
        );

        let send_result = self.builder.send().await;
        let response = match send_result {
            Ok(response) => response,
            Err(err) if err.is_connect() => return Err(crate::Error::Internet(error_context.url)),
            Err(err) => {
                return Err(crate::Error::ReqwestFailed {
                    stage: ReqwestStage::Send,
                    context: error_context,
                    inner: ReqwestInnerError::Reqwest(err),
                })
            }
        };

        let response = match response.error_for_status() {
            Ok(response) => response,
            Err(err) => {
                return Err(crate::Error::ReqwestFailed {
                    stage: ReqwestStage::Status,
                    context: error_context,
                    inner: ReqwestInnerError::Reqwest(err),
                })
            }
        };

        match response.text().await {
            Ok(text) => Ok((text, error_context)),
            Err(err) => Err(crate::Error::ReqwestFailed {
                stage: ReqwestStage::DecodeText,
                context: error_context,
                inner: ReqwestInnerError::Reqwest(err),
            }),
        }
    }

    pub async fn receive_json<J: DeserializeOwned>(self) -> crate::Result<J> {
        let (text, error_context) = self.receive_text_internal().await?;

        text.as_str()
            .serde_parse_custom()
            .map_err(|err| crate::Error::ReqwestFailed {
                stage: ReqwestStage::Deserialise,
                context: error_context,
                inner: ReqwestInnerError::SerdePath(err),
            })
    }
}
