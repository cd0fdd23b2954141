use crate::domain::model::{Passthrough, Resource};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{AppError, ForwardError, Result};
use crate::utils::validation::validate_url;
use reqwest::{header, Client};
use url::Url;

/// Relays one inbound call to one upstream resource.
///
/// Holds a shared `reqwest::Client`; cloning the forwarder shares its
/// connection pool. Every call issues at most one outbound GET.
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: Client,
    base_url: Url,
}

impl Forwarder {
    pub fn new(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        validate_url("upstream.base_url", config.upstream_base_url())?;
        let base_url = Url::parse(config.upstream_base_url()).map_err(|e| {
            AppError::InvalidConfigValueError {
                field: "upstream.base_url".to_string(),
                value: config.upstream_base_url().to_string(),
                reason: e.to_string(),
            }
        })?;

        let mut builder = Client::builder();
        if let Some(user_agent) = config.user_agent() {
            builder = builder.user_agent(user_agent.to_string());
        }

        Ok(Self::new(builder.build()?, base_url))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn forward(
        &self,
        resource: &Resource,
    ) -> std::result::Result<Passthrough, ForwardError> {
        let result = self.try_forward(resource).await;
        if let Err(e) = &result {
            log_failure(resource, e);
        }
        result
    }

    async fn try_forward(
        &self,
        resource: &Resource,
    ) -> std::result::Result<Passthrough, ForwardError> {
        if let Some((name, value)) = resource.parameter() {
            if value.trim().is_empty() {
                return Err(ForwardError::InvalidParameter {
                    name,
                    value: value.to_string(),
                });
            }
        }

        let url = resource.upstream_url(&self.base_url)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(resource, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ForwardError::upstream_status(status));
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response
            .bytes()
            .await
            .map_err(|e| classify_reqwest_error(resource, e))?;

        Ok(Passthrough {
            body: body.to_vec(),
            content_type,
        })
    }
}

fn classify_reqwest_error(resource: &Resource, err: reqwest::Error) -> ForwardError {
    // builder 錯誤代表請求本身組不起來，不屬於網路問題
    if err.is_builder() {
        return ForwardError::Unexpected {
            message: err.to_string(),
        };
    }
    ForwardError::Transport {
        resource: resource.label(),
        source: err,
    }
}

fn log_failure(resource: &Resource, err: &ForwardError) {
    let target = match resource.parameter() {
        Some((name, value)) => format!("{} ({}={})", resource.label(), name, value),
        None => resource.label().to_string(),
    };

    match err {
        ForwardError::UpstreamStatus { status, reason } => {
            tracing::error!("Error fetching {}: {} - {}", target, status.as_u16(), reason);
        }
        ForwardError::Transport { source, .. } => {
            tracing::error!("Transport failure fetching {}: {}", target, source);
        }
        ForwardError::InvalidParameter { name, value } => {
            tracing::warn!("Rejected {} request: blank {} parameter {:?}", target, name, value);
        }
        ForwardError::Unexpected { message } => {
            tracing::error!("Unexpected failure fetching {}: {}", target, message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_forwarder() -> Forwarder {
        Forwarder::new(Client::new(), Url::parse("http://127.0.0.1:1/v2").unwrap())
    }

    #[tokio::test]
    async fn test_blank_parameter_is_rejected_before_sending() {
        let forwarder = unreachable_forwarder();
        let err = forwarder
            .forward(&Resource::StateByCode {
                state_code: "  ".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ForwardError::InvalidParameter {
                name: "stateCode",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_failure() {
        let forwarder = unreachable_forwarder();
        let err = forwarder.forward(&Resource::States).await.unwrap_err();
        assert!(matches!(err, ForwardError::Transport { .. }));
        assert_eq!(
            err.user_friendly_message(),
            "An error occurred while fetching state data."
        );
    }
}
