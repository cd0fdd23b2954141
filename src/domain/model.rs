use crate::utils::error::ForwardError;
use url::Url;

pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://api.covidtracking.com/v2";

/// One of the four upstream resources the API exposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    NationalDaily,
    SingleDay { date: String },
    States,
    StateByCode { state_code: String },
}

impl Resource {
    /// Human-readable name used in logs and in the transport failure message.
    pub fn label(&self) -> &'static str {
        match self {
            Resource::NationalDaily => "national daily data",
            Resource::SingleDay { .. } => "single day data",
            Resource::States => "state data",
            Resource::StateByCode { .. } => "data for the state",
        }
    }

    /// The caller-supplied path parameter, if this resource takes one.
    pub fn parameter(&self) -> Option<(&'static str, &str)> {
        match self {
            Resource::SingleDay { date } => Some(("date", date)),
            Resource::StateByCode { state_code } => Some(("stateCode", state_code)),
            Resource::NationalDaily | Resource::States => None,
        }
    }

    /// 組出上游 URL。參數只會成為單一路徑片段 (會做 percent-encoding)
    pub fn upstream_url(&self, base: &Url) -> Result<Url, ForwardError> {
        let mut url = base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ForwardError::Unexpected {
                    message: format!("upstream base URL cannot be a base: {}", base),
                })?;
            segments.pop_if_empty();

            match self {
                Resource::NationalDaily => {
                    segments.extend(["us", "daily.json"]);
                }
                Resource::SingleDay { date } => {
                    segments.extend(["us", "daily"]).push(&format!("{}.json", date));
                }
                Resource::States => {
                    segments.push("states.json");
                }
                Resource::StateByCode { state_code } => {
                    segments.push("states").push(&format!("{}.json", state_code));
                }
            }
        }
        Ok(url)
    }
}

/// Upstream 2xx payload, kept as raw bytes.
#[derive(Debug, Clone)]
pub struct Passthrough {
    pub body: Vec<u8>,
    pub content_type: Option<String>,
}
