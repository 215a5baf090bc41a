use reqwest::StatusCode;
use url::Url;

pub type Result<T> = ::std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to parse as URL '{url}'")]
    InvalidSyntaxUrl {
        url: String,

        #[source]
        source: url::ParseError,
    },

    #[error("Not a Codeforces contest/problem URL '{0}'")]
    NotContestUrl(Url),

    #[error("Invalid contest id '{0}'")]
    InvalidContestId(String),

    #[error("Unexpected response code '{got}' while requesting to {requested_url}")]
    UnexpectedResponseCode {
        got: StatusCode,
        requested_url: String,
    },

    #[error("Codeforces API rejected the request to {requested_url}: {comment}")]
    ApiFailed {
        comment: String,
        requested_url: String,
    },

    #[error("No standings row for handle '{0}' (not registered to the contest?)")]
    NotParticipated(String),

    #[error("Invalid URL pattern: {0}")]
    UrlGlob(#[from] glob::PatternError),

    #[error("Http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
