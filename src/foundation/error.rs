pub type HeatwallResult<T> = Result<T, HeatwallError>;

#[derive(thiserror::Error, Debug)]
pub enum HeatwallError {
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("render precondition failed: {0}")]
    RenderPrecondition(String),

    #[error("write error: {0}")]
    Write(String),

    #[error("wallpaper error: {0}")]
    Platform(#[from] PlatformError),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HeatwallError {
    pub fn render_precondition(msg: impl Into<String>) -> Self {
        Self::RenderPrecondition(msg.into())
    }

    pub fn write(msg: impl Into<String>) -> Self {
        Self::Write(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Failure to obtain a contribution calendar from the remote API.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("api returned http {status}: {body}")]
    Status { status: u16, body: String },

    #[error("api reported errors: {}", .0.join("; "))]
    Query(Vec<String>),

    #[error("user '{0}' not found")]
    UserNotFound(String),

    #[error("unexpected response shape: {0}")]
    Shape(String),
}

/// Failure to apply an image as the desktop background.
#[derive(thiserror::Error, Debug)]
pub enum PlatformError {
    #[error("setting the wallpaper is not supported on {platform}")]
    Unsupported { platform: String },

    #[error("wallpaper path '{0}' is not valid UTF-8")]
    InvalidPath(String),

    #[error("failed to run '{program}': {reason}")]
    Spawn { program: String, reason: String },

    #[error("'{program}' exited with {status}: {stderr}")]
    CommandFailed {
        program: String,
        status: String,
        stderr: String,
    },
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
