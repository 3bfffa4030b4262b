//! Crate-wide error type.
//!
//! Fatal errors carry a process exit code so `main` can surface distinct
//! failure classes to shell scripts:
//!
//! - `2`: the input directory or its files are unusable
//! - `3`: too little data for the requested analysis
//! - `4`: a render or export step failed
//!
//! Row-level problems (an unparseable `sale_time`, for example) are *not*
//! `AppError`s; ingest records them as `RowError`s and keeps going.

#[derive(Clone)]
pub enum AppError {
    /// Input directory missing, unreadable, or containing no usable files.
    DataSource(String),
    /// Fewer aggregated days than the analysis needs.
    InsufficientData(String),
    /// A plot render or file export failed.
    Render(String),
}

impl AppError {
    pub fn data_source(message: impl Into<String>) -> Self {
        Self::DataSource(message.into())
    }

    pub fn insufficient_data(message: impl Into<String>) -> Self {
        Self::InsufficientData(message.into())
    }

    pub fn render(message: impl Into<String>) -> Self {
        Self::Render(message.into())
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Self::DataSource(_) => 2,
            Self::InsufficientData(_) => 3,
            Self::Render(_) => 4,
        }
    }

    fn message(&self) -> &str {
        match self {
            Self::DataSource(m) | Self::InsufficientData(m) | Self::Render(m) => m,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            Self::DataSource(_) => "DataSource",
            Self::InsufficientData(_) => "InsufficientData",
            Self::Render(_) => "Render",
        };
        f.debug_struct("AppError")
            .field("kind", &kind)
            .field("message", &self.message())
            .finish()
    }
}

impl std::error::Error for AppError {}
