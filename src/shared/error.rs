use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow CI systems to distinguish a complete graph from a
/// partial one and from outright failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - every package in the graph was resolved
    Success = 0,
    /// The graph was produced but some packages could not be resolved
    PartialGraph = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (network error, file I/O error, invalid input, etc.)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::PartialGraph => write!(f, "Partial Graph (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Application-specific errors for dependency graph resolution.
///
/// Uses thiserror to derive Display and Error traits automatically.
/// Callers that need to branch on the failure kind recover it from an
/// `anyhow::Error` with `downcast_ref::<DepGraphError>()`.
#[derive(Debug, Error)]
pub enum DepGraphError {
    #[error("Unknown ecosystem '{ecosystem}'. Supported ecosystems: {supported}")]
    UnknownEcosystem { ecosystem: String, supported: String },

    #[error("Invalid package identity '{input}'\nReason: {reason}\n\n💡 Hint: Use the form ecosystem:name:version (e.g. maven:com.google.guava:guava:31.1-jre)")]
    InvalidIdentity { input: String, reason: String },

    #[error("Invalid version override '{input}'\nReason: {reason}\n\n💡 Hint: Use the form name=version (e.g. com.google.guava:guava=32.1.3-jre)")]
    InvalidOverride { input: String, reason: String },

    #[error("Failed to reach the metadata service while resolving {package}\nDetails: {source}\n\n💡 Hint: Check your network connection and the --base-url setting")]
    Transport {
        package: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Malformed response from the metadata service for {package}\nDetails: {details}\n\n💡 Hint: The service may be returning an unexpected payload; verify --base-url points at a dependency-graph endpoint")]
    MalformedResponse { package: String, details: String },

    #[error("Metadata service client is shut down; request for {package} was not completed")]
    ClientShutDown { package: String },

    #[error("Manifest file not found: {path}\n\n💡 Hint: {suggestion}")]
    ManifestNotFound { path: PathBuf, suggestion: String },

    #[error("Failed to parse manifest {path} at line {line}\nDetails: {details}\n\n💡 Hint: Each non-comment line must be a single ecosystem:name:version coordinate")]
    ManifestParseError {
        path: PathBuf,
        line: usize,
        details: String,
    },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    #[error("Failed to read file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file exists and you have read permissions")]
    FileReadError { path: PathBuf, details: String },

    /// Validation error for request and policy construction
    #[error("Validation error: {message}")]
    Validation { message: String },
}
