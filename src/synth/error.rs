use thiserror::Error;
#[derive(Debug, Error)]
pub enum SynthError {
    #[error("canvas must have positive, finite size; got {width}x{height}")]
    InvalidCanvas { width: f32, height: f32 },
    #[error("invalid {field}: {value} (must be finite and non-zero)")]
    InvalidParameter { field: &'static str, value: f32 },
    #[error("could not parse {field} from {input:?}")]
    UnparsableField { field: &'static str, input: String },
    #[error("unknown {kind} category {value:?}")]
    UnknownCategory { kind: &'static str, value: String },
    #[error("no trace synthesized yet; pump at least one request first")]
    EmptyTrace,
    #[error("failed to render plot: {0}")]
    Plot(String),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
}
impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for SynthError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        SynthError::Plot(format!("{value:?}"))
    }
}
impl From<image::ImageError> for SynthError {
    fn from(value: image::ImageError) -> Self {
        SynthError::Plot(value.to_string())
    }
}
