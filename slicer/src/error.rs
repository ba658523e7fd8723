use thiserror::Error;

/// Failures raised by slicing operations. Every precondition variant is
/// produced before any per-layer work begins, so a failed slice never
/// returns a partial result.
#[derive(Debug, Error)]
pub enum SliceError {
    #[error("layer thickness must be greater than 0mm")]
    InvalidLayerThickness,

    #[error(
        "model height ({height:.2}mm) exceeds build volume height ({limit}mm), \
         scale down the model"
    )]
    ModelTooTall { height: f32, limit: f32 },

    #[error("layer count ({0}) exceeds the safe limit, check the layer thickness setting")]
    TooManyLayers(u32),

    #[error(
        "ran out of memory while rasterizing, increase the layer thickness \
         or simplify the model"
    )]
    ResourceExhausted,

    #[error("failed to encode layer image")]
    ImageEncode(#[from] png::EncodingError),
}
