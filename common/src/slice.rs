/// One cross-section of the model at a fixed Z height. Immutable once
/// produced by a slicing operation.
#[derive(Clone, Debug)]
pub struct SliceLayer {
    /// 1-based layer number, matching the exported file names.
    pub number: u32,
    /// Height of the cut plane in mm.
    pub z: f32,
    /// Encoded PNG bytes for the exposure mask.
    pub image: Vec<u8>,
    /// Exposure time for this layer in seconds.
    pub exposure_time: f32,
    /// Whether this layer gets the extended bottom exposure.
    pub bottom: bool,
}

/// The ordered layer stack plus aggregate print statistics. Owned by the
/// caller that requested the slice.
#[derive(Clone, Debug, Default)]
pub struct SliceResult {
    pub layers: Vec<SliceLayer>,

    pub total_layers: u32,
    /// Total print time in minutes.
    pub print_time: f32,
    /// Sum of per-layer exposure times in seconds.
    pub total_exposure_time: f32,
    /// Sum of per-layer platform movement times in seconds.
    pub total_lift_time: f32,
    /// Estimated resin use in ml.
    pub resin_volume: f32,
    /// Estimated resin cost, `resin_volume * price_per_liter / 1000`.
    pub cost: f32,
}

/// Print statistics computed by the layer planner alone. Available without
/// rasterizing anything.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PrintEstimate {
    /// Z extent of the transformed model in mm, floored at zero.
    pub model_height: f32,
    pub layer_count: u32,
    pub total_exposure_time: f32,
    pub total_lift_time: f32,
    /// Total print time in minutes.
    pub print_time: f32,
    pub resin_volume: f32,
    pub cost: f32,
}
