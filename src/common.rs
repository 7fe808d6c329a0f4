//! Protocol independent description of an A/C state.
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// The protocol a state was decoded from or will be encoded with
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[strum(serialize_all = "UPPERCASE")]
pub enum DecodeType {
    Voltas,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OpMode {
    Off,
    Auto,
    Cool,
    Heat,
    Dry,
    Fan,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum FanSpeed {
    Auto,
    Min,
    Low,
    Medium,
    High,
    Max,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwingV {
    Off,
    Auto,
    Highest,
    High,
    Middle,
    Low,
    Lowest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwingH {
    Off,
    Auto,
    LeftMax,
    Left,
    Middle,
    Right,
    RightMax,
    Wide,
}

/// Everything a generic A/C remote may know about.
///
/// `None` marks settings the source protocol doesn't carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcState {
    pub protocol: DecodeType,
    pub model: Option<i16>,
    pub power: bool,
    pub mode: Option<OpMode>,
    pub celsius: bool,
    pub degrees: f32,
    pub fan_speed: FanSpeed,
    pub swing_v: Option<SwingV>,
    pub swing_h: Option<SwingH>,
    pub quiet: Option<bool>,
    pub turbo: bool,
    pub econo: bool,
    pub light: bool,
    pub filter: Option<bool>,
    pub clean: Option<bool>,
    pub beep: Option<bool>,
    // Minutes until sleep, or off
    pub sleep: Option<i16>,
    // Minutes past midnight
    pub clock: Option<i16>,
}
