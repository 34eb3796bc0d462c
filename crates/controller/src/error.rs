use foundation::ids::RegionId;
use scene::binding::BindingError;
use scene::index::DatasetError;

#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

#[derive(Debug)]
pub enum ControllerError {
    // Construction failures; no partial UI is built.
    Config(ConfigError),
    MissingElement(String),
    MissingGeometry,
    Binding(BindingError),
    Dataset(DatasetError),

    // Per-event failures; the controller stays usable.
    MissingData(DatasetError),
    LabelOutOfRange { index: usize, len: usize },
    UnknownRegion(RegionId),
    Template(String),
}

impl ControllerError {
    /// True for errors that prevent a controller from being built at all.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ControllerError::Config(_)
                | ControllerError::MissingElement(_)
                | ControllerError::MissingGeometry
                | ControllerError::Binding(_)
                | ControllerError::Dataset(_)
        )
    }
}

impl std::fmt::Display for ControllerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ControllerError::Config(e) => write!(f, "{e}"),
            ControllerError::MissingElement(id) => write!(f, "required element #{id} not found"),
            ControllerError::MissingGeometry => {
                write!(f, "no feature collection given and regions carry no geometry")
            }
            ControllerError::Binding(e) => write!(f, "cannot bind shapes: {e}"),
            ControllerError::Dataset(e) => write!(f, "cannot index dataset: {e}"),
            ControllerError::MissingData(e) => write!(f, "missing data: {e}"),
            ControllerError::LabelOutOfRange { index, len } => {
                write!(f, "no filter control {index} (labels={len})")
            }
            ControllerError::UnknownRegion(id) => write!(f, "unknown region {id}"),
            ControllerError::Template(msg) => write!(f, "tooltip template failed: {msg}"),
        }
    }
}

impl std::error::Error for ControllerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ControllerError::Config(e) => Some(e),
            ControllerError::Binding(e) => Some(e),
            ControllerError::Dataset(e) | ControllerError::MissingData(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for ControllerError {
    fn from(e: ConfigError) -> Self {
        ControllerError::Config(e)
    }
}

impl From<BindingError> for ControllerError {
    fn from(e: BindingError) -> Self {
        ControllerError::Binding(e)
    }
}

/// Lookups after construction only fail for the computation at hand.
impl From<DatasetError> for ControllerError {
    fn from(e: DatasetError) -> Self {
        ControllerError::MissingData(e)
    }
}
